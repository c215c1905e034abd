use crate::{LcdError, LcdResult};
use serde::{Deserialize, Serialize};

/// DDRAM address of the first cell of each line. Lines 3 and 4 continue lines 1 and 2 in the
/// controller's memory, which is why they start at 0x14 and 0x54.
const LINE_BASE: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Size of the display in character cells.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub rows: u8,
    pub columns: u8,
}

impl Geometry {
    pub const fn new(rows: u8, columns: u8) -> Self {
        Geometry { rows, columns }
    }

    /// Translates a 1-based (line, column) position into a DDRAM address.
    ///
    /// # Errors
    /// - [LcdError::LineOutOfRange] if `line` is 0, above [Self::rows] or beyond line 4.
    /// - [LcdError::ColumnOutOfRange] if `column` is 0 or above [Self::columns].
    ///
    /// `column == columns` is accepted and addresses the last cell.
    pub fn resolve_address(&self, line: u8, column: u8) -> LcdResult<u8> {
        let max_line = self.rows.min(LINE_BASE.len() as u8);
        if line == 0 || line > max_line {
            return Err(LcdError::LineOutOfRange { line, max: max_line });
        }
        if column == 0 || column > self.columns {
            return Err(LcdError::ColumnOutOfRange { column, max: self.columns });
        }

        LINE_BASE[line as usize - 1]
            .checked_add(column - 1)
            .ok_or(LcdError::ColumnOutOfRange { column, max: self.columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cell_of_a_20x4() {
        let geometry = Geometry::new(4, 20);
        for line in 1..=4 {
            for column in 1..=20 {
                assert_eq!(
                    geometry.resolve_address(line, column),
                    Ok(LINE_BASE[line as usize - 1] + column - 1),
                );
            }
        }
    }

    #[test]
    fn line_starts() {
        let geometry = Geometry::new(4, 20);
        assert_eq!(geometry.resolve_address(1, 1), Ok(0x00));
        assert_eq!(geometry.resolve_address(2, 1), Ok(0x40));
        assert_eq!(geometry.resolve_address(3, 1), Ok(0x14));
        assert_eq!(geometry.resolve_address(4, 1), Ok(0x54));
    }

    #[test]
    fn line_past_rows() {
        let geometry = Geometry::new(2, 16);
        assert_eq!(
            geometry.resolve_address(3, 1),
            Err(LcdError::LineOutOfRange { line: 3, max: 2 }),
        );
        assert_eq!(
            geometry.resolve_address(0, 1),
            Err(LcdError::LineOutOfRange { line: 0, max: 2 }),
        );
    }

    #[test]
    fn line_past_base_table() {
        let geometry = Geometry::new(6, 20);
        assert_eq!(
            geometry.resolve_address(5, 1),
            Err(LcdError::LineOutOfRange { line: 5, max: 4 }),
        );
    }

    #[test]
    fn column_boundary() {
        let geometry = Geometry::new(2, 16);
        assert_eq!(geometry.resolve_address(2, 16), Ok(0x4F));
        assert_eq!(
            geometry.resolve_address(2, 17),
            Err(LcdError::ColumnOutOfRange { column: 17, max: 16 }),
        );
        assert_eq!(
            geometry.resolve_address(1, 0),
            Err(LcdError::ColumnOutOfRange { column: 0, max: 16 }),
        );
    }

    #[test]
    fn wide_geometry_overflow() {
        let geometry = Geometry::new(4, 255);
        assert_eq!(geometry.resolve_address(4, 171), Ok(0xFE));
        assert_eq!(
            geometry.resolve_address(4, 173),
            Err(LcdError::ColumnOutOfRange { column: 173, max: 255 }),
        );
    }
}
