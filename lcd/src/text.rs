//! Line formatting helpers. These only shape the bytes; nothing here touches the bus.
use log::warn;
use std::fmt::Display;

/// Renders `text` into bytes the controller's ROM can show.
///
/// Newlines are dropped, since a line is written in one go. Non-ASCII characters are replaced
/// with `?`.
pub fn render(text: impl Display) -> Vec<u8> {
    text.to_string()
        .chars()
        .filter(|&c| c != '\n')
        .map(|c| {
            if c.is_ascii() {
                c as u8
            } else {
                warn!("Non-ASCII character: {}", c);
                b'?'
            }
        })
        .collect()
}

/// Cuts `line` to at most `width` bytes.
pub fn truncate(mut line: Vec<u8>, width: usize) -> Vec<u8> {
    line.truncate(width);
    line
}

/// Pads `line` with trailing spaces up to `width`. Longer lines are left alone.
pub fn pad(mut line: Vec<u8>, width: usize) -> Vec<u8> {
    if line.len() < width {
        line.resize(width, b' ');
    }
    line
}

/// Prepends `count` spaces.
pub fn shift(line: Vec<u8>, count: usize) -> Vec<u8> {
    let mut shifted = vec![b' '; count];
    shifted.extend(line);
    shifted
}

/// Centers `line` in `width` cells. Odd leftovers go to the right.
pub fn center(line: Vec<u8>, width: usize) -> Vec<u8> {
    let offset = width.saturating_sub(line.len()) / 2;
    pad(shift(line, offset), width)
}

/// Right-aligns `line` in `width` cells, without any trailing padding.
pub fn right_justify(line: Vec<u8>, width: usize) -> Vec<u8> {
    let offset = width.saturating_sub(line.len());
    shift(line, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_strips_newlines_and_non_ascii() {
        assert_eq!(render("a\nb"), b"ab");
        assert_eq!(render("zażółć"), b"za????");
        assert_eq!(render(format_args!("{}°C", 21)), b"21?C");
    }

    #[test]
    fn pad_and_truncate() {
        assert_eq!(pad(b"Hello".to_vec(), 8), b"Hello   ");
        assert_eq!(pad(b"Hello".to_vec(), 3), b"Hello");
        assert_eq!(truncate(b"Hello".to_vec(), 3), b"Hel");
        assert_eq!(truncate(b"Hi".to_vec(), 3), b"Hi");
    }

    #[test]
    fn center_sixteen() {
        assert_eq!(center(b"There".to_vec(), 16), b"     There      ");
        assert_eq!(center(b"".to_vec(), 4), b"    ");
        assert_eq!(center(b"toolongtext".to_vec(), 4), b"toolongtext");
    }

    #[test]
    fn right_justify_sixteen() {
        assert_eq!(right_justify(b"LCD".to_vec(), 16), b"             LCD");
        assert_eq!(right_justify(b"toolong".to_vec(), 4), b"toolong");
    }
}
