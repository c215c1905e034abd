use dotenv::var;
use eyre::WrapErr;
use i2clcd::PinMap;
use serde::{Deserialize, Serialize};
use std::env::var_os;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    /// I2C character device the expander hangs off.
    pub device: String,
    /// 7-bit slave address of the expander.
    pub address: u16,
    pub rows: u8,
    pub columns: u8,
    pub pins: PinMap,
    /// How long the greeting stays on screen.
    pub hold_secs: u64,
    /// Record bus traffic in memory instead of touching the hardware.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: "/dev/i2c-1".to_string(),
            address: 0x27,
            rows: 2,
            columns: 16,
            pins: PinMap::default(),
            hold_secs: 10,
            dry_run: false,
        }
    }
}

impl Config {
    /// Reads the config file named by `I2CLCD_CONFIG_FILE`, or `lcd.json`.
    ///
    /// Returns `Ok(None)` only if the file does not exist. A file that can't be read or parsed is
    /// an error.
    pub fn try_load() -> eyre::Result<Option<Self>> {
        let config_str = var_os("I2CLCD_CONFIG_FILE");
        let config_str: &OsStr = config_str.as_deref().unwrap_or(OsStr::new("lcd.json"));
        Self::try_load_from(Path::new(config_str))
    }

    fn try_load_from(config_path: &Path) -> eyre::Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }
        let file = std::fs::File::open(config_path)
            .wrap_err_with(|| format!("Invalid config {}", config_path.display()))?;
        let reader = std::io::BufReader::new(file);
        let config = serde_json::from_reader(reader)
            .wrap_err_with(|| format!("Invalid config {}", config_path.display()))?;
        Ok(Some(config))
    }

    /// Loads the config file (or defaults if there is none) and applies `I2CLCD_*` environment
    /// overrides.
    pub fn load() -> eyre::Result<Self> {
        let mut config = Self::try_load()?.unwrap_or_default();

        if let Ok(device) = var("I2CLCD_DEVICE") {
            config.device = device;
        }
        if let Ok(address) = var("I2CLCD_ADDRESS") {
            config.address = parse_address(&address)
                .wrap_err_with(|| format!("Invalid I2CLCD_ADDRESS {:?}", address))?;
        }
        if let Ok(rows) = var("I2CLCD_ROWS") {
            config.rows = rows.parse().wrap_err("Invalid I2CLCD_ROWS")?;
        }
        if let Ok(columns) = var("I2CLCD_COLUMNS") {
            config.columns = columns.parse().wrap_err("Invalid I2CLCD_COLUMNS")?;
        }
        if let Ok(hold) = var("I2CLCD_HOLD_SECS") {
            config.hold_secs = hold.parse().wrap_err("Invalid I2CLCD_HOLD_SECS")?;
        }
        if let Ok(dry_run) = var("I2CLCD_DRY_RUN") {
            config.dry_run = matches!(dry_run.trim(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_secs(self.hold_secs)
    }
}

/// Parses a slave address given either in decimal or as `0x`-prefixed hex.
fn parse_address(s: &str) -> Result<u16, std::num::ParseIntError> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}
