mod config;

use crate::config::Config;
use dotenv::dotenv;
use i2clcd::{I2cBus, Lcd, LcdError, MemoryBus};
use log::{debug, info, warn};
use std::thread::sleep;
use sysinfo::System;
use time::OffsetDateTime;

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    const UNKNOWN_STR: &str = "???";

    info!(
        "Hello, {}!",
        System::host_name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!("Architecture {}", System::cpu_arch());

    let config = Config::load()?;
    info!(
        "LCD {}x{} @ {} {:#04x}, pins {:?}",
        config.rows, config.columns, config.device, config.address, config.pins
    );

    if config.dry_run {
        dry_run(&config)
    } else {
        hardware(&config)
    }
}

#[cfg(target_os = "linux")]
fn hardware(config: &Config) -> eyre::Result<()> {
    let lcd = Lcd::with_pins(config.rows, config.columns, config.pins)?;
    lcd.enable_hardware(&config.device, config.address)?;
    debug!("{:?} initialized.", lcd);
    greet(&lcd, config)
}

#[cfg(not(target_os = "linux"))]
fn hardware(_config: &Config) -> eyre::Result<()> {
    Err(eyre::eyre!("I2C displays are only supported on Linux, set I2CLCD_DRY_RUN=1 to simulate"))
}

fn dry_run(config: &Config) -> eyre::Result<()> {
    let bus = MemoryBus::new();
    let lcd = Lcd::with_pins(config.rows, config.columns, config.pins)?;
    lcd.enable(bus.clone())?;
    debug!("{:?} initialized.", lcd);
    greet(&lcd, config)?;
    info!("Dry run done, {} bytes written to the bus.", bus.len());
    Ok(())
}

fn greet<B: I2cBus>(lcd: &Lcd<B>, config: &Config) -> eyre::Result<()> {
    lcd.power_on()?;
    lcd.backlight_on()?;
    lcd.clear()?;
    lcd.set_position(1, 1)?;

    lcd.print_at(1, "Hello")?;
    lcd.center_at(2, "There")?;
    match lcd.right_justify_at(3, clock()) {
        Err(err @ LcdError::LineOutOfRange { .. }) => warn!("Clock not shown: {}", err),
        other => {
            other?;
        }
    }

    info!("Holding for {:?}...", config.hold());
    sleep(config.hold());

    lcd.clear()?;
    lcd.backlight_off()?;
    lcd.power_off()?;
    Ok(())
}

fn clock() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!("{:02}:{:02}", now.hour(), now.minute())
}
