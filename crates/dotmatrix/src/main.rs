use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dotmatrix_gb::GameBoyConfig;

const USAGE: &str = "Usage: dotmatrix <rom_path> [--boot <boot_rom>] [--no-strict-banks] [--no-random-ram]";

fn main() -> Result<()> {
    env_logger::init();

    let mut rom_path: Option<PathBuf> = None;
    let mut boot_path: Option<PathBuf> = None;
    let mut strict_banks = true;
    let mut randomize_ram = true;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--boot" => boot_path = Some(args.next().context(USAGE)?.into()),
            "--no-strict-banks" => strict_banks = false,
            "--no-random-ram" => randomize_ram = false,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            other if other.starts_with("--") => bail!("unknown option '{other}'\n{USAGE}"),
            _ if rom_path.is_none() => rom_path = Some(arg.into()),
            _ => bail!(USAGE),
        }
    }

    let rom_path = rom_path.context(USAGE)?;
    log::info!("Playing ROM path: '{}'", rom_path.display());
    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM '{}'", rom_path.display()))?;

    let mut config = GameBoyConfig::builder()
        .strict_bank_switch(strict_banks)
        .randomize_ram(randomize_ram)
        .build();
    if let Some(path) = boot_path {
        let boot = std::fs::read(&path)
            .with_context(|| format!("failed to read boot ROM '{}'", path.display()))?;
        config.boot_rom = Some(boot);
    }

    dotmatrix::run_gameboy(config, &rom)
}
