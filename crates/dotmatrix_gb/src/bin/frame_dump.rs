//! Headless runner: execute a ROM for a number of frames and dump the last
//! frame as raw RGB24, optionally with the tile maps and the object layer.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dotmatrix_gb::{
    GameBoy, GameBoyConfig, TileMap, OBJECT_LAYER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_MAP_SIZE,
};

const USAGE: &str = "Usage: frame_dump <rom_path> <out_rgb24_path> [frames] [--bg-map <out_path>] [--win-map <out_path>] [--obj-layer <out_path>] [--boot <boot_rom>]";

struct Args {
    rom: PathBuf,
    out: PathBuf,
    frames: u32,
    bg_map: Option<PathBuf>,
    win_map: Option<PathBuf>,
    obj_layer: Option<PathBuf>,
    boot_rom: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut bg_map = None;
    let mut win_map = None;
    let mut obj_layer = None;
    let mut boot_rom = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bg-map" => bg_map = Some(args.next().context(USAGE)?.into()),
            "--win-map" => win_map = Some(args.next().context(USAGE)?.into()),
            "--obj-layer" => obj_layer = Some(args.next().context(USAGE)?.into()),
            "--boot" => boot_rom = Some(args.next().context(USAGE)?.into()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let rom: PathBuf = positional.next().context(USAGE)?.into();
    let out: PathBuf = positional.next().context(USAGE)?.into();
    let frames = match positional.next() {
        Some(frames) => frames
            .parse()
            .with_context(|| format!("invalid frame count '{frames}'"))?,
        None => 120,
    };
    if positional.next().is_some() {
        bail!(USAGE);
    }

    Ok(Args {
        rom,
        out,
        frames,
        bg_map,
        win_map,
        obj_layer,
        boot_rom,
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM '{}'", args.rom.display()))?;

    let mut config = GameBoyConfig::builder().randomize_ram(false).build();
    if let Some(path) = &args.boot_rom {
        let boot = std::fs::read(path)
            .with_context(|| format!("failed to read boot ROM '{}'", path.display()))?;
        config.boot_rom = Some(boot);
    }

    let mut gb = GameBoy::with_config(config)?;
    gb.load_rom(&rom)?;

    for frame in 0..args.frames {
        gb.step_frame()
            .with_context(|| format!("emulation failed in frame {frame} ({})", gb.cpu.regs))?;
    }

    let mut buffer = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
    gb.video_frame(&mut buffer);
    std::fs::write(&args.out, &buffer)
        .with_context(|| format!("failed to write '{}'", args.out.display()))?;
    println!(
        "Wrote {} bytes ({}x{} rgb24) after {} frames to '{}'",
        buffer.len(),
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        args.frames,
        args.out.display()
    );

    if let Some(path) = &args.bg_map {
        write_view(path, &gb.debug_tile_map(TileMap::Background), TILE_MAP_SIZE, "background map")?;
    }
    if let Some(path) = &args.win_map {
        write_view(path, &gb.debug_tile_map(TileMap::Window), TILE_MAP_SIZE, "window map")?;
    }
    if let Some(path) = &args.obj_layer {
        write_view(path, &gb.debug_object_layer(), OBJECT_LAYER_SIZE, "object layer")?;
    }

    Ok(())
}

/// Write a square shade buffer as raw RGB24.
fn write_view(path: &Path, shades: &[u8], side: usize, label: &str) -> Result<()> {
    let mut rgb = vec![0u8; side * side * 3];
    dotmatrix_gb::shades_to_rgb24(shades, &mut rgb);
    std::fs::write(path, &rgb).with_context(|| format!("failed to write '{}'", path.display()))?;
    println!("Wrote {side}x{side} rgb24 {label} to '{}'", path.display());
    Ok(())
}
