use anyhow::Result;
use dotmatrix_gb::{GameBoy, GameBoyApp, GameBoyConfig};
use dotmatrix_sdl2::App;
use dotmatrix_sdl2::{SdlContext, SdlInitInfo};

/// Load `rom_data` into a fresh machine and run it in an SDL2 window until
/// the window closes, Escape is pressed, or emulation fails.
pub fn run_gameboy(config: GameBoyConfig, rom_data: &[u8]) -> Result<()> {
    let mut gb = GameBoy::with_config(config)?;
    gb.load_rom(rom_data)?;

    let mut app = GameBoyApp::new(gb);
    let init_info = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(app.title())
        .build();
    SdlContext::run(init_info, &mut app)?;

    if let Some(err) = app.take_error() {
        return Err(err.into());
    }
    Ok(())
}
