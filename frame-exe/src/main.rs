//! Headless frame dumper. Renders a view of one of the built in levels with
//! the software renderer and writes it out as a PNG or PPM image.

mod cli;
mod config;
mod snapshot;

use cli::*;
use level::prefab;
use log::{debug, info};
use render_soft::SoftwareRenderer;
use render_trait::{IndexedBuffer, PlayViewRenderer};
use simplelog::TermLogger;
use std::error::Error;
use std::path::PathBuf;

use crate::config::UserConfig;

const BASE_DIR: &str = "room4doom/";

/// The main `frame-exe` crate should take care of initialising a few things
fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load()?;
    user_config.sync_cli(&mut options);
    user_config.write();

    let Some(build) = prefab::by_name(&options.level) else {
        return Err(format!("Unknown level {}, try one of {:?}", options.level, prefab::NAMES).into());
    };
    let mut room = build()?;
    room.view.pitch = options.pitch;
    info!("Rendering level {}", options.level);

    math::init_tables();
    let display = user_config.display_config();
    let mut renderer = SoftwareRenderer::new(display);
    let mut buffer = IndexedBuffer::new(display.width, display.height);

    for tic in 0..options.frames.max(1) {
        room.view.game_tic = tic;
        #[cfg(feature = "hprof")]
        coarse_prof::profile!("frame");
        let stats = renderer.render_player_view(&room.view, &room.map, &room.things, &room.pics, &mut buffer);
        debug!("Frame {tic}: {stats:?}");
        if tic == 0 {
            info!(
                "{} segs, {} visplanes, {} vissprites, {} sprite columns, {} BSP nodes",
                stats.segs, stats.visplanes, stats.vissprites, stats.sprite_columns, stats.bsp_nodes
            );
        }
    }
    #[cfg(feature = "hprof")]
    coarse_prof::write(&mut std::io::stdout())?;

    let path: PathBuf = user_config.output.clone().into();
    let palette = room.pics.palette().unwrap_or(&[]);
    snapshot::save_frame(&buffer, palette, &path)?;
    info!("Wrote {:?}", path);
    Ok(())
}
