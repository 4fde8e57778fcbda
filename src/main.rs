// src/main.rs
use std::fs::File;
use std::path::PathBuf;
use log::{info, warn};

use sky_engine::{
    config::ConfigStore,
    language::{Language, LanguageCode},
    locator,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let game_dir = args.next().map(PathBuf::from).unwrap_or(std::env::current_dir()?);
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| game_dir.join("sky.json"));

    info!("Game directory: {}", game_dir.display());
    let config = ConfigStore::load(&config_path)?;

    let requested = config
        .get_str("language")
        .map(|tag| Language::parse(&tag))
        .unwrap_or(Language::Other);
    info!("Requested language: {:?} ({:?})", requested, requested.code());

    let exe_path = game_dir.join("sky.exe");
    match File::open(&exe_path) {
        Ok(mut exe) => match locator::locate(&mut exe)? {
            Some(block) => info!(
                "{}: traditional Chinese data found ({} byte string block, {} glyphs)",
                exe_path.display(),
                block.block().len(),
                block.font().len()
            ),
            None => info!("{}: not a known traditional Chinese release", exe_path.display()),
        },
        Err(e) => {
            if requested.code() == LanguageCode::ChineseTraditional {
                warn!("Cannot open {}: {}", exe_path.display(), e);
            } else {
                info!("No {} present", exe_path.display());
            }
        }
    }

    Ok(())
}
