// ============================================================================
// FILE: src/lib.rs - Library Root
// ============================================================================
pub mod assets;
pub mod config;
pub mod disk;
pub mod engine;
pub mod errors;
pub mod input;
pub mod language;
pub mod locator;
pub mod subsystems;

pub use engine::SkyEngine;
pub use errors::SkyError;
