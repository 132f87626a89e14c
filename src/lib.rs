// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod analysis;
pub mod app_dirs;
pub mod config;
pub mod game;
pub mod phrases;
pub mod store;
pub mod trial;
pub mod ui;
pub mod util;
