/// Application state and event loop.
pub mod app;

/// Event stream and key dispatch.
pub mod event;

/// Frame rendering.
pub mod ui;

pub use app::App;
