//! Core application setup and state management.

/// App construction: plugins, schedules, platform surfaces.
pub mod app_setup;

/// Application state machine and loading progress.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
