//! Terminal host: owns the bridges, replays clicks and re-renders on change.
pub mod app;
pub mod config;
pub mod logging;
pub mod render;
pub mod script;
