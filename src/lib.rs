//! Terminal explorer for places near a detected or entered position.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod location;
pub mod logging;
pub mod markers;
pub mod models;
pub mod render;
pub mod status;
pub mod ui;
