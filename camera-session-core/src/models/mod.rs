pub mod config;
pub mod error;
pub mod media;
pub mod permission;
pub mod state;
