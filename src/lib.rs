// src/lib.rs

pub mod apps;
pub mod backup;
pub mod config;
pub mod constants;
pub mod errors;
pub mod orchestrator;
pub mod services;
pub mod state;
pub mod tweaks;
pub mod utils;
