// src/utils/mod.rs

pub mod command;
pub mod registry;
pub mod windows;
