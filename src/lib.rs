// src/lib.rs

pub mod cli;
pub mod layouts;
pub mod settings;
