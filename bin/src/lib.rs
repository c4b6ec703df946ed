pub mod cli;
pub mod commands;
pub mod loader;
pub mod render;
pub mod scheduler;
