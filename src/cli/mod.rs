pub mod commands;
pub mod context;
pub mod render;
pub mod alerts;
pub mod policies;
pub mod servers;
pub mod session;
pub mod serve;

pub use commands::{Cli, Commands};
