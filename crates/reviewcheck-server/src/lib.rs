pub mod cli;
pub mod config;
pub mod predict;
pub mod server;
pub mod state;

pub use cli::*;
pub use config::*;
pub use predict::*;
pub use server::*;
pub use state::*;
