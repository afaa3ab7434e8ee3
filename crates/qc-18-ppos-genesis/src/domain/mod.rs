pub mod config;
pub mod entities;
pub mod errors;
pub mod keys;

pub use config::*;
pub use entities::*;
pub use errors::*;
