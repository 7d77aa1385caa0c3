#[macro_use]
mod macros;

pub mod achievement;
pub mod api;
pub mod composed;
pub mod config;
pub mod de;
pub mod error;
pub mod schema;

pub use error::Error;
