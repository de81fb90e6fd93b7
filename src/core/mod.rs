//! Error taxonomy and the invoice selector types shared by all modules.

mod error;
mod types;

pub use error::*;
pub use types::*;
