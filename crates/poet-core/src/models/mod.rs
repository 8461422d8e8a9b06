//! Data models for the application

mod identity;
mod storage;
mod upload;

pub use identity::*;
pub use storage::*;
pub use upload::*;
