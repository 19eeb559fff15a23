pub mod error;
pub mod hierarchy;
pub mod keymap;
pub mod models;
pub mod report;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};
