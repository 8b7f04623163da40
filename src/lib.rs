pub mod config;
pub mod error;
pub mod failure;
pub mod output;
pub mod report;
pub mod run;

pub use error::{Error, Result};
