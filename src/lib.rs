use std::result;

pub mod archive;
pub mod class;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod resolve;

pub type Result<T> = result::Result<T, error::LintError>;
