pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod gitlab;
pub mod labels;
pub mod logging;
pub mod output;

pub use error::{Result, SemverLabelsError};
