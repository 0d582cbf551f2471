//! Error types for trialbal-loader

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Syntax error at {location}: {message}")]
    SyntaxError { location: String, message: String },

    #[error("Invalid include pattern: {pattern}")]
    InvalidInclude { pattern: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
