use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    #[error("input file not found: {0}")]
    #[diagnostic(help("check the path passed on the command line"))]
    InputNotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ConvertError {
    /// Classifies an error raised while opening or reading `path`.
    pub fn from_read(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ConvertError::InputNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied(path.to_path_buf()),
            _ => ConvertError::Read {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }

    pub fn from_write(path: &Path, err: impl ToString) -> Self {
        ConvertError::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Process exit code reported by the converter binaries.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::InputNotFound(_) | ConvertError::PermissionDenied(_) => 2,
            ConvertError::ConfigRead(_) | ConvertError::ConfigParse(_) => 3,
            _ => 1,
        }
    }
}
