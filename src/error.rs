use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum PulpError {
    #[error("cannot access '{}': No such file or directory", .0.display())]
    RootNotFound(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot write output '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, PulpError>;
