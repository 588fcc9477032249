use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    StorageIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    StorageParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize storage: {0}")]
    StorageSerialize(#[from] toml::ser::Error),

    #[error("audio output unavailable: {0}")]
    AudioDevice(#[from] rodio::StreamError),

    #[error("audio playback failed: {0}")]
    AudioPlayback(#[from] rodio::PlayError),
}

pub type Result<T> = std::result::Result<T, Error>;
