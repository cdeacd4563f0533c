//! Config load and save failures.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config.ron: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("could not write config.ron: {0}")]
    WriteError(#[source] std::io::Error),

    /// The file exists but is not valid RON for [`crate::Config`].
    #[error("config.ron is malformed: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("could not serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// The OS did not expose a configuration directory and none was given.
    #[error("no configuration directory available")]
    NoConfigDir,
}
