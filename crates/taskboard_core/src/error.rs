//! Error types shared across the crate.
//!
//! None of these are fatal to the sync client: the event loop turns every
//! failure into a state transition, a dropped frame, or a status message.

use thiserror::Error;

/// Failure to load, save, or interpret the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML for [`crate::config::Config`].
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// The config could not be serialized back to TOML.
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// The platform has no config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// A configured relay endpoint is not a usable WebSocket URL.
    #[error("Invalid relay URL {url:?}: {reason}")]
    InvalidUrl {
        /// The offending URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// An inbound frame that could not be interpreted.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame itself is not a JSON envelope.
    #[error("invalid envelope: {0}")]
    InvalidFrame(#[source] serde_json::Error),
    /// The envelope parsed, but its `payload` is not the expected nested JSON.
    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        /// Envelope type whose payload failed.
        kind: &'static str,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Transport error.
    #[error(transparent)]
    Transport(#[from] crate::sync::TransportError),
    /// Protocol error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
