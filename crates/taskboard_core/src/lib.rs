//! # `taskboard_core`
//!
//! Shared code for Taskboard viewers.
//!
//! A viewer stays attached to a relay over a WebSocket and keeps a live,
//! project-scoped picture of a task board that an editor process publishes.
//! This crate holds the sync client ([`sync::BoardClient`]) along with the
//! pieces around it: persisted configuration, session identity and a
//! presentation projection of the board.

#![warn(missing_docs)]

/// Config docs
pub mod config;

/// Error docs
pub mod error;

/// Session identity
pub mod session;

pub mod sync;

/// Board projection
pub mod view;

pub use error::{Error, Result};
