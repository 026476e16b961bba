//! Runtime configuration for a code push update server.
//!
//! - **config** — environment snapshot, resolution and resolved types.
//! - **error** — application-wide error enums.
//! - **logger** — tracing-subscriber initialisation from `LogConfig`.

pub mod config;
pub mod error;
pub mod logger;
