//! Runtime configuration resolved from environment variables.
//!
//! Resolution runs once at startup and cannot fail. The resulting
//! [`ResolvedConfig`] is immutable and shared as a [`SharedConfig`].
//!
//! # Module layout
//!
//! - **env** — `RawEnv` snapshot and typed scalar coercion (`EnvReader`).
//! - **types** — Public configuration structs consumed by subsystems.
//! - **storage** — `StorageKind`, download URL chains, active-profile dispatch.
//! - **reconnect** — Redis reconnection policy.
//! - **load** — `load`, `load_from`.

mod env;
mod load;
mod reconnect;
mod storage;
mod types;

pub use env::{EnvNumber, EnvReader, RawEnv, to_bool, to_number};
pub use load::{load, load_from};
pub use reconnect::{ReconnectContext, ReconnectDecision, ReconnectPolicy};
pub use storage::{ActiveStorage, DownloadUrlChain, GLOBAL_DOWNLOAD_URL_VAR, StorageKind};
pub use types::*;
