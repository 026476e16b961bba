//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs that subsystems consume.
//! Resolution from the environment lives in `load.rs`.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use super::reconnect::ReconnectPolicy;

/// Served by the local backend when no download URL override is set.
pub const DEFAULT_LOCAL_DOWNLOAD_URL: &str = "http://127.0.0.1:3000/download";

/// JWT secret used when `TOKEN_SECRET` is unset. Not safe for production.
pub const PLACEHOLDER_TOKEN_SECRET: &str = "INSERT_RANDOM_TOKEN_KEY";

/// Shared handle passed to every component after startup.
pub type SharedConfig = Arc<ResolvedConfig>;

// ── Logging ─────────────────────────────────────────────────────────────────

/// Logger settings. Both values are passed through unvalidated; the logger
/// rejects unknown values when it is initialised.
#[derive(Debug, Clone, Serialize)]
pub struct LogConfig {
    /// `error`, `warn`, `info` or `debug`.
    pub level: String,
    /// `text` or `json`.
    pub format: String,
}

// ── Database ────────────────────────────────────────────────────────────────
//
// Numeric fields are `f64` throughout: a value that parses is kept as given,
// including zero, negatives and fractions. Consumers range-check on use.

/// Relational database connection settings (MySQL only).
#[derive(Debug, Clone, Serialize)]
pub struct DbConfig {
    pub username: String,
    #[serde(serialize_with = "redact::string")]
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: f64,
    pub dialect: String,
    /// Whether the ORM should log its queries.
    pub logging: bool,
}

// ── Storage profiles ────────────────────────────────────────────────────────

/// Local-disk backend. The download URL always resolves.
#[derive(Debug, Clone, Serialize)]
pub struct LocalConfig {
    /// Where binaries are written. Must not be a public directory.
    pub storage_dir: PathBuf,
    pub download_url: String,
    /// Static route the server mounts `storage_dir` under.
    pub public: String,
}

/// Qiniu cloud storage.
#[derive(Debug, Clone, Serialize)]
pub struct QiniuConfig {
    pub access_key: Option<String>,
    #[serde(serialize_with = "redact::option")]
    pub secret_key: Option<String>,
    pub bucket_name: Option<String>,
    pub download_url: Option<String>,
}

/// Amazon S3.
#[derive(Debug, Clone, Serialize)]
pub struct S3Config {
    pub access_key_id: Option<String>,
    #[serde(serialize_with = "redact::option")]
    pub secret_access_key: Option<String>,
    #[serde(serialize_with = "redact::option")]
    pub session_token: Option<String>,
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    pub download_url: Option<String>,
}

/// Aliyun OSS.
#[derive(Debug, Clone, Serialize)]
pub struct OssConfig {
    pub access_key_id: Option<String>,
    #[serde(serialize_with = "redact::option")]
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
    pub bucket_name: Option<String>,
    /// Prefix prepended to every object key.
    pub prefix: Option<String>,
    pub download_url: Option<String>,
}

/// Tencent Cloud COS.
#[derive(Debug, Clone, Serialize)]
pub struct TencentCloudConfig {
    pub access_key_id: Option<String>,
    #[serde(serialize_with = "redact::option")]
    pub secret_access_key: Option<String>,
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    pub download_url: Option<String>,
}

// ── Auth / common ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct JwtConfig {
    #[serde(serialize_with = "redact::string")]
    pub token_secret: String,
}

impl JwtConfig {
    /// `true` while the secret is still the shipped placeholder.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.token_secret == PLACEHOLDER_TOKEN_SECRET
    }
}

/// Feature toggles and tuning knobs shared across subsystems.
#[derive(Debug, Clone, Serialize)]
pub struct CommonConfig {
    /// Whether new account registrations are accepted.
    pub allow_registration: bool,
    /// Failed logins allowed per day; `0` disables the limit. Requires Redis.
    pub try_login_times: f64,
    /// How many previous releases get a diff patch.
    pub diff_nums: f64,
    /// Scratch directory for diff computation.
    pub data_dir: PathBuf,
    /// Active storage backend name. Not validated here; see
    /// [`ResolvedConfig::active_storage`](super::ResolvedConfig::active_storage).
    pub storage_type: String,
    /// Cache update-check results in Redis.
    pub update_check_cache: bool,
    /// Cache rollout results per client id in Redis.
    pub rollout_client_unique_id_cache: bool,
}

// ── SMTP ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SmtpAuth {
    pub user: Option<String>,
    #[serde(serialize_with = "redact::option")]
    pub pass: Option<String>,
}

/// Outgoing mail, used by the registration flow.
#[derive(Debug, Clone, Serialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: f64,
    pub secure: bool,
    pub auth: SmtpAuth,
}

// ── Cache store ─────────────────────────────────────────────────────────────

/// Redis connection settings.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStoreConfig {
    pub host: String,
    pub port: f64,
    #[serde(serialize_with = "redact::option")]
    pub password: Option<String>,
    /// Logical database index.
    pub db: f64,
    #[serde(skip)]
    pub reconnect: ReconnectPolicy,
}

// ── Top level ───────────────────────────────────────────────────────────────

/// Fully-resolved runtime configuration. Built once at startup, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Deployment environment name (`NODE_ENV`), only used for diagnostics.
    pub environment: String,
    pub log: LogConfig,
    pub db: DbConfig,
    pub local: LocalConfig,
    pub qiniu: QiniuConfig,
    pub s3: S3Config,
    pub oss: OssConfig,
    pub tencentcloud: TencentCloudConfig,
    pub jwt: JwtConfig,
    pub common: CommonConfig,
    pub smtp: SmtpConfig,
    pub redis: CacheStoreConfig,
}

mod redact {
    use serde::Serializer;

    const REDACTED: &str = "<redacted>";

    #[allow(clippy::ptr_arg)]
    pub fn string<S: Serializer>(_: &String, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(REDACTED)
    }

    pub fn option<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(_) => s.serialize_some(REDACTED),
            None => s.serialize_none(),
        }
    }
}
