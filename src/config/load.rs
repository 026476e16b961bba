//! Configuration resolution from the environment.
//!
//! [`load`] snapshots the process environment and hands it to [`load_from`].
//! Tests build a [`RawEnv`] directly instead of mutating env vars.

use super::env::{EnvReader, RawEnv};
use super::reconnect::ReconnectPolicy;
use super::storage::StorageKind;
use super::types::*;

/// Resolve configuration from the current process environment.
pub fn load() -> ResolvedConfig {
    load_from(&RawEnv::from_process())
}

/// Resolve configuration from an explicit environment snapshot.
///
/// Never fails. Malformed numbers fall back to their defaults and unset
/// optional values stay `None` for the consuming subsystem to reject.
pub fn load_from(env: &RawEnv) -> ResolvedConfig {
    let env = EnvReader::new(env);

    ResolvedConfig {
        environment: env.string_or("NODE_ENV", "development"),
        log: LogConfig {
            level: env.string_or("LOG_LEVEL", "info"),
            format: env.string_or("LOG_FORMAT", "text"),
        },
        db: DbConfig {
            username: env.string_or("RDS_USERNAME", "root"),
            password: env.string_or("RDS_PASSWORD", "password"),
            database: env.string_or("RDS_DATABASE", "codepush"),
            host: env.string_or("RDS_HOST", "127.0.0.1"),
            port: env.number("RDS_PORT", 3306.0),
            dialect: "mysql".to_string(),
            logging: false,
        },
        local: LocalConfig {
            storage_dir: env.dir_or_temp("STORAGE_DIR"),
            download_url: StorageKind::Local
                .download_url_chain()
                .resolve_or(&env, DEFAULT_LOCAL_DOWNLOAD_URL),
            public: "/download".to_string(),
        },
        qiniu: QiniuConfig {
            access_key: env.string("QINIU_ACCESS_KEY"),
            secret_key: env.string("QINIU_SECRET_KEY"),
            bucket_name: env.string("QINIU_BUCKET_NAME"),
            download_url: StorageKind::Qiniu.download_url_chain().resolve(&env),
        },
        s3: S3Config {
            access_key_id: env.string("AWS_ACCESS_KEY_ID"),
            secret_access_key: env.string("AWS_SECRET_ACCESS_KEY"),
            session_token: env.string("AWS_SESSION_TOKEN"),
            bucket_name: env.string("AWS_BUCKET_NAME"),
            region: env.string("AWS_REGION"),
            download_url: StorageKind::S3.download_url_chain().resolve(&env),
        },
        oss: OssConfig {
            access_key_id: env.string("OSS_ACCESS_KEY_ID"),
            secret_access_key: env.string("OSS_SECRET_ACCESS_KEY"),
            endpoint: env.string("OSS_ENDPOINT"),
            bucket_name: env.string("OSS_BUCKET_NAME"),
            prefix: env.string("OSS_PREFIX"),
            download_url: StorageKind::Oss.download_url_chain().resolve(&env),
        },
        tencentcloud: TencentCloudConfig {
            access_key_id: env.string("COS_ACCESS_KEY_ID"),
            secret_access_key: env.string("COS_SECRET_ACCESS_KEY"),
            bucket_name: env.string("COS_BUCKET_NAME"),
            region: env.string("COS_REGION"),
            download_url: StorageKind::TencentCloud.download_url_chain().resolve(&env),
        },
        jwt: JwtConfig {
            token_secret: env.string_or("TOKEN_SECRET", PLACEHOLDER_TOKEN_SECRET),
        },
        common: CommonConfig {
            allow_registration: env.flag("ALLOW_REGISTRATION"),
            try_login_times: env.number("TRY_LOGIN_TIMES", 4.0),
            diff_nums: env.number("DIFF_NUMS", 3.0),
            data_dir: env.dir_or_temp("DATA_DIR"),
            storage_type: env.string_or("STORAGE_TYPE", StorageKind::Local.as_str()),
            update_check_cache: env.flag("UPDATE_CHECK_CACHE"),
            rollout_client_unique_id_cache: env.flag("ROLLOUT_CLIENT_UNIQUE_ID_CACHE"),
        },
        smtp: SmtpConfig {
            host: env.string("SMTP_HOST"),
            port: env.number("SMTP_PORT", 465.0),
            secure: true,
            auth: SmtpAuth {
                user: env.string("SMTP_USERNAME"),
                pass: env.string("SMTP_PASSWORD"),
            },
        },
        redis: CacheStoreConfig {
            host: env.string_or("REDIS_HOST", "127.0.0.1"),
            port: env.number("REDIS_PORT", 6379.0),
            password: env.string("REDIS_PASSWORD"),
            db: env.number("REDIS_DB", 0.0),
            reconnect: ReconnectPolicy::default(),
        },
    }
}
