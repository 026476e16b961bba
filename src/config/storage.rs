//! Storage backend selection and download URL precedence.
//!
//! The resolver keeps `storage_type` as the raw string it was given. Turning
//! it into a [`StorageKind`] happens at first dispatch through
//! [`ResolvedConfig::active_storage`], which is where an unknown backend
//! name is rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::StorageError;

use super::env::EnvReader;
use super::types::*;

/// Shared override consulted after the provider-specific variable.
pub const GLOBAL_DOWNLOAD_URL_VAR: &str = "DOWNLOAD_URL";

/// The closed set of binary storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Local,
    Qiniu,
    S3,
    Oss,
    TencentCloud,
}

impl StorageKind {
    pub const ALL: [StorageKind; 5] = [
        StorageKind::Local,
        StorageKind::Qiniu,
        StorageKind::S3,
        StorageKind::Oss,
        StorageKind::TencentCloud,
    ];

    /// Canonical name, as accepted in `STORAGE_TYPE`.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Local => "local",
            StorageKind::Qiniu => "qiniu",
            StorageKind::S3 => "s3",
            StorageKind::Oss => "oss",
            StorageKind::TencentCloud => "tencentcloud",
        }
    }

    /// Download URL sources for this backend, highest priority first.
    pub fn download_url_chain(self) -> DownloadUrlChain {
        DownloadUrlChain::new(match self {
            StorageKind::Local => "LOCAL_DOWNLOAD_URL",
            StorageKind::Qiniu => "QINIU_DOWNLOAD_URL",
            StorageKind::S3 => "AWS_DOWNLOAD_URL",
            StorageKind::Oss => "OSS_DOWNLOAD_URL",
            StorageKind::TencentCloud => "COS_DOWNLOAD_URL",
        })
    }
}

impl FromStr for StorageKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| StorageError::UnknownBackend(s.to_string()))
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider override, then [`GLOBAL_DOWNLOAD_URL_VAR`]. First set value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadUrlChain {
    provider_var: &'static str,
}

impl DownloadUrlChain {
    pub const fn new(provider_var: &'static str) -> Self {
        Self { provider_var }
    }

    pub fn candidates(&self) -> [&'static str; 2] {
        [self.provider_var, GLOBAL_DOWNLOAD_URL_VAR]
    }

    /// `None` when neither variable is set.
    pub fn resolve(&self, reader: &EnvReader<'_>) -> Option<String> {
        reader.first_of(&self.candidates())
    }

    /// Like [`resolve`](Self::resolve) but terminates in `fallback`.
    pub fn resolve_or(&self, reader: &EnvReader<'_>, fallback: &str) -> String {
        self.resolve(reader).unwrap_or_else(|| fallback.to_string())
    }
}

/// Borrowed view of the active storage profile.
#[derive(Debug, Clone, Copy)]
pub enum ActiveStorage<'a> {
    Local(&'a LocalConfig),
    Qiniu(&'a QiniuConfig),
    S3(&'a S3Config),
    Oss(&'a OssConfig),
    TencentCloud(&'a TencentCloudConfig),
}

impl<'a> ActiveStorage<'a> {
    pub fn kind(&self) -> StorageKind {
        match self {
            ActiveStorage::Local(_) => StorageKind::Local,
            ActiveStorage::Qiniu(_) => StorageKind::Qiniu,
            ActiveStorage::S3(_) => StorageKind::S3,
            ActiveStorage::Oss(_) => StorageKind::Oss,
            ActiveStorage::TencentCloud(_) => StorageKind::TencentCloud,
        }
    }

    /// Always `Some` for the local backend.
    pub fn download_url(&self) -> Option<&'a str> {
        match self {
            ActiveStorage::Local(c) => Some(c.download_url.as_str()),
            ActiveStorage::Qiniu(c) => c.download_url.as_deref(),
            ActiveStorage::S3(c) => c.download_url.as_deref(),
            ActiveStorage::Oss(c) => c.download_url.as_deref(),
            ActiveStorage::TencentCloud(c) => c.download_url.as_deref(),
        }
    }

    /// Download URL, or an error naming the backend that has none.
    pub fn require_download_url(&self) -> Result<&'a str, StorageError> {
        self.download_url()
            .ok_or(StorageError::MissingDownloadUrl { backend: self.kind().as_str() })
    }
}

impl ResolvedConfig {
    /// Parse `common.storage_type` into a [`StorageKind`].
    pub fn storage_kind(&self) -> Result<StorageKind, StorageError> {
        self.common.storage_type.parse()
    }

    /// Select the profile named by `common.storage_type`.
    ///
    /// Credentials of the selected profile are not checked; a missing key
    /// surfaces when the storage client first uses it.
    pub fn active_storage(&self) -> Result<ActiveStorage<'_>, StorageError> {
        Ok(match self.storage_kind()? {
            StorageKind::Local => ActiveStorage::Local(&self.local),
            StorageKind::Qiniu => ActiveStorage::Qiniu(&self.qiniu),
            StorageKind::S3 => ActiveStorage::S3(&self.s3),
            StorageKind::Oss => ActiveStorage::Oss(&self.oss),
            StorageKind::TencentCloud => ActiveStorage::TencentCloud(&self.tencentcloud),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::RawEnv;

    #[test]
    fn kind_round_trips_through_name() {
        for kind in StorageKind::ALL {
            assert_eq!(kind.as_str().parse::<StorageKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(
            "azure".parse::<StorageKind>(),
            Err(StorageError::UnknownBackend("azure".into()))
        );
        // names are case-sensitive
        assert!("S3".parse::<StorageKind>().is_err());
    }

    #[test]
    fn provider_override_beats_global() {
        let env: RawEnv = [("AWS_DOWNLOAD_URL", "https://cdn.s3"), ("DOWNLOAD_URL", "https://global")]
            .into_iter()
            .collect();
        let reader = EnvReader::new(&env);
        let chain = StorageKind::S3.download_url_chain();
        assert_eq!(chain.resolve(&reader).as_deref(), Some("https://cdn.s3"));
    }

    #[test]
    fn global_override_used_when_provider_unset() {
        let env: RawEnv = [("DOWNLOAD_URL", "https://global")].into_iter().collect();
        let reader = EnvReader::new(&env);
        for kind in StorageKind::ALL {
            let chain = kind.download_url_chain();
            assert_eq!(chain.resolve(&reader).as_deref(), Some("https://global"), "{kind}");
        }
    }

    #[test]
    fn fallback_only_when_chain_is_empty() {
        let env = RawEnv::default();
        let reader = EnvReader::new(&env);
        let chain = StorageKind::Local.download_url_chain();
        assert_eq!(chain.resolve(&reader), None);
        assert_eq!(chain.resolve_or(&reader, DEFAULT_LOCAL_DOWNLOAD_URL), DEFAULT_LOCAL_DOWNLOAD_URL);
    }

    #[test]
    fn candidates_are_ordered() {
        assert_eq!(
            StorageKind::TencentCloud.download_url_chain().candidates(),
            ["COS_DOWNLOAD_URL", "DOWNLOAD_URL"]
        );
    }
}
