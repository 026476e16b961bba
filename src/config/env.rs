//! Raw environment snapshot and typed scalar coercion.
//!
//! [`RawEnv`] is captured once at startup; [`EnvReader`] turns its string
//! entries into booleans, numbers, strings and paths with defaults. Nothing
//! here fails: unparsable input degrades to the supplied default.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Immutable snapshot of the variables the resolver reads from.
#[derive(Debug, Clone, Default)]
pub struct RawEnv {
    vars: HashMap<String, String>,
}

impl RawEnv {
    /// Snapshot the current process environment.
    /// Entries whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Overlay a dotenv-format file. Variables already present in the
    /// snapshot keep their value, matching `dotenvy::dotenv()` semantics.
    pub fn with_env_file(mut self, path: &Path) -> Result<Self, AppError> {
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

        for item in iter {
            let (key, value) = item
                .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;
            self.vars.entry(key).or_insert(value);
        }
        Ok(self)
    }

    /// Look up a variable. An empty value (`VAR=`) counts as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for RawEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Numeric types the reader can coerce into.
pub trait EnvNumber: Copy {
    /// `None` means "fall back to the default".
    fn parse_env(raw: &str) -> Option<Self>;
}

macro_rules! int_env_number {
    ($($t:ty),* $(,)?) => {
        $(
            impl EnvNumber for $t {
                fn parse_env(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

int_env_number!(u8, u16, u32, u64, usize, i32, i64);

impl EnvNumber for f64 {
    fn parse_env(raw: &str) -> Option<Self> {
        raw.parse::<f64>().ok().filter(|n| !n.is_nan())
    }
}

/// `"true"` and `"1"` are true. Anything else, including absence, is false.
pub fn to_bool(raw: Option<&str>) -> bool {
    matches!(raw, Some("true" | "1"))
}

/// Parse `raw` as `T`, returning `default` when absent, unparsable or NaN.
/// Parsed values are returned without range checks.
///
/// An empty value never reaches this function as `Some("")`: [`RawEnv::get`]
/// treats `VAR=` as unset, so it yields `default` rather than `0`.
pub fn to_number<T: EnvNumber>(raw: Option<&str>, default: T) -> T {
    raw.map(str::trim).and_then(T::parse_env).unwrap_or(default)
}

/// Typed view over a [`RawEnv`].
#[derive(Debug, Clone, Copy)]
pub struct EnvReader<'a> {
    env: &'a RawEnv,
}

impl<'a> EnvReader<'a> {
    pub fn new(env: &'a RawEnv) -> Self {
        Self { env }
    }

    pub fn raw(&self, key: &str) -> Option<&'a str> {
        self.env.get(key)
    }

    pub fn flag(&self, key: &str) -> bool {
        to_bool(self.raw(key))
    }

    pub fn number<T: EnvNumber>(&self, key: &str, default: T) -> T {
        to_number(self.raw(key), default)
    }

    /// Optional string: `None` when unset, never `Some("")`.
    pub fn string(&self, key: &str) -> Option<String> {
        self.raw(key).map(str::to_owned)
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or(default).to_owned()
    }

    /// First key in `keys` that is set, in order.
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.string(k))
    }

    /// Directory path, defaulting to the OS temp dir.
    pub fn dir_or_temp(&self, key: &str) -> PathBuf {
        self.raw(key)
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir)
    }
}
