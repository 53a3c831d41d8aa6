use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const WWW_PREFIX: &str = "www.";

/// A host name in the form used to key the domain table and the cache.
///
/// Normalization lower-cases the host, drops a trailing `:port` and strips
/// exactly one leading `www.`, so `WWW.Example.com:443` and `example.com`
/// share one key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedHost(String);

impl NormalizedHost {
    pub fn new(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let without_port = strip_port(&lowered);

        let host = match without_port.strip_prefix(WWW_PREFIX) {
            Some(rest) if !rest.is_empty() => rest,
            _ => without_port,
        };

        Self(host.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        // A second colon means an IPv6 literal; leave it alone.
        Some((name, port))
            if !name.is_empty()
                && !name.contains(':')
                && !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            name
        }
        _ => host,
    }
}

impl Display for NormalizedHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedHost {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// The upstream username whose trips are resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidProfileId(
                "profile id cannot be empty".to_string(),
            ));
        }
        if trimmed.contains('/') {
            return Err(CoreError::InvalidProfileId(format!(
                "profile id must not contain '/': '{}'",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProfileId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ProfileId> for String {
    fn from(value: ProfileId) -> Self {
        value.0
    }
}

impl Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
