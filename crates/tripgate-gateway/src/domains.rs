use crate::error::{GatewayError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use tripgate_core::{NormalizedHost, ProfileId};

#[derive(Debug, Deserialize)]
struct DomainFile {
    #[serde(default)]
    domains: HashMap<String, ProfileId>,
}

/// Host to profile mapping, loaded once at startup.
///
/// Keys are normalized on load so lookups go through [`NormalizedHost`].
/// Two spellings of one host (`www.a.com` and `a.com`) must agree on the
/// profile.
#[derive(Debug, Clone, Default)]
pub struct DomainTable {
    entries: HashMap<NormalizedHost, ProfileId>,
}

impl DomainTable {
    /// Parses `domains: { <host>: <profile> }`.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let file: DomainFile = serde_yaml::from_str(source)?;
        Self::from_entries(file.domains)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| GatewayError::DomainsIo {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_yaml(&source)?;
        info!(path = %path.display(), hosts = table.len(), "Domain table loaded");
        Ok(table)
    }

    pub fn from_entries<H: AsRef<str>>(
        entries: impl IntoIterator<Item = (H, ProfileId)>,
    ) -> Result<Self> {
        let mut table: HashMap<NormalizedHost, ProfileId> = HashMap::new();
        for (raw, profile) in entries {
            let host = NormalizedHost::new(raw.as_ref());
            if let Some(existing) = table.get(&host) {
                if existing != &profile {
                    return Err(GatewayError::ConflictingHost {
                        host: host.to_string(),
                        first: existing.to_string(),
                        second: profile.to_string(),
                    });
                }
                continue;
            }
            debug!(host = %host, profile = %profile, "Registered host");
            table.insert(host, profile);
        }
        Ok(Self { entries: table })
    }

    pub fn lookup(&self, host: &NormalizedHost) -> Option<&ProfileId> {
        self.entries.get(host)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn keys_are_normalized() {
        let table = DomainTable::from_yaml(
            "domains:\n  WWW.Alice.example: alice\n  bob.example:8080: bob\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup(&NormalizedHost::new("alice.example")).map(ProfileId::as_str),
            Some("alice")
        );
        assert_eq!(
            table.lookup(&NormalizedHost::new("www.bob.example")).map(ProfileId::as_str),
            Some("bob")
        );
        assert!(table.lookup(&NormalizedHost::new("carol.example")).is_none());
    }

    #[test]
    fn missing_domains_key_is_empty() {
        let table = DomainTable::from_yaml("{}").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn empty_profile_is_rejected() {
        assert!(DomainTable::from_yaml("domains:\n  a.example: \"\"\n").is_err());
    }

    #[test]
    fn duplicate_spellings_must_agree() {
        let same = DomainTable::from_yaml("domains:\n  a.example: alice\n  www.a.example: alice\n");
        assert_eq!(same.unwrap().len(), 1);

        let conflict =
            DomainTable::from_yaml("domains:\n  a.example: alice\n  www.a.example: bob\n");
        assert!(matches!(
            conflict,
            Err(GatewayError::ConflictingHost { .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "domains:\n  trip.example: alice").unwrap();

        let table = DomainTable::load(file.path()).unwrap();
        assert_eq!(
            table.lookup(&NormalizedHost::new("trip.example")).map(ProfileId::as_str),
            Some("alice")
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DomainTable::load("/nonexistent/domains.yaml").unwrap_err();
        assert!(matches!(err, GatewayError::DomainsIo { .. }));
    }
}
