use std::time::Duration;
use tracing::warn;
use typed_builder::TypedBuilder;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the Rybbit endpoint.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RybbitConfig {
    /// Full URL events are posted to.
    #[builder(setter(into))]
    pub api_url: String,
    /// Sent as a bearer token.
    #[builder(setter(into))]
    pub api_key: String,
    /// Default site id for events.
    #[builder(setter(into))]
    pub site_id: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

impl RybbitConfig {
    /// Builds a config only when all three settings are present and non-empty.
    ///
    /// A partial configuration disables analytics and logs a warning.
    pub fn from_parts(
        api_url: Option<String>,
        api_key: Option<String>,
        site_id: Option<String>,
    ) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let (api_url, api_key, site_id) = (present(api_url), present(api_key), present(site_id));

        match (api_url, api_key, site_id) {
            (Some(api_url), Some(api_key), Some(site_id)) => Some(
                Self::builder()
                    .api_url(api_url)
                    .api_key(api_key)
                    .site_id(site_id)
                    .build(),
            ),
            (None, None, None) => None,
            _ => {
                warn!(
                    "Rybbit analytics partially configured, analytics disabled; \
                     set RYBBIT_API_URL, RYBBIT_API_KEY and RYBBIT_SITE_ID"
                );
                None
            }
        }
    }
}
