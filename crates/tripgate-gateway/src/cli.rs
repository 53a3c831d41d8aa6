use clap::Parser;
use std::path::PathBuf;

pub const PORT_ENV: &str = "PORT";
pub const DOMAINS_FILE_ENV: &str = "DOMAINS_FILE";
pub const DB_PATH_ENV: &str = "DB_PATH";
pub const NO_DB_ENV: &str = "TRIPGATE_NO_DB";
pub const UPSTREAM_URL_ENV: &str = "TRIPGATE_UPSTREAM_URL";
pub const PROFILE_BASE_URL_ENV: &str = "TRIPGATE_PROFILE_BASE_URL";
pub const UPSTREAM_TIMEOUT_ENV: &str = "TRIPGATE_UPSTREAM_TIMEOUT_SECS";
pub const GEO_API_URL_ENV: &str = "TRIPGATE_GEO_API_URL";
pub const RYBBIT_API_URL_ENV: &str = "RYBBIT_API_URL";
pub const RYBBIT_API_KEY_ENV: &str = "RYBBIT_API_KEY";
pub const RYBBIT_SITE_ID_ENV: &str = "RYBBIT_SITE_ID";
pub const LOG_JSON_ENV: &str = "TRIPGATE_LOG_JSON";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DOMAINS_FILE: &str = "domains.yaml";
pub const DEFAULT_DB_PATH: &str = "stats.db";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Parser)]
#[command(name = "tripgate", about = "Redirects custom domains to a traveller's current trip")]
pub struct CLI {
    /// Port to listen on, all interfaces.
    #[arg(long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = DOMAINS_FILE_ENV, default_value = DEFAULT_DOMAINS_FILE)]
    pub domains_file: PathBuf,

    /// SQLite file for visit statistics.
    #[arg(long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Keep visits in memory only.
    #[arg(long, env = NO_DB_ENV)]
    pub no_db: bool,

    #[arg(long, env = UPSTREAM_URL_ENV, default_value = tripgate_upstream::DEFAULT_API_URL)]
    pub upstream_url: String,

    #[arg(long, env = PROFILE_BASE_URL_ENV, default_value = tripgate_core::target::DEFAULT_PROFILE_BASE_URL)]
    pub profile_base_url: String,

    #[arg(long, env = UPSTREAM_TIMEOUT_ENV, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,

    /// ip-api compatible service for visit geolocation. Disabled when unset.
    #[arg(long, env = GEO_API_URL_ENV)]
    pub geo_api_url: Option<String>,

    #[arg(long, env = RYBBIT_API_URL_ENV)]
    pub rybbit_api_url: Option<String>,

    #[arg(long, env = RYBBIT_API_KEY_ENV, hide_env_values = true)]
    pub rybbit_api_key: Option<String>,

    #[arg(long, env = RYBBIT_SITE_ID_ENV)]
    pub rybbit_site_id: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,
}
