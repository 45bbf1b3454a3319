// src/config.rs
use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, ENV_NOTION_AUTH_TOKEN, NOTION_API_BASE_URL,
    NOTION_API_VERSION, REQUEST_TIMEOUT_SECS,
};
use crate::error::AppError;
use crate::types::{ApiKey, BaseUrl};
use clap::{Parser, Subcommand};
use std::time::Duration;

/// Lifetime and size of the session's lookup caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttl: Duration,
    /// Entries per cache; 0 disables caching.
    pub capacity: usize,
}

impl CacheSettings {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self { ttl, capacity }
    }

    /// Settings under which nothing is ever cached.
    pub fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            capacity: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0 && !self.ttl.is_zero()
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Everything needed to open a [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub api_key: ApiKey,
    pub base_url: BaseUrl,
    pub notion_version: String,
    pub timeout: Duration,
    pub cache: CacheSettings,
}

impl SessionConfig {
    /// Configuration with default endpoint, timeout and caching for the given token.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: default_base_url(),
            notion_version: NOTION_API_VERSION.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            cache: CacheSettings::default(),
        }
    }

    /// Uses `auth` when given, otherwise falls back to `NOTION_AUTH_TOKEN`.
    pub fn with_auth(auth: Option<&str>) -> Result<Self, AppError> {
        let token = match auth {
            Some(token) => token.to_string(),
            None => std::env::var(ENV_NOTION_AUTH_TOKEN).map_err(|_| {
                AppError::MissingConfiguration(format!(
                    "Either pass `auth` or set {}",
                    ENV_NOTION_AUTH_TOKEN
                ))
            })?,
        };
        Ok(Self::new(ApiKey::new(token)?))
    }

    /// Reads the integration token from `NOTION_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::with_auth(None)
    }

    pub fn with_base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: CacheSettings) -> Self {
        self.cache = cache;
        self
    }
}

fn default_base_url() -> BaseUrl {
    BaseUrl::parse(NOTION_API_BASE_URL).expect("Default Notion API URL should be valid")
}

/// Parsed command-line input of the `uno` binary.
#[derive(Parser, Debug)]
#[command(author, version, about = "Query a Notion workspace", long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Integration token (defaults to the NOTION_AUTH_TOKEN environment variable)
    #[arg(long)]
    pub token: Option<String>,

    /// Alternative API endpoint, e.g. a recording proxy
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Cache TTL in seconds
    #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Maximum entries per lookup cache (0 disables caching)
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_size: usize,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the session can reach Notion
    Status,
    /// Show the bot user of this integration
    Whoami,
    /// List all users of the workspace
    Users,
    /// Search databases by title
    SearchDb {
        /// Title to search for; lists all databases when omitted
        name: Option<String>,
        /// Match titles containing NAME instead of equal to it
        #[arg(long, default_value_t = false)]
        substring: bool,
        /// Only keep databases below this parent page (repeatable)
        #[arg(long = "parent")]
        parents: Vec<String>,
    },
    /// Search pages by title
    SearchPage {
        name: Option<String>,
        #[arg(long, default_value_t = false)]
        substring: bool,
        #[arg(long = "parent")]
        parents: Vec<String>,
    },
    /// Retrieve a database by id or URL
    Db { reference: String },
    /// Retrieve a page by id or URL
    Page { reference: String },
    /// Retrieve a user by id
    User { reference: String },
}

impl SessionConfig {
    /// Resolves a session configuration from CLI input and environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        let mut config = Self::with_auth(cli.token.as_deref())?.with_cache(CacheSettings::new(
            Duration::from_secs(cli.cache_ttl),
            cli.cache_size,
        ));
        if let Some(url) = &cli.base_url {
            config = config.with_base_url(BaseUrl::parse(url)?);
        }
        Ok(config)
    }
}
