use crate::model::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    /// Search service that turns one query into a set of result URLs.
    pub search_api_url: String,
    /// AI-completion endpoint used for query generation.
    pub completion_api_url: String,
    pub completion_api_key: Option<String>,
    pub completion_timeout_secs: u64,

    pub web_collector_url: String,
    pub instagram_collector_url: String,
    pub linkedin_collector_url: String,
    pub youtube_collector_url: String,

    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,

    /// Pause between consecutive search-service queries.
    pub inter_query_delay_ms: u64,
    /// Pause before a flagged page's single altered-identity refetch.
    pub decoy_retry_delay_ms: u64,
    pub web_url_cap: usize,
    pub social_url_cap: usize,
    pub max_concurrent_collectors: usize,
}

impl AppConfig {
    /// Service endpoint for the given platform's collector.
    #[must_use]
    pub fn collector_endpoint(&self, platform: Platform) -> &str {
        match platform {
            Platform::Web => &self.web_collector_url,
            Platform::Instagram => &self.instagram_collector_url,
            Platform::Linkedin => &self.linkedin_collector_url,
            Platform::Youtube => &self.youtube_collector_url,
        }
    }

    /// Maximum number of classified URLs handed to a collector.
    #[must_use]
    pub fn url_cap(&self, platform: Platform) -> usize {
        if platform.is_social() {
            self.social_url_cap
        } else {
            self.web_url_cap
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("search_api_url", &self.search_api_url)
            .field("completion_api_url", &self.completion_api_url)
            .field(
                "completion_api_key",
                &self.completion_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("completion_timeout_secs", &self.completion_timeout_secs)
            .field("web_collector_url", &self.web_collector_url)
            .field("instagram_collector_url", &self.instagram_collector_url)
            .field("linkedin_collector_url", &self.linkedin_collector_url)
            .field("youtube_collector_url", &self.youtube_collector_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("inter_query_delay_ms", &self.inter_query_delay_ms)
            .field("decoy_retry_delay_ms", &self.decoy_retry_delay_ms)
            .field("web_url_cap", &self.web_url_cap)
            .field("social_url_cap", &self.social_url_cap)
            .field(
                "max_concurrent_collectors",
                &self.max_concurrent_collectors,
            )
            .finish()
    }
}
