pub mod api;
pub mod domain;
pub mod router;
pub mod store;

pub mod config {
    pub const DEFAULT_API_URL: &str = "http://localhost:3000";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_url: String,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                api_url: std::env::var("API_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                sentry_dsn: std::env::var("SENTRY_DSN")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
            })
        }
    }
}
