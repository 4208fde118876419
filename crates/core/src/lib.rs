pub mod catalog;
pub mod domain;
pub mod engine;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub catalog_path: Option<PathBuf>,
        pub catalog_url: Option<String>,
        pub pairings_path: Option<PathBuf>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                catalog_path: non_empty_var("CATALOG_PATH").map(PathBuf::from),
                catalog_url: non_empty_var("CATALOG_URL"),
                pairings_path: non_empty_var("PAIRINGS_PATH").map(PathBuf::from),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_catalog_url(&self) -> anyhow::Result<&str> {
            self.catalog_url
                .as_deref()
                .context("CATALOG_URL is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}
