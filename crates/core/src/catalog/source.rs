use crate::catalog::Catalog;
use crate::config::Settings;
use crate::domain::card::Card;
use crate::engine::synergy::PairingTable;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRIES: u32 = 3;
const EMBEDDED_CARDS: &str = include_str!("../../data/cards.json");

#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn load_cards(&self) -> Result<Vec<Card>>;
}

pub fn parse_cards(text: &str) -> Result<Vec<Card>> {
    serde_json::from_str::<Vec<Card>>(text).context("catalog is not a valid JSON array of cards")
}

/// Cards compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedCatalogSource;

#[async_trait::async_trait]
impl CatalogSource for EmbeddedCatalogSource {
    fn source_name(&self) -> &'static str {
        "embedded"
    }

    async fn load_cards(&self) -> Result<Vec<Card>> {
        parse_cards(EMBEDDED_CARDS)
    }
}

#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for FileCatalogSource {
    fn source_name(&self) -> &'static str {
        "file"
    }

    async fn load_cards(&self) -> Result<Vec<Card>> {
        let text = read_file(&self.path).await?;
        parse_cards(&text).with_context(|| format!("parse catalog {} failed", self.path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    http: reqwest::Client,
    url: String,
    retries: u32,
}

impl HttpCatalogSource {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let url = settings.require_catalog_url()?.to_string();

        let timeout_secs = std::env::var("CATALOG_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("CATALOG_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES)
            .max(1);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build catalog http client")?;

        Ok(Self { http, url, retries })
    }

    async fn fetch_once(&self) -> Result<Vec<Card>> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("catalog request failed")?;

        let status = res.status();
        let text = res.text().await.context("failed to read catalog response")?;

        if !status.is_success() {
            anyhow::bail!("catalog HTTP {status}: {text}");
        }

        parse_cards(&text)
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalogSource {
    fn source_name(&self) -> &'static str {
        "http"
    }

    async fn load_cards(&self) -> Result<Vec<Card>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(cards) => return Ok(cards),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, error = %err, "catalog fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {} failed", path.display()))
}

/// Picks the catalog source from settings: URL, then path, then the embedded cards.
pub fn source_from_settings(settings: &Settings) -> Result<Box<dyn CatalogSource>> {
    if settings.catalog_url.is_some() {
        return Ok(Box::new(HttpCatalogSource::from_settings(settings)?));
    }
    if let Some(path) = &settings.catalog_path {
        return Ok(Box::new(FileCatalogSource::new(path)));
    }
    Ok(Box::new(EmbeddedCatalogSource))
}

pub async fn load_pairings(path: Option<&Path>) -> Result<PairingTable> {
    let Some(path) = path else {
        return Ok(PairingTable::default());
    };
    let text = read_file(path).await?;
    PairingTable::from_json(&text)
        .with_context(|| format!("parse pairing table {} failed", path.display()))
}

pub async fn load_catalog(source: &dyn CatalogSource, pairings: PairingTable) -> Result<Catalog> {
    let cards = source
        .load_cards()
        .await
        .with_context(|| format!("load catalog from {} source failed", source.source_name()))?;
    let catalog = Catalog::new(cards, pairings)?;

    tracing::info!(
        source = source.source_name(),
        cards = catalog.len(),
        pairing_rules = catalog.pairings().rules.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

pub async fn load_catalog_from_settings(settings: &Settings) -> Result<Catalog> {
    let source = source_from_settings(settings)?;
    let pairings = load_pairings(settings.pairings_path.as_deref()).await?;
    load_catalog(source.as_ref(), pairings).await
}
