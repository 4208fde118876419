use crate::domain::recommendation::Recommendation;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recommendation result saved for later inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationExport {
    pub generated_at: DateTime<Utc>,
    pub catalog_cards: usize,
    pub recommendation: Recommendation,
}

impl RecommendationExport {
    pub fn new(recommendation: Recommendation, catalog_cards: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            catalog_cards,
            recommendation,
        }
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("serialize recommendation export failed")
    }
}

pub fn parse_export(text: &str) -> anyhow::Result<RecommendationExport> {
    let export = serde_json::from_str::<RecommendationExport>(text.trim())
        .context("export is not valid JSON for the recommendation export schema")?;

    anyhow::ensure!(
        export.recommendation.best_overall.len() <= 3,
        "export bestOverall must have at most 3 entries (got {})",
        export.recommendation.best_overall.len()
    );

    Ok(export)
}
