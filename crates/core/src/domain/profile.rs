use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monthly dollar amounts keyed by reward category.
pub type Spending = BTreeMap<String, f64>;

pub const ANY_ECOSYSTEM: &str = "Any";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub credit_score: Option<u16>,
    #[serde(default)]
    pub accounts_opened24: u32,
    #[serde(default)]
    pub is_student: bool,
    #[serde(default = "default_ecosystem", alias = "ecosystem")]
    pub preferred_ecosystem: String,
    #[serde(default, alias = "travelFreq")]
    pub travel_frequency: TravelFrequency,
    #[serde(default, alias = "rewardPref")]
    pub reward_preference: RewardPreference,
}

fn default_ecosystem() -> String {
    ANY_ECOSYSTEM.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            credit_score: None,
            accounts_opened24: 0,
            is_student: false,
            preferred_ecosystem: default_ecosystem(),
            travel_frequency: TravelFrequency::default(),
            reward_preference: RewardPreference::default(),
        }
    }
}

impl Profile {
    /// Lowercased ecosystem preference, `None` when the user accepts any.
    pub fn ecosystem_preference(&self) -> Option<String> {
        let pref = self.preferred_ecosystem.trim();
        if pref.is_empty() || pref == ANY_ECOSYSTEM {
            return None;
        }
        Some(pref.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TravelFrequency {
    Often,
    #[default]
    Never,
    Other,
}

impl From<String> for TravelFrequency {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "often" => TravelFrequency::Often,
            "never" => TravelFrequency::Never,
            _ => TravelFrequency::Other,
        }
    }
}

impl From<TravelFrequency> for String {
    fn from(value: TravelFrequency) -> Self {
        match value {
            TravelFrequency::Often => "Often",
            TravelFrequency::Never => "Never",
            TravelFrequency::Other => "Other",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RewardPreference {
    #[default]
    CashBack,
    PointsMiles,
    /// Any other stated preference. Neither alignment rule fires.
    Neutral(String),
}

impl From<String> for RewardPreference {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Cash Back" => RewardPreference::CashBack,
            "Points/Miles" => RewardPreference::PointsMiles,
            _ => RewardPreference::Neutral(value),
        }
    }
}

impl From<RewardPreference> for String {
    fn from(value: RewardPreference) -> Self {
        match value {
            RewardPreference::CashBack => "Cash Back".to_string(),
            RewardPreference::PointsMiles => "Points/Miles".to_string(),
            RewardPreference::Neutral(s) => s,
        }
    }
}
