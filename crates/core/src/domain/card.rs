use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Reward category that supplies the fallback rate for unlisted categories.
pub const DEFAULT_CATEGORY: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Number(u64),
    Text(String),
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Number(n) => write!(f, "{n}"),
            CardId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardLevel {
    Beginner,
    Student,
    Mid,
    Premium,
    Secured,
    Store,
}

impl CardLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            CardLevel::Beginner => "Beginner",
            CardLevel::Student => "Student",
            CardLevel::Mid => "Mid",
            CardLevel::Premium => "Premium",
            CardLevel::Secured => "Secured",
            CardLevel::Store => "Store",
        }
    }
}

impl fmt::Display for CardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(CardLevel::Beginner),
            "student" => Ok(CardLevel::Student),
            "mid" => Ok(CardLevel::Mid),
            "premium" => Ok(CardLevel::Premium),
            "secured" => Ok(CardLevel::Secured),
            "store" => Ok(CardLevel::Store),
            other => Err(format!("unknown card level: {other:?}")),
        }
    }
}

impl Serialize for CardLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CardLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A catalog entry. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub issuer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecosystem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<CardLevel>,
    #[serde(default)]
    pub annual_fee: f64,
    #[serde(default = "default_point_value_cents")]
    pub point_value_cents: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_credit_score: Option<u16>,
    #[serde(default)]
    pub secured: bool,
    #[serde(default)]
    pub student_friendly: bool,
    #[serde(default)]
    pub rotating_categories: bool,
    #[serde(default)]
    pub unlock_transfer_partners: bool,
    #[serde(default)]
    pub rewards: BTreeMap<String, f64>,
}

fn default_point_value_cents() -> f64 {
    1.0
}

impl Card {
    /// Points earned per dollar in `category`: the explicit entry, else the
    /// `default` entry, else 0. An explicit 0 does not fall through to `default`.
    pub fn rate_for(&self, category: &str) -> f64 {
        self.rewards
            .get(category)
            .or_else(|| self.rewards.get(DEFAULT_CATEGORY))
            .copied()
            .unwrap_or(0.0)
    }

    /// True when the card lists `category` itself or carries a default rate.
    pub fn earns_in(&self, category: &str) -> bool {
        self.rewards.contains_key(category) || self.rewards.contains_key(DEFAULT_CATEGORY)
    }

    /// Lowercased ecosystem, falling back to the issuer.
    pub fn ecosystem_key(&self) -> String {
        self.ecosystem
            .as_deref()
            .unwrap_or(&self.issuer)
            .to_lowercase()
    }

    pub fn level_or_default(&self) -> CardLevel {
        self.level.unwrap_or(CardLevel::Mid)
    }

    /// Minimum score, with a zero requirement treated as none.
    pub fn credit_floor(&self) -> Option<u16> {
        self.min_credit_score.filter(|score| *score > 0)
    }

    pub fn matches_identifier(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        self.id.to_string() == identifier || self.name.to_lowercase() == identifier.to_lowercase()
    }
}
