use crate::domain::card::{CardId, CardLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub monthly: f64,
    pub annual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardCategory {
    pub category: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCard {
    pub id: CardId,
    pub name: String,
    /// Base estimate after every applicable multiplier.
    pub estimates: Estimate,
    /// Spend-weighted average reward rate.
    pub rate: f64,
    pub reward_categories: Vec<RewardCategory>,
    pub annual_fee: f64,
    pub level: CardLevel,
    pub owned: bool,
    pub reasons: Vec<Reason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLeader {
    pub id: CardId,
    pub name: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub scored: Vec<ScoredCard>,
    pub best_by_category: BTreeMap<String, CategoryLeader>,
    pub best_overall: Vec<ScoredCard>,
}

/// Why a multiplier was applied. Presentation text comes from `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Reason {
    StudentFriendly,
    PreferredEcosystem { ecosystem: String },
    OwnershipSynergy { owned: String },
    SameEcosystemOwned,
    StrongCashBack,
    PremiumTravelUnderCashBack,
    PointsTravelEarning,
    FlatCashUnderPoints,
    FrequentTraveler,
    TravelDeemphasized,
    RotatingCategories,
    TransferPartnersUnlocked,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::StudentFriendly => f.write_str("Good for students"),
            Reason::PreferredEcosystem { ecosystem } => {
                write!(f, "Matches preferred ecosystem ({ecosystem})")
            }
            Reason::OwnershipSynergy { owned } => {
                write!(f, "Boosted because you own {owned}, a strong pairing")
            }
            Reason::SameEcosystemOwned => f.write_str("Same ecosystem as cards you already own"),
            Reason::StrongCashBack => f.write_str("Strong cash back benefits"),
            Reason::PremiumTravelUnderCashBack => {
                f.write_str("Premium travel card penalized under cash back preference")
            }
            Reason::PointsTravelEarning => f.write_str("Optimized for points + travel earning"),
            Reason::FlatCashUnderPoints => {
                f.write_str("Cash-back card penalized due to points preference")
            }
            Reason::FrequentTraveler => f.write_str("Better for frequent travelers"),
            Reason::TravelDeemphasized => f.write_str("Travel rewards de-emphasized"),
            Reason::RotatingCategories => f.write_str("Rotating category bonus potential"),
            Reason::TransferPartnersUnlocked => {
                f.write_str("Unlocks transfer partners useful with your existing cards")
            }
        }
    }
}
