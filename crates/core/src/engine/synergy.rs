use crate::domain::card::Card;
use serde::{Deserialize, Serialize};

pub const PAIRING_MULTIPLIER: f64 = 1.40;

/// Owning any card in `when_owned` boosts candidates whose name contains `boosts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyRule {
    pub when_owned: Vec<String>,
    pub boosts: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    PAIRING_MULTIPLIER
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingTable {
    pub rules: Vec<SynergyRule>,
}

/// The first owned card that triggers a rule, plus that rule's multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct SynergyMatch<'a> {
    pub owned: &'a str,
    pub multiplier: f64,
}

impl Default for PairingTable {
    fn default() -> Self {
        let rule = |owned: &[&str], boosts: &str| SynergyRule {
            when_owned: owned.iter().map(|s| s.to_string()).collect(),
            boosts: boosts.to_string(),
            multiplier: PAIRING_MULTIPLIER,
        };

        Self {
            rules: vec![
                rule(&["Chase Freedom Flex", "Chase Freedom Unlimited"], "sapphire"),
                rule(&["Amex Gold"], "platinum"),
                rule(&["Capital One SavorOne"], "venture"),
            ],
        }
    }
}

impl PairingTable {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let table: Self = serde_json::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, rule) in self.rules.iter().enumerate() {
            anyhow::ensure!(
                !rule.when_owned.is_empty(),
                "pairing rule {i} must name at least one owned card"
            );
            anyhow::ensure!(
                !rule.boosts.trim().is_empty(),
                "pairing rule {i} must name a boosted product"
            );
            anyhow::ensure!(
                rule.multiplier.is_finite() && rule.multiplier > 0.0,
                "pairing rule {i} multiplier must be positive (got {})",
                rule.multiplier
            );
        }
        Ok(())
    }

    /// Rules matching `candidate`, each at most once, in table order.
    pub fn matches<'a>(&'a self, candidate: &Card, owned_names: &[&'a str]) -> Vec<SynergyMatch<'a>> {
        let candidate_name = candidate.name.to_lowercase();

        self.rules
            .iter()
            .filter(|rule| candidate_name.contains(&rule.boosts.to_lowercase()))
            .filter_map(|rule| {
                let owned = rule.when_owned.iter().find_map(|wanted| {
                    owned_names
                        .iter()
                        .copied()
                        .find(|owned| owned.eq_ignore_ascii_case(wanted))
                })?;
                Some(SynergyMatch {
                    owned,
                    multiplier: rule.multiplier,
                })
            })
            .collect()
    }
}
