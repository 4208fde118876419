use crate::domain::card::{Card, CardLevel, DEFAULT_CATEGORY};
use crate::domain::profile::{Profile, RewardPreference, Spending, TravelFrequency};
use crate::domain::recommendation::{Estimate, Reason, ScoredCard};
use crate::engine::rewards::{estimate_rewards, round_cents, top_reward_categories, weighted_rate};
use crate::engine::synergy::PairingTable;
use std::collections::BTreeSet;

pub const STUDENT_BOOST: f64 = 1.20;
pub const ECOSYSTEM_PREFERENCE_BOOST: f64 = 1.10;
pub const SAME_ECOSYSTEM_BOOST: f64 = 1.05;
pub const STRONG_CASH_BACK_BOOST: f64 = 1.07;
pub const PREMIUM_TRAVEL_CASH_PENALTY: f64 = 0.90;
pub const POINTS_EARNING_BOOST: f64 = 1.08;
pub const FLAT_CASH_POINTS_PENALTY: f64 = 0.95;
pub const FREQUENT_TRAVEL_BOOST: f64 = 1.10;
pub const NO_TRAVEL_PENALTY: f64 = 0.80;
pub const ROTATING_BOOST: f64 = 1.05;
pub const TRANSFER_PARTNER_BOOST: f64 = 1.40;

/// Combined groceries + dining rate that counts as a strong cash-back card.
const STRONG_CASH_COMBINED_RATE: f64 = 6.0;
/// Travel or dining rate that counts as a points-earning card.
const BONUS_RATE: f64 = 3.0;
/// Default rate that marks a flat-rate cash card.
const FLAT_CASH_RATE: f64 = 2.0;

/// Cards the user already holds, resolved against the catalog.
#[derive(Debug, Clone, Default)]
pub struct OwnedPortfolio {
    names: Vec<String>,
    ecosystems: BTreeSet<String>,
}

impl OwnedPortfolio {
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut out = Self::default();
        for card in cards {
            if !out.names.contains(&card.name) {
                out.names.push(card.name.clone());
            }
            out.ecosystems.insert(card.ecosystem_key());
        }
        out
    }

    pub fn owns(&self, card: &Card) -> bool {
        self.names.iter().any(|name| *name == card.name)
    }

    pub fn owns_ecosystem(&self, card: &Card) -> bool {
        self.ecosystems.contains(&card.ecosystem_key())
    }

    pub fn names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Per-request inputs shared by every candidate.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub profile: &'a Profile,
    pub spending: &'a Spending,
    pub owned: &'a OwnedPortfolio,
    pub pairings: &'a PairingTable,
}

/// Running product of multipliers with the reasons in application order.
#[derive(Debug, Clone)]
struct MultiplierChain {
    factor: f64,
    reasons: Vec<Reason>,
}

impl MultiplierChain {
    fn new() -> Self {
        Self {
            factor: 1.0,
            reasons: Vec::new(),
        }
    }

    fn apply(&mut self, multiplier: f64, reason: Reason) {
        self.factor *= multiplier;
        self.reasons.push(reason);
    }
}

pub fn score_card(card: &Card, ctx: ScoringContext<'_>) -> ScoredCard {
    let base = estimate_rewards(card, ctx.spending);
    let chain = multipliers_for(card, ctx);

    // Rounded once, after the whole chain.
    let annual = round_cents(base.annual * chain.factor);
    let estimates = Estimate {
        monthly: round_cents(annual / 12.0),
        annual,
    };

    tracing::debug!(
        card = %card.id,
        base_annual = base.annual,
        multiplier = chain.factor,
        adjusted_annual = annual,
        "scored card"
    );

    ScoredCard {
        id: card.id.clone(),
        name: card.name.clone(),
        estimates,
        rate: weighted_rate(card, ctx.spending),
        reward_categories: top_reward_categories(card),
        annual_fee: card.annual_fee.max(0.0),
        level: card.level_or_default(),
        owned: ctx.owned.owns(card),
        reasons: chain.reasons,
    }
}

fn multipliers_for(card: &Card, ctx: ScoringContext<'_>) -> MultiplierChain {
    let profile = ctx.profile;
    let mut chain = MultiplierChain::new();
    let rate = |category: &str| card.rate_for(category);

    if profile.is_student && card.student_friendly {
        chain.apply(STUDENT_BOOST, Reason::StudentFriendly);
    }

    if let Some(pref) = profile.ecosystem_preference() {
        if card.ecosystem_key().contains(&pref) {
            chain.apply(
                ECOSYSTEM_PREFERENCE_BOOST,
                Reason::PreferredEcosystem {
                    ecosystem: profile.preferred_ecosystem.trim().to_string(),
                },
            );
        }
    }

    for hit in ctx.pairings.matches(card, &ctx.owned.names()) {
        chain.apply(
            hit.multiplier,
            Reason::OwnershipSynergy {
                owned: hit.owned.to_string(),
            },
        );
    }

    let same_ecosystem = ctx.owned.owns_ecosystem(card);
    if same_ecosystem {
        chain.apply(SAME_ECOSYSTEM_BOOST, Reason::SameEcosystemOwned);
    }

    let bonus_earner = rate("travel") >= BONUS_RATE || rate("dining") >= BONUS_RATE;
    match profile.reward_preference {
        RewardPreference::CashBack => {
            if rate("groceries") + rate("dining") >= STRONG_CASH_COMBINED_RATE {
                chain.apply(STRONG_CASH_BACK_BOOST, Reason::StrongCashBack);
            }
            if card.level == Some(CardLevel::Premium) && rate("travel") >= BONUS_RATE {
                chain.apply(PREMIUM_TRAVEL_CASH_PENALTY, Reason::PremiumTravelUnderCashBack);
            }
        }
        RewardPreference::PointsMiles => {
            if bonus_earner {
                chain.apply(POINTS_EARNING_BOOST, Reason::PointsTravelEarning);
            }
            let flat_cash = card
                .rewards
                .get(DEFAULT_CATEGORY)
                .is_some_and(|default| *default >= FLAT_CASH_RATE);
            if flat_cash && !bonus_earner {
                chain.apply(FLAT_CASH_POINTS_PENALTY, Reason::FlatCashUnderPoints);
            }
        }
        RewardPreference::Neutral(_) => {}
    }

    if rate("travel") >= BONUS_RATE {
        match profile.travel_frequency {
            TravelFrequency::Often => chain.apply(FREQUENT_TRAVEL_BOOST, Reason::FrequentTraveler),
            TravelFrequency::Never => chain.apply(NO_TRAVEL_PENALTY, Reason::TravelDeemphasized),
            TravelFrequency::Other => {}
        }
    }

    if card.rotating_categories {
        chain.apply(ROTATING_BOOST, Reason::RotatingCategories);
    }

    if card.unlock_transfer_partners && same_ecosystem {
        chain.apply(TRANSFER_PARTNER_BOOST, Reason::TransferPartnersUnlocked);
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: serde_json::Value) -> Card {
        serde_json::from_value(value).unwrap()
    }

    fn sapphire() -> Card {
        card(json!({
            "id": 1,
            "name": "Chase Sapphire Preferred",
            "issuer": "Chase",
            "level": "Premium",
            "annualFee": 95,
            "pointValueCents": 2,
            "minCreditScore": 670,
            "unlockTransferPartners": true,
            "rewards": {"dining": 3, "travel": 3, "other": 1}
        }))
    }

    fn freedom_flex() -> Card {
        card(json!({
            "id": 2,
            "name": "Chase Freedom Flex",
            "issuer": "Chase",
            "level": "Mid",
            "rotatingCategories": true,
            "rewards": {"dining": 3, "default": 1}
        }))
    }

    fn spending() -> Spending {
        [("dining".to_string(), 300.0)].into_iter().collect()
    }

    fn score(card: &Card, profile: &Profile, owned: &OwnedPortfolio) -> ScoredCard {
        let spending = spending();
        let pairings = PairingTable::default();
        score_card(
            card,
            ScoringContext {
                profile,
                spending: &spending,
                owned,
                pairings: &pairings,
            },
        )
    }

    #[test]
    fn no_adjustments_for_neutral_profile() {
        let profile = Profile {
            credit_score: Some(720),
            travel_frequency: TravelFrequency::Other,
            reward_preference: RewardPreference::Neutral("general".to_string()),
            ..Profile::default()
        };
        let scored = score(&sapphire(), &profile, &OwnedPortfolio::default());
        assert_eq!(scored.estimates.annual, 121.0);
        assert!(scored.reasons.is_empty());
        assert_eq!(scored.level, CardLevel::Premium);
        assert!(!scored.owned);
    }

    #[test]
    fn cash_back_never_traveler_penalizes_premium_travel_card() {
        let profile = Profile {
            credit_score: Some(720),
            ..Profile::default()
        };
        let scored = score(&sapphire(), &profile, &OwnedPortfolio::default());
        // 121 * 0.90 * 0.80
        assert_eq!(scored.estimates.annual, 87.12);
        assert_eq!(scored.estimates.monthly, 7.26);
        assert_eq!(
            scored.reasons,
            vec![Reason::PremiumTravelUnderCashBack, Reason::TravelDeemphasized]
        );
    }

    #[test]
    fn full_chain_for_owned_freedom_points_traveler() {
        let profile = Profile {
            credit_score: Some(760),
            preferred_ecosystem: "Chase".to_string(),
            travel_frequency: TravelFrequency::Often,
            reward_preference: RewardPreference::PointsMiles,
            ..Profile::default()
        };
        let flex = freedom_flex();
        let owned = OwnedPortfolio::from_cards([&flex]);
        let scored = score(&sapphire(), &profile, &owned);

        assert_eq!(
            scored.reasons,
            vec![
                Reason::PreferredEcosystem {
                    ecosystem: "Chase".to_string()
                },
                Reason::OwnershipSynergy {
                    owned: "Chase Freedom Flex".to_string()
                },
                Reason::SameEcosystemOwned,
                Reason::PointsTravelEarning,
                Reason::FrequentTraveler,
                Reason::TransferPartnersUnlocked,
            ]
        );
        // 121 * 1.10 * 1.40 * 1.05 * 1.08 * 1.10 * 1.40
        assert_eq!(scored.estimates.annual, 325.42);
        assert_eq!(scored.estimates.monthly, 27.12);
    }

    #[test]
    fn owned_card_is_flagged_and_rotating_bonus_applies() {
        let profile = Profile {
            credit_score: Some(700),
            ..Profile::default()
        };
        let flex = freedom_flex();
        let owned = OwnedPortfolio::from_cards([&flex]);
        let scored = score(&flex, &profile, &owned);

        assert!(scored.owned);
        assert_eq!(
            scored.reasons,
            vec![Reason::SameEcosystemOwned, Reason::RotatingCategories]
        );
        // 300 * 12 * 3 * 0.01 = 108; 108 * 1.05 * 1.05
        assert_eq!(scored.estimates.annual, 119.07);
    }

    #[test]
    fn student_boost_and_flat_cash_penalty() {
        let double_cash = card(json!({
            "id": 3,
            "name": "Citi Double Cash",
            "issuer": "Citi",
            "studentFriendly": true,
            "rewards": {"default": 2}
        }));
        let profile = Profile {
            credit_score: Some(700),
            is_student: true,
            reward_preference: RewardPreference::PointsMiles,
            ..Profile::default()
        };
        let scored = score(&double_cash, &profile, &OwnedPortfolio::default());
        assert_eq!(
            scored.reasons,
            vec![Reason::StudentFriendly, Reason::FlatCashUnderPoints]
        );
        // 300 * 12 * 2 * 0.01 = 72; 72 * 1.2 * 0.95
        assert_eq!(scored.estimates.annual, 82.08);
        assert_eq!(scored.level, CardLevel::Mid);
        assert_eq!(scored.rate, 2.0);
    }

    #[test]
    fn strong_cash_back_card_is_boosted() {
        let gold = card(json!({
            "id": 4,
            "name": "Amex Gold",
            "issuer": "American Express",
            "ecosystem": "Amex",
            "rewards": {"dining": 4, "groceries": 4, "default": 1}
        }));
        let profile = Profile {
            credit_score: Some(700),
            preferred_ecosystem: "amex".to_string(),
            ..Profile::default()
        };
        let scored = score(&gold, &profile, &OwnedPortfolio::default());
        assert_eq!(
            scored.reasons,
            vec![
                Reason::PreferredEcosystem {
                    ecosystem: "amex".to_string()
                },
                Reason::StrongCashBack
            ]
        );
    }

    #[test]
    fn transfer_partners_need_same_ecosystem_ownership() {
        let profile = Profile {
            credit_score: Some(760),
            travel_frequency: TravelFrequency::Other,
            reward_preference: RewardPreference::Neutral("any".to_string()),
            ..Profile::default()
        };
        let scored = score(&sapphire(), &profile, &OwnedPortfolio::default());
        assert!(!scored.reasons.contains(&Reason::TransferPartnersUnlocked));
    }
}
