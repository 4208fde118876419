//! The recommendation pipeline: filter, estimate, score, aggregate.
//!
//! Everything here is a pure function of the catalog and the request. The
//! catalog is never mutated and no state survives between calls.

pub mod eligibility;
pub mod ranking;
pub mod rewards;
pub mod scoring;
pub mod synergy;

use crate::catalog::Catalog;
use crate::domain::card::Card;
use crate::domain::contract::RecommendRequest;
use crate::domain::recommendation::Recommendation;
use std::sync::Arc;

pub use eligibility::is_eligible;
pub use rewards::estimate_rewards;
pub use scoring::{score_card, OwnedPortfolio, ScoringContext};

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn recommend(&self, request: &RecommendRequest) -> Recommendation {
        recommend_cards(&self.catalog, request)
    }
}

pub fn recommend_cards(catalog: &Catalog, request: &RecommendRequest) -> Recommendation {
    let eligible: Vec<&Card> = catalog
        .cards()
        .iter()
        .filter(|card| is_eligible(card, &request.profile))
        .collect();

    let owned = OwnedPortfolio::from_cards(catalog.resolve_owned(&request.owned_cards));

    let ctx = ScoringContext {
        profile: &request.profile,
        spending: &request.spending,
        owned: &owned,
        pairings: catalog.pairings(),
    };

    let scored: Vec<_> = eligible.iter().map(|card| score_card(card, ctx)).collect();
    let best_by_category = ranking::best_by_category(&eligible, &request.spending);
    let best_overall = ranking::best_overall(&scored);

    tracing::info!(
        catalog = catalog.len(),
        eligible = eligible.len(),
        owned = !owned.is_empty(),
        categories = best_by_category.len(),
        "recommendation computed"
    );

    Recommendation {
        scored,
        best_by_category,
        best_overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{CardId, CardLevel};
    use crate::domain::profile::{Profile, RewardPreference, Spending, TravelFrequency};
    use crate::engine::synergy::PairingTable;
    use serde_json::json;

    fn catalog() -> Catalog {
        let cards = serde_json::from_value(json!([
            {
                "id": 1,
                "name": "Chase Sapphire Preferred",
                "issuer": "Chase",
                "level": "Premium",
                "annualFee": 95,
                "pointValueCents": 2,
                "minCreditScore": 670,
                "unlockTransferPartners": true,
                "rewards": {"dining": 3, "groceries": 1, "gas": 1, "travel": 2, "other": 1}
            },
            {
                "id": 2,
                "name": "Discover Student",
                "issuer": "Discover",
                "level": "Student",
                "minCreditScore": 620,
                "studentFriendly": true,
                "rotatingCategories": true,
                "rewards": {"dining": 1, "groceries": 1, "gas": 1, "travel": 1, "other": 1}
            },
            {
                "id": 3,
                "name": "Chase Freedom Flex",
                "issuer": "Chase",
                "level": "Mid",
                "minCreditScore": 650,
                "rotatingCategories": true,
                "rewards": {"dining": 3, "default": 1}
            },
            {
                "id": 4,
                "name": "Capital One Platinum Secured",
                "issuer": "Capital One",
                "level": "Secured",
                "secured": true,
                "minCreditScore": 300,
                "rewards": {}
            },
            {
                "id": 5,
                "name": "Citi Double Cash",
                "issuer": "Citi",
                "level": "Mid",
                "rewards": {"default": 2}
            }
        ]))
        .unwrap();
        Catalog::new(cards, PairingTable::default()).unwrap()
    }

    fn spending() -> Spending {
        [
            ("dining", 300.0),
            ("groceries", 400.0),
            ("gas", 200.0),
            ("travel", 100.0),
            ("other", 200.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    fn request(score: u16, accounts: u32, owned: &[&str]) -> RecommendRequest {
        RecommendRequest {
            profile: Profile {
                credit_score: Some(score),
                accounts_opened24: accounts,
                travel_frequency: TravelFrequency::Other,
                reward_preference: RewardPreference::Neutral("general".to_string()),
                ..Profile::default()
            },
            spending: spending(),
            owned_cards: owned.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ids(cards: &[crate::domain::recommendation::ScoredCard]) -> Vec<CardId> {
        cards.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn result_has_all_three_sections() {
        let rec = recommend_cards(&catalog(), &request(720, 1, &[]));
        assert_eq!(rec.scored.len(), 5);
        assert!(!rec.best_overall.is_empty());
        assert_eq!(rec.best_by_category.len(), 5);
    }

    #[test]
    fn best_overall_is_sorted_and_capped() {
        let rec = recommend_cards(&catalog(), &request(720, 1, &[]));
        assert!(rec.best_overall.len() <= 3);
        for pair in rec.best_overall.windows(2) {
            assert!(pair[0].estimates.annual >= pair[1].estimates.annual);
        }
        // Sapphire: 1900 points * 12 * 0.02 - 95 = 361, ahead of Double Cash at 288.
        assert_eq!(
            ids(&rec.best_overall),
            vec![CardId::Number(1), CardId::Number(5), CardId::Number(3)]
        );
        assert_eq!(rec.best_overall[0].estimates.annual, 361.0);
        assert_eq!(rec.best_overall[1].estimates.annual, 288.0);
    }

    #[test]
    fn owned_card_is_marked_but_kept() {
        let rec = recommend_cards(&catalog(), &request(720, 1, &["1"]));
        let owned = rec.scored.iter().find(|c| c.id == CardId::Number(1)).unwrap();
        assert!(owned.owned);
        assert!(rec.scored.iter().filter(|c| c.owned).count() == 1);
    }

    #[test]
    fn unknown_owned_entries_are_ignored() {
        let with_junk = recommend_cards(&catalog(), &request(720, 1, &["nope", "42"]));
        let without = recommend_cards(&catalog(), &request(720, 1, &[]));
        assert_eq!(with_junk, without);
    }

    #[test]
    fn low_score_only_sees_starter_cards() {
        let rec = recommend_cards(&catalog(), &request(600, 1, &[]));
        assert!(!ids(&rec.best_overall).contains(&CardId::Number(1)));
        for card in &rec.scored {
            assert!(matches!(
                card.level,
                CardLevel::Secured | CardLevel::Beginner | CardLevel::Student
            ) || card.id == CardId::Number(5));
        }
        // Double Cash has no minimum score, so it stays eligible.
        assert_eq!(
            ids(&rec.scored),
            vec![CardId::Number(4), CardId::Number(5)]
        );
    }

    #[test]
    fn velocity_rule_removes_chase_everywhere() {
        let rec = recommend_cards(&catalog(), &request(800, 5, &[]));
        let chase = [CardId::Number(1), CardId::Number(3)];
        assert!(rec.scored.iter().all(|c| !chase.contains(&c.id)));
        assert!(rec.best_overall.iter().all(|c| !chase.contains(&c.id)));
        assert!(rec.best_by_category.values().all(|l| !chase.contains(&l.id)));
    }

    #[test]
    fn category_leaders_come_from_eligible_cards() {
        let rec = recommend_cards(&catalog(), &request(720, 1, &[]));
        assert_eq!(rec.best_by_category["dining"].id, CardId::Number(1));
        assert_eq!(rec.best_by_category["dining"].rate, 3.0);
        assert_eq!(rec.best_by_category["groceries"].id, CardId::Number(5));

        let rec = recommend_cards(&catalog(), &request(660, 1, &[]));
        // Sapphire is premium and hidden below 680, so Freedom Flex takes dining.
        assert_eq!(rec.best_by_category["dining"].id, CardId::Number(3));
    }

    #[test]
    fn freedom_owner_gets_sapphire_synergy() {
        let rec = recommend_cards(&catalog(), &request(720, 1, &["chase freedom flex"]));
        let sapphire = rec.scored.iter().find(|c| c.id == CardId::Number(1)).unwrap();
        assert!(sapphire.reasons.contains(&crate::domain::recommendation::Reason::OwnershipSynergy {
            owned: "Chase Freedom Flex".to_string()
        }));
        assert!(sapphire
            .reasons
            .contains(&crate::domain::recommendation::Reason::TransferPartnersUnlocked));
    }

    #[test]
    fn engine_is_deterministic() {
        let engine = RecommendationEngine::new(Arc::new(catalog()));
        let req = request(740, 2, &["3"]);
        assert_eq!(engine.recommend(&req), engine.recommend(&req));
        assert_eq!(engine.catalog().len(), 5);
    }
}
