pub mod source;

use crate::domain::card::Card;
use crate::engine::synergy::PairingTable;
use std::collections::HashSet;

/// Read-only card catalog plus the synergy pairings that ship with it.
#[derive(Debug, Clone)]
pub struct Catalog {
    cards: Vec<Card>,
    pairings: PairingTable,
}

impl Catalog {
    pub fn new(cards: Vec<Card>, pairings: PairingTable) -> anyhow::Result<Self> {
        anyhow::ensure!(!cards.is_empty(), "catalog must contain at least one card");

        let mut seen_ids = HashSet::with_capacity(cards.len());
        for card in &cards {
            validate_card(card)?;
            anyhow::ensure!(
                seen_ids.insert(card.id.to_string()),
                "duplicate card id in catalog: {}",
                card.id
            );
        }
        pairings.validate()?;

        Ok(Self { cards, pairings })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn pairings(&self) -> &PairingTable {
        &self.pairings
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        let id = id.trim();
        self.cards.iter().find(|card| card.id.to_string() == id)
    }

    /// Catalog cards named by `identifiers` (ids or names). Unknown entries are skipped.
    pub fn resolve_owned<S: AsRef<str>>(&self, identifiers: &[S]) -> Vec<&Card> {
        let mut out: Vec<&Card> = Vec::new();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            match self.cards.iter().find(|c| c.matches_identifier(identifier)) {
                Some(card) if !out.iter().any(|o| o.id == card.id) => out.push(card),
                Some(_) => {}
                None => tracing::debug!(identifier, "owned card not in catalog; ignoring"),
            }
        }
        out
    }
}

fn validate_card(card: &Card) -> anyhow::Result<()> {
    let id = &card.id;
    anyhow::ensure!(!card.name.trim().is_empty(), "card {id}: name must be non-empty");
    anyhow::ensure!(!card.issuer.trim().is_empty(), "card {id}: issuer must be non-empty");
    anyhow::ensure!(
        card.annual_fee.is_finite() && card.annual_fee >= 0.0,
        "card {id}: annualFee must be non-negative (got {})",
        card.annual_fee
    );
    anyhow::ensure!(
        card.point_value_cents.is_finite() && card.point_value_cents > 0.0,
        "card {id}: pointValueCents must be positive (got {})",
        card.point_value_cents
    );
    for (category, rate) in &card.rewards {
        anyhow::ensure!(
            rate.is_finite() && *rate >= 0.0,
            "card {id}: reward rate for {category} must be non-negative (got {rate})"
        );
    }
    Ok(())
}
