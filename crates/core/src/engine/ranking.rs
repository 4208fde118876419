use crate::domain::card::Card;
use crate::domain::profile::Spending;
use crate::domain::recommendation::{CategoryLeader, ScoredCard};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const BEST_OVERALL_LIMIT: usize = 3;

/// Highest raw rate per spending category among eligible cards.
/// Ties keep the card that comes first in catalog order.
pub fn best_by_category(eligible: &[&Card], spending: &Spending) -> BTreeMap<String, CategoryLeader> {
    let mut out = BTreeMap::new();

    for category in spending.keys() {
        let mut best: Option<(&Card, f64)> = None;
        for card in eligible.iter().copied().filter(|c| c.earns_in(category)) {
            let rate = card.rate_for(category);
            match best {
                Some((_, best_rate)) if rate <= best_rate => {}
                _ => best = Some((card, rate)),
            }
        }

        if let Some((card, rate)) = best {
            out.insert(
                category.clone(),
                CategoryLeader {
                    id: card.id.clone(),
                    name: card.name.clone(),
                    rate,
                },
            );
        }
    }

    out
}

/// Top cards by adjusted annual estimate; the stable sort keeps catalog order on ties.
pub fn best_overall(scored: &[ScoredCard]) -> Vec<ScoredCard> {
    let mut sorted: Vec<&ScoredCard> = scored.iter().collect();
    sorted.sort_by(|a, b| {
        b.estimates
            .annual
            .partial_cmp(&a.estimates.annual)
            .unwrap_or(Ordering::Equal)
    });

    sorted
        .into_iter()
        .take(BEST_OVERALL_LIMIT)
        .cloned()
        .collect()
}
