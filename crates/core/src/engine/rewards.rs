use crate::domain::card::{Card, DEFAULT_CATEGORY};
use crate::domain::profile::Spending;
use crate::domain::recommendation::{Estimate, RewardCategory};

const MONTHS: f64 = 12.0;
const TOP_CATEGORY_LIMIT: usize = 3;

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Non-finite and negative amounts count as no spend.
pub(crate) fn sanitized(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Base annual/monthly value of `card` for `spending`, net of the annual fee.
///
/// Rates are points per dollar; `pointValueCents` converts points to cash.
pub fn estimate_rewards(card: &Card, spending: &Spending) -> Estimate {
    let point_value = if card.point_value_cents.is_finite() {
        card.point_value_cents / 100.0
    } else {
        0.0
    };

    let mut annual: f64 = spending
        .iter()
        .map(|(category, amount)| sanitized(*amount) * MONTHS * card.rate_for(category) * point_value)
        .sum();

    if card.annual_fee > 0.0 {
        annual -= card.annual_fee;
    }

    let annual = round_cents(annual);
    Estimate {
        monthly: round_cents(annual / MONTHS),
        annual,
    }
}

/// Σ(rate × spend) / Σ(spend), rounded to cents; 0 when nothing is spent.
pub fn weighted_rate(card: &Card, spending: &Spending) -> f64 {
    let (weighted, total) = spending
        .iter()
        .fold((0.0, 0.0), |(weighted, total), (category, amount)| {
            let amount = sanitized(*amount);
            (weighted + card.rate_for(category) * amount, total + amount)
        });

    if total > 0.0 {
        round_cents(weighted / total)
    } else {
        0.0
    }
}

/// Up to three bonus categories (rate above 1, `default` excluded), highest first.
pub fn top_reward_categories(card: &Card) -> Vec<RewardCategory> {
    let mut categories: Vec<(&String, f64)> = card
        .rewards
        .iter()
        .filter(|(category, rate)| category.as_str() != DEFAULT_CATEGORY && **rate > 1.0)
        .map(|(category, rate)| (category, *rate))
        .collect();

    categories.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    categories
        .into_iter()
        .take(TOP_CATEGORY_LIMIT)
        .map(|(category, rate)| RewardCategory {
            category: capitalize(category),
            rate,
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
