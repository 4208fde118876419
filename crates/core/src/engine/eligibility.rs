use crate::domain::card::{Card, CardLevel};
use crate::domain::profile::Profile;

/// New accounts in the trailing 24 months at which Chase declines applicants.
pub const CHASE_VELOCITY_LIMIT: u32 = 5;
/// Below this score only secured, beginner and student cards are shown.
pub const LOW_SCORE_CEILING: u16 = 630;
/// Below this score premium cards are hidden.
pub const PREMIUM_SCORE_FLOOR: u16 = 680;

/// Whether `card` may be shown to `profile` at all, independent of scoring.
pub fn is_eligible(card: &Card, profile: &Profile) -> bool {
    // Missing data never excludes.
    let Some(min_score) = card.credit_floor() else {
        return true;
    };
    let Some(score) = profile.credit_score else {
        return true;
    };

    if profile.accounts_opened24 >= CHASE_VELOCITY_LIMIT
        && card.issuer.trim().eq_ignore_ascii_case("chase")
    {
        return false;
    }

    let level = card.level;

    if score < LOW_SCORE_CEILING {
        let starter = card.secured
            || matches!(level, Some(CardLevel::Beginner) | Some(CardLevel::Student));
        if !starter {
            return false;
        }
    }

    if (LOW_SCORE_CEILING..PREMIUM_SCORE_FLOOR).contains(&score)
        && level == Some(CardLevel::Premium)
    {
        return false;
    }

    score >= min_score
}
