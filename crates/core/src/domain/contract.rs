use crate::domain::profile::{Profile, Spending};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

const MIN_CREDIT_SCORE: f64 = 300.0;
const MAX_CREDIT_SCORE: f64 = 850.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Request body as received, before any shape checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecommendRequest {
    #[serde(default)]
    pub profile: Value,
    #[serde(default)]
    pub spending: Value,
    #[serde(default)]
    pub owned_cards: Value,
}

/// A request that passed validation and is safe to hand to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub profile: Profile,
    pub spending: Spending,
    #[serde(default)]
    pub owned_cards: Vec<String>,
}

impl RecommendRequest {
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        ensure_object(&body, "Request body must be an object")?;
        let raw: RawRecommendRequest = serde_json::from_value(body)
            .map_err(|e| ValidationError::new(format!("Request body is malformed: {e}")))?;
        raw.validate_and_into_request()
    }
}

impl RawRecommendRequest {
    /// Checks run in order profile, spending, ownedCards; the first failure wins.
    pub fn validate_and_into_request(self) -> Result<RecommendRequest, ValidationError> {
        let profile = validate_profile(self.profile)?;
        let spending = validate_spending(self.spending)?;
        let owned_cards = validate_owned_cards(self.owned_cards)?;

        Ok(RecommendRequest {
            profile,
            spending,
            owned_cards,
        })
    }
}

fn ensure_object<'a>(
    value: &'a Value,
    message: &str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::new(message))
}

fn whole_number(value: Option<&Value>) -> Option<f64> {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && n.fract() == 0.0)
}

fn validate_profile(value: Value) -> Result<Profile, ValidationError> {
    let fields = ensure_object(&value, "Profile must be an object")?;

    let score = match whole_number(fields.get("creditScore")) {
        Some(score) if (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score) => score,
        _ => {
            return Err(ValidationError::new(
                "Credit score must be a whole number between 300 and 850",
            ))
        }
    };

    let accounts = match whole_number(fields.get("accountsOpened24")) {
        Some(n) if (0.0..=f64::from(u32::MAX)).contains(&n) => n,
        _ => {
            return Err(ValidationError::new(
                "Accounts opened must be a non-negative whole number",
            ))
        }
    };

    match fields.get("isStudent") {
        None | Some(Value::Null) | Some(Value::Bool(_)) => {}
        Some(_) => return Err(ValidationError::new("isStudent must be a boolean")),
    }

    // Null fields take their defaults; checked numbers go back as integers.
    let mut normalized: Map<String, Value> = fields
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    normalized.insert("creditScore".to_string(), Value::from(score as u64));
    normalized.insert("accountsOpened24".to_string(), Value::from(accounts as u64));

    serde_json::from_value(Value::Object(normalized))
        .map_err(|e| ValidationError::new(format!("Profile is malformed: {e}")))
}

fn validate_spending(value: Value) -> Result<Spending, ValidationError> {
    let fields = ensure_object(&value, "Spending must be an object")?;

    let mut spending = Spending::new();
    for (category, amount) in fields {
        let amount = amount
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "Spending for {category} must be a non-negative number"
                ))
            })?;
        spending.insert(category.clone(), amount);
    }
    Ok(spending)
}

fn validate_owned_cards(value: Value) -> Result<Vec<String>, ValidationError> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        _ => return Err(ValidationError::new("ownedCards must be an array")),
    };

    entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(number_identifier(&n)),
            _ => Err(ValidationError::new(
                "ownedCards entries must be card ids or names",
            )),
        })
        .collect()
}

/// `1.0` and `1` name the same card.
fn number_identifier(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}
