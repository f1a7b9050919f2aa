use crate::core::chart::{coerce_scalar, Coerced, ParseError};
use crate::models::UserMeasurements;
use serde_json::Value;

/// Normalize a raw user-measurement mapping into canonical form:
/// lowercase keys, finite numeric values, same quote-stripped coercion as
/// the chart parser.
///
/// Unlike chart parsing, keys that fail numeric coercion are dropped
/// outright: nothing downstream consumes non-numeric user fields. Fails
/// when no key coerces to a finite number.
pub fn normalize_profile(raw: &serde_json::Map<String, Value>) -> Result<UserMeasurements, ParseError> {
    let mut profile = UserMeasurements::new();

    for (key, value) in raw {
        let key = key.trim().to_lowercase();
        match coerce_scalar(value) {
            Coerced::Number(n) => {
                profile.insert(key, n);
            }
            Coerced::Text(_) | Coerced::Unusable(_) => {
                tracing::debug!(key = %key, "dropped non-numeric user measurement");
            }
        }
    }

    if profile.is_empty() {
        return Err(ParseError::NoUsableMeasurements);
    }

    Ok(profile)
}
