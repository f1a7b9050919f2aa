use crate::models::{MeasurementValue, ParseIssue, ParsedChart, SizeChart, SizeMeasurements, UserMeasurements};
use serde_json::Value;
use thiserror::Error;

/// Size ladder assumed when a flat chart carries no explicit size list.
pub const DEFAULT_SIZE_LABELS: [&str; 5] = ["XS", "S", "M", "L", "XL"];

/// Offset applied per ladder step when synthesizing a chart from one flat
/// measurement set.
pub const SYNTHETIC_STEP: f64 = 5.0;

/// Errors raised while normalizing a raw size chart or user profile.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("measurement input is empty")]
    EmptyInput,

    #[error("could not decode measurement data: {0}")]
    Decode(String),

    #[error("no usable numeric measurements in input")]
    NoUsableMeasurements,
}

/// The raw encodings a size chart arrives in, resolved by structural
/// inspection before any measurement handling. Catalog records are loosely
/// typed, so every variant shows up in practice.
#[derive(Debug)]
enum RawChart {
    /// `{"S": {"waist": 68.6, ...}, "M": {...}}`
    Nested(serde_json::Map<String, Value>),
    /// `{"waist": 70, "sizes": ["S", "M", "L"]}` - one flat measurement
    /// set with no per-size breakdown.
    Flat(serde_json::Map<String, Value>),
    /// `[{"size": "S", "measurements": {...}}, ...]`
    List(Vec<Value>),
    /// The decoded value is itself an encoded chart (re-serialized by an
    /// upstream writer); unwrapped exactly once.
    Encoded(String),
    Unrecognized,
}

/// Parse one raw, format-ambiguous size chart into canonical form.
///
/// Decoding is strict JSON first, then a permissive literal decoder that
/// accepts Python-style dict syntax (single quotes, unquoted keys,
/// `True`/`False`/`None`). Fails if the input is empty, undecodable, or
/// yields no numeric measurements at all.
pub fn parse_chart(raw: &str) -> Result<ParsedChart, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    parse_chart_value(decode(trimmed)?)
}

/// Parse an already-decoded chart value. Used when the record store hands
/// back a JSON object or array rather than a string-encoded chart.
pub fn parse_chart_value(value: Value) -> Result<ParsedChart, ParseError> {
    let mut issues = Vec::new();

    let chart = match classify(value) {
        RawChart::Nested(map) => build_nested(map, &mut issues),
        RawChart::Flat(map) => build_flat(map, &mut issues),
        RawChart::List(items) => build_list(items, &mut issues),
        RawChart::Encoded(inner) => {
            // One level of unwrapping covers every observed input; a
            // string inside a string inside a string is not a chart.
            match classify(decode(inner.trim())?) {
                RawChart::Nested(map) => build_nested(map, &mut issues),
                RawChart::Flat(map) => build_flat(map, &mut issues),
                RawChart::List(items) => build_list(items, &mut issues),
                _ => SizeChart::default(),
            }
        }
        RawChart::Unrecognized => SizeChart::default(),
    };

    if !chart.has_numeric_measurements() {
        return Err(ParseError::NoUsableMeasurements);
    }

    Ok(ParsedChart { chart, issues })
}

/// Strict JSON decode with a lenient fallback.
fn decode(input: &str) -> Result<Value, ParseError> {
    if let Ok(value) = serde_json::from_str(input) {
        return Ok(value);
    }

    lenient_decode(input).ok_or_else(|| {
        let preview: String = input.chars().take(60).collect();
        ParseError::Decode(preview)
    })
}

/// Permissive decoder for Python-style dict literals.
///
/// Rewrites the input into valid JSON: single-quoted strings become
/// double-quoted, bare identifiers become quoted keys/values, and
/// `True`/`False`/`None` map to their JSON forms.
fn lenient_decode(input: &str) -> Option<Value> {
    let normalized = normalize_literal(input)?;
    serde_json::from_str(&normalized).ok()
}

fn normalize_literal(input: &str) -> Option<String> {
    let mut out = String::with_capacity(input.len() + 16);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let mut content = String::new();
                let mut closed = false;
                while let Some(next) = chars.next() {
                    if next == '\\' {
                        match chars.next() {
                            Some('n') => content.push('\n'),
                            Some('t') => content.push('\t'),
                            Some('\\') => content.push('\\'),
                            Some(q) if q == c => content.push(q),
                            Some('"') => content.push('"'),
                            Some(other) => {
                                content.push('\\');
                                content.push(other);
                            }
                            None => return None,
                        }
                    } else if next == c {
                        closed = true;
                        break;
                    } else {
                        content.push(next);
                    }
                }
                if !closed {
                    return None;
                }
                // serde_json re-escapes the content correctly for JSON.
                out.push_str(&serde_json::to_string(&content).ok()?);
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::new();
                word.push(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match word.as_str() {
                    "True" | "true" => out.push_str("true"),
                    "False" | "false" => out.push_str("false"),
                    "None" | "null" => out.push_str("null"),
                    // Unquoted key or bare-word value.
                    _ => out.push_str(&serde_json::to_string(&word).ok()?),
                }
            }
            other => out.push(other),
        }
    }

    Some(out)
}

fn classify(value: Value) -> RawChart {
    match value {
        Value::String(s) => RawChart::Encoded(s),
        Value::Array(items) => RawChart::List(items),
        Value::Object(map) => {
            if map.values().any(Value::is_object) {
                RawChart::Nested(map)
            } else {
                RawChart::Flat(map)
            }
        }
        _ => RawChart::Unrecognized,
    }
}

/// Outcome of coercing one raw scalar into a measurement value.
pub(crate) enum Coerced {
    Number(f64),
    Text(String),
    Unusable(&'static str),
}

pub(crate) fn coerce_scalar(value: &Value) -> Coerced {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => Coerced::Number(f),
            _ => Coerced::Unusable("non-finite number"),
        },
        Value::String(s) => match coerce_numeric_str(s) {
            Some(f) => Coerced::Number(f),
            None => Coerced::Text(s.clone()),
        },
        Value::Bool(b) => Coerced::Text(b.to_string()),
        Value::Null => Coerced::Unusable("null value"),
        Value::Array(_) | Value::Object(_) => Coerced::Unusable("not a scalar"),
    }
}

/// Coerce a string-encoded number, stripping surrounding quote characters
/// so `36"` and `'36'` parse the same as a bare 36.
pub(crate) fn coerce_numeric_str(s: &str) -> Option<f64> {
    let stripped = s.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn coerce_measurements(
    raw: &serde_json::Map<String, Value>,
    size: &str,
    issues: &mut Vec<ParseIssue>,
) -> SizeMeasurements {
    let mut measures = SizeMeasurements::new();

    for (key, value) in raw {
        let key = key.trim().to_lowercase();
        match coerce_scalar(value) {
            Coerced::Number(n) => {
                measures.insert(key, MeasurementValue::Number(n));
            }
            Coerced::Text(t) => {
                measures.insert(key, MeasurementValue::Text(t));
            }
            Coerced::Unusable(reason) => issues.push(ParseIssue {
                size: Some(size.to_string()),
                key,
                reason: reason.to_string(),
            }),
        }
    }

    measures
}

fn build_nested(map: serde_json::Map<String, Value>, issues: &mut Vec<ParseIssue>) -> SizeChart {
    let mut chart = SizeChart::default();

    for (label, inner) in map {
        match inner {
            Value::Object(raw_measures) => {
                let measures = coerce_measurements(&raw_measures, &label, issues);
                if measures.is_empty() {
                    issues.push(ParseIssue {
                        size: Some(label),
                        key: String::new(),
                        reason: "size has no usable measurements".to_string(),
                    });
                } else {
                    chart.sizes.insert(label, measures);
                }
            }
            _ => issues.push(ParseIssue {
                size: None,
                key: label,
                reason: "expected a per-size measurement object".to_string(),
            }),
        }
    }

    chart
}

fn build_flat(map: serde_json::Map<String, Value>, issues: &mut Vec<ParseIssue>) -> SizeChart {
    let mut labels: Vec<String> = Vec::new();
    if let Some(Value::Array(raw_labels)) = map.get("sizes") {
        labels = raw_labels.iter().filter_map(label_from_value).collect();
    }
    if labels.is_empty() {
        labels = DEFAULT_SIZE_LABELS.iter().map(|l| l.to_string()).collect();
    }

    let mut base = UserMeasurements::new();
    for (key, value) in &map {
        if key == "sizes" {
            continue;
        }
        let key = key.trim().to_lowercase();
        match coerce_scalar(value) {
            Coerced::Number(n) => {
                base.insert(key, n);
            }
            Coerced::Text(_) | Coerced::Unusable(_) => issues.push(ParseIssue {
                size: None,
                key,
                reason: "not numeric, dropped from flat chart".to_string(),
            }),
        }
    }

    synthesize_size_variants(&base, &labels)
}

/// Linear extrapolation policy for charts that arrive as one flat
/// measurement set: the size at ladder index `i` gets
/// `(i - anchor) * SYNTHETIC_STEP` added to every base measurement,
/// anchored at `M` (midpoint when the ladder has no `M`).
///
/// These are fabricated values, not measured data; the policy exists only
/// because some sources publish a single measurement set for all sizes.
pub fn synthesize_size_variants(base: &UserMeasurements, labels: &[String]) -> SizeChart {
    let anchor = labels
        .iter()
        .position(|l| l.trim().eq_ignore_ascii_case("m"))
        .unwrap_or(labels.len() / 2);

    let mut chart = SizeChart::default();
    for (i, label) in labels.iter().enumerate() {
        let offset = (i as f64 - anchor as f64) * SYNTHETIC_STEP;
        let measures: SizeMeasurements = base
            .iter()
            .map(|(key, value)| (key.clone(), MeasurementValue::Number(value + offset)))
            .collect();
        if !measures.is_empty() {
            chart.sizes.insert(label.clone(), measures);
        }
    }

    chart
}

fn build_list(items: Vec<Value>, issues: &mut Vec<ParseIssue>) -> SizeChart {
    let mut chart = SizeChart::default();

    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(record) = item else {
            issues.push(ParseIssue {
                size: None,
                key: format!("[{index}]"),
                reason: "list entry is not an object".to_string(),
            });
            continue;
        };

        let Some(label) = record.get("size").and_then(label_from_value) else {
            issues.push(ParseIssue {
                size: None,
                key: format!("[{index}]"),
                reason: "record has no size label".to_string(),
            });
            continue;
        };

        match record.get("measurements") {
            Some(Value::Object(raw_measures)) => {
                let measures = coerce_measurements(raw_measures, &label, issues);
                if measures.is_empty() {
                    issues.push(ParseIssue {
                        size: Some(label),
                        key: String::new(),
                        reason: "size has no usable measurements".to_string(),
                    });
                } else {
                    chart.sizes.insert(label, measures);
                }
            }
            _ => issues.push(ParseIssue {
                size: Some(label),
                key: "measurements".to_string(),
                reason: "record lacks a measurements object".to_string(),
            }),
        }
    }

    chart
}

fn label_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
