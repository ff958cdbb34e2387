use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tsgate_core::{GatewayError, ValuePoint};

use crate::WireFormat;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
struct SensorEnvelope {
    data: Vec<EnvelopePoint>,
}

#[derive(Deserialize)]
struct EnvelopePoint {
    timestamp: String,
    value: Option<RawValue>,
}

#[derive(Deserialize)]
struct PredictionRow {
    timestamp: String,
    predicted_value: Option<RawValue>,
}

/// Parse an upstream timestamp.
///
/// Accepts RFC 3339 with an offset, or a naive ISO-8601 date-time which is
/// taken to be UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn to_point(
    provider: &str,
    timestamp: &str,
    value: Option<RawValue>,
) -> Result<Option<ValuePoint>, GatewayError> {
    let ts = parse_timestamp(timestamp)
        .ok_or_else(|| GatewayError::schema(provider, format!("bad timestamp {timestamp:?}")))?;
    let v = match value {
        None => return Ok(None),
        Some(RawValue::Number(v)) => v,
        Some(RawValue::Text(t)) => t
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                GatewayError::schema(provider, format!("non-numeric value {t:?} at {timestamp}"))
            })?,
    };
    Ok(Some(ValuePoint::new(ts, v)))
}

/// Decode a response body into value points sorted by timestamp.
///
/// Null values are treated as absent and skipped.
///
/// # Errors
/// Returns `Schema` when the body is not valid JSON of the expected shape,
/// or a timestamp or value cannot be interpreted.
pub fn parse_body(
    provider: &str,
    wire: WireFormat,
    body: &str,
) -> Result<Vec<ValuePoint>, GatewayError> {
    let schema = |e: serde_json::Error| GatewayError::schema(provider, e.to_string());
    let raw: Vec<(String, Option<RawValue>)> = match wire {
        WireFormat::SensorEnvelope => serde_json::from_str::<SensorEnvelope>(body)
            .map_err(schema)?
            .data
            .into_iter()
            .map(|p| (p.timestamp, p.value))
            .collect(),
        WireFormat::PredictionList => serde_json::from_str::<Vec<PredictionRow>>(body)
            .map_err(schema)?
            .into_iter()
            .map(|r| (r.timestamp, r.predicted_value))
            .collect(),
    };

    let mut out = Vec::with_capacity(raw.len());
    for (ts, v) in raw {
        if let Some(p) = to_point(provider, &ts, v)? {
            out.push(p);
        }
    }
    out.sort_by_key(|p| p.timestamp);
    Ok(out)
}
