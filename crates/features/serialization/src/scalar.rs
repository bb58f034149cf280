use crate::error::SerializationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rune_model::{Scalar, ScalarKind};
use rust_decimal::Decimal;
use serde_json::{Number, Value as Json};
use std::str::FromStr;

pub(crate) const DATE: &str = "%Y-%m-%d";
pub(crate) const DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub(crate) const TIME: &str = "%H:%M:%S%.f";

pub(crate) fn to_json(scalar: &Scalar) -> Result<Json, SerializationError> {
    Ok(match scalar {
        Scalar::Int(v) => Json::from(*v),
        Scalar::Number(v) => Json::Number(Number::from_str(&v.to_string()).map_err(|e| {
            SerializationError::format(format!("number {v} cannot be written: {e}"))
        })?),
        Scalar::String(v) => Json::String(v.clone()),
        Scalar::Boolean(v) => Json::Bool(*v),
        Scalar::Date(v) => Json::String(v.format(DATE).to_string()),
        Scalar::DateTime(v) => Json::String(v.format(DATE_TIME).to_string()),
        Scalar::ZonedDateTime(v) => Json::String(v.to_rfc3339()),
        Scalar::Time(v) => Json::String(v.format(TIME).to_string()),
    })
}

pub(crate) fn from_json(kind: ScalarKind, json: &Json) -> Result<Scalar, SerializationError> {
    let mismatch =
        || SerializationError::format(format!("expected a {kind} value, found `{json}`"));
    let text = json.as_str();

    match kind {
        ScalarKind::Int => json.as_i64().map(Scalar::Int).ok_or_else(mismatch),
        ScalarKind::Number => match json {
            Json::Number(n) => {
                parse_decimal(&n.to_string()).map(Scalar::Number).ok_or_else(mismatch)
            }
            _ => Err(mismatch()),
        },
        ScalarKind::String => text.map(Scalar::from).ok_or_else(mismatch),
        ScalarKind::Boolean => json.as_bool().map(Scalar::Boolean).ok_or_else(mismatch),
        ScalarKind::Date => text
            .and_then(|s| NaiveDate::parse_from_str(s, DATE).ok())
            .map(Scalar::Date)
            .ok_or_else(mismatch),
        ScalarKind::DateTime => text
            .and_then(|s| NaiveDateTime::parse_from_str(s, DATE_TIME).ok())
            .map(Scalar::DateTime)
            .ok_or_else(mismatch),
        ScalarKind::ZonedDateTime => text
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(Scalar::ZonedDateTime)
            .ok_or_else(mismatch),
        ScalarKind::Time => text
            .and_then(|s| NaiveTime::parse_from_str(s, TIME).ok())
            .map(Scalar::Time)
            .ok_or_else(mismatch),
    }
}

/// Reads the number from its source text so no digit goes through `f64`.
fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)).ok()
}
