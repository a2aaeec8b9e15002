//! Decoding donation snapshots handed over by the record store

use common::models::{DonationRecord, DonorProfile};
use serde::Deserialize;
use serde_json::Value;

use crate::leaderboard::DonorHistory;

/// Decode a list of donation records.
///
/// Anything other than a JSON array is rejected, including `null`, so an
/// upstream bug never looks like a donor with zero donations. Unknown
/// fields on each record are ignored.
pub fn parse_donations(value: &Value) -> common::Result<Vec<DonationRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => {
            return Err(common::Error::InvalidArgument(
                "donations must be an array, got null".into(),
            ))
        }
        other => {
            return Err(common::Error::InvalidArgument(format!(
                "donations must be an array, got {}",
                type_name(other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            DonationRecord::deserialize(item).map_err(|e| {
                common::Error::InvalidArgument(format!("donations[{}]: {}", idx, e))
            })
        })
        .collect()
}

/// Decode a single donation record
pub fn parse_donation(value: &Value) -> common::Result<DonationRecord> {
    DonationRecord::deserialize(value)
        .map_err(|e| common::Error::InvalidArgument(format!("donation: {}", e)))
}

/// Decode a donor profile
pub fn parse_profile(value: &Value) -> common::Result<DonorProfile> {
    DonorProfile::deserialize(value)
        .map_err(|e| common::Error::InvalidArgument(format!("profile: {}", e)))
}

/// Decode `{ "profile": ..., "donations": [...] }`
pub fn parse_donor_history(value: &Value) -> common::Result<DonorHistory> {
    let profile = value
        .get("profile")
        .ok_or_else(|| common::Error::InvalidArgument("missing profile".into()))?;
    Ok(DonorHistory {
        profile: parse_profile(profile)?,
        donations: parse_donations(value.get("donations").unwrap_or(&Value::Null))?,
    })
}

/// Decode a list of donor histories
pub fn parse_donors(value: &Value) -> common::Result<Vec<DonorHistory>> {
    let items = value
        .as_array()
        .ok_or_else(|| common::Error::InvalidArgument("donors must be an array".into()))?;
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            parse_donor_history(item).map_err(|e| match e {
                common::Error::InvalidArgument(msg) => {
                    common::Error::InvalidArgument(format!("donors[{}]: {}", idx, msg))
                }
                other => other,
            })
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
