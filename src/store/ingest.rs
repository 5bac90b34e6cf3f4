//! Roll ingestion
//!
//! Uploaded rolls come from spreadsheets whose column headings vary by
//! district office. Normalization happens once here, at import time: a
//! declared alias table maps every known legacy spelling onto the
//! canonical field, and anything unparseable falls back to an empty
//! value instead of failing the row.

use crate::store::models::VoterRecord;
use serde_json::Value;

/// Canonical field name -> legacy column spellings seen in uploads.
/// First match wins, checked in declaration order.
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    (
        "name",
        &["name", "Name", "NAME", "voter_name", "Voter Name", "VoterName", "full_name"],
    ),
    (
        "voterId",
        &["voterId", "voter_id", "VoterId", "EPIC No", "epic_no", "EpicNo", "CardNo", "card_no"],
    ),
    (
        "boothNumber",
        &["boothNumber", "booth_number", "Booth No", "boothNo", "booth", "BOOTH"],
    ),
    (
        "pollingStationAddress",
        &[
            "pollingStationAddress",
            "polling_station_address",
            "PS Address",
            "pollingStation",
            "polling_station",
            "ps_address",
        ],
    ),
    ("age", &["age", "Age", "AGE"]),
    ("gender", &["gender", "Gender", "sex", "Sex"]),
    (
        "phone",
        &["phone", "Phone", "mobile", "Mobile", "phone_no", "PhoneNo", "contact"],
    ),
    ("address", &["address", "Address", "ADDRESS", "residence"]),
    ("village", &["village", "Village", "town", "Town", "gram"]),
    ("taluka", &["taluka", "Taluka", "tehsil", "Tehsil", "block"]),
];

/// Normalize one uploaded row into a [`VoterRecord`].
///
/// Returns `None` for rows carrying neither a name nor a voter id;
/// those are counted as skipped by the upload.
pub fn normalize_row(row: &Value) -> Option<VoterRecord> {
    let cells = row.as_object()?;

    let mut record = VoterRecord::default();
    for (canonical, aliases) in FIELD_ALIASES {
        let Some(cell) = aliases.iter().find_map(|alias| cells.get(*alias)) else {
            continue;
        };

        match *canonical {
            "age" => record.age = cell_as_age(cell),
            "name" => record.name = cell_as_text(cell),
            "voterId" => record.voter_id = cell_as_text(cell),
            "boothNumber" => record.booth_number = cell_as_text(cell),
            "pollingStationAddress" => record.polling_station_address = cell_as_text(cell),
            "gender" => record.gender = cell_as_text(cell),
            "phone" => record.phone = cell_as_text(cell),
            "address" => record.address = cell_as_text(cell),
            "village" => record.village = cell_as_text(cell),
            "taluka" => record.taluka = cell_as_text(cell),
            _ => unreachable!("unknown canonical field"),
        }
    }

    if record.name.is_empty() && record.voter_id.is_empty() {
        return None;
    }

    Some(record)
}

/// Spreadsheet cells arrive as strings or numbers; anything else is empty
fn cell_as_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Age columns hold numbers, numeric strings, or garbage. Garbage is 0.
fn cell_as_age(cell: &Value) -> u32 {
    match cell {
        Value::Number(n) => n.as_u64().unwrap_or(0) as u32,
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
