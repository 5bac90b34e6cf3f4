//! Store models
//!
//! Rust structs representing the documents held in the store.
//! Wire names are camelCase to match the legacy roll exports, and every
//! struct decodes with defaults so a missing field becomes an empty
//! string, zero, or empty list instead of a failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single entry in a voter's ordered family list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
}

/// One voter from the roll
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoterRecord {
    /// Opaque key assigned by the store
    pub id: String,
    pub name: String,
    pub voter_id: String,
    pub booth_number: String,
    pub polling_station_address: String,
    pub age: u32,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub village: String,
    pub taluka: String,
    /// Ordered references to other voters in the same household
    pub family: Vec<FamilyMember>,
    pub voted: bool,
    pub surveyed: bool,
    pub last_contacted: Option<DateTime<Utc>>,
    pub last_campaign: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothStatus {
    #[default]
    Active,
    Inactive,
}

/// A polling booth with its assigned staff
///
/// `voter_count` and `surveyed_count` are denormalized counters written
/// by explicit update calls; they are not derived from the voter set and
/// can drift from it. Reports compute the derived tallies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Booth {
    pub id: String,
    pub booth_number: String,
    pub location: String,
    pub polling_station_address: String,
    pub village: String,
    pub voter_count: u32,
    pub surveyed_count: u32,
    pub status: BoothStatus,
    /// Staff assigned to this booth, keyed by staff id
    pub karyakartas: HashMap<String, Karyakarta>,
    pub assigned_karyakarta: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    #[default]
    Volunteer,
    Supervisor,
    Manager,
}

/// Field staff member (karyakarta)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Karyakarta {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: StaffRole,
    pub email: Option<String>,
    pub area: Option<String>,
    pub assigned_booths: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Sent,
}

/// One sent messaging campaign. The log is append-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Campaign {
    /// Timestamp-derived identifier
    pub id: String,
    pub message: String,
    pub recipients: u32,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: CampaignStatus,
}

/// Singleton branding/config document shown on screens and receipts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingConfig {
    pub leader_name: String,
    pub party_name: String,
    pub slogan: String,
    pub leader_image: String,
    pub banner_image: String,
    pub call_to_action: String,
    pub contact_phone: String,
}

/// Fields a booth worker can record during a voter survey
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyUpdate {
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub village: Option<String>,
    pub taluka: Option<String>,
}

/// Outcome of a bulk roll upload
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub imported: u32,
    pub skipped: u32,
}
