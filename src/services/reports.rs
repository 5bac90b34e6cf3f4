//! Reports service
//!
//! Aggregate views over the voter set. `summarize` is a pure pass over a
//! snapshot; the async wrapper reads through the directory cache. The
//! per-booth tallies here are derived from the actual records, unlike
//! the denormalized counters stored on each booth.

use crate::services::directory::VoterDirectory;
use crate::store::VoterRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoothTally {
    pub booth_number: String,
    pub total: u32,
    pub voted: u32,
    pub surveyed: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageTally {
    pub village: String,
    pub total: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderSplit {
    pub male: u32,
    pub female: u32,
    pub other: u32,
}

/// Age distribution; `unknown` holds records whose age never parsed
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBands {
    pub under_25: u32,
    pub age_25_to_40: u32,
    pub age_41_to_60: u32,
    pub over_60: u32,
    pub unknown: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterSummary {
    pub total: u32,
    pub voted: u32,
    pub surveyed: u32,
    pub with_phone: u32,
    pub by_booth: Vec<BoothTally>,
    pub by_village: Vec<VillageTally>,
    pub gender: GenderSplit,
    pub ages: AgeBands,
}

#[derive(Clone)]
pub struct ReportsService {
    directory: VoterDirectory,
}

impl ReportsService {
    pub fn new(directory: VoterDirectory) -> Self {
        Self { directory }
    }

    /// Summary over the current voter snapshot (cache permitting)
    pub async fn voter_summary(&self) -> VoterSummary {
        let records = self.directory.load(false).await;
        summarize(&records)
    }
}

/// Aggregate a voter snapshot. Pure.
pub fn summarize(records: &[VoterRecord]) -> VoterSummary {
    let mut booths: BTreeMap<String, BoothTally> = BTreeMap::new();
    let mut villages: BTreeMap<String, u32> = BTreeMap::new();
    let mut gender = GenderSplit::default();
    let mut ages = AgeBands::default();

    let mut voted = 0u32;
    let mut surveyed = 0u32;
    let mut with_phone = 0u32;

    for record in records {
        if record.voted {
            voted += 1;
        }
        if record.surveyed {
            surveyed += 1;
        }
        if !record.phone.is_empty() {
            with_phone += 1;
        }

        if !record.booth_number.is_empty() {
            let tally = booths
                .entry(record.booth_number.clone())
                .or_insert_with(|| BoothTally {
                    booth_number: record.booth_number.clone(),
                    total: 0,
                    voted: 0,
                    surveyed: 0,
                });
            tally.total += 1;
            if record.voted {
                tally.voted += 1;
            }
            if record.surveyed {
                tally.surveyed += 1;
            }
        }

        if !record.village.is_empty() {
            *villages.entry(record.village.clone()).or_default() += 1;
        }

        match record.gender.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('m') => gender.male += 1,
            Some('f') | Some('s') => gender.female += 1, // "f", "female", "stri"
            _ => gender.other += 1,
        }

        match record.age {
            0 => ages.unknown += 1,
            1..=24 => ages.under_25 += 1,
            25..=40 => ages.age_25_to_40 += 1,
            41..=60 => ages.age_41_to_60 += 1,
            _ => ages.over_60 += 1,
        }
    }

    VoterSummary {
        total: records.len() as u32,
        voted,
        surveyed,
        with_phone,
        by_booth: booths.into_values().collect(),
        by_village: villages
            .into_iter()
            .map(|(village, total)| VillageTally { village, total })
            .collect(),
        gender,
        ages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(booth: &str, village: &str, gender: &str, age: u32) -> VoterRecord {
        VoterRecord {
            name: "X".to_string(),
            booth_number: booth.to_string(),
            village: village.to_string(),
            gender: gender.to_string(),
            age,
            ..Default::default()
        }
    }

    #[test]
    fn test_summarize_totals_and_flags() {
        let mut a = record("5", "Shirpur", "M", 34);
        a.voted = true;
        a.phone = "9876543210".to_string();
        let mut b = record("5", "Shirpur", "F", 61);
        b.surveyed = true;
        let c = record("9", "Dhule", "", 0);

        let summary = summarize(&[a, b, c]);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.voted, 1);
        assert_eq!(summary.surveyed, 1);
        assert_eq!(summary.with_phone, 1);

        assert_eq!(summary.by_booth.len(), 2);
        let booth5 = &summary.by_booth[0];
        assert_eq!(booth5.booth_number, "5");
        assert_eq!(booth5.total, 2);
        assert_eq!(booth5.voted, 1);
        assert_eq!(booth5.surveyed, 1);

        assert_eq!(summary.by_village.len(), 2);
        assert_eq!(summary.gender.male, 1);
        assert_eq!(summary.gender.female, 1);
        assert_eq!(summary.gender.other, 1);

        assert_eq!(summary.ages.age_25_to_40, 1);
        assert_eq!(summary.ages.over_60, 1);
        assert_eq!(summary.ages.unknown, 1);
    }

    #[test]
    fn test_summarize_empty_set() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.by_booth.is_empty());
        assert!(summary.by_village.is_empty());
    }
}
