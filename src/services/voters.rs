//! Voters service
//!
//! High-level operations on the voter roll: bulk upload, single-record
//! edits, survey capture, vote toggling, and family membership. Records
//! are never hard-deleted.

use crate::config::VOTERS_PATH;
use crate::error::{AppError, Result};
use crate::store::{ingest, DocumentStore, FamilyMember, SurveyUpdate, UploadSummary, VoterRecord};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Clone)]
pub struct VoterService {
    store: DocumentStore,
}

impl VoterService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Bulk-import uploaded roll rows.
    ///
    /// Each row is normalized through the ingestion alias table; rows
    /// with neither a name nor a voter id are skipped. All imported
    /// records land in one multi-path write.
    pub async fn upload_rolls(&self, rows: &[Value]) -> Result<UploadSummary> {
        tracing::info!("Uploading roll with {} rows", rows.len());

        let mut entries = Vec::new();
        let mut skipped = 0u32;

        for row in rows {
            match ingest::normalize_row(row) {
                Some(record) => {
                    let id = Uuid::new_v4().to_string();
                    entries.push((voter_path(&id), serde_json::to_value(&record)?));
                }
                None => skipped += 1,
            }
        }

        let imported = entries.len() as u32;
        if !entries.is_empty() {
            self.store.update_multi(&entries).await?;
        }

        tracing::info!("Roll upload complete: {} imported, {} skipped", imported, skipped);
        Ok(UploadSummary { imported, skipped })
    }

    /// Add a single voter record
    pub async fn add_voter(&self, mut record: VoterRecord) -> Result<VoterRecord> {
        let id = Uuid::new_v4().to_string();
        record.id = id.clone();

        self.store
            .set(&voter_path(&id), &serde_json::to_value(&record)?)
            .await?;

        tracing::debug!("Added voter: {}", id);
        Ok(record)
    }

    /// Get a voter by store id
    pub async fn get_voter(&self, id: &str) -> Result<VoterRecord> {
        let value = self
            .store
            .read(&voter_path(id))
            .await?
            .ok_or_else(|| AppError::VoterNotFound(id.to_string()))?;

        let mut record: VoterRecord = serde_json::from_value(value)?;
        record.id = id.to_string();
        Ok(record)
    }

    /// Merge surveyed contact/demographic details and mark the voter
    /// surveyed. Only the provided fields are touched.
    pub async fn record_survey(&self, id: &str, survey: &SurveyUpdate) -> Result<()> {
        self.get_voter(id).await?;

        let mut patch = serde_json::Map::new();
        if let Some(phone) = &survey.phone {
            patch.insert("phone".to_string(), json!(phone));
        }
        if let Some(age) = survey.age {
            patch.insert("age".to_string(), json!(age));
        }
        if let Some(gender) = &survey.gender {
            patch.insert("gender".to_string(), json!(gender));
        }
        if let Some(address) = &survey.address {
            patch.insert("address".to_string(), json!(address));
        }
        if let Some(village) = &survey.village {
            patch.insert("village".to_string(), json!(village));
        }
        if let Some(taluka) = &survey.taluka {
            patch.insert("taluka".to_string(), json!(taluka));
        }
        patch.insert("surveyed".to_string(), json!(true));

        self.store
            .update(&voter_path(id), &Value::Object(patch))
            .await?;

        tracing::debug!("Recorded survey for voter: {}", id);
        Ok(())
    }

    /// Toggle the voted flag
    pub async fn set_voted(&self, id: &str, voted: bool) -> Result<()> {
        self.get_voter(id).await?;

        self.store
            .update(&voter_path(id), &json!({ "voted": voted }))
            .await?;

        tracing::debug!("Marked voter {} voted={}", id, voted);
        Ok(())
    }

    /// Replace the ordered family list
    pub async fn set_family(&self, id: &str, family: &[FamilyMember]) -> Result<()> {
        self.get_voter(id).await?;

        self.store
            .update(&voter_path(id), &json!({ "family": family }))
            .await?;

        tracing::debug!("Updated family for voter {}: {} members", id, family.len());
        Ok(())
    }
}

fn voter_path(id: &str) -> String {
    format!("{}/{}", VOTERS_PATH, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{initialize_store, DocumentStore};
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> VoterService {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_store(&pool).await.unwrap();

        VoterService::new(DocumentStore::new(pool))
    }

    #[tokio::test]
    async fn test_upload_counts_imported_and_skipped() {
        let service = create_test_service().await;

        let rows = vec![
            json!({"Voter Name": "Rita", "EPIC No": "V1", "Booth No": "5"}),
            json!({"name": "Raju", "voterId": "V2", "booth": "9"}),
            json!({"age": 44}), // no name, no id
        ];

        let summary = service.upload_rolls(&rows).await.unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 1);
    }

    #[tokio::test]
    async fn test_add_and_get_voter() {
        let service = create_test_service().await;

        let added = service
            .add_voter(VoterRecord {
                name: "Rita Patil".to_string(),
                voter_id: "V100".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!added.id.is_empty());

        let fetched = service.get_voter(&added.id).await.unwrap();
        assert_eq!(fetched.name, "Rita Patil");
        assert_eq!(fetched.id, added.id);
    }

    #[tokio::test]
    async fn test_get_missing_voter_fails() {
        let service = create_test_service().await;

        let result = service.get_voter("nope").await;
        assert!(matches!(result, Err(AppError::VoterNotFound(_))));
    }

    #[tokio::test]
    async fn test_survey_merges_fields_and_marks_surveyed() {
        let service = create_test_service().await;

        let added = service
            .add_voter(VoterRecord {
                name: "Rita".to_string(),
                voter_id: "V1".to_string(),
                age: 30,
                ..Default::default()
            })
            .await
            .unwrap();

        let survey = SurveyUpdate {
            phone: Some("9876543210".to_string()),
            village: Some("Shirpur".to_string()),
            ..Default::default()
        };
        service.record_survey(&added.id, &survey).await.unwrap();

        let voter = service.get_voter(&added.id).await.unwrap();
        assert_eq!(voter.phone, "9876543210");
        assert_eq!(voter.village, "Shirpur");
        assert!(voter.surveyed);
        // untouched fields survive the merge
        assert_eq!(voter.age, 30);
        assert_eq!(voter.name, "Rita");
    }

    #[tokio::test]
    async fn test_vote_toggle() {
        let service = create_test_service().await;

        let added = service
            .add_voter(VoterRecord {
                name: "Rita".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        service.set_voted(&added.id, true).await.unwrap();
        assert!(service.get_voter(&added.id).await.unwrap().voted);

        service.set_voted(&added.id, false).await.unwrap();
        assert!(!service.get_voter(&added.id).await.unwrap().voted);
    }

    #[tokio::test]
    async fn test_family_list_keeps_order() {
        let service = create_test_service().await;

        let added = service
            .add_voter(VoterRecord {
                name: "Rita".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let family = vec![
            FamilyMember { id: "f1".to_string(), name: "Anil".to_string() },
            FamilyMember { id: "f2".to_string(), name: "Sunita".to_string() },
        ];
        service.set_family(&added.id, &family).await.unwrap();

        let voter = service.get_voter(&added.id).await.unwrap();
        assert_eq!(voter.family, family);
    }
}
