//! Booths service
//!
//! Polling booth management: creation, status, the denormalized
//! voter/surveyed counters, and staff assignment.

use crate::config::{BOOTHS_PATH, STAFF_PATH};
use crate::error::{AppError, Result};
use crate::store::{Booth, BoothStatus, DocumentStore, Karyakarta};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone)]
pub struct BoothService {
    store: DocumentStore,
}

impl BoothService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn create_booth(&self, mut booth: Booth) -> Result<Booth> {
        let id = Uuid::new_v4().to_string();
        booth.id = id.clone();

        self.store
            .set(&booth_path(&id), &serde_json::to_value(&booth)?)
            .await?;

        tracing::info!("Created booth {} ({})", id, booth.booth_number);
        Ok(booth)
    }

    pub async fn get_booth(&self, id: &str) -> Result<Booth> {
        let value = self
            .store
            .read(&booth_path(id))
            .await?
            .ok_or_else(|| AppError::BoothNotFound(id.to_string()))?;

        let mut booth: Booth = serde_json::from_value(value)?;
        booth.id = id.to_string();
        Ok(booth)
    }

    /// List all booths in path order
    pub async fn list_booths(&self) -> Result<Vec<Booth>> {
        let documents = self.store.read_all(BOOTHS_PATH).await?;

        let mut booths = Vec::with_capacity(documents.len());
        for (path, value) in documents {
            let mut booth: Booth = serde_json::from_value(value)?;
            booth.id = path.rsplit('/').next().unwrap_or_default().to_string();
            booths.push(booth);
        }
        Ok(booths)
    }

    pub async fn set_status(&self, id: &str, status: BoothStatus) -> Result<()> {
        self.get_booth(id).await?;

        self.store
            .update(&booth_path(id), &json!({ "status": status }))
            .await?;

        tracing::debug!("Booth {} status set to {:?}", id, status);
        Ok(())
    }

    /// Write the denormalized counters.
    ///
    /// These are maintained by explicit calls, not derived from the
    /// voter set, and can drift from it; reports compute the derived
    /// tallies for comparison.
    pub async fn set_counts(&self, id: &str, voter_count: u32, surveyed_count: u32) -> Result<()> {
        self.get_booth(id).await?;

        self.store
            .update(
                &booth_path(id),
                &json!({ "voterCount": voter_count, "surveyedCount": surveyed_count }),
            )
            .await?;

        tracing::debug!(
            "Booth {} counters set: {} voters, {} surveyed",
            id,
            voter_count,
            surveyed_count
        );
        Ok(())
    }

    /// Assign a karyakarta to a booth.
    ///
    /// Writes the booth's staff map and `assignedKaryakarta` field plus
    /// the staff record's `assignedBooths` list in one multi-path update.
    pub async fn assign_karyakarta(&self, booth_id: &str, staff: &Karyakarta) -> Result<()> {
        let mut booth = self.get_booth(booth_id).await?;

        booth
            .karyakartas
            .insert(staff.id.clone(), staff.clone());
        booth.assigned_karyakarta = Some(staff.id.clone());

        let mut assigned_booths = staff.assigned_booths.clone();
        if !assigned_booths.iter().any(|b| b == booth_id) {
            assigned_booths.push(booth_id.to_string());
        }

        let entries = vec![
            (
                booth_path(booth_id),
                json!({
                    "karyakartas": booth.karyakartas,
                    "assignedKaryakarta": booth.assigned_karyakarta,
                }),
            ),
            (
                format!("{}/{}", STAFF_PATH, staff.id),
                json!({ "assignedBooths": assigned_booths }),
            ),
        ];
        self.store.update_multi(&entries).await?;

        tracing::info!("Assigned karyakarta {} to booth {}", staff.id, booth_id);
        Ok(())
    }
}

fn booth_path(id: &str) -> String {
    format!("{}/{}", BOOTHS_PATH, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::staff::KaryakartaService;
    use crate::store::{initialize_store, StaffRole};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_services() -> (BoothService, KaryakartaService) {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_store(&pool).await.unwrap();

        let store = DocumentStore::new(pool);
        (BoothService::new(store.clone()), KaryakartaService::new(store))
    }

    fn test_booth(number: &str) -> Booth {
        Booth {
            booth_number: number.to_string(),
            location: "ZP School".to_string(),
            village: "Shirpur".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_list_and_get() {
        let (booths, _) = create_test_services().await;

        let created = booths.create_booth(test_booth("5")).await.unwrap();
        booths.create_booth(test_booth("9")).await.unwrap();

        let all = booths.list_booths().await.unwrap();
        assert_eq!(all.len(), 2);

        let fetched = booths.get_booth(&created.id).await.unwrap();
        assert_eq!(fetched.booth_number, "5");
        assert_eq!(fetched.status, BoothStatus::Active);
    }

    #[tokio::test]
    async fn test_status_and_counters() {
        let (booths, _) = create_test_services().await;

        let booth = booths.create_booth(test_booth("5")).await.unwrap();

        booths
            .set_status(&booth.id, BoothStatus::Inactive)
            .await
            .unwrap();
        booths.set_counts(&booth.id, 850, 120).await.unwrap();

        let fetched = booths.get_booth(&booth.id).await.unwrap();
        assert_eq!(fetched.status, BoothStatus::Inactive);
        assert_eq!(fetched.voter_count, 850);
        assert_eq!(fetched.surveyed_count, 120);
        // counter write must not clobber other fields
        assert_eq!(fetched.village, "Shirpur");
    }

    #[tokio::test]
    async fn test_assign_karyakarta_updates_both_sides() {
        let (booths, staff) = create_test_services().await;

        let booth = booths.create_booth(test_booth("5")).await.unwrap();
        let worker = staff
            .create_karyakarta(Karyakarta {
                name: "Suresh".to_string(),
                phone: "9876543210".to_string(),
                role: StaffRole::Supervisor,
                ..Default::default()
            })
            .await
            .unwrap();

        booths.assign_karyakarta(&booth.id, &worker).await.unwrap();

        let fetched = booths.get_booth(&booth.id).await.unwrap();
        assert_eq!(fetched.assigned_karyakarta.as_deref(), Some(worker.id.as_str()));
        assert_eq!(fetched.karyakartas[&worker.id].name, "Suresh");

        let refreshed = staff.get_karyakarta(&worker.id).await.unwrap();
        assert_eq!(refreshed.assigned_booths, vec![booth.id.clone()]);

        // Assigning again must not duplicate the booth reference
        let refreshed = staff.get_karyakarta(&worker.id).await.unwrap();
        booths.assign_karyakarta(&booth.id, &refreshed).await.unwrap();
        let refreshed = staff.get_karyakarta(&worker.id).await.unwrap();
        assert_eq!(refreshed.assigned_booths.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_booth_fails() {
        let (booths, _) = create_test_services().await;

        let result = booths.get_booth("nope").await;
        assert!(matches!(result, Err(AppError::BoothNotFound(_))));
    }
}
