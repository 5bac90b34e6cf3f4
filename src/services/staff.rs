//! Karyakarta (field staff) service

use crate::config::STAFF_PATH;
use crate::error::{AppError, Result};
use crate::store::{DocumentStore, Karyakarta};
use uuid::Uuid;

#[derive(Clone)]
pub struct KaryakartaService {
    store: DocumentStore,
}

impl KaryakartaService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn create_karyakarta(&self, mut staff: Karyakarta) -> Result<Karyakarta> {
        let id = Uuid::new_v4().to_string();
        staff.id = id.clone();

        self.store
            .set(&staff_path(&id), &serde_json::to_value(&staff)?)
            .await?;

        tracing::info!("Created karyakarta {} ({:?})", id, staff.role);
        Ok(staff)
    }

    pub async fn get_karyakarta(&self, id: &str) -> Result<Karyakarta> {
        let value = self
            .store
            .read(&staff_path(id))
            .await?
            .ok_or_else(|| AppError::StaffNotFound(id.to_string()))?;

        let mut staff: Karyakarta = serde_json::from_value(value)?;
        staff.id = id.to_string();
        Ok(staff)
    }

    pub async fn list_karyakartas(&self) -> Result<Vec<Karyakarta>> {
        let documents = self.store.read_all(STAFF_PATH).await?;

        let mut staff = Vec::with_capacity(documents.len());
        for (path, value) in documents {
            let mut member: Karyakarta = serde_json::from_value(value)?;
            member.id = path.rsplit('/').next().unwrap_or_default().to_string();
            staff.push(member);
        }
        Ok(staff)
    }

    /// Replace a staff record, keeping its id
    pub async fn update_karyakarta(&self, staff: &Karyakarta) -> Result<()> {
        self.get_karyakarta(&staff.id).await?;

        self.store
            .set(&staff_path(&staff.id), &serde_json::to_value(staff)?)
            .await?;

        tracing::debug!("Updated karyakarta {}", staff.id);
        Ok(())
    }
}

fn staff_path(id: &str) -> String {
    format!("{}/{}", STAFF_PATH, id)
}
