//! Path-addressed document operations
//!
//! Documents live at slash-separated paths ("voters/abc", "config/branding")
//! and hold one JSON value each. Writes are transactional per call;
//! `update_multi` merges several paths in a single transaction, which is
//! what campaign fan-out relies on. Every committed mutation is published
//! to subscribers as a [`ChangeEvent`].

use crate::error::{AppError, Result};
use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tokio::sync::broadcast;

/// Buffered change events per subscriber before old ones are dropped
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// A committed mutation under some path. `value` is `None` for deletes.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: String,
    pub value: Option<Value>,
}

/// Path-addressed document store over SQLite
#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { pool, changes }
    }

    /// Read a single document
    pub async fn read(&self, path: &str) -> Result<Option<Value>> {
        let row: Option<String> = sqlx::query_scalar("SELECT value FROM documents WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))?;

        match row {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Read every direct child of a collection path, ordered by path.
    /// This is the wholesale snapshot read the directory cache uses.
    pub async fn read_all(&self, prefix: &str) -> Result<Vec<(String, Value)>> {
        let rows = sqlx::query("SELECT path, value FROM documents WHERE parent = ? ORDER BY path")
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::StoreRead(e.to_string()))?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            let path: String = row.get(0);
            let text: String = row.get(1);
            documents.push((path, serde_json::from_str(&text)?));
        }

        Ok(documents)
    }

    /// Wholesale-set a document, replacing any existing value
    pub async fn set(&self, path: &str, value: &Value) -> Result<()> {
        validate_path(path)?;

        upsert(&self.pool, path, value)
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        tracing::debug!("Set document: {}", path);
        self.publish(path, Some(value.clone()));
        Ok(())
    }

    /// Merge a JSON-object patch into a document, creating it if absent.
    /// The merge is shallow: top-level keys of the patch replace the
    /// document's keys.
    pub async fn update(&self, path: &str, patch: &Value) -> Result<()> {
        validate_path(path)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        let merged = merge_into(&mut tx, path, patch)
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        tracing::debug!("Updated document: {}", path);
        self.publish(path, Some(merged));
        Ok(())
    }

    /// Merge several paths in one transaction. Either every entry lands
    /// or none do.
    pub async fn update_multi(&self, entries: &[(String, Value)]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        let mut merged = Vec::with_capacity(entries.len());
        for (path, patch) in entries {
            validate_path(path)?;
            let value = merge_into(&mut tx, path, patch)
                .await
                .map_err(|e| AppError::StoreWrite(e.to_string()))?;
            merged.push((path.clone(), value));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?;

        tracing::debug!("Updated {} documents in one batch", merged.len());
        for (path, value) in merged {
            self.publish(&path, Some(value));
        }
        Ok(())
    }

    /// Delete a document. Deleting an absent path is not an error.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM documents WHERE path = ?")
            .bind(path)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::StoreWrite(e.to_string()))?
            .rows_affected();

        if rows > 0 {
            tracing::debug!("Deleted document: {}", path);
            self.publish(path, None);
        }
        Ok(())
    }

    /// Watch every mutation at or under a path. Dropping the returned
    /// handle ends the subscription.
    pub fn subscribe(&self, prefix: &str) -> Subscription {
        Subscription {
            prefix: prefix.to_string(),
            rx: self.changes.subscribe(),
        }
    }

    fn publish(&self, path: &str, value: Option<Value>) {
        // send only fails when nobody is listening
        let _ = self.changes.send(ChangeEvent {
            path: path.to_string(),
            value,
        });
    }
}

/// A scoped change subscription. Holds a filtered receiver; teardown is
/// the drop of this handle, there is no explicit unsubscribe call.
pub struct Subscription {
    prefix: String,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Next change under this subscription's prefix, or `None` once the
    /// store is gone.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.matches(&event.path) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscription on {} lagged, skipped {}", self.prefix, skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn matches(&self, path: &str) -> bool {
        path == self.prefix
            || path
                .strip_prefix(self.prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() || path.starts_with('/') || path.ends_with('/') {
        return Err(AppError::StoreWrite(format!("invalid path: {:?}", path)));
    }
    Ok(())
}

/// Collection portion of a path: "voters/abc" -> "voters"
fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

async fn upsert(pool: &SqlitePool, path: &str, value: &Value) -> std::result::Result<(), sqlx::Error> {
    let text = value.to_string();
    sqlx::query(
        r#"
        INSERT INTO documents (path, parent, value, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(path) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(path)
    .bind(parent_of(path))
    .bind(text)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

async fn merge_into(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    path: &str,
    patch: &Value,
) -> std::result::Result<Value, sqlx::Error> {
    let existing: Option<String> = sqlx::query_scalar("SELECT value FROM documents WHERE path = ?")
        .bind(path)
        .fetch_optional(&mut **tx)
        .await?;

    let merged = match existing.and_then(|text| serde_json::from_str::<Value>(&text).ok()) {
        Some(Value::Object(mut base)) => {
            if let Value::Object(patch_map) = patch {
                for (key, value) in patch_map {
                    base.insert(key.clone(), value.clone());
                }
                Value::Object(base)
            } else {
                patch.clone()
            }
        }
        _ => patch.clone(),
    };

    let text = merged.to_string();
    sqlx::query(
        r#"
        INSERT INTO documents (path, parent, value, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(path) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(path)
    .bind(parent_of(path))
    .bind(text)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut **tx)
    .await?;

    Ok(merged)
}
