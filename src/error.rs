//! Error types for the Matdaan application
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to the frontend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store read failed: {0}")]
    StoreRead(String),

    #[error("Store write failed: {0}")]
    StoreWrite(String),

    #[error("Voter not found: {0}")]
    VoterNotFound(String),

    #[error("Booth not found: {0}")]
    BoothNotFound(String),

    #[error("Karyakarta not found: {0}")]
    StaffNotFound(String),

    #[error("No printer found: {0}")]
    DeviceNotFound(String),

    #[error("Printer permission denied: {0}")]
    PermissionDenied(String),

    #[error("Printer transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
