//! Unified error type for the service layer.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Wraps the backend crate errors behind one interface for frontends.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Data(#[from] fb_data::DataError),

    #[error(transparent)]
    Geometry(#[from] fb_geom::GeometryError),

    #[error(transparent)]
    Allocation(#[from] fb_eli::EliError),

    #[error("Invalid snapshot: {what}")]
    Snapshot { what: String },

    #[error("Failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<fb_core::FbError> for AppError {
    fn from(err: fb_core::FbError) -> Self {
        AppError::Data(fb_data::DataError::from(err))
    }
}
