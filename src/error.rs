use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::certificates::archive::ArchiveError;

/// Plain-text body for every failure past input validation.
pub const GENERATION_FAILED: &str = "Error generating certificates.";

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Please upload both the template and participants files.")]
    MissingUploads,

    #[error("Template file does not exist.")]
    TemplateNotFound,

    #[error("Participants file does not exist.")]
    ParticipantsNotFound,

    #[error("The participants list is empty.")]
    EmptyParticipants,

    #[error("failed to read multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("template image could not be decoded: {0}")]
    Template(#[from] image::ImageError),

    #[error("no font could be resolved for family {0:?}")]
    NoFont(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUploads
            | AppError::TemplateNotFound
            | AppError::ParticipantsNotFound
            | AppError::EmptyParticipants => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::BAD_REQUEST {
            tracing::info!("Rejected generation request: {}", self);
            return (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response();
        }

        tracing::error!("Certificate generation failed: {}", self);
        (status, GENERATION_FAILED).into_response()
    }
}
