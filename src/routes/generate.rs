use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Instrument;

use crate::certificates::style::{Style, StyleForm, STYLE_FIELDS};
use crate::certificates::{generate, read_participants, Batch};
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::{sanitize_file_name, Workspace};

const ARCHIVE_DOWNLOAD_NAME: &str = "certificates.zip";

pub async fn generate_certificates(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let workspace = Workspace::create(&state.config.work_dir)?;
    let span = tracing::info_span!("generate", request_id = %workspace.id());
    span.in_scope(|| tracing::debug!("Workspace at {}", workspace.path().display()));

    // `workspace` outlives the run and is dropped on every exit path,
    // taking uploads, certificates and the archive with it.
    let result = run(&state, &workspace, multipart).instrument(span).await;
    drop(workspace);
    result
}

struct Uploads {
    template: Option<PathBuf>,
    participants: Option<PathBuf>,
    style: StyleForm,
}

async fn run(
    state: &AppState,
    workspace: &Workspace,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let Ok(multipart) = multipart else {
        return Err(AppError::MissingUploads);
    };
    let uploads = receive_uploads(multipart, workspace).await?;

    let (Some(template_path), Some(participants_path)) = (uploads.template, uploads.participants)
    else {
        return Err(AppError::MissingUploads);
    };
    if !template_path.exists() {
        return Err(AppError::TemplateNotFound);
    }
    if !participants_path.exists() {
        return Err(AppError::ParticipantsNotFound);
    }

    let batch = Batch {
        template_path,
        participants_path,
        fonts_dir: state.config.fonts_dir.clone(),
        certificates_dir: workspace.certificates_dir(),
        archive_path: workspace.archive_path(),
    };
    let style = Style::from(uploads.style);
    tracing::info!(
        "Generating certificates with font {:?} at {}px, position ({}, {})",
        style.font_family,
        style.font_size,
        style.x,
        style.y
    );

    let span = tracing::Span::current();
    let archive = tokio::task::spawn_blocking(move || {
        span.in_scope(|| {
            let names = read_participants(&batch)?;
            tracing::info!("Loaded {} participant(s)", names.len());
            generate(&batch, &names, style)
        })
    })
    .await??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ARCHIVE_DOWNLOAD_NAME),
            ),
        ],
        archive,
    )
        .into_response())
}

/// Persists the two file parts into the workspace and collects style fields.
async fn receive_uploads(
    mut multipart: Multipart,
    workspace: &Workspace,
) -> Result<Uploads, AppError> {
    let uploads_dir = workspace.uploads_dir();
    let mut uploads = Uploads {
        template: None,
        participants: None,
        style: StyleForm::default(),
    };

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "template" | "participants" => {
                // Browsers send an empty filename when no file was chosen.
                let Some(file_name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string)
                else {
                    continue;
                };
                let path = uploads_dir.join(format!("{}-{}", name, sanitize_file_name(&file_name)));
                let data = field.bytes().await?;
                tokio::fs::write(&path, &data).await?;
                tracing::debug!("Stored upload {} ({} bytes)", path.display(), data.len());

                if name == "template" {
                    uploads.template = Some(path);
                } else {
                    uploads.participants = Some(path);
                }
            }
            other if STYLE_FIELDS.contains(&other) => {
                let value = field.text().await?;
                uploads.style.set(other, value);
            }
            _ => {}
        }
    }

    Ok(uploads)
}
