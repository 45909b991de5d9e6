pub mod archive;
pub mod names;
pub mod render;
pub mod style;

use std::path::PathBuf;

use crate::error::AppError;
use crate::fonts::FontRegistry;
use names::parse_participants;
use render::CertificateRenderer;
use style::Style;

/// Everything one generation run reads and writes on disk.
pub struct Batch {
    pub template_path: PathBuf,
    pub participants_path: PathBuf,
    pub fonts_dir: PathBuf,
    pub certificates_dir: PathBuf,
    pub archive_path: PathBuf,
}

/// Reads and normalizes the participants file; an all-blank file is rejected.
pub fn read_participants(batch: &Batch) -> Result<Vec<String>, AppError> {
    let raw = std::fs::read(&batch.participants_path)?;
    let names = parse_participants(&String::from_utf8_lossy(&raw));
    if names.is_empty() {
        return Err(AppError::EmptyParticipants);
    }
    Ok(names)
}

/// Renders one certificate per name, zips them and returns the archive bytes.
///
/// Blocking; run it off the async executor.
pub fn generate(batch: &Batch, names: &[String], style: Style) -> Result<Vec<u8>, AppError> {
    let fonts = FontRegistry::load_dir(&batch.fonts_dir);
    let template = std::fs::read(&batch.template_path)?;
    let renderer = CertificateRenderer::new(&template, style, &fonts)?;
    let (width, height) = renderer.dimensions();
    tracing::debug!("Template is {}x{}", width, height);

    let written = renderer.write_all(names, &batch.certificates_dir)?;
    tracing::info!("Rendered {} certificate(s)", written.len());

    archive::build_archive(&batch.certificates_dir, &batch.archive_path)?;
    Ok(std::fs::read(&batch.archive_path)?)
}
