use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error while archiving: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Zips every regular file directly inside `src_dir` into `archive_path`,
/// replacing any previous archive there. Returns the number of entries.
pub fn build_archive(src_dir: &Path, archive_path: &Path) -> Result<usize, ArchiveError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(src_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut zip = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in &files {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let content = std::fs::read(path)?;
        zip.start_file(name, options)?;
        zip.write_all(&content)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;

    tracing::info!("Archived {} file(s) into {}", files.len(), archive_path.display());
    Ok(files.len())
}
