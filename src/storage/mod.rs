use chrono::Utc;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

const UPLOADS_DIR: &str = "uploads";
const CERTIFICATES_DIR: &str = "certificates";
const ARCHIVE_NAME: &str = "certificates.zip";

pub fn generate_request_id() -> String {
    format!(
        "{}_{}",
        Utc::now().format("%Y%m%d"),
        &Uuid::new_v4().simple().to_string()[..8]
    )
}

pub fn ensure_dirs(work_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(work_dir)
}

/// Longest file stem we write; leaves room for a prefix or extension under NAME_MAX.
pub const MAX_FILE_STEM_BYTES: usize = 200;

/// Replaces characters that would let a name escape its directory and cuts
/// it to `MAX_FILE_STEM_BYTES` on a char boundary.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len().min(MAX_FILE_STEM_BYTES));
    for c in name.chars() {
        let c = match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        };
        if out.len() + c.len_utf8() > MAX_FILE_STEM_BYTES {
            break;
        }
        out.push(c);
    }
    out
}

/// Scratch area owned by a single generation request.
///
/// Holds `uploads/`, `certificates/` and `certificates.zip` under a uniquely
/// named directory. Dropping the workspace removes all of it; removal
/// failures are logged and swallowed.
pub struct Workspace {
    id: String,
    dir: Option<TempDir>,
    root: PathBuf,
}

impl Workspace {
    pub fn create(work_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(work_dir)?;
        let id = generate_request_id();
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", id))
            .tempdir_in(work_dir)?;
        let root = dir.path().to_path_buf();

        std::fs::create_dir_all(root.join(UPLOADS_DIR))?;
        std::fs::create_dir_all(root.join(CERTIFICATES_DIR))?;

        Ok(Self {
            id,
            dir: Some(dir),
            root,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join(UPLOADS_DIR)
    }

    pub fn certificates_dir(&self) -> PathBuf {
        self.root.join(CERTIFICATES_DIR)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_NAME)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => tracing::debug!("Removed workspace {}", self.root.display()),
            Err(e) => tracing::warn!(
                "Failed to remove workspace {}: {}",
                self.root.display(),
                e
            ),
        }
    }
}
