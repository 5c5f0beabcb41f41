pub mod find;
pub mod index;
pub mod outline;
pub mod paginate;
pub mod stats;
pub mod validate;

pub use find::{find, FindArgs};
pub use index::{index, IndexArgs};
pub use outline::{outline, OutlineArgs};
pub use paginate::{paginate, PaginateArgs};
pub use stats::{stats, StatsArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use folio_editor::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve `path` against the working directory
pub(crate) fn resolve(path: &Path, cwd: &str) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(cwd).join(path)
    }
}

pub(crate) fn load_document(path: &Path, cwd: &str) -> Result<Document> {
    let path = resolve(path, cwd);
    let json = fs::read_to_string(&path).with_context(|| format!("Cannot read {}", path.display()))?;
    let document = Document::from_json(&json).with_context(|| format!("Invalid document {}", path.display()))?;
    Ok(document)
}
