//! Loading a before/after shape document from disk.

use std::path::Path;

use tracing::{debug, warn};

use crate::adjacency::find_duplicate_ids;
use crate::error::DocumentError;
use crate::model::Document;

/// Reads a document of the form
/// `{"before": {"shape_info": [...], "photovoltaic_systems": [...]}, "after": {...}}`.
///
/// Blank adjacency fields (`""`) load as unset. Duplicate ids are logged, not
/// rejected; the editing operations report them again after every copy.
///
/// # Example
///
/// ```no_run
/// use remodel_shape::document::load_document;
///
/// let document = load_document("building.json")?;
/// println!("{} floors after remodeling", document.after.shape_info.len());
/// # Ok::<(), remodel_shape::error::DocumentError>(())
/// ```
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document, DocumentError> {
    let content = std::fs::read_to_string(&path).map_err(|source| DocumentError::FileRead {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    let document: Document =
        serde_json::from_str(&content).map_err(|source| DocumentError::JsonParse {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

    let duplicates = find_duplicate_ids(&document.before.shape_info, &document.after.shape_info);
    if !duplicates.is_empty() {
        warn!(?duplicates, "document contains duplicate ids");
    }
    debug!(
        before = document.before.shape_info.len(),
        after = document.after.shape_info.len(),
        "loaded document"
    );
    Ok(document)
}
