use crate::error::ExportError;
use crate::model::Document;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Saves the whole document, both versions, as pretty JSON.
pub fn export_json<P: AsRef<Path>>(document: &Document, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;
    write_document(document, file)
}

pub fn write_document<W: Write>(document: &Document, mut writer: W) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(document)?;
    writer
        .write_all(json.as_bytes())
        .and_then(|()| writer.write_all(b"\n"))
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Building, Floor};
    use pretty_assertions::assert_eq;

    #[test]
    fn written_document_reads_back() {
        let document = Document {
            before: Building::new(vec![Floor::new("f1", "1층", 1)]),
            after: Building::default(),
        };
        let mut buffer = Vec::new();
        write_document(&document, &mut buffer).unwrap();

        let back: Document = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(back, document);
    }
}
