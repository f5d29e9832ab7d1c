pub mod csv;
pub mod json;

pub use crate::error::ExportError;
pub use csv::export_adjacency_csv;
pub use json::{export_json, write_document};
