//! # Remodel Shape
//!
//! Structural editing for the floor → zone → surface model of a building
//! before and after a remodel.
//!
//! Surfaces point at their thermal neighbours by id. Every edit in this crate
//! keeps that web of references consistent:
//!
//! - link and unlink surfaces under the wall/floor/ceiling rules
//! - grow or shrink floors, zones and surfaces by count
//! - remove single floors, zones and surfaces
//! - copy a version, floor, zone or surface over destinations in either
//!   version under fresh ids
//! - select and merge part of one version into another
//!
//! Operations take a tree by reference and hand back the next one, always
//! sanitized so no adjacency field names a missing id.
//!
//! ## Example
//!
//! ```no_run
//! use remodel_shape::document::load_document;
//! use remodel_shape::model::{NanoIds, Version};
//! use remodel_shape::propagate::{apply_copy, CopyRequest};
//!
//! let document = load_document("building.json")?;
//! let request = CopyRequest::version(Version::Before, Version::After);
//! let next = apply_copy(&document, &request, &mut NanoIds)?;
//! println!("{} floors after remodeling", next.after.shape_info.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adjacency;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod logging;
pub mod merge;
pub mod model;
pub mod propagate;
pub mod removal;
pub mod resize;
pub mod selection;
