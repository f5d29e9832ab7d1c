//! Adjacency link manager.
//!
//! A link between surfaces A and B is stored as a directed pair of fields:
//! the origin A carries `adjacent_surface_id = B`, the partner B carries
//! `adjacent_from = A`. Everything here keeps that pair consistent while the
//! tree is edited.

pub mod check;
pub mod eligibility;
pub mod link;
pub mod sanitize;

pub use check::{check_tree, find_duplicate_ids, validate_unique_ids, Violation};
pub use eligibility::{
    check_eligibility, eligible_targets, is_eligible, link_surfaces, LinkCandidate,
};
pub use link::{
    change_boundary_condition, clear_reverse_adjacency, remove_adjacency, set_adjacency,
    would_destroy_link,
};
pub use sanitize::{sanitize, sanitized};
