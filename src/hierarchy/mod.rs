//! The concept graph arena and the memoized ancestor resolution that runs over
//! it.
//!
//! Parent links are identifiers looked up through the graph's index rather
//! than references between records, so a malformed document with a parent
//! cycle is just data and not an ownership problem.

mod graph;
mod resolver;

pub use graph::{ConceptGraph, ConceptRecord, DERIVED_KEYS};
pub use resolver::{resolve_hierarchy, resolve_hierarchy_in_order, ResolveStats};
