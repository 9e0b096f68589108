//! Section contact graph.
//!
//! Nodes are class sections, each holding its roster of students. An edge
//! between two sections carries the number of sibling pairs currently split
//! across them. Connected components of this graph are the groups of
//! sections an outbreak can traverse through sibling contact.

mod section_graph;
mod types;

pub use section_graph::{Link, SectionGraph};
pub use types::{SectionKey, StudentId};
