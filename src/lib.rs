//! Sibling-aware class section assignment.
//!
//! Students with siblings in other sections link those sections together:
//! an outbreak in one class can travel to the next through a shared
//! household. This crate rearranges siblings across sections to keep the
//! resulting clusters small and exposure even, using simulated annealing.
//!
//! - **Graph**: class sections with their rosters, linked by the number of
//!   sibling pairs split between them.
//! - **Registry**: the siblings and the section each one attends.
//! - **Objective**: contagion risk from component sizes and the spread of
//!   per-section exposure.
//! - **Neighbor**: moves one sibling to another section, re-routing links
//!   and respecting a per-section capacity.
//! - **SA**: the annealing loop with linear, geometric, logarithmic, Cauchy
//!   and modified Cauchy cooling.
//!
//! # Architecture
//!
//! Building the initial graph from enrollment data, collecting parameters
//! and rendering results are left to callers; this crate takes an
//! [`sa::Instance`] and an [`sa::AnnealingConfig`] and returns an
//! [`sa::AnnealingResult`].

pub mod error;
pub mod graph;
pub mod neighbor;
pub mod objective;
pub mod random;
pub mod registry;
pub mod sa;

pub use error::CohortError;
