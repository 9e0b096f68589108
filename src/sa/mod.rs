//! Simulated Annealing over section assignments.
//!
//! A single-solution trajectory search: each step moves one sibling to
//! another section, and worsening moves are accepted with a probability
//! that shrinks as the temperature falls, letting the search escape local
//! optima early on and settle later.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod cooling;
mod runner;
mod types;

pub use config::{AnnealingConfig, ReseedPolicy};
pub use cooling::{CoolingSchedule, CoolingStep};
pub use runner::{AnnealingController, AnnealingResult, INITIAL_TEMPERATURE_FACTOR};
pub use types::{Assignment, Instance};
