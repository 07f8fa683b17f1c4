//! CP decomposition at one or more ranks through a pluggable solver.

pub mod command_solver;
pub mod orchestrator;

pub use command_solver::{CommandSolver, SolverRequest, SolverResponse};
pub use orchestrator::{DecompositionOrchestrator, DecompositionOutcome};
