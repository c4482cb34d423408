// Solver adapters module

pub mod factory;
pub mod protocol;
pub mod route_solver;
pub mod selection_solver;

#[cfg(test)]
pub(crate) mod testing;

pub use factory::{DynRouteSolver, DynSelectionSolver, SolverFactory};
pub use route_solver::{RouteSolver, RouteSolverConfig};
pub use selection_solver::{SelectionSolver, SelectionSolverConfig};
