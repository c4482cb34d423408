//! Text protocol spoken by the external solver executables.
//!
//! Both solvers take positional arguments and answer on stdout. The grammar
//! lives here, separate from process handling, so that format drift in the
//! executables shows up in the fixture tests under `tests/fixtures/`.
//!
//! Route solver (`route/v1`):
//!
//! ```text
//! args:   <graph> <heuristic> <city-mapping> <source> <destination>
//! stdout: ... any lines ...
//!         Optimized Path:
//!         A -> B -> C
//!         ... lines containing "via" describe the legs ...
//! ```
//!
//! Selection solver (`selection/v1`):
//!
//! ```text
//! args:   <capacity> <count> (<id> <weight> <value>)*                       weighted
//!         <capacity> <max-volume> <count> (<id> <weight> <volume> <value>)*  dimensional
//! stdout: whitespace separated ids, possibly empty
//! ```

use crate::domain::{
    models::{DeliveryCandidate, RouteResult, SelectionResult},
    solver_service::{Result, SolverError},
    value_objects::SelectionLayout,
};
use std::path::Path;

pub const ROUTE_PROTOCOL: &str = "route/v1";
pub const SELECTION_PROTOCOL: &str = "selection/v1";

/// Line announcing that the next line holds the path
pub const PATH_MARKER: &str = "Optimized Path:";
pub const PATH_SEPARATOR: &str = " -> ";
/// Substring identifying a leg description line
pub const LEG_MARKER: &str = "via";

/// Static map files handed to the routing solver on every call
#[derive(Debug, Clone, Copy)]
pub struct MapFiles<'a> {
    pub graph: &'a Path,
    pub heuristic: &'a Path,
    pub city_mapping: &'a Path,
}

pub fn route_arguments(maps: MapFiles<'_>, source: &str, destination: &str) -> Vec<String> {
    vec![
        maps.graph.display().to_string(),
        maps.heuristic.display().to_string(),
        maps.city_mapping.display().to_string(),
        source.to_string(),
        destination.to_string(),
    ]
}

pub fn parse_route_output(stdout: &str) -> Result<RouteResult> {
    let lines: Vec<&str> = stdout.trim().lines().collect();

    let marker = lines
        .iter()
        .position(|line| line.trim().starts_with(PATH_MARKER))
        .ok_or_else(|| SolverError::Parse(format!("missing '{}' line", PATH_MARKER)))?;

    let path_line = lines.get(marker + 1).ok_or_else(|| {
        SolverError::Parse(format!("no path line after '{}'", PATH_MARKER))
    })?;

    let waypoints = parse_path_line(path_line)?;

    let legs = lines
        .iter()
        .filter(|line| line.contains(LEG_MARKER))
        .map(|line| line.trim().to_string())
        .collect();

    Ok(RouteResult::new(waypoints, legs))
}

fn parse_path_line(line: &str) -> Result<Vec<String>> {
    let line = line.trim();
    if line.is_empty() {
        return Err(SolverError::Parse("empty path line".to_string()));
    }

    let arrow = PATH_SEPARATOR.trim();
    if line.starts_with(arrow) || line.ends_with(arrow) {
        return Err(SolverError::Parse(format!("malformed path line '{}'", line)));
    }

    line.split(PATH_SEPARATOR)
        .map(str::trim)
        .map(|token| {
            if token.is_empty() {
                Err(SolverError::Parse(format!("malformed path line '{}'", line)))
            } else {
                Ok(token.to_string())
            }
        })
        .collect()
}

/// Flat positional encoding of a packing problem.
///
/// The count is derived from `candidates`, so it always matches the number
/// of records that follow. Dimensional layouts require `max_volume` and a
/// volume on every candidate; callers validate that beforehand and a missing
/// value is encoded as 0.
pub fn selection_arguments(
    layout: SelectionLayout,
    capacity: u64,
    max_volume: Option<u64>,
    candidates: &[DeliveryCandidate],
) -> Vec<String> {
    let mut args = Vec::with_capacity(3 + candidates.len() * layout.fields_per_candidate());

    args.push(capacity.to_string());
    if layout == SelectionLayout::Dimensional {
        args.push(max_volume.unwrap_or_default().to_string());
    }
    args.push(candidates.len().to_string());

    for candidate in candidates {
        args.push(candidate.id.to_string());
        args.push(candidate.weight.to_string());
        if layout == SelectionLayout::Dimensional {
            args.push(candidate.volume.unwrap_or_default().to_string());
        }
        args.push(candidate.value.to_string());
    }

    args
}

pub fn parse_selection_output(stdout: &str) -> Result<SelectionResult> {
    let selected_ids = stdout
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| SolverError::Parse(format!("'{}' is not an item id", token)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SelectionResult::new(selected_ids))
}
