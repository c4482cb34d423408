//! End-to-end solves against shell scripts standing in for the solver executables
#![cfg(unix)]

use delivopt::config::ConfigLoader;
use delivopt::{
    DeliveryCandidate, ErrorKind, RouteRequest, SelectionRequest, SolverError, SolverFactory,
    SolverService,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const ROUTE_SCRIPT: &str = r#"#!/bin/sh
[ "$#" -eq 5 ] || { echo "usage: a_star graph heuristic cities source destination" >&2; exit 1; }
[ -f "$1" ] && [ -f "$2" ] && [ -f "$3" ] || { echo "missing map file" >&2; exit 4; }
echo "Expanded 3 nodes"
echo "Optimized Path:"
echo "$4 -> depot -> $5"
echo "$4 to depot via ring road"
echo "depot to $5 via harbour bridge"
"#;

// Picks the first and last candidate: args are capacity count (id weight value)*
const SELECTION_SCRIPT: &str = r#"#!/bin/sh
[ "$#" -ge 5 ] || { echo "Error: Insufficient arguments." >&2; exit 1; }
count=$2
shift 2
first=$1
while [ "$#" -gt 3 ]; do shift 3; done
echo "$first $1"
"#;

const ROGUE_SELECTION_SCRIPT: &str = "#!/bin/sh\necho 999\n";

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_config(dir: &Path, route: &Path, selection: &Path) -> PathBuf {
    let path = dir.join("delivopt.toml");
    let contents = format!(
        r#"
[gateway]
timeout_ms = 5000
max_concurrent = 2
working_dir = "{dir}"

[route]
executable = "{route}"
graph_file = "graph.txt"
heuristic_file = "heuristic.txt"
city_mapping_file = "cities.txt"
verify_endpoints = true

[selection]
executable = "{selection}"
"#,
        dir = dir.display(),
        route = route.display(),
        selection = selection.display(),
    );
    fs::write(&path, contents).unwrap();
    path
}

// One test so no other test forks while the scripts are being written.
#[tokio::test]
async fn test_solves_through_external_scripts() {
    let dir = tempfile::tempdir().unwrap();
    for map in ["graph.txt", "heuristic.txt", "cities.txt"] {
        fs::write(dir.path().join(map), "").unwrap();
    }

    let route_bin = write_script(dir.path(), "a_star", ROUTE_SCRIPT);
    let selection_bin = write_script(dir.path(), "knapsack", SELECTION_SCRIPT);
    let rogue_bin = write_script(dir.path(), "rogue_knapsack", ROGUE_SELECTION_SCRIPT);

    let config_path = write_config(dir.path(), &route_bin, &selection_bin);
    let settings = ConfigLoader::from_file(&config_path).unwrap();
    let factory = SolverFactory::from_settings(settings.clone());

    // Route: map files resolve against the working directory
    let route = factory
        .route_solver()
        .solve(&RouteRequest::new("Depot North", "Quay 7"))
        .await
        .unwrap();
    assert_eq!(route.waypoints, vec!["Depot North", "depot", "Quay 7"]);
    assert_eq!(
        route.legs,
        vec![
            "Depot North to depot via ring road",
            "depot to Quay 7 via harbour bridge"
        ]
    );

    // Selection: flat positional layout reaches the script intact
    let request = SelectionRequest::new(
        50,
        vec![
            DeliveryCandidate::new(11, 10, 60),
            DeliveryCandidate::new(12, 20, 100),
            DeliveryCandidate::new(13, 30, 120),
        ],
    );
    let selection = factory.selection_solver().solve(&request).await.unwrap();
    assert_eq!(selection.selected_ids, vec![11, 13]);

    // Missing executable surfaces as a spawn failure
    let mut missing = settings.clone();
    missing.route.executable = dir.path().join("no_such_solver");
    let err = SolverFactory::from_settings(missing)
        .route_solver()
        .solve(&RouteRequest::new("1", "2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Spawn);

    // Solver usage errors go to stderr with a non-zero exit
    let mut broken_maps = settings.clone();
    broken_maps.route.graph_file = PathBuf::from("absent.txt");
    let err = SolverFactory::from_settings(broken_maps)
        .route_solver()
        .solve(&RouteRequest::new("1", "2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Solver);
    assert!(err.to_string().contains("missing map file"));

    // Ids outside the candidate set are caught
    let mut rogue = settings;
    rogue.selection.executable = rogue_bin;
    let err = SolverFactory::from_settings(rogue)
        .selection_solver()
        .solve(&request)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SolverError::UnexpectedSelection { ref unknown, .. } if unknown == &vec![999]
    ));
}
