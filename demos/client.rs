// Example client demonstrating how to use the delivery optimizer gRPC service
//
// A van leaves the depot with 50 kg of capacity:
// - Delivery 1: 10 kg, worth 60
// - Delivery 2: 20 kg, worth 100
// - Delivery 3: 30 kg, worth 120
//
// The selection solver picks the most valuable subset that fits, then the
// route solver plans the drive between two map nodes.

use tonic::Request;

pub mod delivopt {
    tonic::include_proto!("delivopt");
}

use delivopt::{
    delivery_optimizer_client::DeliveryOptimizerClient, DeliveryCandidate, Empty, RouteRequest,
    SelectionRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Connect to the gRPC server
    let mut client = DeliveryOptimizerClient::connect("http://127.0.0.1:50051").await?;

    println!("=== Configured Solvers ===\n");
    let solvers = client
        .get_available_solvers(Request::new(Empty {}))
        .await?
        .into_inner();
    for solver in solvers.solvers {
        println!(
            "  {:<10} {} ({}, {})",
            solver.kind, solver.name, solver.executable, solver.protocol
        );
    }

    println!("\n=== Delivery Selection ===\n");
    let candidates = vec![
        DeliveryCandidate {
            id: 1,
            weight: 10,
            value: 60,
            volume: None,
        },
        DeliveryCandidate {
            id: 2,
            weight: 20,
            value: 100,
            volume: None,
        },
        DeliveryCandidate {
            id: 3,
            weight: 30,
            value: 120,
            volume: None,
        },
    ];

    let selection = SelectionRequest {
        capacity: 50,
        volume: None,
        candidates,
    };

    match client.select_deliveries(Request::new(selection)).await {
        Ok(response) => {
            let result = response.into_inner();
            println!("✓ Load deliveries {:?}", result.selected_ids);
            println!("  Solve Time: {:.2} ms", result.solve_time_ms);
        }
        Err(status) => println!("✗ Selection failed: {}", status.message()),
    }

    println!("\n=== Route Suggestion ===\n");
    let route = RouteRequest {
        source: "0".to_string(),
        destination: "7".to_string(),
    };

    match client.suggest_route(Request::new(route)).await {
        Ok(response) => {
            let result = response.into_inner();
            if result.found {
                println!("✓ {}", result.waypoints.join(" -> "));
                for leg in &result.legs {
                    println!("    {}", leg);
                }
            } else {
                println!("✗ No route found");
            }
        }
        Err(status) => println!("✗ Route failed: {}", status.message()),
    }

    Ok(())
}
