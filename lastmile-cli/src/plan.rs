//! Plan command implementation.
//!
//! Loads a JSON scenario (depot, deliveries, vehicles), runs one
//! optimisation pass against an in-memory store and prints the planned
//! routes as JSON on stdout.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use serde::{Deserialize, Serialize};

use lastmile_engine::{
    Coordinate, Delivery, DeliveryId, Dispatcher, DispatchStore, OptimizationResult,
    OptimizeRequest, PlanCommit, Priority, Route, RouteId, StoreError, StoreVersion, Strategy,
    Vehicle, VehicleId,
};

use crate::CliError;

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(
    long_about = "Plan delivery routes for a scenario file. The scenario is \
                 a JSON document holding the depot coordinates, the \
                 deliveries to place and the vehicle fleet.",
    about = "Plan delivery routes for a scenario"
)]
pub(crate) struct PlanArgs {
    /// Path to the JSON scenario file.
    #[arg(value_name = "path")]
    scenario: PathBuf,
    /// Stop-ordering strategy: distance, priority or time.
    #[arg(long, default_value = "distance")]
    strategy: Strategy,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[expect(clippy::print_stdout, reason = "the rendered plan is the command's output")]
pub(crate) fn run(args: &PlanArgs) -> Result<(), CliError> {
    let output = execute(args)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

fn execute(args: &PlanArgs) -> Result<PlanOutput, CliError> {
    let scenario = load_scenario(&args.scenario)?;
    let depot = coordinate(scenario.depot).map_err(CliError::InvalidDepot)?;
    let store = build_store(&scenario)?;
    let mut dispatcher = Dispatcher::new(store);
    let request = OptimizeRequest::for_depot(depot, args.strategy);
    let result = dispatcher.optimize(&request)?;
    Ok(render(result))
}

fn load_scenario(path: &Path) -> Result<Scenario, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadScenario {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::ParseScenario {
        path: path.to_path_buf(),
        source,
    })
}

fn build_store(scenario: &Scenario) -> Result<ScenarioStore, CliError> {
    let mut store = ScenarioStore::default();
    for delivery in &scenario.deliveries {
        store.deliveries.push(delivery.to_domain()?);
    }
    for vehicle in &scenario.vehicles {
        store
            .vehicles
            .push(Vehicle::new(vehicle.id, vehicle.capacity_weight_kg, vehicle.capacity_volume_m3));
    }
    Ok(store)
}

fn render(result: OptimizationResult) -> PlanOutput {
    let routes = result
        .routes
        .into_iter()
        .map(|planned| RouteOutput {
            id: planned.route.id,
            vehicle_id: planned.route.vehicle_id,
            stops: planned
                .route
                .waypoints
                .iter()
                .map(|w| StopOutput {
                    sequence: w.sequence_index,
                    delivery_id: w.delivery_id,
                    distance_from_previous_km: w.distance_from_previous_km,
                    estimated_arrival_minutes: w.estimated_arrival_minutes,
                })
                .collect(),
            total_distance_km: planned.metrics.total_distance_km,
            estimated_duration_minutes: planned.metrics.estimated_duration_minutes,
            efficiency_score: planned.metrics.efficiency_score,
        })
        .collect();
    PlanOutput {
        routes,
        unassigned: result.unassigned,
        summary: SummaryOutput {
            route_count: result.summary.route_count,
            assigned_deliveries: result.summary.assigned_deliveries,
            unassigned_deliveries: result.summary.unassigned_deliveries,
            total_distance_km: result.summary.total_distance_km,
        },
    }
}

fn coordinate(position: Position) -> Result<Coordinate, lastmile_engine::CoordinateError> {
    Coordinate::new(position.latitude, position.longitude)
}

/// The scenario document as authored on disk.
#[derive(Debug, Deserialize)]
struct Scenario {
    depot: Position,
    deliveries: Vec<ScenarioDelivery>,
    vehicles: Vec<ScenarioVehicle>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Position {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ScenarioDelivery {
    id: DeliveryId,
    #[serde(default)]
    destination: Option<Position>,
    #[serde(default)]
    weight_kg: Option<f64>,
    #[serde(default)]
    volume_m3: Option<f64>,
    /// Priority level name; defaults to NORMAL when omitted.
    #[serde(default)]
    priority: Option<String>,
}

impl ScenarioDelivery {
    fn to_domain(&self) -> Result<Delivery, CliError> {
        let destination = match self.destination {
            Some(position) => Some(coordinate(position).map_err(|source| {
                CliError::InvalidDestination {
                    id: self.id,
                    source,
                }
            })?),
            None => None,
        };
        let priority = match &self.priority {
            Some(name) => Priority::from_str(name).map_err(|source| CliError::InvalidPriority {
                id: self.id,
                source,
            })?,
            None => Priority::Normal,
        };
        Ok(Delivery::new(
            self.id,
            destination,
            self.weight_kg,
            self.volume_m3,
            priority,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ScenarioVehicle {
    id: VehicleId,
    capacity_weight_kg: f64,
    capacity_volume_m3: f64,
}

/// One-shot in-memory store backing a single `plan` invocation.
#[derive(Debug, Default)]
struct ScenarioStore {
    version: StoreVersion,
    deliveries: Vec<Delivery>,
    vehicles: Vec<Vehicle>,
    routes: Vec<Route>,
    next_route_id: RouteId,
}

impl DispatchStore for ScenarioStore {
    fn version(&self) -> StoreVersion {
        self.version
    }

    fn available_vehicles(&self) -> Vec<Vehicle> {
        self.vehicles
            .iter()
            .filter(|v| v.is_available())
            .cloned()
            .collect()
    }

    fn unassigned_deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .iter()
            .filter(|d| d.status == lastmile_engine::DeliveryStatus::Pending)
            .cloned()
            .collect()
    }

    fn delivery(&self, id: DeliveryId) -> Result<Delivery, StoreError> {
        self.deliveries
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(StoreError::DeliveryNotFound(id))
    }

    fn vehicle(&self, id: VehicleId) -> Result<Vehicle, StoreError> {
        self.vehicles
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or(StoreError::VehicleNotFound(id))
    }

    fn route(&self, id: RouteId) -> Result<Route, StoreError> {
        self.routes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::RouteNotFound(id))
    }

    fn next_route_id(&mut self) -> RouteId {
        self.next_route_id += 1;
        self.next_route_id
    }

    fn commit(&mut self, commit: PlanCommit) -> Result<StoreVersion, StoreError> {
        if commit.expected_version != self.version {
            return Err(StoreError::ConcurrentModification {
                expected: commit.expected_version,
                found: self.version,
            });
        }
        for (id, _) in &commit.delivery_status {
            self.delivery(*id)?;
        }
        for (id, _) in &commit.vehicle_status {
            self.vehicle(*id)?;
        }
        for id in &commit.retired_routes {
            self.route(*id)?;
        }

        self.routes.retain(|r| !commit.retired_routes.contains(&r.id));
        self.routes.extend(commit.routes);
        for (id, status) in commit.delivery_status {
            if let Some(delivery) = self.deliveries.iter_mut().find(|d| d.id == id) {
                delivery.status = status;
            }
        }
        for (id, status) in commit.vehicle_status {
            if let Some(vehicle) = self.vehicles.iter_mut().find(|v| v.id == id) {
                vehicle.status = status;
            }
        }
        self.version += 1;
        Ok(self.version)
    }
}

/// JSON document printed on stdout.
#[derive(Debug, Serialize)]
struct PlanOutput {
    routes: Vec<RouteOutput>,
    unassigned: Vec<DeliveryId>,
    summary: SummaryOutput,
}

#[derive(Debug, Serialize)]
struct RouteOutput {
    id: RouteId,
    vehicle_id: VehicleId,
    stops: Vec<StopOutput>,
    total_distance_km: f64,
    estimated_duration_minutes: f64,
    efficiency_score: Option<f64>,
}

#[derive(Debug, Serialize)]
struct StopOutput {
    sequence: u32,
    delivery_id: DeliveryId,
    distance_from_previous_km: f64,
    estimated_arrival_minutes: f64,
}

#[derive(Debug, Serialize)]
struct SummaryOutput {
    route_count: usize,
    assigned_deliveries: usize,
    unassigned_deliveries: usize,
    total_distance_km: f64,
}
