//! Facade crate for the lastmile delivery route optimiser.
//!
//! Re-exports the domain types, solver and scorer, and exposes
//! [`Dispatcher`], the service that plans routes against a
//! [`DispatchStore`] and commits them atomically.

#![forbid(unsafe_code)]

mod dispatch;

pub use dispatch::{
    DispatchError, Dispatcher, OptimizationResult, OptimizeRequest, PlanSummary, PlannedRoute,
};

pub use lastmile_core::{
    fits, haversine_km, leg_km, Coordinate, CoordinateError, Delivery, DeliveryId,
    DeliveryParseError, DeliveryStatus, DispatchStore, InvalidDeliveryTransition, PlanCommit,
    Priority, Route, RouteError, RouteId, RouteStatus, StoreError, StoreVersion, TravelModel,
    UnknownVehicleStatus, Vehicle, VehicleId, VehicleStatus, Waypoint, EARTH_RADIUS_KM, PENALTY_KM,
};

pub use lastmile_scorer::{
    EvaluatorConfig, EvaluatorConfigError, RouteEvaluator, RouteMetrics, Suggestion,
};

pub use lastmile_solver::{
    ConstructorConfig, FleetAllocator, FleetPlan, RouteConstructor, Strategy, UnknownStrategy,
};
