//! Dispatch service tying the solver and scorer to a store.
//!
//! [`Dispatcher`] owns a [`DispatchStore`] and runs the full
//! snapshot-plan-commit cycle: read the fleet and the delivery backlog,
//! allocate routes, and write the plan back atomically with the status
//! transitions it implies. A commit that fails for any reason leaves the
//! store untouched and discards the plan; the caller re-reads and retries.

use thiserror::Error;

use lastmile_core::{
    Coordinate, Delivery, DeliveryId, DeliveryStatus, DispatchStore, InvalidDeliveryTransition,
    PlanCommit, Route, RouteError, RouteId, RouteStatus, StoreError, StoreVersion, Vehicle,
    VehicleId, VehicleStatus,
};
use lastmile_scorer::{RouteEvaluator, RouteMetrics};
use lastmile_solver::{FleetAllocator, FleetPlan, Strategy};

/// Errors surfaced by [`Dispatcher`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The request cannot be planned as given; nothing was read or written.
    #[error("invalid request: {0}")]
    InvalidInput(&'static str),
    /// Only planned routes may be replanned.
    #[error("route {id} is {status}; only planned routes can be reoptimised")]
    RouteNotReplannable {
        /// The route that was asked to be replanned.
        id: RouteId,
        /// Its current status.
        status: RouteStatus,
    },
    /// The delivery is already owned by an active route and that route is
    /// not being retired in this plan.
    #[error("delivery {0} is already assigned to an active route")]
    DeliveryAlreadyRouted(DeliveryId),
    /// The store rejected a read or the commit.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A constructed route violated the waypoint invariants.
    #[error(transparent)]
    Route(#[from] RouteError),
    /// A delivery could not take the status the plan requires.
    #[error(transparent)]
    DeliveryTransition(#[from] InvalidDeliveryTransition),
}

/// Parameters for one optimisation run.
///
/// Leaving `delivery_ids` or `vehicle_ids` unset plans the store's whole
/// backlog across its whole available fleet; setting them restricts the run
/// to the named records (unknown ids are an error).
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeRequest {
    /// Where every route starts. Required; requests without a depot are
    /// rejected before any store access.
    pub depot: Option<Coordinate>,
    /// Stop-ordering strategy for the constructed routes.
    pub strategy: Strategy,
    /// Restrict the run to these deliveries instead of the store backlog.
    pub delivery_ids: Option<Vec<DeliveryId>>,
    /// Restrict the run to these vehicles instead of the available fleet.
    pub vehicle_ids: Option<Vec<VehicleId>>,
}

impl OptimizeRequest {
    /// A request planning the whole backlog from `depot`.
    #[must_use]
    pub const fn for_depot(depot: Coordinate, strategy: Strategy) -> Self {
        Self {
            depot: Some(depot),
            strategy,
            delivery_ids: None,
            vehicle_ids: None,
        }
    }
}

/// A committed route together with its evaluated metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    /// The route as written to the store.
    pub route: Route,
    /// Metrics derived from the route at planning time.
    pub metrics: RouteMetrics,
}

/// Aggregate figures for one optimisation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanSummary {
    /// Number of routes committed.
    pub route_count: usize,
    /// Deliveries placed on a route.
    pub assigned_deliveries: usize,
    /// Deliveries no vehicle could take.
    pub unassigned_deliveries: usize,
    /// Distance across all committed routes, in kilometres.
    pub total_distance_km: f64,
    /// Store version after the commit.
    pub store_version: StoreVersion,
}

/// The outcome of a successful optimisation run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Committed routes with their metrics, in allocation order.
    pub routes: Vec<PlannedRoute>,
    /// Deliveries left without a vehicle, in input order.
    pub unassigned: Vec<DeliveryId>,
    /// Aggregate figures for the run.
    pub summary: PlanSummary,
}

/// Route optimisation service over a [`DispatchStore`].
#[derive(Debug)]
pub struct Dispatcher<S> {
    store: S,
    allocator: FleetAllocator,
    evaluator: RouteEvaluator,
}

impl<S: DispatchStore> Dispatcher<S> {
    /// Dispatcher with default allocation and evaluation settings.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_components(store, FleetAllocator::new(), RouteEvaluator::new())
    }

    /// Dispatcher with explicit solver and scorer components.
    #[must_use]
    pub const fn with_components(
        store: S,
        allocator: FleetAllocator,
        evaluator: RouteEvaluator,
    ) -> Self {
        Self {
            store,
            allocator,
            evaluator,
        }
    }

    /// Read access to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the dispatcher and return its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Plan routes for the request and commit them atomically.
    ///
    /// On success the store holds the new routes, the planned deliveries
    /// are `Assigned` and their vehicles are `Assigned`. Deliveries no
    /// vehicle could take are reported in the result, not failed.
    ///
    /// # Errors
    /// [`DispatchError::InvalidInput`] when the depot is missing or there
    /// is nothing to plan or plan with; [`DispatchError::Store`] for
    /// unknown ids and rejected commits. A rejected commit means the store
    /// changed mid-run; nothing was applied and the caller should retry.
    pub fn optimize(
        &mut self,
        request: &OptimizeRequest,
    ) -> Result<OptimizationResult, DispatchError> {
        let depot = request
            .depot
            .ok_or(DispatchError::InvalidInput("a depot coordinate is required"))?;
        let deliveries = self.resolve_deliveries(request)?;
        if deliveries.is_empty() {
            return Err(DispatchError::InvalidInput("no deliveries to plan"));
        }
        let vehicles = self.resolve_vehicles(request)?;
        if !vehicles.iter().any(Vehicle::is_available) {
            return Err(DispatchError::InvalidInput("no available vehicles"));
        }

        let version = self.store.version();
        let plan = {
            let allocator = &self.allocator;
            let store = &mut self.store;
            allocator.allocate(&deliveries, &vehicles, depot, request.strategy, || {
                store.next_route_id()
            })?
        };
        let commit = build_commit(version, &plan, &deliveries, &[])?;
        let store_version = self.store.commit(commit)?;
        log::info!(
            "optimised {} deliveries into {} routes at store version {store_version}",
            deliveries.len(),
            plan.routes.len()
        );
        Ok(self.present(plan, &vehicles, &deliveries, store_version))
    }

    /// Replan one existing route, optionally merging extra deliveries.
    ///
    /// The route must still be [`RouteStatus::Planned`]. Its deliveries are
    /// released, the additions merged in, and construction re-run for the
    /// same vehicle under `strategy`. The old route is retired and replaced
    /// in a single commit; deliveries that no longer fit drop back to
    /// `Pending`.
    ///
    /// # Errors
    /// [`DispatchError::RouteNotReplannable`] when the route has left the
    /// planned state; [`DispatchError::Store`] for unknown route, vehicle
    /// or delivery ids and for rejected commits.
    pub fn reoptimize(
        &mut self,
        route_id: RouteId,
        additional_delivery_ids: &[DeliveryId],
        strategy: Strategy,
    ) -> Result<OptimizationResult, DispatchError> {
        let route = self.store.route(route_id)?;
        if route.status != RouteStatus::Planned {
            return Err(DispatchError::RouteNotReplannable {
                id: route_id,
                status: route.status,
            });
        }
        let vehicle = self.store.vehicle(route.vehicle_id)?;
        let deliveries = self.merged_deliveries(&route, additional_delivery_ids)?;

        // The vehicle owns the route being replaced, so treat it as free
        // for the duration of the replan.
        let mut candidate = vehicle.clone();
        candidate.status = VehicleStatus::Available;

        let version = self.store.version();
        let plan = {
            let allocator = &self.allocator;
            let store = &mut self.store;
            allocator.allocate(&deliveries, &[candidate], route.depot, strategy, || {
                store.next_route_id()
            })?
        };
        let released: Vec<DeliveryId> = route.delivery_ids().collect();
        let mut commit = build_commit(version, &plan, &deliveries, &released)?;
        commit.retired_routes.push(route_id);
        release_dropped(&mut commit, &plan, &deliveries);
        if plan.routes.is_empty() {
            commit.vehicle_status.push((vehicle.id, VehicleStatus::Available));
        }
        let store_version = self.store.commit(commit)?;
        log::info!("replanned route {route_id} at store version {store_version}");
        let vehicles = vec![vehicle];
        Ok(self.present(plan, &vehicles, &deliveries, store_version))
    }

    /// Metrics for a stored route, recomputed from current coordinates.
    ///
    /// # Errors
    /// [`DispatchError::Store`] when the route id is unknown.
    pub fn evaluate_route(&self, route_id: RouteId) -> Result<RouteMetrics, DispatchError> {
        let (route, vehicle, deliveries) = self.route_context(route_id)?;
        Ok(self.evaluator.metrics(&route, vehicle.as_ref(), &deliveries))
    }

    /// Human-readable improvement suggestions for a stored route.
    ///
    /// # Errors
    /// [`DispatchError::Store`] when the route id is unknown.
    pub fn suggest_improvements(&self, route_id: RouteId) -> Result<Vec<String>, DispatchError> {
        let (route, vehicle, deliveries) = self.route_context(route_id)?;
        Ok(self
            .evaluator
            .suggest(&route, vehicle.as_ref(), &deliveries)
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    fn resolve_deliveries(
        &self,
        request: &OptimizeRequest,
    ) -> Result<Vec<Delivery>, DispatchError> {
        match &request.delivery_ids {
            Some(ids) => ids
                .iter()
                .map(|id| self.store.delivery(*id).map_err(DispatchError::from))
                .collect(),
            None => Ok(self.store.unassigned_deliveries()),
        }
    }

    fn resolve_vehicles(&self, request: &OptimizeRequest) -> Result<Vec<Vehicle>, DispatchError> {
        match &request.vehicle_ids {
            Some(ids) => ids
                .iter()
                .map(|id| self.store.vehicle(*id).map_err(DispatchError::from))
                .collect(),
            None => Ok(self.store.available_vehicles()),
        }
    }

    /// The route's own deliveries followed by the additions, each loaded
    /// from the store and deduplicated by id.
    fn merged_deliveries(
        &self,
        route: &Route,
        additional_delivery_ids: &[DeliveryId],
    ) -> Result<Vec<Delivery>, DispatchError> {
        let mut deliveries = Vec::new();
        for id in route.delivery_ids() {
            deliveries.push(self.store.delivery(id)?);
        }
        for id in additional_delivery_ids {
            if deliveries.iter().any(|d| d.id == *id) {
                continue;
            }
            deliveries.push(self.store.delivery(*id)?);
        }
        Ok(deliveries)
    }

    fn route_context(
        &self,
        route_id: RouteId,
    ) -> Result<(Route, Option<Vehicle>, Vec<Delivery>), DispatchError> {
        let route = self.store.route(route_id)?;
        let vehicle = self.store.vehicle(route.vehicle_id).ok();
        // Deliveries missing from the store are left out; the evaluator
        // charges the penalty distance for their waypoints.
        let deliveries = route
            .delivery_ids()
            .filter_map(|id| self.store.delivery(id).ok())
            .collect();
        Ok((route, vehicle, deliveries))
    }

    fn present(
        &self,
        plan: FleetPlan,
        vehicles: &[Vehicle],
        deliveries: &[Delivery],
        store_version: StoreVersion,
    ) -> OptimizationResult {
        let routes: Vec<PlannedRoute> = plan
            .routes
            .into_iter()
            .map(|route| {
                let vehicle = vehicles.iter().find(|v| v.id == route.vehicle_id);
                let assigned: Vec<Delivery> = route
                    .delivery_ids()
                    .filter_map(|id| deliveries.iter().find(|d| d.id == id).cloned())
                    .collect();
                let metrics = self.evaluator.metrics(&route, vehicle, &assigned);
                PlannedRoute { route, metrics }
            })
            .collect();
        let summary = PlanSummary {
            route_count: routes.len(),
            assigned_deliveries: routes.iter().map(|r| r.route.stop_count()).sum(),
            unassigned_deliveries: plan.unassigned.len(),
            total_distance_km: routes.iter().map(|r| r.metrics.total_distance_km).sum(),
            store_version,
        };
        OptimizationResult {
            routes,
            unassigned: plan.unassigned,
            summary,
        }
    }
}

/// Translate a fleet plan into the atomic commit it implies.
///
/// Every delivery placed on a route moves to `Assigned`; a delivery whose
/// current status forbids that transition fails the whole plan. A delivery
/// already `Assigned` is accepted only when `released` names it, meaning
/// the route that owns it is retired in this same commit; anything else
/// would leave one delivery on two active routes, so the plan is rejected.
fn build_commit(
    version: StoreVersion,
    plan: &FleetPlan,
    deliveries: &[Delivery],
    released: &[DeliveryId],
) -> Result<PlanCommit, DispatchError> {
    let mut commit = PlanCommit::against(version);
    for route in &plan.routes {
        for id in route.delivery_ids() {
            let delivery = deliveries
                .iter()
                .find(|d| d.id == id)
                .ok_or(DispatchError::Store(StoreError::DeliveryNotFound(id)))?;
            if delivery.status == DeliveryStatus::Assigned {
                if released.contains(&id) {
                    continue;
                }
                return Err(DispatchError::DeliveryAlreadyRouted(id));
            }
            let mut updated = delivery.clone();
            updated.advance_to(DeliveryStatus::Assigned)?;
            commit.delivery_status.push((id, DeliveryStatus::Assigned));
        }
        commit.vehicle_status.push((route.vehicle_id, VehicleStatus::Assigned));
    }
    commit.routes = plan.routes.clone();
    Ok(commit)
}

/// Deliveries released by a replan drop back to `Pending`.
fn release_dropped(commit: &mut PlanCommit, plan: &FleetPlan, deliveries: &[Delivery]) {
    for id in &plan.unassigned {
        let was_assigned = deliveries
            .iter()
            .any(|d| d.id == *id && d.status == DeliveryStatus::Assigned);
        if was_assigned {
            commit.delivery_status.push((*id, DeliveryStatus::Pending));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lastmile_core::test_support::{coordinate, parcel_at, parcel_with_load, van, MemoryStore};

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_delivery(parcel_at(1, 0.0, 1.0));
        store.insert_delivery(parcel_at(2, 0.0, 2.0));
        store.insert_vehicle(van(1, 100.0, 10.0));
        store
    }

    fn request() -> OptimizeRequest {
        OptimizeRequest::for_depot(coordinate(0.0, 0.0), Strategy::Distance)
    }

    #[test]
    fn optimize_commits_routes_and_assigns_statuses() {
        let mut dispatcher = Dispatcher::new(seeded_store());
        let result = dispatcher.optimize(&request()).expect("plan committed");

        assert_eq!(result.summary.route_count, 1);
        assert_eq!(result.summary.assigned_deliveries, 2);
        assert!(result.unassigned.is_empty());

        let store = dispatcher.store();
        let route_id = result.routes.first().expect("one route").route.id;
        let stored = store.route(route_id).expect("route persisted");
        assert_eq!(stored.stop_count(), 2);
        for id in [1, 2] {
            let delivery = store.delivery(id).expect("known delivery");
            assert_eq!(delivery.status, DeliveryStatus::Assigned);
        }
        let vehicle = store.vehicle(1).expect("known vehicle");
        assert_eq!(vehicle.status, VehicleStatus::Assigned);
    }

    #[test]
    fn optimize_reports_metrics_per_route() {
        let mut dispatcher = Dispatcher::new(seeded_store());
        let result = dispatcher.optimize(&request()).expect("plan committed");
        let planned = result.routes.first().expect("one route");
        assert!((planned.metrics.total_distance_km - 222.39).abs() < 0.01);
        assert!(planned.metrics.efficiency_score.is_some());
    }

    #[test]
    fn missing_depot_is_rejected_before_store_access() {
        let mut dispatcher = Dispatcher::new(seeded_store());
        let mut bad = request();
        bad.depot = None;
        let err = dispatcher.optimize(&bad).expect_err("rejected");
        assert!(matches!(err, DispatchError::InvalidInput(_)));
        assert_eq!(dispatcher.store().version(), 0);
    }

    #[test]
    fn empty_backlog_is_rejected() {
        let mut store = MemoryStore::new();
        store.insert_vehicle(van(1, 100.0, 10.0));
        let mut dispatcher = Dispatcher::new(store);
        let err = dispatcher.optimize(&request()).expect_err("rejected");
        assert_eq!(err, DispatchError::InvalidInput("no deliveries to plan"));
    }

    #[test]
    fn empty_fleet_is_rejected() {
        let mut store = MemoryStore::new();
        store.insert_delivery(parcel_at(1, 0.0, 1.0));
        let mut dispatcher = Dispatcher::new(store);
        let err = dispatcher.optimize(&request()).expect_err("rejected");
        assert_eq!(err, DispatchError::InvalidInput("no available vehicles"));
    }

    #[test]
    fn unknown_explicit_delivery_id_is_a_store_error() {
        let mut dispatcher = Dispatcher::new(seeded_store());
        let mut req = request();
        req.delivery_ids = Some(vec![99]);
        let err = dispatcher.optimize(&req).expect_err("rejected");
        assert_eq!(err, DispatchError::Store(StoreError::DeliveryNotFound(99)));
    }

    #[test]
    fn a_delivery_on_an_active_route_cannot_be_planned_twice() {
        let mut store = seeded_store();
        store.insert_vehicle(van(2, 100.0, 10.0));
        let mut dispatcher = Dispatcher::new(store);

        let mut first = request();
        first.delivery_ids = Some(vec![1]);
        first.vehicle_ids = Some(vec![1]);
        let planned = dispatcher.optimize(&first).expect("initial plan");
        let route_id = planned.routes.first().expect("one route").route.id;
        let committed_version = dispatcher.store().version();

        let mut second = request();
        second.delivery_ids = Some(vec![1]);
        second.vehicle_ids = Some(vec![2]);
        let err = dispatcher.optimize(&second).expect_err("rejected");
        assert_eq!(err, DispatchError::DeliveryAlreadyRouted(1));

        let store = dispatcher.store();
        assert_eq!(store.version(), committed_version);
        let stored = store.route(route_id).expect("route still active");
        assert_eq!(stored.delivery_ids().collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            store.vehicle(2).expect("known vehicle").status,
            VehicleStatus::Available
        );
    }

    #[test]
    fn overflow_deliveries_are_reported_not_failed() {
        let mut store = MemoryStore::new();
        store.insert_delivery(parcel_with_load(1, 40.0, 0.1));
        store.insert_delivery(parcel_with_load(2, 40.0, 0.1));
        store.insert_delivery(parcel_with_load(3, 40.0, 0.1));
        store.insert_vehicle(van(1, 100.0, 10.0));
        let mut dispatcher = Dispatcher::new(store);
        let result = dispatcher.optimize(&request()).expect("partial plan");
        assert_eq!(result.unassigned, vec![3]);
        assert_eq!(
            dispatcher
                .store()
                .delivery(3)
                .expect("known delivery")
                .status,
            DeliveryStatus::Pending
        );
    }

    #[test]
    fn reoptimize_replaces_the_route_and_merges_additions() {
        let mut store = seeded_store();
        store.insert_delivery(parcel_at(3, 0.0, 3.0));
        let mut dispatcher = Dispatcher::new(store);
        let mut req = request();
        req.delivery_ids = Some(vec![1, 2]);
        let first = dispatcher.optimize(&req).expect("initial plan");
        let old_id = first.routes.first().expect("one route").route.id;

        let result = dispatcher
            .reoptimize(old_id, &[3], Strategy::Distance)
            .expect("replanned");
        let new_route = &result.routes.first().expect("one route").route;
        assert_ne!(new_route.id, old_id);
        assert_eq!(new_route.stop_count(), 3);

        let store = dispatcher.store();
        assert_eq!(
            store.route(old_id).expect_err("retired"),
            StoreError::RouteNotFound(old_id)
        );
        assert_eq!(
            store.delivery(3).expect("known delivery").status,
            DeliveryStatus::Assigned
        );
    }

    #[test]
    fn reoptimize_releases_deliveries_that_no_longer_fit() {
        let mut store = MemoryStore::new();
        store.insert_delivery(parcel_with_load(1, 40.0, 0.1));
        store.insert_delivery(parcel_with_load(2, 40.0, 0.1));
        store.insert_vehicle(van(1, 100.0, 10.0));
        let mut dispatcher = Dispatcher::new(store);
        let first = dispatcher.optimize(&request()).expect("initial plan");
        let route_id = first.routes.first().expect("one route").route.id;
        assert_eq!(first.summary.assigned_deliveries, 2);

        // Parcel 2 is repacked heavier than the van can still take.
        let mut store = dispatcher.into_store();
        let mut heavier = store.delivery(2).expect("known delivery");
        heavier.weight_kg = Some(80.0);
        store.insert_delivery(heavier);
        let mut dispatcher = Dispatcher::new(store);

        let result = dispatcher
            .reoptimize(route_id, &[], Strategy::Distance)
            .expect("replanned");
        assert_eq!(result.summary.assigned_deliveries, 1);
        assert_eq!(result.unassigned, vec![2]);
        assert_eq!(
            dispatcher
                .store()
                .delivery(2)
                .expect("known delivery")
                .status,
            DeliveryStatus::Pending
        );
    }

    #[test]
    fn reoptimize_rejects_routes_already_in_progress() {
        let mut dispatcher = Dispatcher::new(seeded_store());
        let first = dispatcher.optimize(&request()).expect("initial plan");
        let route_id = first.routes.first().expect("one route").route.id;

        let mut route = dispatcher.store().route(route_id).expect("known route");
        route
            .advance_to(RouteStatus::InProgress)
            .expect("valid transition");
        let mut store = dispatcher.into_store();
        store.insert_route(route);
        let mut dispatcher = Dispatcher::new(store);

        let err = dispatcher
            .reoptimize(route_id, &[], Strategy::Distance)
            .expect_err("rejected");
        assert_eq!(
            err,
            DispatchError::RouteNotReplannable {
                id: route_id,
                status: RouteStatus::InProgress,
            }
        );
    }

    #[test]
    fn a_concurrent_writer_fails_the_commit_and_changes_nothing() {
        /// Store whose version moves while the plan is being built, as a
        /// concurrent writer's commit would.
        struct RacyStore(MemoryStore);

        impl DispatchStore for RacyStore {
            fn version(&self) -> StoreVersion {
                self.0.version()
            }
            fn available_vehicles(&self) -> Vec<Vehicle> {
                self.0.available_vehicles()
            }
            fn unassigned_deliveries(&self) -> Vec<Delivery> {
                self.0.unassigned_deliveries()
            }
            fn delivery(&self, id: DeliveryId) -> Result<Delivery, StoreError> {
                self.0.delivery(id)
            }
            fn vehicle(&self, id: lastmile_core::VehicleId) -> Result<Vehicle, StoreError> {
                self.0.vehicle(id)
            }
            fn route(&self, id: RouteId) -> Result<Route, StoreError> {
                self.0.route(id)
            }
            fn next_route_id(&mut self) -> RouteId {
                self.0.bump_version();
                self.0.next_route_id()
            }
            fn commit(&mut self, commit: PlanCommit) -> Result<StoreVersion, StoreError> {
                self.0.commit(commit)
            }
        }

        let mut dispatcher = Dispatcher::new(RacyStore(seeded_store()));
        let err = dispatcher.optimize(&request()).expect_err("commit rejected");
        assert!(matches!(
            err,
            DispatchError::Store(StoreError::ConcurrentModification { .. })
        ));
        assert_eq!(
            dispatcher.store().delivery(1).expect("known delivery").status,
            DeliveryStatus::Pending
        );
    }

    #[test]
    fn evaluate_route_reads_back_committed_metrics() {
        let mut dispatcher = Dispatcher::new(seeded_store());
        let result = dispatcher.optimize(&request()).expect("plan committed");
        let planned = result.routes.first().expect("one route");
        let metrics = dispatcher
            .evaluate_route(planned.route.id)
            .expect("known route");
        assert_eq!(metrics, planned.metrics);
    }

    #[test]
    fn suggestions_for_unknown_routes_are_a_store_error() {
        let dispatcher = Dispatcher::new(seeded_store());
        let err = dispatcher.suggest_improvements(42).expect_err("rejected");
        assert_eq!(err, DispatchError::Store(StoreError::RouteNotFound(42)));
    }

    #[test]
    fn an_underused_van_draws_a_capacity_suggestion() {
        let mut store = MemoryStore::new();
        store.insert_delivery(parcel_at(1, 0.0, 0.5));
        store.insert_vehicle(van(1, 5000.0, 500.0));
        let mut dispatcher = Dispatcher::new(store);
        let result = dispatcher.optimize(&request()).expect("plan committed");
        let route_id = result.routes.first().expect("one route").route.id;
        let suggestions = dispatcher
            .suggest_improvements(route_id)
            .expect("known route");
        assert!(suggestions.iter().any(|s| s.contains("underutilised")));
    }
}
