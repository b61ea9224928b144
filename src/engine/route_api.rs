use super::Engine;

use async_trait::async_trait;

use crate::{
    api::RouteAPI,
    entities::{select_best, RoutePlan, RouteSummary},
    error::{no_routes_error, unresolved_address_error, Error},
    map,
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn plan_route(&self, origin: &str, destination: &str) -> Result<RoutePlan, Error> {
        let origin_coordinates = self.geocoder.resolve(origin).await.found();
        let destination_coordinates = self.geocoder.resolve(destination).await.found();

        let (origin, destination) = match (origin_coordinates, destination_coordinates) {
            (Some(origin), Some(destination)) => (origin, destination),
            _ => return Err(unresolved_address_error()),
        };

        let routes = self
            .directions
            .routes(origin, destination)
            .await
            .found()
            .filter(|routes| !routes.is_empty())
            .ok_or_else(no_routes_error)?;

        let best = select_best(&routes);
        let plan = RoutePlan {
            shortest: best.shortest.map(RouteSummary::from),
            fastest: best.fastest.map(RouteSummary::from),
            route_count: routes.len(),
            map: map::render(&routes, &origin, &destination),
        };

        tracing::info!(routes = plan.route_count, "route planned");

        Ok(plan)
    }
}

#[cfg(test)]
use super::stubs::{candidate, StubDirections, StubGeocoder};
#[cfg(test)]
use crate::{entities::Coordinates, external::Lookup};
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
fn berlin_munich() -> StubGeocoder {
    StubGeocoder::default()
        .with("Berlin", Coordinates::new(13.4, 52.5))
        .with("Munich", Coordinates::new(11.6, 48.1))
}

#[test]
fn plan_route_summarises_shortest_and_fastest() {
    use tokio_test::block_on;

    let directions = Arc::new(StubDirections::returning(Lookup::Found(vec![
        candidate(vec![[13.4, 52.5], [11.6, 48.1]], 5000.0, 600.0),
        candidate(vec![[13.4, 52.5], [12.0, 50.0], [11.6, 48.1]], 7000.0, 500.0),
    ])));
    let engine = Engine::with_providers(Arc::new(berlin_munich()), directions.clone());

    let plan = block_on(engine.plan_route("Berlin", "Munich")).unwrap();

    assert_eq!(
        plan.shortest,
        Some(RouteSummary {
            distance_km: 5,
            duration_min: 10
        })
    );
    assert_eq!(
        plan.fastest,
        Some(RouteSummary {
            distance_km: 7,
            duration_min: 8
        })
    );
    assert_eq!(plan.route_count, 2);
    assert_eq!(plan.map.as_str().matches("L.polyline(").count(), 2);
    assert_eq!(plan.map.as_str().matches("L.marker(").count(), 2);
    assert_eq!(directions.calls(), 1);
}

#[test]
fn plan_route_stops_when_destination_is_unknown() {
    use tokio_test::block_on;

    let geocoder = Arc::new(StubGeocoder::default().with("Berlin", Coordinates::new(13.4, 52.5)));
    let directions = Arc::new(StubDirections::returning(Lookup::NotFound));
    let engine = Engine::with_providers(geocoder.clone(), directions.clone());

    let err = block_on(engine.plan_route("Berlin", "Atlantis")).unwrap_err();

    assert_eq!(err, unresolved_address_error());
    assert_eq!(geocoder.calls(), 2);
    assert_eq!(directions.calls(), 0);
}

#[test]
fn plan_route_treats_unreachable_geocoder_as_unresolved() {
    use tokio_test::block_on;

    let directions = Arc::new(StubDirections::returning(Lookup::NotFound));
    let engine = Engine::with_providers(Arc::new(StubGeocoder::offline()), directions.clone());

    let err = block_on(engine.plan_route("Berlin", "Munich")).unwrap_err();

    assert_eq!(err, unresolved_address_error());
    assert_eq!(directions.calls(), 0);
}

#[test]
fn plan_route_reports_missing_routes() {
    use tokio_test::block_on;

    for response in [
        Lookup::NotFound,
        Lookup::Found(vec![]),
        Lookup::Unavailable(crate::error::upstream_error(502)),
    ] {
        let engine = Engine::with_providers(
            Arc::new(berlin_munich()),
            Arc::new(StubDirections::returning(response)),
        );

        let err = block_on(engine.plan_route("Berlin", "Munich")).unwrap_err();

        assert_eq!(err, no_routes_error());
    }
}
