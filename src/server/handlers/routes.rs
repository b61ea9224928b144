use axum::extract::{Extension, Form};
use axum::response::Html;
use serde::Deserialize;

use crate::error::Error;
use crate::server::{pages, DynAPI};

#[derive(Deserialize)]
pub struct PlanParams {
    pub origin: String,
    pub destination: String,
}

pub async fn form() -> Html<String> {
    Html(pages::form_page())
}

pub async fn submit(
    Extension(api): Extension<DynAPI>,
    Form(params): Form<PlanParams>,
) -> Result<Html<String>, Error> {
    let plan = api.plan_route(&params.origin, &params.destination).await?;

    Ok(Html(pages::result_page(&plan)))
}

#[cfg(test)]
use crate::engine::{
    stubs::{candidate, StubDirections, StubGeocoder},
    Engine,
};
#[cfg(test)]
use crate::{entities::Coordinates, external::Lookup};
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
fn api_with(directions: Lookup<Vec<crate::entities::RouteCandidate>>) -> DynAPI {
    let geocoder = StubGeocoder::default()
        .with("Alexanderplatz, Berlin", Coordinates::new(13.41, 52.52))
        .with("Potsdam", Coordinates::new(13.06, 52.39));

    Arc::new(Engine::with_providers(
        Arc::new(geocoder),
        Arc::new(StubDirections::returning(directions)),
    ))
}

#[cfg(test)]
fn params(origin: &str, destination: &str) -> Form<PlanParams> {
    Form(PlanParams {
        origin: origin.into(),
        destination: destination.into(),
    })
}

#[tokio::test]
async fn form_has_both_fields() {
    let Html(page) = form().await;

    assert!(page.contains("name=\"origin\""));
    assert!(page.contains("name=\"destination\""));
    assert!(page.contains("method=\"post\""));
}

#[tokio::test]
async fn submit_renders_summaries_and_map() {
    let api = api_with(Lookup::Found(vec![
        candidate(vec![[13.41, 52.52], [13.06, 52.39]], 34600.0, 2460.0),
        candidate(vec![[13.41, 52.52], [13.2, 52.45], [13.06, 52.39]], 31200.0, 2700.0),
    ]));

    let page = match submit(Extension(api), params("Alexanderplatz, Berlin", "Potsdam")).await {
        Ok(Html(page)) => page,
        Err(err) => panic!("unexpected error: {:?}", err),
    };

    assert!(page.contains("Shortest route: 31 km, 45 min"));
    assert!(page.contains("Fastest route: 35 km, 41 min"));
    assert_eq!(page.matches("L.polyline(").count(), 2);
}

#[tokio::test]
async fn submit_with_unknown_address_returns_message() {
    use axum::{http::StatusCode, response::IntoResponse};

    let api = api_with(Lookup::NotFound);

    let err = match submit(Extension(api), params("Alexanderplatz, Berlin", "nowhere")).await {
        Ok(_) => panic!("expected the unresolved address message"),
        Err(err) => err,
    };

    assert_eq!(err.message, "could not resolve coordinates for one of the addresses");
    assert_eq!(err.into_response().status(), StatusCode::OK);
}

#[tokio::test]
async fn submit_without_routes_returns_message() {
    let api = api_with(Lookup::Found(vec![]));

    let err = match submit(Extension(api), params("Alexanderplatz, Berlin", "Potsdam")).await {
        Ok(_) => panic!("expected the missing routes message"),
        Err(err) => err,
    };

    assert_eq!(err.message, "could not obtain routes");
}
