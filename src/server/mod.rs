mod handlers;
mod pages;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};

use crate::api::API;
use crate::error::{server_error, Error};
use crate::server::handlers::routes;

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn app<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/", get(routes::form).post(routes::submit))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = app(api);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(|err| server_error(&err.to_string()))?
        .serve(app.into_make_service())
        .await
        .map_err(|err| server_error(&err.to_string()))
}

#[cfg(test)]
use crate::engine::{
    stubs::{candidate, StubDirections, StubGeocoder},
    Engine,
};
#[cfg(test)]
use crate::{entities::Coordinates, external::Lookup};
#[cfg(test)]
use axum::{body::Body, http::Request, response::Response};

#[cfg(test)]
fn stub_app() -> Router {
    let geocoder = StubGeocoder::default()
        .with("a b", Coordinates::new(10.0, 20.0))
        .with("c", Coordinates::new(11.0, 21.0));
    let directions = StubDirections::returning(Lookup::Found(vec![
        candidate(vec![[10.0, 20.0], [11.0, 21.0]], 5000.0, 600.0),
        candidate(vec![[10.0, 20.0], [10.5, 20.2], [11.0, 21.0]], 7000.0, 500.0),
    ]));

    app(Engine::with_providers(Arc::new(geocoder), Arc::new(directions)))
}

#[cfg(test)]
fn post_form(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[cfg(test)]
async fn body_text(response: Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn get_root_serves_the_form() {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = stub_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("name=\"origin\""));
    assert!(page.contains("name=\"destination\""));
}

#[tokio::test]
async fn post_root_decodes_the_form_and_renders_routes() {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    let response = stub_app()
        .oneshot(post_form("origin=a+b&destination=c"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Shortest route: 5 km, 10 min"));
    assert!(page.contains("Fastest route: 7 km, 8 min"));
    assert!(page.contains("setView([20.5,10.5], 13)"));
    assert_eq!(page.matches("L.polyline(").count(), 2);
}

#[tokio::test]
async fn post_root_with_unknown_address_returns_plain_message() {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    let response = stub_app()
        .oneshot(post_form("origin=a+b&destination=nowhere"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "could not resolve coordinates for one of the addresses"
    );
}

#[tokio::test]
async fn post_root_without_destination_field_is_rejected() {
    use tower::ServiceExt;

    let response = stub_app()
        .oneshot(post_form("origin=a+b"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
