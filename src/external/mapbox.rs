use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize};
use std::fmt;

use crate::{
    config::Config,
    entities::{Coordinates, RouteCandidate, RouteMetrics},
    error::{invalid_config_error, malformed_response_error, upstream_error, Error},
    external::{Directions, Geocoder, Lookup},
};

#[derive(Clone, Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Clone, Debug, Deserialize)]
struct Feature {
    geometry: PointGeometry,
}

#[derive(Clone, Debug, Deserialize)]
struct PointGeometry {
    coordinates: [f64; 2],
}

#[derive(Clone, Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Clone, Debug, Deserialize)]
struct DirectionsRoute {
    distance: f64,
    duration: f64,
    geometry: LineGeometry,
}

#[derive(Clone, Debug, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

// Without `geometries=geojson` the geometry is an encoded polyline string,
// which is not needed for the figures.
#[derive(Clone, Debug, Deserialize)]
struct FiguresResponse {
    #[serde(default)]
    routes: Vec<RouteFigures>,
}

#[derive(Clone, Debug, Deserialize)]
struct RouteFigures {
    distance: f64,
    duration: f64,
}

impl From<DirectionsRoute> for RouteCandidate {
    fn from(route: DirectionsRoute) -> Self {
        RouteCandidate::new(
            route.geometry.coordinates.into(),
            route.distance,
            route.duration,
        )
    }
}

/// Client for the Mapbox geocoding and directions APIs.
#[derive(Clone)]
pub struct MapboxClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl fmt::Debug for MapboxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapboxClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl MapboxClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// First matching feature for `address`.
    #[tracing::instrument(skip(self))]
    pub async fn find_coordinates(&self, address: &str) -> Lookup<Coordinates> {
        let lookup = Lookup::from(self.fetch_coordinates(address).await);
        report("geocoding", &lookup);
        lookup
    }

    /// Primary driving route plus any alternatives, in service order.
    #[tracing::instrument(skip(self))]
    pub async fn find_routes(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Lookup<Vec<RouteCandidate>> {
        let lookup = Lookup::from(self.fetch_routes(origin, destination).await);
        report("directions", &lookup);
        lookup
    }

    /// Distance and duration of the first driving route only, without
    /// alternatives or geometry.
    #[tracing::instrument(skip(self))]
    pub async fn route_metrics(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Lookup<RouteMetrics> {
        let lookup = Lookup::from(self.fetch_route_metrics(origin, destination).await);
        report("directions", &lookup);
        lookup
    }

    async fn fetch_coordinates(&self, address: &str) -> Result<Option<Coordinates>, Error> {
        let file = format!("{}.json", address);
        let url = self.endpoint(&["geocoding", "v5", "mapbox.places", file.as_str()])?;

        let data: GeocodingResponse = self.get_json(url, &[("limit", "1")]).await?;

        Ok(data
            .features
            .into_iter()
            .next()
            .map(|feature| feature.geometry.coordinates.into()))
    }

    async fn fetch_routes(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<Option<Vec<RouteCandidate>>, Error> {
        let url = self.directions_endpoint(origin, destination)?;

        let data: DirectionsResponse = self
            .get_json(url, &[("alternatives", "true"), ("geometries", "geojson")])
            .await?;

        if data.routes.is_empty() {
            return Ok(None);
        }

        Ok(Some(data.routes.into_iter().map(RouteCandidate::from).collect()))
    }

    async fn fetch_route_metrics(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<Option<RouteMetrics>, Error> {
        let url = self.directions_endpoint(origin, destination)?;

        let data: FiguresResponse = self.get_json(url, &[]).await?;

        Ok(data
            .routes
            .first()
            .map(|route| RouteMetrics::from_raw(route.distance, route.duration)))
    }

    fn directions_endpoint(&self, origin: Coordinates, destination: Coordinates) -> Result<Url, Error> {
        let origin: String = origin.into();
        let destination: String = destination.into();
        let waypoints = format!("{};{}", origin, destination);

        self.endpoint(&["directions", "v5", "mapbox", "driving", waypoints.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|err| invalid_config_error(&format!("MAPBOX_API_BASE: {}", err)))?;

        url.path_segments_mut()
            .map_err(|_| invalid_config_error("MAPBOX_API_BASE cannot be a base url"))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let res = self
            .http
            .get(url)
            .query(&[("access_token", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(upstream_error(status.as_u16()));
        }

        let body = res.text().await?;

        serde_json::from_str(&body).map_err(|err| malformed_response_error(&err.to_string()))
    }
}

fn report<T>(service: &str, lookup: &Lookup<T>) {
    match lookup {
        Lookup::Found(_) => {}
        Lookup::NotFound => tracing::debug!("{} returned no results", service),
        Lookup::Unavailable(err) => {
            tracing::error!(code = err.code, "{} request failed: {}", service, err.message)
        }
    }
}

#[async_trait]
impl Geocoder for MapboxClient {
    async fn resolve(&self, address: &str) -> Lookup<Coordinates> {
        self.find_coordinates(address).await
    }
}

#[async_trait]
impl Directions for MapboxClient {
    async fn routes(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Lookup<Vec<RouteCandidate>> {
        self.find_routes(origin, destination).await
    }
}

#[cfg(test)]
type Requests = std::sync::Arc<std::sync::Mutex<Vec<String>>>;

/// Serves `body` with `status` for every path and records request uris.
#[cfg(test)]
fn stub_service(status: axum::http::StatusCode, body: &'static str) -> (MapboxClient, Requests) {
    use axum::{http::Uri, routing::get, Router};

    let requests = Requests::default();
    let recorder = requests.clone();

    let app = Router::new().fallback(get(move |uri: Uri| {
        let recorder = recorder.clone();
        async move {
            recorder.lock().unwrap().push(uri.to_string());
            (status, body)
        }
    }));

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(server);

    let config = Config::new("pk.test", base).unwrap();
    (MapboxClient::new(&config), requests)
}

#[cfg(test)]
const TWO_ROUTES: &str = r#"{
    "code": "Ok",
    "routes": [
        {"distance": 7000.0, "duration": 500.0, "geometry": {"type": "LineString", "coordinates": [[13.4, 52.5], [13.1, 52.2], [11.6, 48.1]]}},
        {"distance": 5000.0, "duration": 600.0, "geometry": {"type": "LineString", "coordinates": [[13.4, 52.5], [11.6, 48.1]]}}
    ]
}"#;

#[tokio::test]
async fn find_coordinates_requests_single_feature() {
    use axum::http::StatusCode;

    let (client, requests) = stub_service(
        StatusCode::OK,
        r#"{"type": "FeatureCollection", "features": [{"geometry": {"type": "Point", "coordinates": [13.4, 52.5]}}]}"#,
    );

    let lookup = client.find_coordinates("Berlin Mitte").await;

    assert_eq!(lookup.found(), Some(Coordinates::new(13.4, 52.5)));
    assert_eq!(
        requests.lock().unwrap().as_slice(),
        ["/geocoding/v5/mapbox.places/Berlin%20Mitte.json?access_token=pk.test&limit=1"]
    );
}

#[tokio::test]
async fn find_coordinates_encodes_address_as_one_segment() {
    use axum::http::StatusCode;

    let (client, requests) = stub_service(StatusCode::OK, r#"{"features": []}"#);

    client.find_coordinates("1/2 Main St").await;

    assert!(requests.lock().unwrap()[0]
        .starts_with("/geocoding/v5/mapbox.places/1%2F2%20Main%20St.json?"));
}

#[tokio::test]
async fn find_coordinates_without_features_is_not_found() {
    use axum::http::StatusCode;

    let (client, _) = stub_service(StatusCode::OK, r#"{"features": []}"#);

    assert!(matches!(client.find_coordinates("nowhere").await, Lookup::NotFound));
}

#[tokio::test]
async fn find_coordinates_with_missing_features_key_is_not_found() {
    use axum::http::StatusCode;

    let (client, _) = stub_service(StatusCode::OK, r#"{"type": "FeatureCollection"}"#);

    assert!(matches!(client.find_coordinates("nowhere").await, Lookup::NotFound));
}

#[tokio::test]
async fn find_coordinates_with_bad_shape_is_malformed() {
    use axum::http::StatusCode;

    let (client, _) = stub_service(StatusCode::OK, r#"{"features": [{"geometry": {}}]}"#);

    let lookup = client.find_coordinates("Berlin").await;

    assert!(matches!(lookup, Lookup::Unavailable(Error { code: 5, .. })));
}

#[tokio::test]
async fn find_coordinates_on_error_status_is_unavailable() {
    use axum::http::StatusCode;

    let (client, _) = stub_service(StatusCode::UNAUTHORIZED, r#"{"message": "Not Authorized"}"#);

    let lookup = client.find_coordinates("Berlin").await;

    assert!(matches!(lookup, Lookup::Unavailable(Error { code: 4, .. })));
}

#[tokio::test]
async fn find_coordinates_when_unreachable_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = MapboxClient::new(&Config::new("pk.test", base).unwrap());
    let lookup = client.find_coordinates("Berlin").await;

    match lookup {
        Lookup::Unavailable(err) => {
            assert_eq!(err.code, 3);
            assert!(!err.message.contains("pk.test"));
        }
        other => panic!("expected Unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn find_routes_keeps_service_order() {
    use axum::http::StatusCode;

    let (client, requests) = stub_service(StatusCode::OK, TWO_ROUTES);

    let routes = client
        .find_routes(Coordinates::new(13.4, 52.5), Coordinates::new(11.6, 48.1))
        .await
        .found()
        .unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].distance, 7000.0);
    assert_eq!(routes[1].distance, 5000.0);
    assert_eq!(routes[0].geometry.0.len(), 3);
    assert_eq!(routes[0].geometry.0[0].x, 13.4);
    assert_eq!(routes[0].geometry.0[0].y, 52.5);
    assert_eq!(
        requests.lock().unwrap().as_slice(),
        ["/directions/v5/mapbox/driving/13.4,52.5;11.6,48.1?access_token=pk.test&alternatives=true&geometries=geojson"]
    );
}

#[tokio::test]
async fn find_routes_without_routes_is_not_found() {
    use axum::http::StatusCode;

    let (client, _) = stub_service(StatusCode::OK, r#"{"code": "NoRoute", "routes": []}"#);

    let lookup = client
        .find_routes(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 1.0))
        .await;

    assert!(matches!(lookup, Lookup::NotFound));
}

#[tokio::test]
async fn find_routes_with_missing_routes_key_is_not_found() {
    use axum::http::StatusCode;

    let (client, _) = stub_service(StatusCode::OK, r#"{"code": "NoSegment", "message": "No road"}"#);

    let lookup = client
        .find_routes(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 1.0))
        .await;

    assert!(matches!(lookup, Lookup::NotFound));
}

#[tokio::test]
async fn route_metrics_uses_first_route_unrounded() {
    use axum::http::StatusCode;

    let (client, requests) = stub_service(
        StatusCode::OK,
        r#"{"routes": [{"distance": 12345.0, "duration": 90.0, "geometry": "_p~iF~ps|U"}, {"distance": 1.0, "duration": 1.0, "geometry": ""}]}"#,
    );

    let metrics = client
        .route_metrics(Coordinates::new(13.4, 52.5), Coordinates::new(11.6, 48.1))
        .await
        .found()
        .unwrap();

    assert_eq!(metrics, RouteMetrics::from_raw(12345.0, 90.0));
    assert_eq!(
        requests.lock().unwrap().as_slice(),
        ["/directions/v5/mapbox/driving/13.4,52.5;11.6,48.1?access_token=pk.test"]
    );
}

#[test]
fn endpoint_rejects_unusable_base() {
    let client = MapboxClient::new(&Config {
        api_base: "mailto:someone".into(),
        ..Config::new("pk.test", crate::config::DEFAULT_API_BASE).unwrap()
    });

    let err = client.endpoint(&["geocoding"]).unwrap_err();

    assert_eq!(err.code, 2);
}
