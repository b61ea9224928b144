//! Leaflet rendering of route candidates.
//!
//! The output is a fragment (stylesheet, script tags, container and inline
//! script) meant to be dropped into a page as-is. Leaflet takes `[lat, lng]`,
//! so every point is flipped from its stored order.

use serde_json::{json, Value};

use crate::entities::{Coordinates, MapArtifact, RouteCandidate};

pub const ROUTE_COLORS: [&str; 3] = ["blue", "green", "red"];
pub const INITIAL_ZOOM: u8 = 13;
pub const ROUTE_WEIGHT: u8 = 5;
pub const ROUTE_OPACITY: f64 = 0.8;

const MAP_ELEMENT_ID: &str = "route-map";
const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Colors wrap around once the palette is exhausted.
pub fn route_color(index: usize) -> &'static str {
    ROUTE_COLORS[index % ROUTE_COLORS.len()]
}

fn lat_lng(coordinates: &Coordinates) -> Value {
    json!([coordinates.lat, coordinates.lng])
}

fn polyline(index: usize, route: &RouteCandidate) -> String {
    let points: Value = route
        .geometry
        .coords()
        .map(|c| json!([c.y, c.x]))
        .collect();

    format!(
        "L.polyline({}, {{color: \"{}\", weight: {}, opacity: {}}}).addTo(map);\n",
        points,
        route_color(index),
        ROUTE_WEIGHT,
        ROUTE_OPACITY
    )
}

fn marker(at: &Coordinates, label: &str) -> String {
    format!(
        "L.marker({}).bindPopup(\"{}\").addTo(map);\n",
        lat_lng(at),
        label
    )
}

/// Draws every candidate plus Start/End markers, centered between the two
/// endpoints. An empty `routes` slice yields a map with only the markers.
#[tracing::instrument(skip(routes), fields(routes = routes.len()))]
pub fn render(
    routes: &[RouteCandidate],
    origin: &Coordinates,
    destination: &Coordinates,
) -> MapArtifact {
    let center = origin.midpoint(destination);

    let mut script = format!(
        "var map = L.map(\"{}\").setView({}, {});\n",
        MAP_ELEMENT_ID,
        lat_lng(&center),
        INITIAL_ZOOM
    );
    script.push_str(&format!(
        "L.tileLayer(\"{}\", {{maxZoom: 19, attribution: '{}'}}).addTo(map);\n",
        TILE_URL, TILE_ATTRIBUTION
    ));

    for (index, route) in routes.iter().enumerate() {
        script.push_str(&polyline(index, route));
    }

    script.push_str(&marker(origin, "Start"));
    script.push_str(&marker(destination, "End"));

    MapArtifact::new(format!(
        concat!(
            "<link rel=\"stylesheet\" href=\"{css}\"/>\n",
            "<script src=\"{js}\"></script>\n",
            "<div id=\"{id}\" style=\"width: 100%; height: 600px;\"></div>\n",
            "<script>\n(function () {{\n{script}}})();\n</script>\n"
        ),
        css = LEAFLET_CSS,
        js = LEAFLET_JS,
        id = MAP_ELEMENT_ID,
        script = script,
    ))
}

#[cfg(test)]
fn straight_route(points: Vec<[f64; 2]>) -> RouteCandidate {
    RouteCandidate::new(points.into(), 1000.0, 60.0)
}

#[cfg(test)]
fn colors_in(map: &MapArtifact) -> Vec<String> {
    map.as_str()
        .split("color: \"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(String::from)
        .collect()
}

#[test]
fn render_draws_one_polyline_per_route_and_two_markers() {
    let routes = vec![
        straight_route(vec![[10.0, 20.0], [10.5, 20.5]]),
        straight_route(vec![[10.0, 20.0], [10.2, 20.8]]),
    ];

    let map = render(&routes, &Coordinates::new(10.0, 20.0), &Coordinates::new(10.5, 20.5));

    assert_eq!(map.as_str().matches("L.polyline(").count(), 2);
    assert_eq!(map.as_str().matches("L.marker(").count(), 2);
    assert!(map.as_str().contains("bindPopup(\"Start\")"));
    assert!(map.as_str().contains("bindPopup(\"End\")"));
    assert!(map.as_str().contains("weight: 5, opacity: 0.8"));
}

#[test]
fn render_flips_points_to_lat_lng() {
    let routes = vec![straight_route(vec![[10.0, 20.0], [11.0, 21.0]])];

    let map = render(&routes, &Coordinates::new(10.0, 20.0), &Coordinates::new(11.0, 21.0));

    assert!(map.as_str().contains("L.polyline([[20.0,10.0],[21.0,11.0]]"));
    assert!(map.as_str().contains("L.marker([20.0,10.0]).bindPopup(\"Start\")"));
    assert!(map.as_str().contains("L.marker([21.0,11.0]).bindPopup(\"End\")"));
}

#[test]
fn render_centers_on_midpoint_at_fixed_zoom() {
    let map = render(&[], &Coordinates::new(10.0, 50.0), &Coordinates::new(12.0, 54.0));

    assert!(map.as_str().contains("setView([52.0,11.0], 13)"));
}

#[test]
fn render_wraps_palette_after_three_routes() {
    let routes: Vec<_> = (0..4)
        .map(|i| straight_route(vec![[0.0, 0.0], [i as f64, 1.0]]))
        .collect();

    let map = render(&routes, &Coordinates::new(0.0, 0.0), &Coordinates::new(3.0, 1.0));
    let colors = colors_in(&map);

    assert_eq!(colors, vec!["blue", "green", "red", "blue"]);
    assert_eq!(route_color(3), route_color(0));
}

#[test]
fn render_without_routes_keeps_markers() {
    let map = render(&[], &Coordinates::new(1.0, 2.0), &Coordinates::new(3.0, 4.0));

    assert_eq!(map.as_str().matches("L.polyline(").count(), 0);
    assert_eq!(map.as_str().matches("L.marker(").count(), 2);
}

#[test]
fn render_writes_non_finite_points_as_null() {
    let routes = vec![straight_route(vec![[10.0, 20.0], [f64::NAN, 21.0]])];

    let map = render(&routes, &Coordinates::new(10.0, 20.0), &Coordinates::new(11.0, 21.0));

    assert!(map.as_str().contains("L.polyline([[20.0,10.0],[21.0,null]]"));
    assert!(!map.as_str().contains("NaN"));
}
