use geo_types::LineString;

/// One driving route returned by the directions service. Geometry points are
/// stored as `x = lng`, `y = lat`.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteCandidate {
    pub geometry: LineString<f64>,
    /// meters
    pub distance: f64,
    /// seconds
    pub duration: f64,
}

impl RouteCandidate {
    pub fn new(geometry: LineString<f64>, distance: f64, duration: f64) -> Self {
        Self {
            geometry,
            distance,
            duration,
        }
    }
}

/// Display figures for a route, rounded half-to-even.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteSummary {
    pub distance_km: i64,
    pub duration_min: i64,
}

impl From<&RouteCandidate> for RouteSummary {
    fn from(route: &RouteCandidate) -> Self {
        Self {
            distance_km: (route.distance / 1000.0).round_ties_even() as i64,
            duration_min: (route.duration / 60.0).round_ties_even() as i64,
        }
    }
}

/// Unrounded first-route figures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteMetrics {
    pub distance_km: f64,
    pub duration_min: f64,
}

impl RouteMetrics {
    pub fn from_raw(distance_m: f64, duration_s: f64) -> Self {
        Self {
            distance_km: distance_m / 1000.0,
            duration_min: duration_s / 60.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BestRoutes<'a> {
    pub shortest: Option<&'a RouteCandidate>,
    pub fastest: Option<&'a RouteCandidate>,
}

/// Picks the minimum-distance and minimum-duration candidates. On ties the
/// earliest candidate wins. Both are `None` for an empty slice.
pub fn select_best(routes: &[RouteCandidate]) -> BestRoutes<'_> {
    BestRoutes {
        shortest: routes
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance)),
        fastest: routes
            .iter()
            .min_by(|a, b| a.duration.total_cmp(&b.duration)),
    }
}

#[cfg(test)]
fn candidate(distance: f64, duration: f64) -> RouteCandidate {
    RouteCandidate::new(LineString::from(vec![[0.0, 0.0], [1.0, 1.0]]), distance, duration)
}

#[test]
fn select_best_picks_minimum_of_each_key() {
    let routes = vec![
        candidate(7000.0, 500.0),
        candidate(5000.0, 650.0),
        candidate(9000.0, 720.0),
    ];

    let best = select_best(&routes);
    let shortest = best.shortest.unwrap();
    let fastest = best.fastest.unwrap();

    assert!(routes.iter().all(|r| shortest.distance <= r.distance));
    assert!(routes.iter().all(|r| fastest.duration <= r.duration));
    assert!(std::ptr::eq(shortest, &routes[1]));
    assert!(std::ptr::eq(fastest, &routes[0]));
}

#[test]
fn select_best_may_return_same_candidate_twice() {
    let routes = vec![candidate(5000.0, 400.0), candidate(6000.0, 500.0)];

    let best = select_best(&routes);

    assert!(std::ptr::eq(best.shortest.unwrap(), best.fastest.unwrap()));
}

#[test]
fn select_best_on_no_routes() {
    assert_eq!(select_best(&[]), BestRoutes::default());

    let absent: Option<Vec<RouteCandidate>> = None;
    assert_eq!(
        select_best(absent.as_deref().unwrap_or_default()),
        BestRoutes::default()
    );
}

#[test]
fn select_best_breaks_ties_by_first_occurrence() {
    let routes = vec![
        candidate(8000.0, 600.0),
        candidate(5000.0, 600.0),
        candidate(5000.0, 600.0),
    ];

    let best = select_best(&routes);

    assert!(std::ptr::eq(best.shortest.unwrap(), &routes[1]));
    assert!(std::ptr::eq(best.fastest.unwrap(), &routes[0]));
}

#[test]
fn summary_rounds_to_whole_units() {
    let summary = RouteSummary::from(&candidate(12345.0, 125.0));

    assert_eq!(summary.distance_km, 12);
    assert_eq!(summary.duration_min, 2);
}

#[test]
fn summary_rounds_halves_to_even() {
    assert_eq!(RouteSummary::from(&candidate(2500.0, 90.0)).distance_km, 2);
    assert_eq!(RouteSummary::from(&candidate(3500.0, 90.0)).distance_km, 4);
    // 90s is 1.5 min
    assert_eq!(RouteSummary::from(&candidate(2500.0, 90.0)).duration_min, 2);
}

#[test]
fn metrics_are_not_rounded() {
    let metrics = RouteMetrics::from_raw(12345.0, 90.0);

    assert_eq!(metrics.distance_km, 12.345);
    assert_eq!(metrics.duration_min, 1.5);
}
