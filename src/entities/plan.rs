use std::fmt;

use crate::entities::RouteSummary;

/// Self-contained HTML/JS fragment embedding the route map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapArtifact(String);

impl MapArtifact {
    pub fn new(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the result page needs for one submission.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePlan {
    pub shortest: Option<RouteSummary>,
    pub fastest: Option<RouteSummary>,
    pub route_count: usize,
    pub map: MapArtifact,
}
