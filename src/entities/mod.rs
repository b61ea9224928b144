mod coordinates;
mod plan;
mod route;

pub use coordinates::Coordinates;
pub use plan::{MapArtifact, RoutePlan};
pub use route::{select_best, BestRoutes, RouteCandidate, RouteMetrics, RouteSummary};
