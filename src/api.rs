use async_trait::async_trait;

use crate::entities::RoutePlan;
use crate::error::Error;

#[async_trait]
pub trait RouteAPI {
    /// Resolves both addresses, fetches driving routes between them and
    /// renders the result map.
    async fn plan_route(&self, origin: &str, destination: &str) -> Result<RoutePlan, Error>;
}

pub trait API: RouteAPI {}
