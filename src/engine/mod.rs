mod route_api;

use std::sync::Arc;

use crate::{
    api::API,
    config::Config,
    external::{mapbox::MapboxClient, Directions, Geocoder},
};

pub type DynGeocoder = Arc<dyn Geocoder + Send + Sync>;
pub type DynDirections = Arc<dyn Directions + Send + Sync>;

pub struct Engine {
    geocoder: DynGeocoder,
    directions: DynDirections,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let client = Arc::new(MapboxClient::new(config));

        Self::with_providers(client.clone(), client)
    }

    pub fn with_providers(geocoder: DynGeocoder, directions: DynDirections) -> Self {
        Self {
            geocoder,
            directions,
        }
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) mod stubs;
