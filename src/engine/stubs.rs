use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    entities::{Coordinates, RouteCandidate},
    error::upstream_error,
    external::{Directions, Geocoder, Lookup},
};

/// Resolves only the addresses it was given; everything else is `NotFound`.
#[derive(Default)]
pub struct StubGeocoder {
    known: HashMap<String, Coordinates>,
    offline: bool,
    calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn with(mut self, address: &str, coordinates: Coordinates) -> Self {
        self.known.insert(address.into(), coordinates);
        self
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, address: &str) -> Lookup<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.offline {
            return Lookup::Unavailable(upstream_error(503));
        }

        match self.known.get(address) {
            Some(coordinates) => Lookup::Found(*coordinates),
            None => Lookup::NotFound,
        }
    }
}

pub struct StubDirections {
    response: Lookup<Vec<RouteCandidate>>,
    calls: AtomicUsize,
}

impl StubDirections {
    pub fn returning(response: Lookup<Vec<RouteCandidate>>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Directions for StubDirections {
    async fn routes(&self, _: Coordinates, _: Coordinates) -> Lookup<Vec<RouteCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

pub fn candidate(points: Vec<[f64; 2]>, distance: f64, duration: f64) -> RouteCandidate {
    RouteCandidate::new(points.into(), distance, duration)
}
