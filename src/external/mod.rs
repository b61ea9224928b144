pub mod mapbox;

use async_trait::async_trait;

use crate::entities::{Coordinates, RouteCandidate};
use crate::error::Error;

/// Result of a remote lookup. `NotFound` means the service answered with no
/// usable data, `Unavailable` means it could not be reached or answered with
/// something unusable.
#[derive(Clone, Debug)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Unavailable(Error),
}

impl<T> Lookup<T> {
    /// Collapses `NotFound` and `Unavailable`.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::Unavailable(_) => None,
        }
    }
}

impl<T> From<Result<Option<T>, Error>> for Lookup<T> {
    fn from(result: Result<Option<T>, Error>) -> Self {
        match result {
            Ok(Some(value)) => Lookup::Found(value),
            Ok(None) => Lookup::NotFound,
            Err(err) => Lookup::Unavailable(err),
        }
    }
}

#[async_trait]
pub trait Geocoder {
    async fn resolve(&self, address: &str) -> Lookup<Coordinates>;
}

#[async_trait]
pub trait Directions {
    /// Candidates in the order the service returned them; never empty when
    /// `Found`.
    async fn routes(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Lookup<Vec<RouteCandidate>>;
}

#[test]
fn found_collapses_failures() {
    use crate::error::no_routes_error;

    assert_eq!(Lookup::Found(3).found(), Some(3));
    assert_eq!(Lookup::<i32>::NotFound.found(), None);
    assert_eq!(Lookup::<i32>::Unavailable(no_routes_error()).found(), None);
}

#[test]
fn from_result_keeps_the_distinction() {
    use crate::error::upstream_error;

    assert!(matches!(Lookup::from(Ok::<_, Error>(Some(1))), Lookup::Found(1)));
    assert!(matches!(Lookup::<i32>::from(Ok::<_, Error>(None)), Lookup::NotFound));
    assert!(matches!(
        Lookup::<i32>::from(Err(upstream_error(503))),
        Lookup::Unavailable(Error { code: 4, .. })
    ));
}
