/// A resolved location. Remote services exchange it as `[lng, lat]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn midpoint(&self, other: &Coordinates) -> Coordinates {
        Coordinates {
            lng: (self.lng + other.lng) / 2.0,
            lat: (self.lat + other.lat) / 2.0,
        }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.lng, coordinates.lat)
    }
}

#[test]
fn array_is_read_longitude_first() {
    let coordinates = Coordinates::from([10.0, 20.0]);

    assert_eq!(coordinates.lng, 10.0);
    assert_eq!(coordinates.lat, 20.0);
}

#[test]
fn midpoint_averages_both_axes() {
    let a = Coordinates::new(10.0, 50.0);
    let b = Coordinates::new(12.0, 54.0);

    assert_eq!(a.midpoint(&b), Coordinates::new(11.0, 52.0));
}

#[test]
fn string_form_is_lng_comma_lat() {
    let s: String = Coordinates::new(-73.989, 40.733).into();

    assert_eq!(s, "-73.989,40.733");
}
