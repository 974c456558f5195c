use geo::Coord;
use std::str::FromStr;

/// Bounds-checked longitude and latitude.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LLPoint {
    lat: f64,
    lng: f64,
}

impl LLPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude {lat} not in range -90.0..=90.0"));
        }

        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("Longitude {lng} not in range -180.0..=180.0"));
        }

        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// A checked bounding box: the map window in (lon, lat) space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LLBBox {
    /// The "bottom-left" vertex of the rectangle
    min: LLPoint,

    /// The "top-right" vertex of the rectangle
    max: LLPoint,
}

impl LLBBox {
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Result<Self, String> {
        if min_lng >= max_lng {
            return Err(format!(
                "Invalid LLBBox: min_lng {min_lng} >= max_lng {max_lng}"
            ));
        }
        if min_lat >= max_lat {
            return Err(format!(
                "Invalid LLBBox: min_lat {min_lat} >= max_lat {max_lat}"
            ));
        }

        let min = LLPoint::new(min_lat, min_lng)?;
        let max = LLPoint::new(max_lat, max_lng)?;

        Ok(Self { min, max })
    }

    pub fn min(&self) -> LLPoint {
        self.min
    }

    pub fn max(&self) -> LLPoint {
        self.max
    }

    /// Whether a (lon, lat) coordinate lies in the window, boundary included.
    pub fn contains(&self, coord: &Coord) -> bool {
        coord.y >= self.min.lat()
            && coord.y <= self.max.lat()
            && coord.x >= self.min.lng()
            && coord.x <= self.max.lng()
    }
}

impl FromStr for LLBBox {
    type Err = String;

    /// Parses "min_lat,min_lng,max_lat,max_lng" (commas or spaces).
    fn from_str(s: &str) -> Result<Self, String> {
        let parts = s
            .split([',', ' '])
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid bbox value {part:?}"))
            })
            .collect::<Result<Vec<f64>, String>>()?;

        let [min_lat, min_lng, max_lat, max_lng]: [f64; 4] = parts
            .try_into()
            .map_err(|_| "A bbox needs exactly four values".to_string())?;

        Self::new(min_lat, min_lng, max_lat, max_lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        assert!(LLBBox::new(0., 0., 1., 1.).is_ok());

        // Lower Manhattan, New York, US
        assert!(LLBBox::new(40.68, -74.03, 40.88, -73.90).is_ok());

        // Royal Observatory Greenwich, London, UK
        assert!(LLBBox::new(51.470000, -0.015000, 51.480000, 0.015000).is_ok());

        // Sydney Opera House, Sydney, Australia
        assert!(LLBBox::new(-33.861035, 151.204137, -33.852597, 151.222268).is_ok());
    }

    #[test]
    fn test_out_of_order() {
        assert!(LLBBox::new(0., 0., 0., 0.).is_err());
        assert!(LLBBox::new(1., 0., 0., 1.).is_err());
        assert!(LLBBox::new(0., 1., 1., 0.).is_err());
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(LLBBox::new(-91., 0., 1., 1.).is_err());
        assert!(LLBBox::new(0., -181., 1., 1.).is_err());
        assert!(LLBBox::new(0., 0., 91., 1.).is_err());
        assert!(LLBBox::new(0., 0., 1., 181.).is_err());
        assert!(LLBBox::new(f64::NAN, 0., 1., 1.).is_err());
    }

    #[test]
    fn test_from_str_commas() {
        let bbox: LLBBox = "40.68,-74.03,40.88,-73.90".parse().unwrap();
        assert_eq!(bbox, LLBBox::new(40.68, -74.03, 40.88, -73.90).unwrap());
    }

    #[test]
    fn test_from_str_spaces() {
        let bbox: LLBBox = "40.68 -74.03 40.88 -73.90".parse().unwrap();
        assert_eq!(bbox, LLBBox::new(40.68, -74.03, 40.88, -73.90).unwrap());
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("40.68,-74.03,40.88".parse::<LLBBox>().is_err());
        assert!("a,b,c,d".parse::<LLBBox>().is_err());
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let bbox = LLBBox::new(0., 0., 10., 10.).unwrap();

        assert!(bbox.contains(&Coord { x: 5.0, y: 5.0 }));
        assert!(bbox.contains(&Coord { x: 0.0, y: 10.0 }));
        assert!(bbox.contains(&Coord { x: 10.0, y: 0.0 }));
        assert!(!bbox.contains(&Coord { x: 10.1, y: 5.0 }));
        assert!(!bbox.contains(&Coord { x: 5.0, y: -0.1 }));
    }
}
