// Equirectangular projection of the map window onto a page measured in
// PostScript points. One degree of latitude is a fixed number of meters;
// one degree of longitude shrinks with the cosine of the latitude, taken
// once at the window's mid latitude.

use super::geographic::LLBBox;
use geo::Coord;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
pub const METERS_PER_DEGREE_LAT: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

/// Map scale multiplier: 1.0 renders at true size.
pub const SCALE: f64 = 1.0;
pub const INCHES_PER_METER: f64 = 39.3701 * SCALE;
pub const POINTS_PER_INCH: f64 = 72.0;
pub const POINTS_PER_METER: f64 = POINTS_PER_INCH * INCHES_PER_METER;

/// Converts (lon, lat) coordinates into page points with the origin at the
/// window's bottom-left corner, y growing upward.
#[derive(Copy, Clone, Debug)]
pub struct PageTransform {
    min_lat: f64,
    min_lng: f64,
    meters_per_degree_lng: f64,
    width_points: f64,
    height_points: f64,
}

impl PageTransform {
    pub fn new(bbox: &LLBBox) -> Self {
        let mid_lat = (bbox.min().lat() + bbox.max().lat()) / 2.0;
        let meters_per_degree_lng = meters_per_degree_lng(mid_lat);

        let width_meters = (bbox.max().lng() - bbox.min().lng()) * meters_per_degree_lng;
        let height_meters = (bbox.max().lat() - bbox.min().lat()) * METERS_PER_DEGREE_LAT;

        let transform = Self {
            min_lat: bbox.min().lat(),
            min_lng: bbox.min().lng(),
            meters_per_degree_lng,
            width_points: width_meters * POINTS_PER_METER,
            height_points: height_meters * POINTS_PER_METER,
        };

        log::info!("Map dimensions: {width_meters:.2}m x {height_meters:.2}m");
        log::info!(
            "Page dimensions: {:.2}pt x {:.2}pt",
            transform.width_points,
            transform.height_points
        );

        transform
    }

    /// Projects a (lon, lat) coordinate to (x, y) page points.
    pub fn to_page(&self, coord: Coord) -> (f64, f64) {
        let x_meters = (coord.x - self.min_lng) * self.meters_per_degree_lng;
        let y_meters = (coord.y - self.min_lat) * METERS_PER_DEGREE_LAT;
        (x_meters * POINTS_PER_METER, y_meters * POINTS_PER_METER)
    }

    pub fn width_points(&self) -> f64 {
        self.width_points
    }

    pub fn height_points(&self) -> f64 {
        self.height_points
    }
}

/// Meters per degree of longitude at a given latitude.
fn meters_per_degree_lng(lat: f64) -> f64 {
    EARTH_RADIUS_METERS * lat.to_radians().cos() * (std::f64::consts::PI / 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_lengths_at_equator() {
        // Both axes are ~111 km per degree at the equator.
        assert!((METERS_PER_DEGREE_LAT - 111_194.93).abs() < 1.0);
        assert!((meters_per_degree_lng(0.0) - METERS_PER_DEGREE_LAT).abs() < 1e-6);
    }

    #[test]
    fn test_degree_of_longitude_shrinks_with_latitude() {
        assert!((meters_per_degree_lng(60.0) - METERS_PER_DEGREE_LAT / 2.0).abs() < 1.0);
        assert!(meters_per_degree_lng(89.9) < 200.0);
    }

    #[test]
    fn test_window_origin_maps_to_page_origin() {
        let bbox = LLBBox::new(10.0, 20.0, 11.0, 21.0).unwrap();
        let transform = PageTransform::new(&bbox);

        let (x, y) = transform.to_page(Coord { x: 20.0, y: 10.0 });
        assert_eq!((x, y), (0.0, 0.0));

        let (x, y) = transform.to_page(Coord { x: 21.0, y: 11.0 });
        assert!((x - transform.width_points()).abs() < 1e-6);
        assert!((y - transform.height_points()).abs() < 1e-6);
    }

    #[test]
    fn test_page_is_wider_at_lower_latitudes() {
        let near_equator = PageTransform::new(&LLBBox::new(0.0, 0.0, 1.0, 1.0).unwrap());
        let near_pole = PageTransform::new(&LLBBox::new(70.0, 0.0, 71.0, 1.0).unwrap());

        assert!(near_equator.width_points() > near_pole.width_points());
        // Height per degree of latitude does not depend on the latitude.
        assert!((near_equator.height_points() - near_pole.height_points()).abs() < 1e-6);
    }
}
