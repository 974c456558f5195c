use fnv::FnvHashMap;
use geo::Coord;
use once_cell::sync::Lazy;

use super::{FeatureCollector, PolygonFeature};
use crate::osm_reader::{ResolvedRelation, ResolvedWay, Tags};
use crate::relation_rings;

/// Importance level per `highway` value; lower draws later and wider.
static ROAD_HIERARCHY: Lazy<FnvHashMap<&'static str, u8>> = Lazy::new(|| {
    let mut hierarchy = FnvHashMap::default();
    hierarchy.insert("motorway", 1);
    hierarchy.insert("trunk", 2);
    hierarchy.insert("primary", 3);
    hierarchy.insert("secondary", 4);
    hierarchy.insert("tertiary", 5);
    hierarchy.insert("residential", 6);
    hierarchy.insert("service", 7);
    hierarchy.insert("unclassified", 7);
    hierarchy.insert("motorway_link", 2);
    hierarchy.insert("trunk_link", 3);
    hierarchy.insert("primary_link", 4);
    hierarchy.insert("secondary_link", 5);
    hierarchy.insert("tertiary_link", 6);
    hierarchy.insert("living_street", 7);
    hierarchy.insert("track", 7);
    hierarchy.insert("road", 7);
    hierarchy.insert("pedestrian", 8);
    hierarchy.insert("footway", 8);
    hierarchy.insert("steps", 8);
    hierarchy
});

/// Footway roles that are drawn as part of the road they accompany.
const EXCLUDED_FOOTWAYS: [&str; 2] = ["sidewalk", "crossing"];

#[derive(Clone, Debug)]
pub struct RoadLine {
    pub coords: Vec<Coord>,
    pub hierarchy: u8,
}

/// Road centerlines plus pedestrian-area relations.
#[derive(Default)]
pub struct Roads {
    pub lines: Vec<RoadLine>,
    pub pedestrian_areas: Vec<PolygonFeature>,
}

impl Roads {
    /// Lines ordered for painting: least important first so major roads
    /// draw on top.
    pub fn lines_bottom_up(&self) -> Vec<&RoadLine> {
        let mut ordered: Vec<&RoadLine> = self.lines.iter().collect();
        ordered.sort_by(|a, b| b.hierarchy.cmp(&a.hierarchy));
        ordered
    }
}

/// The `highway` value that styles this way, looking through
/// `highway=construction` to the road under construction.
fn road_type(tags: &Tags) -> Option<&str> {
    let highway = tags.get("highway")?;
    if ROAD_HIERARCHY.contains_key(highway.as_str()) {
        return Some(highway);
    }
    if highway == "construction" {
        let construction = tags.get("construction")?;
        if ROAD_HIERARCHY.contains_key(construction.as_str()) {
            return Some(construction);
        }
    }
    None
}

impl FeatureCollector for Roads {
    fn classify_way(&self, tags: &Tags) -> bool {
        let is_sidewalk = tags
            .get("footway")
            .is_some_and(|value| EXCLUDED_FOOTWAYS.contains(&value.as_str()));
        road_type(tags).is_some() && !is_sidewalk
    }

    fn collect_way(&mut self, way: &ResolvedWay) {
        let Some(road_type) = road_type(&way.tags) else {
            return;
        };
        self.lines.push(RoadLine {
            coords: way.coords.clone(),
            hierarchy: ROAD_HIERARCHY[road_type],
        });
    }

    fn classify_relation(&self, tags: &Tags) -> bool {
        tags.get("highway").map(String::as_str) == Some("pedestrian")
    }

    fn collect_relation(&mut self, relation: &ResolvedRelation) {
        for (ring, holes) in relation_rings::rings_and_holes(&relation.members) {
            self.pedestrian_areas.push(PolygonFeature {
                exterior: ring,
                interiors: holes,
            });
        }
    }
}
