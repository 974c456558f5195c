use geo::Coord;

use super::{tag_in, FeatureCollector, PolygonFeature};
use crate::osm_reader::{ResolvedRelation, ResolvedWay, Tags};
use crate::relation_rings;

const WATER_NATURAL: [&str; 4] = ["water", "wetland", "spring", "lake"];
const WATER_LEISURE: [&str; 1] = ["swimming_pool"];
const WATER_AMENITY: [&str; 2] = ["fountain", "swimming_pool"];
const WATER_WATERWAY: [&str; 6] = ["riverbank", "canal", "river", "stream", "lake", "pond"];
const WATER_WATER: [&str; 8] = [
    "lake",
    "pond",
    "reservoir",
    "basin",
    "river",
    "canal",
    "stream",
    "moat",
];
const WATER_MAN_MADE: [&str; 4] = ["reservoir_covered", "reservoir", "lake", "pond"];

/// Waterway values drawn as stroked lines rather than filled areas.
const LINE_WATERWAYS: [&str; 3] = ["river", "stream", "canal"];

/// Inland water: filled bodies plus stroked waterway lines.
#[derive(Default)]
pub struct Water {
    pub polygons: Vec<PolygonFeature>,
    pub lines: Vec<Vec<Coord>>,
}

impl FeatureCollector for Water {
    fn classify_way(&self, tags: &Tags) -> bool {
        tag_in(tags, "natural", &WATER_NATURAL)
            || tag_in(tags, "leisure", &WATER_LEISURE)
            || tag_in(tags, "amenity", &WATER_AMENITY)
            || tag_in(tags, "waterway", &WATER_WATERWAY)
            || tag_in(tags, "water", &WATER_WATER)
            || tag_in(tags, "man_made", &WATER_MAN_MADE)
    }

    fn collect_way(&mut self, way: &ResolvedWay) {
        if tag_in(&way.tags, "waterway", &LINE_WATERWAYS) {
            self.lines.push(way.coords.clone());
        } else {
            self.polygons.push(PolygonFeature {
                exterior: way.coords.clone(),
                interiors: Vec::new(),
            });
        }
    }

    fn classify_relation(&self, tags: &Tags) -> bool {
        tags.contains_key("water") || tags.contains_key("waterway")
    }

    fn collect_relation(&mut self, relation: &ResolvedRelation) {
        for (ring, holes) in relation_rings::rings_and_holes(&relation.members) {
            self.polygons.push(PolygonFeature {
                exterior: ring,
                interiors: holes,
            });
        }
    }
}
