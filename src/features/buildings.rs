use super::{FeatureCollector, PolygonFeature};
use crate::osm_reader::{ResolvedRelation, ResolvedWay, Tags};
use crate::relation_rings;

/// Building footprints. Underground structures are skipped.
#[derive(Default)]
pub struct Buildings {
    pub polygons: Vec<PolygonFeature>,
}

impl FeatureCollector for Buildings {
    fn classify_way(&self, tags: &Tags) -> bool {
        tags.contains_key("building")
            && tags.get("location").map(String::as_str) != Some("underground")
    }

    fn collect_way(&mut self, way: &ResolvedWay) {
        self.polygons.push(PolygonFeature {
            exterior: way.coords.clone(),
            interiors: Vec::new(),
        });
    }

    fn classify_relation(&self, tags: &Tags) -> bool {
        tags.get("building")
            .is_some_and(|value| value != "no" && value != "false")
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
