use super::{tag_in, FeatureCollector, PolygonFeature};
use crate::osm_reader::{ResolvedRelation, ResolvedWay, Tags};
use crate::relation_rings;

const PARK_LEISURE: [&str; 6] = [
    "park",
    "garden",
    "playground",
    "pitch",
    "sports_centre",
    "golf_course",
];

const PARK_LANDUSE: [&str; 7] = [
    "park",
    "grass",
    "recreation_ground",
    "village_green",
    "meadow",
    "cemetery",
    "forest",
];

// Relations additionally cover cultivated green areas that rarely appear
// as plain ways.
const PARK_LANDUSE_RELATION: [&str; 12] = [
    "park",
    "grass",
    "recreation_ground",
    "village_green",
    "meadow",
    "cemetery",
    "forest",
    "wood",
    "orchard",
    "vineyard",
    "farm",
    "farmyard",
];

const PARK_NATURAL: [&str; 2] = ["wood", "forest"];

/// Green areas: parks, gardens, woods, and similar.
#[derive(Default)]
pub struct Parks {
    pub polygons: Vec<PolygonFeature>,
}

impl Parks {
    /// Interior rings rendered as their own, lighter green areas on top of
    /// the parks that contain them.
    pub fn interior_features(&self) -> Vec<PolygonFeature> {
        self.polygons
            .iter()
            .flat_map(|park| park.interiors.iter())
            .map(|ring| PolygonFeature {
                exterior: ring.clone(),
                interiors: Vec::new(),
            })
            .collect()
    }
}

impl FeatureCollector for Parks {
    fn classify_way(&self, tags: &Tags) -> bool {
        tag_in(tags, "leisure", &PARK_LEISURE)
            || tag_in(tags, "landuse", &PARK_LANDUSE)
            || tag_in(tags, "natural", &PARK_NATURAL)
    }

    fn collect_way(&mut self, way: &ResolvedWay) {
        self.polygons.push(PolygonFeature {
            exterior: way.coords.clone(),
            interiors: Vec::new(),
        });
    }

    fn classify_relation(&self, tags: &Tags) -> bool {
        tag_in(tags, "leisure", &PARK_LEISURE)
            || tag_in(tags, "landuse", &PARK_LANDUSE_RELATION)
            || tag_in(tags, "natural", &PARK_NATURAL)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(entries: &[(&str, &str)]) -> Tags {
        entries
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_classifies_park_like_ways() {
        let parks = Parks::default();

        assert!(parks.classify_way(&tags(&[("leisure", "park")])));
        assert!(parks.classify_way(&tags(&[("landuse", "cemetery")])));
        assert!(parks.classify_way(&tags(&[("natural", "wood")])));
        assert!(!parks.classify_way(&tags(&[("leisure", "marina")])));
        assert!(!parks.classify_way(&tags(&[("landuse", "industrial")])));
    }

    #[test]
    fn test_relations_cover_cultivated_areas() {
        let parks = Parks::default();

        assert!(parks.classify_relation(&tags(&[("landuse", "vineyard")])));
        assert!(!parks.classify_way(&tags(&[("landuse", "vineyard")])));
    }
}
