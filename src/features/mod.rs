// Feature collectors for the render layers.
//
// The OSM scan hands every tagged way and relation to the `FeatureSet`,
// which delegates to the first collector that claims it. Checks run in
// rough frequency order (buildings first, coastline last) so the common
// cases short-circuit early.

pub mod buildings;
pub mod parks;
pub mod roads;
pub mod water;

use geo::Coord;

use crate::coastline::CoastlineWay;
use crate::osm_reader::{ResolvedRelation, ResolvedWay, Tags};

/// A filled feature with optional holes, in (lon, lat).
#[derive(Clone, Debug)]
pub struct PolygonFeature {
    pub exterior: Vec<Coord>,
    pub interiors: Vec<Vec<Coord>>,
}

/// One render layer's collector: classification predicates plus storage.
pub trait FeatureCollector {
    fn classify_way(&self, tags: &Tags) -> bool;
    fn collect_way(&mut self, way: &ResolvedWay);

    fn classify_relation(&self, _tags: &Tags) -> bool {
        false
    }
    fn collect_relation(&mut self, _relation: &ResolvedRelation) {}
}

/// All collectors, dispatched in priority order.
#[derive(Default)]
pub struct FeatureSet {
    pub buildings: buildings::Buildings,
    pub roads: roads::Roads,
    pub water: water::Water,
    pub parks: parks::Parks,
    pub coastline: CoastlineWays,
}

impl FeatureSet {
    fn collectors_mut(&mut self) -> [&mut dyn FeatureCollector; 5] {
        [
            &mut self.buildings,
            &mut self.roads,
            &mut self.water,
            &mut self.parks,
            &mut self.coastline,
        ]
    }

    /// Hands the way to the first collector that claims it.
    pub fn collect_way(&mut self, way: &ResolvedWay) {
        for collector in self.collectors_mut() {
            if collector.classify_way(&way.tags) {
                collector.collect_way(way);
                return;
            }
        }
    }

    /// Hands the relation to the first collector that claims it.
    pub fn collect_relation(&mut self, relation: &ResolvedRelation) {
        for collector in self.collectors_mut() {
            if collector.classify_relation(&relation.tags) {
                collector.collect_relation(relation);
                return;
            }
        }
    }
}

/// Raw `natural=coastline` ways, held for the land outline engine.
#[derive(Default)]
pub struct CoastlineWays {
    ways: Vec<CoastlineWay>,
}

impl CoastlineWays {
    pub fn len(&self) -> usize {
        self.ways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ways.is_empty()
    }

    pub fn take(&mut self) -> Vec<CoastlineWay> {
        std::mem::take(&mut self.ways)
    }
}

impl FeatureCollector for CoastlineWays {
    fn classify_way(&self, tags: &Tags) -> bool {
        tags.get("natural").is_some_and(|value| value == "coastline")
    }

    fn collect_way(&mut self, way: &ResolvedWay) {
        self.ways.push(CoastlineWay {
            way_id: way.way_id,
            coords: way.coords.clone(),
            node_refs: way.node_refs.clone(),
        });
    }
}

/// Tag helper shared by the collectors.
pub(crate) fn tag_in(tags: &Tags, key: &str, values: &[&str]) -> bool {
    tags.get(key).is_some_and(|value| values.contains(&value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged_way(tags: &[(&str, &str)]) -> ResolvedWay {
        ResolvedWay {
            way_id: 1,
            tags: tags
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            coords: vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 0.0 },
                Coord { x: 1.0, y: 1.0 },
            ],
            node_refs: vec![10, 11, 12],
        }
    }

    #[test]
    fn test_building_takes_priority_over_park_tags() {
        // A building inside a park-tagged way must be collected once, as a
        // building.
        let mut features = FeatureSet::default();
        features.collect_way(&tagged_way(&[("building", "yes"), ("leisure", "park")]));

        assert_eq!(features.buildings.polygons.len(), 1);
        assert!(features.parks.polygons.is_empty());
    }

    #[test]
    fn test_coastline_way_is_collected_last_in_priority() {
        let mut features = FeatureSet::default();
        features.collect_way(&tagged_way(&[("natural", "coastline")]));

        assert_eq!(features.coastline.len(), 1);

        let ways = features.coastline.take();
        assert_eq!(ways[0].way_id, 1);
        assert_eq!(ways[0].coords.len(), ways[0].node_refs.len());
        assert!(features.coastline.is_empty());
    }

    #[test]
    fn test_unclaimed_way_is_dropped() {
        let mut features = FeatureSet::default();
        features.collect_way(&tagged_way(&[("power", "line")]));

        assert!(features.buildings.polygons.is_empty());
        assert!(features.roads.lines.is_empty());
        assert!(features.water.polygons.is_empty());
        assert!(features.parks.polygons.is_empty());
        assert!(features.coastline.is_empty());
    }
}
