// Two-pass reader for OSM PBF extracts.
//
// Pass 1 walks the file once to learn which node ids are referenced by
// ways (and how many elements there are, for progress display). Pass 2
// resolves way geometry against the node cache and hands every tagged way
// and relation to the feature collectors. Relations are resolved through
// the per-way coordinate lists stored during the same pass; PBF files
// order nodes before ways before relations, so the lists are complete by
// the time relations arrive.

use fnv::{FnvHashMap, FnvHashSet};
use geo::{Coord, MultiPolygon};
use indicatif::{ProgressBar, ProgressStyle};
use osmpbf::{Element, ElementReader};
use std::collections::HashMap;
use std::path::Path;

use crate::features::FeatureSet;
use crate::relation_rings;

pub type Tags = HashMap<String, String>;

/// A way with node-resolved coordinates. `coords` and `node_refs` stay
/// aligned: refs whose node is missing from the extract are dropped from
/// both.
#[derive(Clone, Debug)]
pub struct ResolvedWay {
    pub way_id: i64,
    pub tags: Tags,
    pub coords: Vec<Coord>,
    pub node_refs: Vec<i64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemberRole {
    Outer,
    Inner,
}

/// A relation member way, already resolved to coordinates.
#[derive(Clone, Debug)]
pub struct RelationMember {
    pub role: MemberRole,
    pub coords: Vec<Coord>,
}

#[derive(Clone, Debug)]
pub struct ResolvedRelation {
    pub relation_id: i64,
    pub tags: Tags,
    pub members: Vec<RelationMember>,
}

/// Element totals from pass 1, used to size the pass 2 progress bar.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScanCounts {
    pub nodes: u64,
    pub ways: u64,
    pub relations: u64,
}

impl ScanCounts {
    pub fn total(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }
}

/// Pass 1: collects the ids of all nodes referenced by ways.
pub fn scan_referenced_nodes(path: &Path) -> Result<(FnvHashSet<i64>, ScanCounts), osmpbf::Error> {
    let reader = ElementReader::from_path(path)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Scanning for referenced nodes...");

    let mut needed_nodes: FnvHashSet<i64> = FnvHashSet::default();
    let mut counts = ScanCounts::default();

    reader.for_each(|element| match element {
        Element::Node(_) | Element::DenseNode(_) => {
            counts.nodes += 1;
            if counts.nodes % 1_000_000 == 0 {
                spinner.set_message(format!("Scanned {} nodes...", counts.nodes));
            }
        }
        Element::Way(way) => {
            counts.ways += 1;
            for node_ref in way.refs() {
                needed_nodes.insert(node_ref);
            }
        }
        Element::Relation(_) => {
            counts.relations += 1;
        }
    })?;

    spinner.finish_with_message(format!(
        "Found {} nodes, {} ways, and {} relations",
        counts.nodes, counts.ways, counts.relations
    ));
    log::info!("{} nodes are referenced by ways", needed_nodes.len());

    Ok((needed_nodes, counts))
}

/// Pass 2: resolves geometry and feeds the feature collectors. Returns the
/// boundary relation's multipolygon when `boundary_relation_id` is set and
/// found in the extract.
pub fn scan_features(
    path: &Path,
    needed_nodes: &FnvHashSet<i64>,
    counts: &ScanCounts,
    boundary_relation_id: Option<i64>,
    features: &mut FeatureSet,
) -> Result<Option<MultiPolygon>, osmpbf::Error> {
    let reader = ElementReader::from_path(path)?;

    let progress = ProgressBar::new(counts.total());
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:45.white/black}] {pos}/{len} elements ({eta})")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let mut nodes: FnvHashMap<i64, Coord> = FnvHashMap::default();
    let mut way_coords: FnvHashMap<i64, Vec<Coord>> = FnvHashMap::default();
    let mut boundary: Option<MultiPolygon> = None;

    let mut store_node = |nodes: &mut FnvHashMap<i64, Coord>, id: i64, lon: f64, lat: f64| {
        if needed_nodes.contains(&id) {
            nodes.insert(id, Coord { x: lon, y: lat });
        }
    };

    reader.for_each(|element| {
        progress.inc(1);
        match element {
            Element::Node(node) => {
                store_node(&mut nodes, node.id(), node.lon(), node.lat());
            }
            Element::DenseNode(node) => {
                store_node(&mut nodes, node.id(), node.lon(), node.lat());
            }
            Element::Way(way) => {
                let mut coords: Vec<Coord> = Vec::new();
                let mut node_refs: Vec<i64> = Vec::new();
                for node_ref in way.refs() {
                    if let Some(coord) = nodes.get(&node_ref) {
                        coords.push(*coord);
                        node_refs.push(node_ref);
                    }
                }
                if coords.is_empty() {
                    return;
                }

                way_coords.insert(way.id(), coords.clone());

                let tags: Tags = way
                    .tags()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                if tags.is_empty() {
                    return;
                }

                features.collect_way(&ResolvedWay {
                    way_id: way.id(),
                    tags,
                    coords,
                    node_refs,
                });
            }
            Element::Relation(relation) => {
                let tags: Tags = relation
                    .tags()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();

                let members: Vec<RelationMember> = relation
                    .members()
                    .filter_map(|member| {
                        if member.member_type != osmpbf::RelMemberType::Way {
                            return None;
                        }
                        let role = match member.role() {
                            Ok("outer") => MemberRole::Outer,
                            Ok("inner") => MemberRole::Inner,
                            _ => return None,
                        };
                        way_coords.get(&member.member_id).map(|coords| RelationMember {
                            role,
                            coords: coords.clone(),
                        })
                    })
                    .collect();

                let resolved = ResolvedRelation {
                    relation_id: relation.id(),
                    tags,
                    members,
                };

                if boundary_relation_id == Some(relation.id()) {
                    log::info!("Boundary relation found: {}", relation.id());
                    boundary = Some(relation_rings::to_multipolygon(
                        &relation_rings::rings_and_holes(&resolved.members),
                    ));
                }

                features.collect_relation(&resolved);
            }
        }
    })?;

    progress.finish();

    Ok(boundary)
}
