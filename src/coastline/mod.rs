// Land outline engine: turns `natural=coastline` ways into closed land
// polygons clipped to the map window.
//
// Pipeline: assemble ways into continuous chains, clip the chains against
// the window, order the boundary crossings clockwise, then close the
// in-window chain portions into polygons by walking the perimeter.

pub mod assembler;
pub mod clipper;
pub mod ring;
pub mod walker;

use geo::Coord;
use thiserror::Error;

use crate::coordinate_system::geographic::LLBBox;
use ring::Side;

/// An ordered polyline in (lon, lat); closed iff `first == last` exactly.
pub type Chain = Vec<Coord>;

/// A `natural=coastline` way with node-resolved coordinates. The source
/// convention orients these with water to the right of the travel
/// direction; the engine relies on it only to tell entries from exits.
#[derive(Clone, Debug)]
pub struct CoastlineWay {
    pub way_id: i64,
    pub coords: Chain,
    pub node_refs: Vec<i64>,
}

/// Failures surfaced by the land outline engine. Nothing is repaired or
/// retried; partial results are never rendered.
#[derive(Debug, Error)]
pub enum CoastlineError {
    /// A segment crosses the window boundary yet no side intersection was
    /// computed, or a coordinate is not finite.
    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    /// Entering and exiting crossings do not balance: the extract's
    /// coastline is visibly truncated inside the map window.
    #[error(
        "incomplete coastline: {entering} entering vs {exiting} exiting boundary crossings \
         (excess on the {side:?} side); the OSM extract is likely missing coastline ways \
         that are visible in the current map window"
    )]
    IncompleteCoastline {
        entering: usize,
        exiting: usize,
        side: Side,
    },

    /// The perimeter walk met an event that contradicts its state. The
    /// input data is corrupted upstream of the engine.
    #[error("intersection map invariant violated: {0}")]
    InvariantViolation(String),

    /// A way joined onto a chain by node ref disagrees on the shared
    /// node's coordinate.
    #[error("coastline way {way_id} joins the chain at node {node_ref} but disagrees on its coordinate")]
    AssemblerInconsistency { way_id: i64, node_ref: i64 },
}

/// Runs the full pipeline over raw coastline ways.
///
/// The result holds the closed-in-interior chains first, then the polygons
/// formed by perimeter closure, in traversal order. Chains that could not
/// be closed (malformed source data) are passed through open so the
/// renderer can mark their endpoints instead of filling them.
pub fn build_land_polygons(
    ways: Vec<CoastlineWay>,
    bbox: &LLBBox,
) -> Result<Vec<Chain>, CoastlineError> {
    let chains = assembler::assemble_chains(ways)?;
    let clipped = clipper::clip_chains(chains, bbox)?;

    let mut intersections = clipped.intersections;
    intersections.sort_clockwise();
    intersections.validate_balance()?;

    let mut polygons = clipped.closed_chains;
    if let Some(start) = intersections.starting_point() {
        polygons.extend(walker::close_open_chains(
            &clipped.open_chains,
            &intersections,
            start,
            bbox,
        )?);
    }

    log::info!("Land masses in the map window: {}", polygons.len());
    Ok(polygons)
}
