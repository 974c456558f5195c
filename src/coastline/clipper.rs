// Walks each continuous coastline chain segment by segment against the map
// window. Chains that never leave the window come out as closed interior
// chains; chains that cross come out as bounded chains (entry point to exit
// point) plus one entering and one exiting event per bounded chain.

use fnv::FnvHashMap;
use geo::Coord;
use itertools::Itertools;

use super::ring::{BoundedChainId, IntersectionEvent, IntersectionMap, Side};
use super::{Chain, CoastlineError};
use crate::coordinate_system::geographic::LLBBox;

/// Everything the clipper learned about one set of chains.
#[derive(Debug)]
pub struct ClipOutcome {
    /// Chains that never crossed the window boundary.
    pub closed_chains: Vec<Chain>,
    /// In-window chain portions, keyed by bounded chain id.
    pub open_chains: FnvHashMap<BoundedChainId, Chain>,
    /// Crossing events, unsorted until the ring orders them.
    pub intersections: IntersectionMap,
}

enum SegmentCrossing {
    /// Both endpoints inside the window (boundary included).
    Inside,
    /// Both endpoints strictly outside.
    Outside,
    Crossing(Crossing),
}

struct Crossing {
    point: Coord,
    side: Side,
    is_entering: bool,
}

pub fn clip_chains(chains: Vec<Chain>, bbox: &LLBBox) -> Result<ClipOutcome, CoastlineError> {
    let mut next_id: u64 = 0;
    let mut fresh_id = move || {
        let id = BoundedChainId(next_id);
        next_id += 1;
        id
    };

    let mut closed_chains: Vec<Chain> = Vec::new();
    let mut open_chains: FnvHashMap<BoundedChainId, Chain> = FnvHashMap::default();
    let mut intersections = IntersectionMap::default();

    for chain in chains {
        if chain.len() < 2 {
            continue;
        }
        if let Some(bad) = chain.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(CoastlineError::MalformedGeometry(format!(
                "non-finite coordinate ({}, {}) in coastline chain",
                bad.x, bad.y
            )));
        }

        let mut crossed_boundary = false;
        // Bounded chains cut from this chain, in travel order.
        let mut bounded: Vec<(BoundedChainId, Chain)> = Vec::new();
        let mut acc: Chain = Vec::new();
        let mut current_id = fresh_id();

        for (p1, p2) in chain.iter().copied().tuple_windows() {
            match segment_crossing(p1, p2, bbox)? {
                SegmentCrossing::Inside => {
                    if acc.is_empty() {
                        acc.push(p1);
                    }
                    acc.push(p2);
                }
                SegmentCrossing::Outside => {
                    if !acc.is_empty() {
                        return Err(CoastlineError::InvariantViolation(
                            "chain is outside the map window but the accumulator holds points"
                                .to_string(),
                        ));
                    }
                }
                SegmentCrossing::Crossing(crossing) => {
                    crossed_boundary = true;
                    intersections.push(IntersectionEvent {
                        point: crossing.point,
                        side: crossing.side,
                        is_entering: crossing.is_entering,
                        bounded_id: current_id,
                    });

                    if crossing.is_entering {
                        acc = vec![crossing.point, p2];
                    } else {
                        if acc.is_empty() {
                            acc.push(p1);
                        }
                        acc.push(crossing.point);
                        bounded.push((current_id, std::mem::take(&mut acc)));
                        current_id = fresh_id();
                    }
                }
            }
        }

        if !acc.is_empty() {
            if !crossed_boundary {
                debug_assert!(bounded.is_empty(), "bounded chains without a crossing");
                closed_chains.push(acc);
            } else if acc.last() == chain.first() && !bounded.is_empty() {
                // The original ring re-joins its own start without crossing
                // again (an island straddling the boundary once). Splice the
                // tail onto the first bounded chain and retag its events so
                // the walker sees one entry/exit pair, not an odd count.
                let (first_id, first_coords) = &mut bounded[0];
                let mut merged = acc;
                merged.extend(first_coords.iter().skip(1).copied());
                *first_coords = merged;
                intersections.rewrite_bounded_id(current_id, *first_id);
            } else {
                bounded.push((current_id, acc));
            }
        }

        for (id, bounded_chain) in bounded {
            open_chains.insert(id, bounded_chain);
        }
    }

    Ok(ClipOutcome {
        closed_chains,
        open_chains,
        intersections,
    })
}

/// Classifies the segment p1 -> p2 against the window, computing the
/// crossing point for segments with one endpoint on each side.
///
/// The segment is parameterized as `p1 + t * (p2 - p1)`; for each side line
/// a candidate is kept when `t` lies in [0, 1] and the crossing falls within
/// the side's extent. A segment through a corner produces two candidates;
/// the one nearest p1 wins, with exact ties resolved by side order.
fn segment_crossing(p1: Coord, p2: Coord, bbox: &LLBBox) -> Result<SegmentCrossing, CoastlineError> {
    let p1_inside = bbox.contains(&p1);
    let p2_inside = bbox.contains(&p2);

    if p1_inside && p2_inside {
        return Ok(SegmentCrossing::Inside);
    }
    if !p1_inside && !p2_inside {
        return Ok(SegmentCrossing::Outside);
    }

    let min_lng = bbox.min().lng();
    let min_lat = bbox.min().lat();
    let max_lng = bbox.max().lng();
    let max_lat = bbox.max().lat();

    let mut best: Option<(f64, Crossing)> = None;
    let mut consider = |crossing: Crossing| {
        let dx = crossing.point.x - p1.x;
        let dy = crossing.point.y - p1.y;
        let distance_sq = dx * dx + dy * dy;
        if best.as_ref().is_none_or(|(nearest, _)| distance_sq < *nearest) {
            best = Some((distance_sq, crossing));
        }
    };

    if p1.y != p2.y {
        // Top side (lat = max_lat); entering when the chain moves down.
        let t = (max_lat - p1.y) / (p2.y - p1.y);
        if (0.0..=1.0).contains(&t) {
            let lng = p1.x + t * (p2.x - p1.x);
            if (min_lng..=max_lng).contains(&lng) {
                consider(Crossing {
                    point: Coord { x: lng, y: max_lat },
                    side: Side::Top,
                    is_entering: p1.y > p2.y,
                });
            }
        }
    }

    if p1.x != p2.x {
        // Right side (lon = max_lng); entering when the chain moves left.
        let t = (max_lng - p1.x) / (p2.x - p1.x);
        if (0.0..=1.0).contains(&t) {
            let lat = p1.y + t * (p2.y - p1.y);
            if (min_lat..=max_lat).contains(&lat) {
                consider(Crossing {
                    point: Coord { x: max_lng, y: lat },
                    side: Side::Right,
                    is_entering: p1.x > p2.x,
                });
            }
        }
    }

    if p1.y != p2.y {
        // Bottom side (lat = min_lat); entering when the chain moves up.
        let t = (min_lat - p1.y) / (p2.y - p1.y);
        if (0.0..=1.0).contains(&t) {
            let lng = p1.x + t * (p2.x - p1.x);
            if (min_lng..=max_lng).contains(&lng) {
                consider(Crossing {
                    point: Coord { x: lng, y: min_lat },
                    side: Side::Bottom,
                    is_entering: p1.y < p2.y,
                });
            }
        }
    }

    if p1.x != p2.x {
        // Left side (lon = min_lng); entering when the chain moves right.
        let t = (min_lng - p1.x) / (p2.x - p1.x);
        if (0.0..=1.0).contains(&t) {
            let lat = p1.y + t * (p2.y - p1.y);
            if (min_lat..=max_lat).contains(&lat) {
                consider(Crossing {
                    point: Coord { x: min_lng, y: lat },
                    side: Side::Left,
                    is_entering: p1.x < p2.x,
                });
            }
        }
    }

    match best {
        Some((_, crossing)) => Ok(SegmentCrossing::Crossing(crossing)),
        None => Err(CoastlineError::MalformedGeometry(format!(
            "segment ({}, {}) -> ({}, {}) crosses the map window but intersects no side",
            p1.x, p1.y, p2.x, p2.y
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lng: f64, lat: f64) -> Coord {
        Coord { x: lng, y: lat }
    }

    fn bbox() -> LLBBox {
        LLBBox::new(0.0, 0.0, 10.0, 10.0).unwrap()
    }

    fn events_on(outcome: &ClipOutcome, side: Side) -> Vec<(f64, f64, bool)> {
        outcome
            .intersections
            .side(side)
            .iter()
            .map(|e| (e.point.x, e.point.y, e.is_entering))
            .collect()
    }

    #[test]
    fn test_fully_inside_ring_passes_through_verbatim() {
        let ring = vec![
            coord(2.0, 2.0),
            coord(8.0, 2.0),
            coord(8.0, 8.0),
            coord(2.0, 8.0),
            coord(2.0, 2.0),
        ];

        let outcome = clip_chains(vec![ring.clone()], &bbox()).unwrap();

        assert_eq!(outcome.closed_chains, vec![ring]);
        assert!(outcome.open_chains.is_empty());
        assert!(outcome.intersections.is_empty());
    }

    #[test]
    fn test_fully_outside_chain_produces_nothing() {
        let chain = vec![coord(20.0, 20.0), coord(25.0, 20.0), coord(25.0, 25.0)];

        let outcome = clip_chains(vec![chain], &bbox()).unwrap();

        assert!(outcome.closed_chains.is_empty());
        assert!(outcome.open_chains.is_empty());
        assert!(outcome.intersections.is_empty());
    }

    #[test]
    fn test_single_crossing_cuts_one_bounded_chain() {
        // Enters through TOP descending, exits through RIGHT.
        let chain = vec![coord(8.0, 12.0), coord(8.0, 5.0), coord(12.0, 5.0)];

        let outcome = clip_chains(vec![chain], &bbox()).unwrap();

        assert!(outcome.closed_chains.is_empty());
        assert_eq!(outcome.open_chains.len(), 1);
        let bounded = outcome.open_chains.values().next().unwrap();
        assert_eq!(
            bounded,
            &vec![coord(8.0, 10.0), coord(8.0, 5.0), coord(10.0, 5.0)]
        );
        assert_eq!(events_on(&outcome, Side::Top), vec![(8.0, 10.0, true)]);
        assert_eq!(events_on(&outcome, Side::Right), vec![(10.0, 5.0, false)]);
    }

    #[test]
    fn test_ring_rejoining_its_start_merges_into_one_bounded_chain() {
        // Starts inside, exits through BOTTOM, comes back through LEFT and
        // closes onto its own first point without crossing again.
        let ring = vec![
            coord(3.0, 8.0),
            coord(3.0, -2.0),
            coord(-2.0, -2.0),
            coord(-2.0, 8.0),
            coord(3.0, 8.0),
        ];

        let outcome = clip_chains(vec![ring], &bbox()).unwrap();

        assert_eq!(outcome.open_chains.len(), 1);
        let (id, bounded) = outcome.open_chains.iter().next().unwrap();
        assert_eq!(bounded.first(), Some(&coord(0.0, 8.0)));
        assert_eq!(bounded.last(), Some(&coord(3.0, 0.0)));
        // Both events must reference the merged chain's id.
        assert!(outcome.intersections.iter().all(|e| e.bounded_id == *id));
        assert_eq!(outcome.intersections.len(), 2);
    }

    #[test]
    fn test_corner_touch_prefers_first_side_in_order() {
        // This segment enters exactly through the (10, 10) corner, so TOP
        // and RIGHT both produce the same candidate point.
        let chain = vec![coord(12.0, 12.0), coord(8.0, 8.0)];

        let outcome = clip_chains(vec![chain], &bbox()).unwrap();

        let top = events_on(&outcome, Side::Top);
        assert_eq!(top, vec![(10.0, 10.0, true)]);
        assert!(events_on(&outcome, Side::Right).is_empty());
    }

    #[test]
    fn test_point_on_the_boundary_counts_as_inside() {
        let chain = vec![coord(0.0, 5.0), coord(5.0, 5.0)];

        let outcome = clip_chains(vec![chain.clone()], &bbox()).unwrap();

        assert_eq!(outcome.closed_chains, vec![chain]);
        assert!(outcome.intersections.is_empty());
    }

    #[test]
    fn test_non_finite_coordinate_is_malformed() {
        let chain = vec![coord(5.0, 5.0), coord(f64::NAN, 5.0)];

        match clip_chains(vec![chain], &bbox()) {
            Err(CoastlineError::MalformedGeometry(_)) => {}
            other => panic!("expected MalformedGeometry, got {other:?}"),
        }
    }

    #[test]
    fn test_ring_dipping_in_through_top_yields_one_bounded_chain() {
        // A closed ring dipping into the window from above: in through TOP
        // at lon 3, across the window, back out at lon 7.
        let ring = vec![
            coord(3.0, 12.0),
            coord(3.0, 5.0),
            coord(7.0, 5.0),
            coord(7.0, 12.0),
            coord(3.0, 12.0),
        ];

        let outcome = clip_chains(vec![ring], &bbox()).unwrap();

        assert_eq!(outcome.open_chains.len(), 1);
        let bounded = outcome.open_chains.values().next().unwrap();
        assert_eq!(
            bounded,
            &vec![
                coord(3.0, 10.0),
                coord(3.0, 5.0),
                coord(7.0, 5.0),
                coord(7.0, 10.0),
            ]
        );
        assert_eq!(
            events_on(&outcome, Side::Top),
            vec![(3.0, 10.0, true), (7.0, 10.0, false)]
        );
    }
}
