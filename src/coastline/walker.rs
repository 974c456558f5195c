// Closes bounded chains into land polygons by walking the window perimeter
// clockwise from the first entering event. While traversing a bounded
// chain's interior the walker looks for that chain's exit; between chains
// it walks the perimeter looking for the next entry. Corners are spliced in
// whenever a polygon's closure arc passes a corner of the window.
//
// Clockwise perimeter order plus the water-to-the-right convention of OSM
// coastlines guarantees that the arc from an entering event to its matching
// exiting event encloses land.

use fnv::FnvHashMap;

use super::ring::{BoundedChainId, IntersectionMap, Side};
use super::{Chain, CoastlineError};
use crate::coordinate_system::geographic::LLBBox;

#[derive(Copy, Clone, Debug, PartialEq)]
enum LookingFor {
    Exit,
    Enter,
}

pub fn close_open_chains(
    open_chains: &FnvHashMap<BoundedChainId, Chain>,
    intersections: &IntersectionMap,
    start: (Side, usize),
    bbox: &LLBBox,
) -> Result<Vec<Chain>, CoastlineError> {
    let (start_side, start_index) = start;
    let start_event = &intersections.side(start_side)[start_index];

    let mut acc: Chain = bounded_chain(open_chains, start_event.bounded_id)?.clone();
    // The polygon closes when this chain's exit comes around.
    let mut exit_id_to_find: Option<BoundedChainId> = Some(start_event.bounded_id);
    // Set while inside a nested chain that was absorbed mid-polygon.
    let mut entrance_id_to_find: Option<BoundedChainId> = None;
    let mut looking_for = LookingFor::Exit;

    let mut closed: Vec<Chain> = Vec::new();

    // Entering events of chains nested deeper than one level are deferred
    // and closed by a recursive pass per deferred map.
    let mut deferred_maps: Vec<IntersectionMap> = Vec::new();
    let mut pending_deferred = IntersectionMap::default();
    let mut pending_deferred_used = false;

    let mut side = start_side;
    let mut index = start_index + 1;

    // One full clockwise lap: the walk ends back at the starting event.
    while side != start_side || index != start_index {
        let events = intersections.side(side);
        if index >= events.len() {
            if looking_for == LookingFor::Exit && entrance_id_to_find.is_none() {
                // The closure arc passes this side's corner; without this
                // vertex the polygon edge would cut across the window.
                acc.insert(0, side.clockwise_corner(bbox));
            }
            side = side.next_clockwise();
            index = 0;
            continue;
        }

        let event = &events[index];
        let event_chain = bounded_chain(open_chains, event.bounded_id)?;

        match looking_for {
            LookingFor::Exit => {
                if event.is_entering {
                    return Err(CoastlineError::InvariantViolation(
                        "found an entering intersection while looking for an exit".to_string(),
                    ));
                }
                let Some(exit_id) = exit_id_to_find else {
                    return Err(CoastlineError::InvariantViolation(
                        "looking for an exit with no exit id to look for".to_string(),
                    ));
                };

                if event.bounded_id == exit_id {
                    // The root chain's exit: the polygon is complete.
                    let exit_point = *event_chain.last().ok_or_else(|| {
                        CoastlineError::InvariantViolation(
                            "bounded chain with no coordinates".to_string(),
                        )
                    })?;
                    acc.insert(0, exit_point);
                    closed.push(std::mem::take(&mut acc));
                    exit_id_to_find = None;
                    looking_for = LookingFor::Enter;
                } else if entrance_id_to_find.is_none() {
                    // Exit of a chain nested between the root's entry and
                    // exit: splice it in and watch for its entry on the way
                    // back out.
                    entrance_id_to_find = Some(event.bounded_id);
                    let mut joined = event_chain.clone();
                    joined.append(&mut acc);
                    acc = joined;
                    looking_for = LookingFor::Enter;
                } else {
                    return Err(CoastlineError::InvariantViolation(
                        "found a second nested exit before rejoining the first".to_string(),
                    ));
                }
                index += 1;
            }
            LookingFor::Enter => {
                if !event.is_entering {
                    return Err(CoastlineError::InvariantViolation(
                        "found an exiting intersection while looking for an entry".to_string(),
                    ));
                }

                if exit_id_to_find.is_none() {
                    // The previous polygon just closed; this entry roots the
                    // next one.
                    exit_id_to_find = Some(event.bounded_id);
                    acc = event_chain.clone();
                    looking_for = LookingFor::Exit;
                } else if entrance_id_to_find == Some(event.bounded_id) {
                    // Rejoined the nested chain spliced in earlier.
                    entrance_id_to_find = None;
                    if pending_deferred_used {
                        deferred_maps.push(std::mem::take(&mut pending_deferred));
                        pending_deferred_used = false;
                    }
                    looking_for = LookingFor::Exit;
                } else {
                    // An entry nested deeper still; a recursive pass closes
                    // it from its own starting point.
                    pending_deferred.push(event.clone());
                    pending_deferred_used = true;
                }
                index += 1;
            }
        }
    }

    for deferred in deferred_maps {
        if let Some(deferred_start) = deferred.starting_point() {
            closed.extend(close_open_chains(
                open_chains,
                &deferred,
                deferred_start,
                bbox,
            )?);
        }
    }

    Ok(closed)
}

fn bounded_chain(
    open_chains: &FnvHashMap<BoundedChainId, Chain>,
    id: BoundedChainId,
) -> Result<&Chain, CoastlineError> {
    open_chains.get(&id).ok_or_else(|| {
        CoastlineError::InvariantViolation(format!(
            "no bounded chain for intersection event with id {}",
            id.0
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coastline::ring::IntersectionEvent;
    use geo::Coord;

    fn coord(lng: f64, lat: f64) -> Coord {
        Coord { x: lng, y: lat }
    }

    fn bbox() -> LLBBox {
        LLBBox::new(0.0, 0.0, 10.0, 10.0).unwrap()
    }

    fn event(side: Side, lng: f64, lat: f64, is_entering: bool, id: u64) -> IntersectionEvent {
        IntersectionEvent {
            point: coord(lng, lat),
            side,
            is_entering,
            bounded_id: BoundedChainId(id),
        }
    }

    fn chains(entries: &[(u64, &[Coord])]) -> FnvHashMap<BoundedChainId, Chain> {
        entries
            .iter()
            .map(|&(id, coords)| (BoundedChainId(id), coords.to_vec()))
            .collect()
    }

    fn walk(
        open_chains: &FnvHashMap<BoundedChainId, Chain>,
        map: &IntersectionMap,
    ) -> Result<Vec<Chain>, CoastlineError> {
        let start = map.starting_point().expect("no entering event");
        close_open_chains(open_chains, map, start, &bbox())
    }

    #[test]
    fn test_direct_closure_along_one_side_has_no_corners() {
        // One chain entering TOP at lon 3 and exiting TOP at lon 7; its
        // entry precedes its exit clockwise, so the closing arc stays on
        // the TOP side.
        let chain = [coord(3.0, 10.0), coord(3.0, 5.0), coord(7.0, 5.0), coord(7.0, 10.0)];
        let open_chains = chains(&[(0, &chain[..])]);
        let mut map = IntersectionMap::default();
        map.push(event(Side::Top, 3.0, 10.0, true, 0));
        map.push(event(Side::Top, 7.0, 10.0, false, 0));

        let polygons = walk(&open_chains, &map).unwrap();

        assert_eq!(
            polygons,
            vec![vec![
                coord(7.0, 10.0),
                coord(3.0, 10.0),
                coord(3.0, 5.0),
                coord(7.0, 5.0),
                coord(7.0, 10.0),
            ]]
        );
    }

    #[test]
    fn test_closure_arc_around_the_window_collects_all_corners() {
        // Exit clockwise-before entry on the same side: the closing arc
        // wraps the whole window and picks up all four corners.
        let chain = [coord(7.0, 10.0), coord(7.0, 5.0), coord(3.0, 5.0), coord(3.0, 10.0)];
        let open_chains = chains(&[(0, &chain[..])]);
        let mut map = IntersectionMap::default();
        map.push(event(Side::Top, 3.0, 10.0, false, 0));
        map.push(event(Side::Top, 7.0, 10.0, true, 0));

        let polygons = walk(&open_chains, &map).unwrap();

        assert_eq!(
            polygons,
            vec![vec![
                coord(3.0, 10.0),
                coord(0.0, 10.0),
                coord(0.0, 0.0),
                coord(10.0, 0.0),
                coord(10.0, 10.0),
                coord(7.0, 10.0),
                coord(7.0, 5.0),
                coord(3.0, 5.0),
                coord(3.0, 10.0),
            ]]
        );
    }

    #[test]
    fn test_corner_wrap_from_top_to_right() {
        // Enters TOP at lon 8, exits RIGHT at lat 5: the closure arc must
        // contain the (10, 10) corner.
        let chain = [coord(8.0, 10.0), coord(8.0, 5.0), coord(10.0, 5.0)];
        let open_chains = chains(&[(0, &chain[..])]);
        let mut map = IntersectionMap::default();
        map.push(event(Side::Top, 8.0, 10.0, true, 0));
        map.push(event(Side::Right, 10.0, 5.0, false, 0));

        let polygons = walk(&open_chains, &map).unwrap();

        assert_eq!(
            polygons,
            vec![vec![
                coord(10.0, 5.0),
                coord(10.0, 10.0),
                coord(8.0, 10.0),
                coord(8.0, 5.0),
                coord(10.0, 5.0),
            ]]
        );
    }

    #[test]
    fn test_two_roots_close_two_polygons() {
        let open_chains = chains(&[
            (
                0,
                &[coord(3.0, 10.0), coord(3.0, 5.0), coord(4.0, 5.0), coord(4.0, 10.0)][..],
            ),
            (
                1,
                &[coord(6.0, 10.0), coord(6.0, 5.0), coord(7.0, 5.0), coord(7.0, 10.0)][..],
            ),
        ]);
        let mut map = IntersectionMap::default();
        map.push(event(Side::Top, 3.0, 10.0, true, 0));
        map.push(event(Side::Top, 4.0, 10.0, false, 0));
        map.push(event(Side::Top, 6.0, 10.0, true, 1));
        map.push(event(Side::Top, 7.0, 10.0, false, 1));

        let polygons = walk(&open_chains, &map).unwrap();

        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].first(), Some(&coord(4.0, 10.0)));
        assert_eq!(polygons[0].last(), Some(&coord(4.0, 10.0)));
        assert_eq!(polygons[1].first(), Some(&coord(7.0, 10.0)));
        assert_eq!(polygons[1].last(), Some(&coord(7.0, 10.0)));
    }

    #[test]
    fn test_nested_chain_is_spliced_into_the_root_polygon() {
        // A land mass spanning TOP lon 1..9 with an inlet between lon 3
        // and 7 whose walls are their own bounded chain: the inlet chain's
        // exit appears between the root's entry and exit, so it is spliced
        // in and rejoined on the way out.
        let root = [
            coord(1.0, 10.0),
            coord(1.0, 2.0),
            coord(9.0, 2.0),
            coord(9.0, 10.0),
        ];
        let inlet = [
            coord(7.0, 10.0),
            coord(7.0, 6.0),
            coord(3.0, 6.0),
            coord(3.0, 10.0),
        ];
        let open_chains = chains(&[(0, &root[..]), (1, &inlet[..])]);
        let mut map = IntersectionMap::default();
        map.push(event(Side::Top, 1.0, 10.0, true, 0));
        map.push(event(Side::Top, 3.0, 10.0, false, 1));
        map.push(event(Side::Top, 7.0, 10.0, true, 1));
        map.push(event(Side::Top, 9.0, 10.0, false, 0));

        let polygons = walk(&open_chains, &map).unwrap();

        assert_eq!(
            polygons,
            vec![vec![
                coord(9.0, 10.0),
                coord(7.0, 10.0),
                coord(7.0, 6.0),
                coord(3.0, 6.0),
                coord(3.0, 10.0),
                coord(1.0, 10.0),
                coord(1.0, 2.0),
                coord(9.0, 2.0),
                coord(9.0, 10.0),
            ]]
        );
    }

    #[test]
    fn test_entering_event_while_looking_for_exit_is_rejected() {
        // Two chains whose entries are adjacent clockwise: the walk meets
        // the second entry while still looking for the first exit.
        let open_chains = chains(&[
            (0, &[coord(1.0, 10.0), coord(1.0, 5.0), coord(8.5, 5.0), coord(8.5, 10.0)][..]),
            (1, &[coord(2.0, 10.0), coord(2.0, 7.0), coord(8.0, 7.0), coord(8.0, 10.0)][..]),
        ]);
        let mut map = IntersectionMap::default();
        map.push(event(Side::Top, 1.0, 10.0, true, 0));
        map.push(event(Side::Top, 2.0, 10.0, true, 1));
        map.push(event(Side::Top, 8.0, 10.0, false, 1));
        map.push(event(Side::Top, 8.5, 10.0, false, 0));

        match walk(&open_chains, &map) {
            Err(CoastlineError::InvariantViolation(_)) => {}
            other => panic!("expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_event_without_a_bounded_chain_is_rejected() {
        let open_chains = chains(&[]);
        let mut map = IntersectionMap::default();
        map.push(event(Side::Top, 1.0, 10.0, true, 0));
        map.push(event(Side::Top, 2.0, 10.0, false, 0));

        match walk(&open_chains, &map) {
            Err(CoastlineError::InvariantViolation(_)) => {}
            other => panic!("expected InvariantViolation, got {other:?}"),
        }
    }
}
