// Boundary intersection events, ordered clockwise along the map window
// perimeter: TOP by ascending longitude, RIGHT by descending latitude,
// BOTTOM by descending longitude, LEFT by ascending latitude.

use geo::Coord;

use super::CoastlineError;
use crate::coordinate_system::geographic::LLBBox;

/// One side of the map window rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Sides in the order a clockwise perimeter walk visits them.
    pub const CLOCKWISE: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn next_clockwise(self) -> Side {
        match self {
            Side::Top => Side::Right,
            Side::Right => Side::Bottom,
            Side::Bottom => Side::Left,
            Side::Left => Side::Top,
        }
    }

    /// The corner this side shares with the clockwise-next side.
    pub fn clockwise_corner(self, bbox: &LLBBox) -> Coord {
        match self {
            Side::Top => Coord {
                x: bbox.max().lng(),
                y: bbox.max().lat(),
            },
            Side::Right => Coord {
                x: bbox.max().lng(),
                y: bbox.min().lat(),
            },
            Side::Bottom => Coord {
                x: bbox.min().lng(),
                y: bbox.min().lat(),
            },
            Side::Left => Coord {
                x: bbox.min().lng(),
                y: bbox.max().lat(),
            },
        }
    }
}

/// Identifies one bounded chain: the portion of a coastline between a
/// boundary entry and the following exit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundedChainId(pub(crate) u64);

/// A coastline segment crossing one side of the map window. `is_entering`
/// is true when the chain moves from outside the window to inside.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEvent {
    pub point: Coord,
    pub side: Side,
    pub is_entering: bool,
    pub bounded_id: BoundedChainId,
}

/// Intersection events bucketed per window side. A fresh map is always a
/// new value with four empty buckets; maps are never shared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntersectionMap {
    top: Vec<IntersectionEvent>,
    right: Vec<IntersectionEvent>,
    bottom: Vec<IntersectionEvent>,
    left: Vec<IntersectionEvent>,
}

impl IntersectionMap {
    pub fn side(&self, side: Side) -> &[IntersectionEvent] {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<IntersectionEvent> {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }

    pub fn push(&mut self, event: IntersectionEvent) {
        self.side_mut(event.side).push(event);
    }

    pub fn is_empty(&self) -> bool {
        Side::CLOCKWISE.iter().all(|&side| self.side(side).is_empty())
    }

    pub fn len(&self) -> usize {
        Side::CLOCKWISE.iter().map(|&side| self.side(side).len()).sum()
    }

    /// All events, sides in clockwise order.
    pub fn iter(&self) -> impl Iterator<Item = &IntersectionEvent> {
        Side::CLOCKWISE.into_iter().flat_map(|side| self.side(side).iter())
    }

    /// Retags every event of one bounded chain, used when the clipper
    /// splices a chain's tail back onto its first bounded chain.
    pub fn rewrite_bounded_id(&mut self, from: BoundedChainId, to: BoundedChainId) {
        for side in Side::CLOCKWISE {
            for event in self.side_mut(side) {
                if event.bounded_id == from {
                    event.bounded_id = to;
                }
            }
        }
    }

    /// Sorts each side's events by their clockwise perimeter position.
    pub fn sort_clockwise(&mut self) {
        let ascending = |a: f64, b: f64| {
            a.partial_cmp(&b)
                .expect("non-finite coordinate in intersection event")
        };

        self.top.sort_by(|a, b| ascending(a.point.x, b.point.x));
        self.right.sort_by(|a, b| ascending(b.point.y, a.point.y));
        self.bottom.sort_by(|a, b| ascending(b.point.x, a.point.x));
        self.left.sort_by(|a, b| ascending(a.point.y, b.point.y));
    }

    /// Checks that entering and exiting events balance. An imbalance means
    /// the extract's coastline is truncated inside the map window; the
    /// reported side is the one carrying the largest surplus.
    pub fn validate_balance(&self) -> Result<(), CoastlineError> {
        let mut entering = 0usize;
        let mut exiting = 0usize;
        for event in self.iter() {
            if event.is_entering {
                entering += 1;
            } else {
                exiting += 1;
            }
        }

        if entering == exiting {
            return Ok(());
        }

        let excess_is_entering = entering > exiting;
        let mut worst_side = Side::Top;
        let mut worst_surplus = i64::MIN;
        for side in Side::CLOCKWISE {
            let mut surplus = 0i64;
            for event in self.side(side) {
                if event.is_entering == excess_is_entering {
                    surplus += 1;
                } else {
                    surplus -= 1;
                }
            }
            if surplus > worst_surplus {
                worst_surplus = surplus;
                worst_side = side;
            }
        }

        Err(CoastlineError::IncompleteCoastline {
            entering,
            exiting,
            side: worst_side,
        })
    }

    /// The first entering event in clockwise scan order, if any. This is
    /// where the closure walker starts.
    pub fn starting_point(&self) -> Option<(Side, usize)> {
        for side in Side::CLOCKWISE {
            for (index, event) in self.side(side).iter().enumerate() {
                if event.is_entering {
                    return Some((side, index));
                }
            }
        }
        None
    }
}
