// Assembles multipolygon relation members into closed rings with holes.
// Outer ring fragments are joined wherever two fragments share an endpoint
// coordinate, in any of the four end-to-end orientations; inner rings
// become holes of the outer ring that contains them.

use geo::{Contains, Coord, LineString, MultiPolygon, Point, Polygon};

use crate::osm_reader::{MemberRole, RelationMember};

pub type Ring = Vec<Coord>;

/// Joins outer-ring fragments, closes them, and assigns holes.
///
/// Fragment joining restarts from scratch after every merge, because a
/// merge can create new shared endpoints between previously disjoint
/// fragments.
pub fn rings_and_holes(members: &[RelationMember]) -> Vec<(Ring, Vec<Ring>)> {
    let mut outer_rings: Vec<Ring> = Vec::new();
    let mut inner_rings: Vec<Ring> = Vec::new();

    for member in members {
        if member.coords.is_empty() {
            continue;
        }
        match member.role {
            MemberRole::Outer => outer_rings.push(member.coords.clone()),
            MemberRole::Inner => inner_rings.push(member.coords.clone()),
        }
    }

    let mut connected: Vec<Ring> = Vec::new();
    while !outer_rings.is_empty() {
        let mut current = outer_rings.remove(0);

        let mut modified = true;
        while modified {
            modified = false;
            let mut index = 0;
            while index < outer_rings.len() {
                let other = &outer_rings[index];
                if current.last() == other.first() {
                    let other = outer_rings.remove(index);
                    current.extend(other.into_iter().skip(1));
                    modified = true;
                } else if current.last() == other.last() {
                    let other = outer_rings.remove(index);
                    current.extend(other.into_iter().rev().skip(1));
                    modified = true;
                } else if current.first() == other.last() {
                    let mut other = outer_rings.remove(index);
                    other.extend(current.drain(..).skip(1));
                    current = other;
                    modified = true;
                } else if current.first() == other.first() {
                    let mut other = outer_rings.remove(index);
                    other.reverse();
                    other.extend(current.drain(..).skip(1));
                    current = other;
                    modified = true;
                } else {
                    index += 1;
                }
            }
        }

        if current.first() != current.last() {
            let first = current[0];
            current.push(first);
        }
        connected.push(current);
    }

    let mut output: Vec<(Ring, Vec<Ring>)> = Vec::new();
    for ring in connected {
        // Three unique points plus the closing point.
        if ring.len() < 4 {
            continue;
        }

        let outer_polygon = Polygon::new(LineString::new(ring.clone()), Vec::new());
        let holes: Vec<Ring> = inner_rings
            .iter()
            .filter(|inner| inner.len() >= 3)
            .map(|inner| {
                let mut closed = inner.clone();
                if closed.first() != closed.last() {
                    let first = closed[0];
                    closed.push(first);
                }
                closed
            })
            .filter(|inner| outer_polygon.contains(&Point::from(inner[0])))
            .collect();

        output.push((ring, holes));
    }

    output
}

/// Builds a `geo` multipolygon from assembled rings and holes.
pub fn to_multipolygon(rings: &[(Ring, Vec<Ring>)]) -> MultiPolygon {
    MultiPolygon::new(
        rings
            .iter()
            .map(|(ring, holes)| {
                Polygon::new(
                    LineString::new(ring.clone()),
                    holes.iter().map(|hole| LineString::new(hole.clone())).collect(),
                )
            })
            .collect(),
    )
}
