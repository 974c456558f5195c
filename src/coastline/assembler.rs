// Joins `natural=coastline` ways into maximal continuous chains by matching
// shared endpoint node refs. Ways all run with water to the right of the
// travel direction, so a join is always head-to-tail; start-against-start
// and end-against-end never match and are not tried.

use std::collections::HashSet;

use super::{Chain, CoastlineError, CoastlineWay};

struct Section {
    way_id: i64,
    coords: Chain,
    start_ref: i64,
    end_ref: i64,
    used: bool,
}

/// Chains the input ways together. The seed for each chain is the unused
/// way with the most coordinates (longer ways are more likely part of the
/// backbone coastline, which keeps diagnostics stable). Ways that extend
/// no chain start their own; duplicate way ids are ignored.
pub fn assemble_chains(ways: Vec<CoastlineWay>) -> Result<Vec<Chain>, CoastlineError> {
    let mut seen_ids: HashSet<i64> = HashSet::new();
    let mut sections: Vec<Section> = Vec::with_capacity(ways.len());
    for way in ways {
        if !seen_ids.insert(way.way_id) {
            continue;
        }
        let (Some(&start_ref), Some(&end_ref)) = (way.node_refs.first(), way.node_refs.last())
        else {
            continue;
        };
        sections.push(Section {
            way_id: way.way_id,
            coords: way.coords,
            start_ref,
            end_ref,
            used: false,
        });
    }

    let mut longest: Option<usize> = None;
    for (index, section) in sections.iter().enumerate() {
        if longest.is_none_or(|best| section.coords.len() > sections[best].coords.len()) {
            longest = Some(index);
        }
    }
    let Some(seed) = longest else {
        return Ok(Vec::new());
    };

    let mut chains: Vec<Chain> = Vec::new();
    let mut current: Chain = sections[seed].coords.clone();
    let mut chain_start = sections[seed].start_ref;
    let mut chain_end = sections[seed].end_ref;
    sections[seed].used = true;

    loop {
        let mut extended = false;

        for index in 0..sections.len() {
            if sections[index].used {
                continue;
            }

            if sections[index].start_ref == chain_end {
                // Connect to the end of the chain.
                check_shared_coord(
                    current.last(),
                    sections[index].coords.first(),
                    &sections[index],
                    chain_end,
                )?;
                current.extend(sections[index].coords.iter().skip(1).copied());
                chain_end = sections[index].end_ref;
                sections[index].used = true;
                extended = true;
                break;
            } else if sections[index].end_ref == chain_start {
                // Connect to the start of the chain.
                check_shared_coord(
                    current.first(),
                    sections[index].coords.last(),
                    &sections[index],
                    chain_start,
                )?;
                let mut joined = sections[index].coords.clone();
                joined.extend(current.iter().skip(1).copied());
                current = joined;
                chain_start = sections[index].start_ref;
                sections[index].used = true;
                extended = true;
                break;
            }
        }

        if !extended {
            if current.len() >= 2 {
                chains.push(std::mem::take(&mut current));
            }

            // Start a new chain from the first unused section.
            match sections.iter().position(|section| !section.used) {
                Some(index) => {
                    current = sections[index].coords.clone();
                    chain_start = sections[index].start_ref;
                    chain_end = sections[index].end_ref;
                    sections[index].used = true;
                }
                None => break,
            }
        }
    }

    log::info!("Assembled {} coastline chains", chains.len());
    Ok(chains)
}

/// Two ways joined on a node ref must agree bitwise on that node's
/// coordinate; anything else means the extract is inconsistent.
fn check_shared_coord(
    chain_tip: Option<&geo::Coord>,
    section_tip: Option<&geo::Coord>,
    section: &Section,
    node_ref: i64,
) -> Result<(), CoastlineError> {
    if chain_tip.is_some() && chain_tip == section_tip {
        Ok(())
    } else {
        Err(CoastlineError::AssemblerInconsistency {
            way_id: section.way_id,
            node_ref,
        })
    }
}
