//! Greedy neuron-to-compartment placement.

use std::fmt::{Display, Formatter};

use log::{debug, info};

use crate::error::{NetError, Result};
use crate::network::{GroupId, GroupParams, Network, NeuronFlags};

/// Tile/core a neuron is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placement {
    /// Tile index
    pub tile: usize,
    /// Core index within the tile
    pub core: usize,
}

impl Placement {
    /// Create a placement
    pub const fn new(tile: usize, core: usize) -> Self {
        Self { tile, core }
    }
}

impl Display for Placement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.tile, self.core)
    }
}

impl From<(usize, usize)> for Placement {
    fn from((tile, core): (usize, usize)) -> Self {
        Self { tile, core }
    }
}

/// Remaining compartments per (tile, core)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompartmentTable {
    cores_per_tile: usize,
    remaining: Vec<Vec<usize>>,
}

impl CompartmentTable {
    /// Table with every core starting at `capacity`
    pub fn new(tiles: usize, cores_per_tile: usize, capacity: usize) -> Self {
        Self {
            cores_per_tile,
            remaining: vec![vec![capacity; cores_per_tile]; tiles],
        }
    }

    /// Number of tiles
    pub fn tiles(&self) -> usize {
        self.remaining.len()
    }

    /// Cores in each tile
    pub fn cores_per_tile(&self) -> usize {
        self.cores_per_tile
    }

    /// Free compartments on one core
    pub fn remaining(&self, placement: Placement) -> Option<usize> {
        self.remaining
            .get(placement.tile)
            .and_then(|cores| cores.get(placement.core))
            .copied()
    }

    /// Free compartments across the table, saturating at `usize::MAX`
    pub fn total_remaining(&self) -> usize {
        self.remaining
            .iter()
            .flatten()
            .fold(0usize, |acc, &free| acc.saturating_add(free))
    }

    /// Take one compartment from the first core with room, tiles then cores
    /// in ascending order.
    pub fn map_next(&mut self) -> Result<Placement> {
        for (tile, cores) in self.remaining.iter_mut().enumerate() {
            for (core, free) in cores.iter_mut().enumerate() {
                if *free > 0 {
                    *free -= 1;
                    return Ok(Placement { tile, core });
                }
            }
        }
        Err(NetError::NoCapacity {
            tiles: self.remaining.len(),
            cores: self.cores_per_tile,
        })
    }
}

/// Create a group of `count` flag-style neurons and place each one.
///
/// With `mappings`, neuron `i` goes to `mappings[i]` and the table is left
/// alone; the list must have exactly one entry per neuron. Without it,
/// placements come from [`CompartmentTable::map_next`]. Both failure modes
/// are checked before the network is modified.
pub fn create_layer(
    network: &mut Network,
    count: usize,
    table: &mut CompartmentTable,
    params: GroupParams,
    mappings: Option<&[Placement]>,
) -> Result<GroupId> {
    info!("Creating layer with {} neurons", count);

    match mappings {
        Some(list) if list.len() != count => {
            return Err(NetError::MappingSizeMismatch {
                expected: count,
                actual: list.len(),
            });
        }
        None if table.total_remaining() < count => {
            return Err(NetError::NoCapacity {
                tiles: table.tiles(),
                cores: table.cores_per_tile(),
            });
        }
        _ => {}
    }

    let group_id = network.create_group(params);
    for i in 0..count {
        if i % 10_000 == 0 {
            debug!("Creating neuron {}", i);
        }
        let placement = match mappings {
            Some(list) => list[i],
            None => table.map_next()?,
        };
        let group = network.group_mut(group_id)?;
        let address = group.create_neuron(NeuronFlags::default());
        if let Some(neuron) = group.neuron_mut(address.neuron) {
            neuron.set_placement(placement);
        }
    }
    Ok(group_id)
}
