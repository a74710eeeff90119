//! Tracks which agent currently stands in each cell of a grid.
//!
//! Occupancy is a flat array sized to the grid where each cell either holds the [Entity] of the
//! agent standing in it or nothing, a cell is occupied exactly when it has an occupant. The grid
//! never owns agents, it only remembers who was last seen where.
//!
//! How a cell is released when an agent walks out of it depends on the [OccupancyPolicy]:
//!
//! ```text
//!  VacateOnExit                 Sticky
//!  step 1   |__|A_|__|          step 1   |__|A_|__|
//!  step 2   |__|__|A_|          step 2   |__|A~|A_|   <- stale flag left behind
//! ```
//!
//! A cell holds a single occupant, the last agent to step into it. When two agents share a cell and
//! the newer one walks out first the cell reads empty until the other agent's next step occupies it
//! again.
//!
//! Agents which are despawned have every cell they still hold released, see
//! [crate::plugin::motion_layer::release_removed_agents].
//!

use crate::prelude::*;
use bevy::prelude::*;

/// How an agent's old cell is treated after it moves into a new one
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum OccupancyPolicy {
	/// Cells are only ever marked occupied and never cleared as agents leave them. Every cell an
	/// agent has passed through keeps looking occupied to the congestion throttle
	Sticky,
	/// The previous cell is released as soon as the agent's cell changes
	#[default]
	VacateOnExit,
}

/// Cell index to occupying agent
#[derive(Component, Clone, Debug)]
pub struct OccupancyTracker {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Occupant of each cell indexed by `column + row * width`
	occupants: Vec<Option<Entity>>,
}

impl OccupancyTracker {
	/// Create a tracker where no cell is occupied
	pub fn new(dimensions: &GridDimensions) -> Self {
		OccupancyTracker {
			width: dimensions.get_width(),
			height: dimensions.get_height(),
			occupants: vec![None; dimensions.get_cell_count()],
		}
	}
	/// Mark a cell as occupied by `agent`. Occupying a cell the agent already holds changes nothing,
	/// a different agent replaces the previous occupant
	pub fn occupy(&mut self, field_cell: FieldCell, agent: Entity) {
		let index = flat_index(field_cell, self.width, self.height);
		if self.occupants[index] != Some(agent) {
			trace!("{:?} occupies {:?}", agent, field_cell);
			self.occupants[index] = Some(agent);
		}
	}
	/// Release a cell if `agent` is its occupant. A cell since taken over by another agent is left alone
	pub fn vacate(&mut self, field_cell: FieldCell, agent: Entity) {
		let index = flat_index(field_cell, self.width, self.height);
		if self.occupants[index] == Some(agent) {
			trace!("{:?} vacates {:?}", agent, field_cell);
			self.occupants[index] = None;
		}
	}
	/// Whether any agent holds the cell
	pub fn is_occupied(&self, field_cell: FieldCell) -> bool {
		self.occupant(field_cell).is_some()
	}
	/// The agent occupying a cell
	pub fn occupant(&self, field_cell: FieldCell) -> Option<Entity> {
		self.occupants[flat_index(field_cell, self.width, self.height)]
	}
	/// Number of cells which hold an agent
	pub fn occupied_count(&self) -> usize {
		self.occupants.iter().filter(|o| o.is_some()).count()
	}
	/// Release every cell held by any of `agents`, returning how many were released
	pub fn vacate_agents(&mut self, agents: &[Entity]) -> usize {
		let mut released = 0;
		for occupant in self.occupants.iter_mut() {
			if occupant.is_some_and(|o| agents.contains(&o)) {
				*occupant = None;
				released += 1;
			}
		}
		released
	}
	/// Release every cell
	pub fn clear(&mut self) {
		self.occupants.fill(None);
	}
	/// Number of `(columns, rows)` tracked
	pub fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
}
