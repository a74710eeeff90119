//! A [NavigationField] is the finished product of a goal change: the [IntegrationField] and
//! [FlowField] built over a [Grid] towards a single goal.
//!
//! It can only be created by [NavigationField::build] which runs both passes to completion, there
//! is no way to observe a half propagated field. Agents read it through a [CurrentNavigationField]
//! handle which swaps the whole field in one go whenever a new one is published.
//!

use std::sync::Arc;

use crate::prelude::*;
use bevy::prelude::*;

/// Fully built integration and direction fields towards a single goal
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationField {
	/// Monotonic build counter of the owning navigation entity
	version: u64,
	/// Size and placement of the grid the field was built over
	dimensions: GridDimensions,
	/// Cell that all directions lead to
	goal: FieldCell,
	/// World position the build was requested for
	destination: Vec2,
	/// Directions agents are allowed to move in
	direction_set: DirectionSet,
	/// Cumulative cost of reaching the goal from each cell
	integration_field: IntegrationField,
	/// Best direction of movement from each cell
	flow_field: FlowField,
}

impl NavigationField {
	/// Build the fields for a goal. The goal position is clamped onto the grid, the `cost_field`
	/// must have the same shape as the `grid`
	pub fn build(
		grid: &Grid,
		cost_field: &CostField,
		goal_world: Vec2,
		direction_set: DirectionSet,
		version: u64,
	) -> Result<Self, ConfigurationError> {
		let dimensions = *grid.get_dimensions();
		let expected = (dimensions.get_width(), dimensions.get_height());
		if cost_field.get_dimensions() != expected {
			return Err(ConfigurationError::FieldShape {
				expected,
				found: cost_field.get_dimensions(),
			});
		}
		let goal = grid.cell_at(goal_world).get_field_cell();
		if cost_field.is_impassable(goal) {
			warn!(
				"Navigation goal {:?} is impassable, propagating from it regardless",
				goal
			);
		}
		let mut integration_field = IntegrationField::new(&dimensions, goal);
		integration_field.calculate_field(goal, cost_field);
		let mut flow_field = FlowField::new(&dimensions);
		flow_field.calculate(&integration_field, direction_set);
		debug!(
			"Built navigation field v{} towards {:?}, {} of {} cells reachable",
			version,
			goal,
			integration_field.get_reachable_count(),
			dimensions.get_cell_count()
		);
		Ok(NavigationField {
			version,
			dimensions,
			goal,
			destination: goal_world,
			direction_set,
			integration_field,
			flow_field,
		})
	}
	/// Version assigned when the field was published
	pub fn get_version(&self) -> u64 {
		self.version
	}
	/// Cell the field leads towards
	pub fn get_goal(&self) -> FieldCell {
		self.goal
	}
	/// World position the goal cell was chosen from
	pub fn get_destination(&self) -> Vec2 {
		self.destination
	}
	/// Directions agents may be sent in
	pub fn get_direction_set(&self) -> DirectionSet {
		self.direction_set
	}
	/// Grid the field was built over
	pub fn get_dimensions(&self) -> &GridDimensions {
		&self.dimensions
	}
	/// Cumulative costs to the goal
	pub fn get_integration_field(&self) -> &IntegrationField {
		&self.integration_field
	}
	/// Best direction of each cell
	pub fn get_flow_field(&self) -> &FlowField {
		&self.flow_field
	}
	/// Clamped lookup of the [FieldCell] beneath a world position
	pub fn get_cell_from_world_position(&self, position: Vec2) -> FieldCell {
		self.dimensions.get_field_cell_from_xy(position)
	}
	/// In-bounds neighbours of a cell in the iteration order of the [DirectionSet]
	pub fn get_neighbour_cells(&self, field_cell: FieldCell, direction_set: DirectionSet) -> Vec<FieldCell> {
		self.dimensions.get_neighbours(field_cell, direction_set)
	}
	/// Best direction of movement from a cell, [Ordinal::Zero] at the goal and on unreachable cells
	pub fn best_direction(&self, field_cell: FieldCell) -> Ordinal {
		self.flow_field.get_ordinal(field_cell)
	}
	/// Cumulative cost of reaching the goal from a cell, `u32::MAX` when it cannot be reached
	pub fn integration_value(&self, field_cell: FieldCell) -> u32 {
		self.integration_field.get_field_cell_value(field_cell)
	}
	/// Whether `field_cell` is the goal
	pub fn is_goal(&self, field_cell: FieldCell) -> bool {
		self.goal == field_cell
	}
	/// Read-only snapshot for drawing the field, the world position of each cell alongside the 2d
	/// unit vector of its best direction
	pub fn iter_cell_vectors<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = (Vec2, Vec2)> + 'a {
		grid.iter().map(|cell| {
			(
				cell.get_world_position(),
				self.flow_field
					.get_2d_direction_unit_vector(cell.get_field_cell()),
			)
		})
	}
}

/// Handle to the field agents of a navigation entity currently follow. Publishing replaces the
/// whole field at once, readers either see the previous field or the new one
#[derive(Component, Clone, Debug, Default)]
pub struct CurrentNavigationField {
	/// The published field, `None` until the first build completes
	field: Option<Arc<NavigationField>>,
	/// Version to hand to the next build
	next_version: u64,
}

impl CurrentNavigationField {
	/// Make a completed field the current one
	pub fn publish(&mut self, field: NavigationField) {
		debug!(
			"Publishing navigation field v{} towards {:?}",
			field.get_version(),
			field.get_goal()
		);
		self.next_version = self.next_version.max(field.get_version() + 1);
		self.field = Some(Arc::new(field));
	}
	/// The current field, `None` when nothing has been published yet
	pub fn get(&self) -> Option<&Arc<NavigationField>> {
		self.field.as_ref()
	}
	/// Version of the current field
	pub fn version(&self) -> Option<u64> {
		self.field.as_ref().map(|f| f.get_version())
	}
	/// Version a newly built field should carry
	pub fn get_next_version(&self) -> u64 {
		self.next_version
	}
	/// Build a field towards `goal_world` and publish it once complete
	pub fn rebuild(
		&mut self,
		grid: &Grid,
		cost_field: &CostField,
		goal_world: Vec2,
		direction_set: DirectionSet,
	) -> Result<(), ConfigurationError> {
		let field = NavigationField::build(
			grid,
			cost_field,
			goal_world,
			direction_set,
			self.next_version,
		)?;
		self.publish(field);
		Ok(())
	}
}
