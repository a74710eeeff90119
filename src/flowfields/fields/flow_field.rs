//! A [FlowField] holds one [Ordinal] per grid cell, the best direction of movement from that cell
//! towards the goal. A character controller reads the direction of the cell it's standing in and
//! moves that way.
//!
//! Each direction is derived from an [IntegrationField] by comparing a cell's integration cost
//! against its neighbours and pointing at the cheapest one, the first of equally cheap neighbours
//! in `N, E, S, W, NE, SE, SW, NW` order wins:
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! | SE  | SE  |  S  | SW  | SW  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | SE  | SE  |  S  | SW  | SW  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  E  |  E  |  G  |  W  |  W  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | NE  | NE  |  N  | NW  | NW  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | NE  | NE  |  N  | NW  | NW  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! The goal and any cell the wavefront never reached are left as [Ordinal::Zero].
//!

use crate::prelude::*;
use bevy::prelude::*;

#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Flat array of directions indexed by `column + row * width`
	directions: Vec<Ordinal>,
}

impl Field<Ordinal> for FlowField {
	/// Get a reference to the field array
	fn get(&self) -> &[Ordinal] {
		&self.directions
	}
	fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	/// Retrieve a field cell value
	fn get_field_cell_value(&self, field_cell: FieldCell) -> Ordinal {
		self.directions[flat_index(field_cell, self.width, self.height)]
	}
	/// Set a field cell to a value
	fn set_field_cell_value(&mut self, value: Ordinal, field_cell: FieldCell) {
		let index = flat_index(field_cell, self.width, self.height);
		self.directions[index] = value;
	}
}

impl FlowField {
	/// Create a new [FlowField] where every cell is [Ordinal::Zero]
	pub fn new(dimensions: &GridDimensions) -> Self {
		FlowField {
			width: dimensions.get_width(),
			height: dimensions.get_height(),
			directions: vec![Ordinal::Zero; dimensions.get_cell_count()],
		}
	}
	/// Calculate the [FlowField] from an [IntegrationField]. Each reachable cell points at the
	/// neighbour from `direction_set` with the strictly lowest integration cost which is also lower
	/// than its own, ties go to the first neighbour found in iteration order
	pub fn calculate(&mut self, integration_field: &IntegrationField, direction_set: DirectionSet) {
		for row in 0..self.height {
			for column in 0..self.width {
				let field_cell = FieldCell::new(column, row);
				let current_cost = integration_field.get_field_cell_value(field_cell);
				// unreachable and goal cells have nowhere better to go
				if current_cost == UNREACHABLE || current_cost == 0 {
					self.set_field_cell_value(Ordinal::Zero, field_cell);
					continue;
				}
				let mut cheapest_value = current_cost;
				let mut cheapest_ord = Ordinal::Zero;
				for ord in direction_set.ordinals() {
					let Some(n) = field_cell.get_neighbour(*ord, self.width, self.height) else {
						continue;
					};
					// a diagonal flanked by two unreachable cells would clip the corner of a wall
					//   X n <- ignore diagonal from o
					//   o X
					if is_blocked_diagonal(field_cell, *ord, integration_field) {
						continue;
					}
					let neighbour_cost = integration_field.get_field_cell_value(n);
					if neighbour_cost < cheapest_value {
						cheapest_value = neighbour_cost;
						cheapest_ord = *ord;
					}
				}
				self.set_field_cell_value(cheapest_ord, field_cell);
			}
		}
	}
	/// Get the best direction of movement from a cell
	pub fn get_ordinal(&self, field_cell: FieldCell) -> Ordinal {
		self.get_field_cell_value(field_cell)
	}
	/// Reading the direction of a cell obtain a unit vector in 2d space
	pub fn get_2d_direction_unit_vector(&self, field_cell: FieldCell) -> Vec2 {
		self.get_ordinal(field_cell).to_2d_unit_vector()
	}
	/// Reading the direction of a cell obtain a unit vector in 3d space across the x-z plane
	pub fn get_3d_direction_unit_vector(&self, field_cell: FieldCell) -> Vec3 {
		self.get_ordinal(field_cell).to_3d_unit_vector()
	}
}

/// Whether moving from `field_cell` along the diagonal `ordinal` would squeeze between two unreachable orthogonal neighbours
fn is_blocked_diagonal(
	field_cell: FieldCell,
	ordinal: Ordinal,
	integration_field: &IntegrationField,
) -> bool {
	let Some((a, b)) = ordinal.flanking() else {
		return false;
	};
	let (width, height) = integration_field.get_dimensions();
	match (
		field_cell.get_neighbour(a, width, height),
		field_cell.get_neighbour(b, width, height),
	) {
		(Some(a), Some(b)) => {
			!integration_field.is_reachable(a) && !integration_field.is_reachable(b)
		}
		_ => false,
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;

	fn dims(width: usize, height: usize) -> GridDimensions {
		GridDimensions::new(width, height, 1.0, Vec2::ZERO).unwrap()
	}
	fn build(dimensions: &GridDimensions, cost_field: &CostField, goal: FieldCell, set: DirectionSet) -> (IntegrationField, FlowField) {
		let mut integration_field = IntegrationField::new(dimensions, goal);
		integration_field.calculate_field(goal, cost_field);
		let mut flow_field = FlowField::new(dimensions);
		flow_field.calculate(&integration_field, set);
		(integration_field, flow_field)
	}
	/// Lay out a field row by row from the top of the grid so tables read like the grid
	fn rows_top_down(field: &FlowField) -> Vec<Vec<Ordinal>> {
		let (width, height) = field.get_dimensions();
		(0..height).rev().map(|row| {
			(0..width).map(|column| field.get_ordinal(FieldCell::new(column, row))).collect()
		}).collect()
	}

	#[test]
	fn default_init() {
		let flow_field = FlowField::new(&dims(3, 3));
		assert!(flow_field.get().iter().all(|o| *o == Ordinal::Zero));
	}
	/// Uniform field with the goal in the centre, every cell points inwards
	#[test]
	fn calculate_flow_centre_goal() {
		use Ordinal::*;
		let dimensions = dims(5, 5);
		let cost_field = CostField::new(&dimensions);
		let (_, flow_field) = build(&dimensions, &cost_field, FieldCell::new(2, 2), DirectionSet::All);
		let actual = vec![
			vec![SouthEast, SouthEast, South, SouthWest, SouthWest],
			vec![SouthEast, SouthEast, South, SouthWest, SouthWest],
			vec![East, East, Zero, West, West],
			vec![NorthEast, NorthEast, North, NorthWest, NorthWest],
			vec![NorthEast, NorthEast, North, NorthWest, NorthWest],
		];
		assert_eq!(actual, rows_top_down(&flow_field));
	}
	/// Restricting the directions to orthogonals never produces a diagonal
	#[test]
	fn calculate_flow_orthogonal_only() {
		use Ordinal::*;
		let dimensions = dims(3, 3);
		let cost_field = CostField::new(&dimensions);
		let (_, flow_field) = build(&dimensions, &cost_field, FieldCell::new(1, 1), DirectionSet::Orthogonal);
		let actual = vec![
			vec![East, South, South],
			vec![East, Zero, West],
			vec![North, North, North],
		];
		assert_eq!(actual, rows_top_down(&flow_field));
	}
	/// Every cell along the western edge is a goal, everything flows west
	#[test]
	fn calculate_flow_target_west() {
		let dimensions = dims(6, 4);
		let cost_field = CostField::new(&dimensions);
		let goal = FieldCell::new(0, 2);
		let (_, flow_field) = build(&dimensions, &cost_field, goal, DirectionSet::All);
		for row in 0..4 {
			for column in 1..6 {
				let ord = flow_field.get_ordinal(FieldCell::new(column, row));
				assert!(
					matches!(ord, Ordinal::West | Ordinal::NorthWest | Ordinal::SouthWest | Ordinal::North | Ordinal::South),
					"cell ({}, {}) points {:?}", column, row, ord
				);
			}
		}
		assert_eq!(Ordinal::West, flow_field.get_ordinal(FieldCell::new(5, 2)));
	}
	/// Diagonals that would clip the corner of two walls are not taken
	#[test]
	fn blocked_diagonal_not_taken() {
		//  goal in the top left, walls flank the diagonal from (1,1)
		//  _________
		// |G_|x_|__|
		// |x_|o_|__|
		// |__|__|__|
		let dimensions = dims(3, 3);
		let mut cost_field = CostField::new(&dimensions);
		cost_field.set_cost(FieldCell::new(1, 2), 255);
		cost_field.set_cost(FieldCell::new(0, 1), 255);
		let (integration_field, flow_field) = build(&dimensions, &cost_field, FieldCell::new(0, 2), DirectionSet::All);
		// the goal is walled in entirely so nothing else is reachable
		assert_eq!(1, integration_field.get_reachable_count());
		assert_eq!(Ordinal::Zero, flow_field.get_ordinal(FieldCell::new(1, 1)));
	}
	/// A wall corner forces the flow around it rather than diagonally through it
	#[test]
	fn flows_around_wall_corner() {
		//  _____________
		// |__|__|__|__|
		// |G_|x_|__|__|
		// |x_|o_|__|__|
		// |__|__|__|__|
		let dimensions = dims(4, 4);
		let mut cost_field = CostField::new(&dimensions);
		cost_field.set_cost(FieldCell::new(1, 2), 255);
		cost_field.set_cost(FieldCell::new(0, 1), 255);
		let goal = FieldCell::new(0, 2);
		let (integration_field, flow_field) = build(&dimensions, &cost_field, goal, DirectionSet::All);
		// (1,1) is reached the long way round via the top row and down the right hand side
		assert!(integration_field.is_reachable(FieldCell::new(1, 1)));
		// the goal sits diagonally NorthWest but squeezing between the walls is not allowed
		assert_eq!(Ordinal::NorthEast, flow_field.get_ordinal(FieldCell::new(1, 1)));
	}
	#[test]
	fn unreachable_cells_are_zero() {
		let dimensions = dims(4, 1);
		let mut cost_field = CostField::new(&dimensions);
		cost_field.set_cost(FieldCell::new(1, 0), 255);
		let (_, flow_field) = build(&dimensions, &cost_field, FieldCell::new(0, 0), DirectionSet::All);
		assert_eq!(Ordinal::Zero, flow_field.get_ordinal(FieldCell::new(2, 0)));
		assert_eq!(Ordinal::Zero, flow_field.get_ordinal(FieldCell::new(3, 0)));
	}
	#[test]
	fn unit_vectors_from_cells() {
		let dimensions = dims(3, 1);
		let cost_field = CostField::new(&dimensions);
		let (_, flow_field) = build(&dimensions, &cost_field, FieldCell::new(2, 0), DirectionSet::All);
		assert_eq!(Vec2::new(1.0, 0.0), flow_field.get_2d_direction_unit_vector(FieldCell::new(0, 0)));
		assert_eq!(Vec3::new(1.0, 0.0, 0.0), flow_field.get_3d_direction_unit_vector(FieldCell::new(1, 0)));
		assert_eq!(Vec2::ZERO, flow_field.get_2d_direction_unit_vector(FieldCell::new(2, 0)));
	}
}
