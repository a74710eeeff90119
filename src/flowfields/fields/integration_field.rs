//! The IntegrationField contains a flat array of 32-bit values and it uses a [CostField] to
//! produce a cumulative cost of reaching the goal.
//!
//! When a new goal needs to be processed the field is reset to `u32::MAX` and the cell containing
//! the goal is set to `0`. A wavefront expands from the goal calculating the field values:
//!
//! 1. Pop the next cell from the front of a FIFO queue (initially just the goal)
//! 2. Find its valid orthogonal neighbours (North, East, South, West, when not against a boundary)
//! 3. For each neighbour lookup its `CostField` value and add it to the integration cost of the popped cell
//! 4. If the result is cheaper than what the neighbour already holds store it and push the neighbour onto the queue
//! 5. Repeat until the queue is empty
//!
//! Propagation only ever uses orthogonal neighbours so with a uniform cost field each value is the
//! Manhattan distance to the goal, this produces a diamond-like pattern as the wave expands:
//!
//! ```text
//!  _____________________________
//! |     |     |     |     |     |
//! |  4  |  3  |  2  |  3  |  4  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  2  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  2  |  1  |  0  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  3  |  2  |  1  |  2  |  3  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  4  |  3  |  2  |  3  |  4  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Impassable cells (`255`) are never pushed so the wave flows around those areas and they keep the
//! `u32::MAX` unreachable marker, as does any cell walled off from the goal. When the `CostField`
//! uses a range of values, such as a steep hill, a cell may be improved and re-queued after it was
//! first reached so the final values are always the cheapest route.
//!

use std::collections::VecDeque;

use crate::prelude::*;

#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationField {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Flat array of cumulative costs indexed by `column + row * width`
	values: Vec<u32>,
}

impl Field<u32> for IntegrationField {
	/// Get a reference to the field array
	fn get(&self) -> &[u32] {
		&self.values
	}
	fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	/// Retrieve a field cell value
	fn get_field_cell_value(&self, field_cell: FieldCell) -> u32 {
		self.values[flat_index(field_cell, self.width, self.height)]
	}
	/// Set a field cell to a value
	fn set_field_cell_value(&mut self, value: u32, field_cell: FieldCell) {
		let index = flat_index(field_cell, self.width, self.height);
		self.values[index] = value;
	}
}

impl IntegrationField {
	/// Creates a new [IntegrationField] where all cells are set to `u32::MAX` apart from the `goal` which is set to `0`
	pub fn new(dimensions: &GridDimensions, goal: FieldCell) -> Self {
		let mut field = IntegrationField {
			width: dimensions.get_width(),
			height: dimensions.get_height(),
			values: vec![UNREACHABLE; dimensions.get_cell_count()],
		};
		field.set_field_cell_value(0, goal);
		field
	}
	/// Reset all the cells of the [IntegrationField] to `u32::MAX` apart from the `goal` which is the starting point of calculating the field and is set to `0`
	pub fn reset(&mut self, goal: FieldCell) {
		self.values.fill(UNREACHABLE);
		self.set_field_cell_value(0, goal);
	}
	/// Whether the wavefront reached the cell
	pub fn is_reachable(&self, field_cell: FieldCell) -> bool {
		self.get_field_cell_value(field_cell) != UNREACHABLE
	}
	/// Number of cells the wavefront reached, including the goal
	pub fn get_reachable_count(&self) -> usize {
		self.values.iter().filter(|v| **v != UNREACHABLE).count()
	}
	/// From the `goal` iterate over successive orthogonal neighbours and calculate the field values from the `cost_field`
	pub fn calculate_field(&mut self, goal: FieldCell, cost_field: &CostField) {
		// further positions to process
		let mut queue: VecDeque<FieldCell> = VecDeque::new();
		queue.push_back(goal);
		while let Some(cell) = queue.pop_front() {
			let prev_int_cost = self.get_field_cell_value(cell);
			for n in cell.get_neighbours(Ordinal::orthogonal(), self.width, self.height) {
				let cell_cost = cost_field.cost_of(n);
				// ignore impassable cells
				if cell_cost == IMPASSABLE_COST {
					continue;
				}
				// don't overwrite an int cell with a better cost
				let int_cost = prev_int_cost.saturating_add(cell_cost as u32);
				if int_cost < self.get_field_cell_value(n) {
					self.set_field_cell_value(int_cost, n);
					queue.push_back(n);
				}
			}
		}
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	use bevy::prelude::Vec2;

	fn dims(width: usize, height: usize) -> GridDimensions {
		GridDimensions::new(width, height, 1.0, Vec2::ZERO).unwrap()
	}
	/// Lay out a field row by row from the top of the grid so tables read like the grid
	fn rows_top_down(field: &IntegrationField) -> Vec<Vec<u32>> {
		let (width, height) = field.get_dimensions();
		(0..height).rev().map(|row| {
			(0..width).map(|column| field.get_field_cell_value(FieldCell::new(column, row))).collect()
		}).collect()
	}

	/// Calculate integration field from a uniform cost field with a source in the centre
	#[test]
	fn basic_field() {
		let dimensions = dims(5, 5);
		let cost_field = CostField::new(&dimensions);
		let goal = FieldCell::new(2, 2);
		let mut integration_field = IntegrationField::new(&dimensions, goal);
		integration_field.calculate_field(goal, &cost_field);

		let actual = vec![
			vec![4, 3, 2, 3, 4],
			vec![3, 2, 1, 2, 3],
			vec![2, 1, 0, 1, 2],
			vec![3, 2, 1, 2, 3],
			vec![4, 3, 2, 3, 4],
		];
		assert_eq!(actual, rows_top_down(&integration_field));
	}
	/// Calculate integration field around impassable cells
	#[test]
	fn field_with_walls() {
		//  _______________
		// |__|__|__|__|__|
		// |__|x_|x_|x_|__|
		// |__|__|G_|x_|__|
		// |__|__|__|x_|__|
		// |__|__|__|__|__|
		let dimensions = dims(5, 5);
		let mut cost_field = CostField::new(&dimensions);
		cost_field.set_cost(FieldCell::new(1, 3), 255);
		cost_field.set_cost(FieldCell::new(2, 3), 255);
		cost_field.set_cost(FieldCell::new(3, 3), 255);
		cost_field.set_cost(FieldCell::new(3, 2), 255);
		cost_field.set_cost(FieldCell::new(3, 1), 255);
		let goal = FieldCell::new(2, 2);
		let mut integration_field = IntegrationField::new(&dimensions, goal);
		integration_field.calculate_field(goal, &cost_field);

		let m = UNREACHABLE;
		let actual = vec![
			vec![4, 5, 6, 7, 8],
			vec![3, m, m, m, 7],
			vec![2, 1, 0, m, 6],
			vec![3, 2, 1, m, 5],
			vec![4, 3, 2, 3, 4],
		];
		assert_eq!(actual, rows_top_down(&integration_field));
	}
	/// A cell enclosed by walls is never reached
	#[test]
	fn isolated_cell_unreachable() {
		let dimensions = dims(5, 5);
		let mut cost_field = CostField::new(&dimensions);
		// box in the bottom left corner
		cost_field.set_cost(FieldCell::new(1, 0), 255);
		cost_field.set_cost(FieldCell::new(0, 1), 255);
		cost_field.set_cost(FieldCell::new(1, 1), 255);
		let goal = FieldCell::new(4, 4);
		let mut integration_field = IntegrationField::new(&dimensions, goal);
		integration_field.calculate_field(goal, &cost_field);
		assert!(!integration_field.is_reachable(FieldCell::new(0, 0)));
		assert!(!integration_field.is_reachable(FieldCell::new(1, 1)));
		assert_eq!(21, integration_field.get_reachable_count());
	}
	/// An expensive cell is routed around when a cheaper path exists
	#[test]
	fn expensive_cell_is_avoided() {
		//  goal at (0,1), a swamp of cost 10 at (1,1)
		//  ____________
		// |__|__|__|__|
		// |G_|~~|__|__|
		// |__|__|__|__|
		let dimensions = dims(4, 3);
		let mut cost_field = CostField::new(&dimensions);
		cost_field.set_cost(FieldCell::new(1, 1), 10);
		let goal = FieldCell::new(0, 1);
		let mut integration_field = IntegrationField::new(&dimensions, goal);
		integration_field.calculate_field(goal, &cost_field);
		let actual = vec![
			vec![1, 2, 3, 4],
			vec![0, 10, 4, 5],
			vec![1, 2, 3, 4],
		];
		assert_eq!(actual, rows_top_down(&integration_field));
	}
	/// Values are re-lowered when a cheaper route arrives after a cell was first reached
	#[test]
	fn later_cheaper_route_wins() {
		//  a single row, the goal at the west end and a cost 20 cell next to it, the only way round is
		//  through the row above
		let dimensions = dims(3, 2);
		let mut cost_field = CostField::new(&dimensions);
		cost_field.set_cost(FieldCell::new(1, 0), 20);
		let goal = FieldCell::new(0, 0);
		let mut integration_field = IntegrationField::new(&dimensions, goal);
		integration_field.calculate_field(goal, &cost_field);
		let actual = vec![
			vec![1, 2, 3],
			vec![0, 20, 4],
		];
		assert_eq!(actual, rows_top_down(&integration_field));
	}
	#[test]
	fn reset_clears_previous_goal() {
		let dimensions = dims(3, 3);
		let cost_field = CostField::new(&dimensions);
		let mut integration_field = IntegrationField::new(&dimensions, FieldCell::new(0, 0));
		integration_field.calculate_field(FieldCell::new(0, 0), &cost_field);
		integration_field.reset(FieldCell::new(2, 2));
		assert_eq!(0, integration_field.get_field_cell_value(FieldCell::new(2, 2)));
		assert_eq!(1, integration_field.get_reachable_count());
	}
}
