//! The kinds of fields used by the algorithm
//!
//! Every field is a flat array sized to the grid, a [FieldCell] `(column, row)`
//! lives at index `column + row * width`
//!

pub mod cost_field;
pub mod flow_field;
pub mod integration_field;

use crate::prelude::*;
use bevy::prelude::*;

/// Defines required access to field arrays
pub trait Field<T> {
	/// Get a reference to the flat field array
	fn get(&self) -> &[T];
	/// Number of `(columns, rows)` in the field
	fn get_dimensions(&self) -> (usize, usize);
	/// Retrieve a field cell value
	fn get_field_cell_value(&self, field_cell: FieldCell) -> T;
	/// Set a field cell to a value
	fn set_field_cell_value(&mut self, value: T, field_cell: FieldCell);
}

/// Flat index of a `field_cell` within a field of `(width, height)`, panics when out of bounds as that
/// means a cell from a different grid has been mixed in
pub(crate) fn flat_index(field_cell: FieldCell, width: usize, height: usize) -> usize {
	if field_cell.get_column() >= width || field_cell.get_row() >= height {
		panic!(
			"Field cell index out of bounds. Asked for column {}, row {}, field has {} columns and {} rows",
			field_cell.get_column(),
			field_cell.get_row(),
			width,
			height
		)
	}
	field_cell.get_column() + field_cell.get_row() * width
}

/// ID of a cell within a field
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct FieldCell((usize, usize));

impl FieldCell {
	/// Create a new instance of [FieldCell]
	pub fn new(column: usize, row: usize) -> Self {
		FieldCell((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the column
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the row
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
	/// Get the neighbouring cell in the direction of `ordinal` if it lies within a field of `(width, height)`
	pub fn get_neighbour(&self, ordinal: Ordinal, width: usize, height: usize) -> Option<FieldCell> {
		if ordinal == Ordinal::Zero {
			return None;
		}
		let (dx, dy) = ordinal.offset();
		let column = self.get_column() as i64 + dx as i64;
		let row = self.get_row() as i64 + dy as i64;
		if column < 0 || row < 0 || column >= width as i64 || row >= height as i64 {
			None
		} else {
			Some(FieldCell::new(column as usize, row as usize))
		}
	}
	/// Get the neighbours of the cell for each direction in `ordinals`, in that order, skipping any which fall outside a field of `(width, height)`
	pub fn get_neighbours(
		&self,
		ordinals: &[Ordinal],
		width: usize,
		height: usize,
	) -> Vec<FieldCell> {
		ordinals
			.iter()
			.filter_map(|ord| self.get_neighbour(*ord, width, height))
			.collect()
	}
}
