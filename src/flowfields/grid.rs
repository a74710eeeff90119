//! The uniform grid which every field is laid over.
//!
//! The grid origin is its bottom-left corner at `world_offset`, columns grow towards `+x` and rows
//! grow towards `+y` (or `+z` when movement happens across the x-z plane). Each cell covers a
//! square of `cell_diameter` world units:
//!
//! ```text
//!    y
//!    ^  _______________________
//!    | |(0,3)|(1,3)|(2,3)|(3,3)|
//!    | |(0,2)|(1,2)|(2,2)|(3,2)|
//!    | |(0,1)|(1,1)|(2,1)|(3,1)|
//!    | |(0,0)|(1,0)|(2,0)|(3,0)|
//!    o ------------------------> x
//!  world_offset
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::Rng;

/// Size and placement of a grid in the world
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridDimensions {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// World units spanned by a single cell
	cell_diameter: f32,
	/// World position of the bottom-left corner of the grid
	world_offset: Vec2,
}

impl GridDimensions {
	/// Create a new instance of [GridDimensions], fails if either size is zero or the diameter is not a finite positive number
	pub fn new(
		width: usize,
		height: usize,
		cell_diameter: f32,
		world_offset: Vec2,
	) -> Result<Self, ConfigurationError> {
		if width == 0 || height == 0 {
			return Err(ConfigurationError::InvalidGridSize { width, height });
		}
		if !cell_diameter.is_finite() || cell_diameter <= 0.0 {
			return Err(ConfigurationError::InvalidCellDiameter(cell_diameter));
		}
		Ok(GridDimensions {
			width,
			height,
			cell_diameter,
			world_offset,
		})
	}
	/// Number of columns
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Number of rows
	pub fn get_height(&self) -> usize {
		self.height
	}
	/// World size of one side of a cell
	pub fn get_cell_diameter(&self) -> f32 {
		self.cell_diameter
	}
	/// Half the cell diameter
	pub fn get_cell_radius(&self) -> f32 {
		self.cell_diameter / 2.0
	}
	/// World position of the bottom-left corner of the grid
	pub fn get_world_offset(&self) -> Vec2 {
		self.world_offset
	}
	/// Total number of cells
	pub fn get_cell_count(&self) -> usize {
		self.width * self.height
	}
	/// World units covered by the grid along `x` and `y`
	pub fn get_world_size(&self) -> Vec2 {
		Vec2::new(
			self.width as f32 * self.cell_diameter,
			self.height as f32 * self.cell_diameter,
		)
	}
	/// Flat index of a [FieldCell]
	pub fn get_index(&self, field_cell: FieldCell) -> usize {
		field_cell.get_column() + field_cell.get_row() * self.width
	}
	/// Whether the [FieldCell] lies inside the grid
	pub fn contains(&self, field_cell: FieldCell) -> bool {
		field_cell.get_column() < self.width && field_cell.get_row() < self.height
	}
	/// Find the [FieldCell] beneath a world position. Positions outside of the grid are clamped to the
	/// nearest edge cell so this always succeeds
	pub fn get_field_cell_from_xy(&self, position: Vec2) -> FieldCell {
		let local = (position - self.world_offset) / self.cell_diameter;
		FieldCell::new(
			clamp_to_axis(local.x, self.width),
			clamp_to_axis(local.y, self.height),
		)
	}
	/// World position of the centre of a [FieldCell]
	pub fn get_xy_from_field_cell(&self, field_cell: FieldCell) -> Vec2 {
		self.world_offset
			+ Vec2::new(
				(field_cell.get_column() as f32 + 0.5) * self.cell_diameter,
				(field_cell.get_row() as f32 + 0.5) * self.cell_diameter,
			)
	}
	/// In-bounds neighbours of a [FieldCell] in the iteration order of the [DirectionSet]
	pub fn get_neighbours(&self, field_cell: FieldCell, direction_set: DirectionSet) -> Vec<FieldCell> {
		field_cell.get_neighbours(direction_set.ordinals(), self.width, self.height)
	}
	/// A uniformly random world position which lies inside the grid
	pub fn get_random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
		let size = self.get_world_size();
		Vec2::new(
			rng.random_range(self.world_offset.x..self.world_offset.x + size.x),
			rng.random_range(self.world_offset.y..self.world_offset.y + size.y),
		)
	}
}

/// Convert a position measured in cells along one axis into a column/row index within `0..len`
fn clamp_to_axis(value: f32, len: usize) -> usize {
	// NaN fails the comparison and falls to the first cell
	if value > 0.0 {
		(value.floor() as usize).min(len - 1)
	} else {
		0
	}
}

/// A single cell of the [Grid], its world position is computed once when the grid is built
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
	/// Index of the cell
	field_cell: FieldCell,
	/// World position of the cell centre
	world_position: Vec2,
}

impl Cell {
	/// Column and row of the cell
	pub fn get_field_cell(&self) -> FieldCell {
		self.field_cell
	}
	/// World position of the centre of the cell
	pub fn get_world_position(&self) -> Vec2 {
		self.world_position
	}
}

/// Fixed size 2D array of [Cell]s with coordinate transforms between world space and grid indices.
/// Immutable once built
#[derive(Component, Clone, Debug)]
pub struct Grid {
	/// Size and placement of the grid
	dimensions: GridDimensions,
	/// Flat array of cells indexed by `column + row * width`
	cells: Vec<Cell>,
}

impl Grid {
	/// Create a new [Grid], fails with a [ConfigurationError] if either size is zero or the diameter is not a finite positive number
	pub fn new(
		width: usize,
		height: usize,
		cell_diameter: f32,
		world_offset: Vec2,
	) -> Result<Self, ConfigurationError> {
		let dimensions = GridDimensions::new(width, height, cell_diameter, world_offset)?;
		Ok(Grid::from_dimensions(dimensions))
	}
	/// Create a new [Grid] from already validated [GridDimensions]
	pub fn from_dimensions(dimensions: GridDimensions) -> Self {
		let mut cells = Vec::with_capacity(dimensions.get_cell_count());
		for row in 0..dimensions.get_height() {
			for column in 0..dimensions.get_width() {
				let field_cell = FieldCell::new(column, row);
				cells.push(Cell {
					field_cell,
					world_position: dimensions.get_xy_from_field_cell(field_cell),
				});
			}
		}
		Grid { dimensions, cells }
	}
	/// Size and placement of the grid
	pub fn get_dimensions(&self) -> &GridDimensions {
		&self.dimensions
	}
	/// Get the [Cell] of a [FieldCell], panics if the cell is not part of this grid
	pub fn get_cell(&self, field_cell: FieldCell) -> &Cell {
		&self.cells[flat_index(
			field_cell,
			self.dimensions.get_width(),
			self.dimensions.get_height(),
		)]
	}
	/// Get the [Cell] beneath a world position, clamped to the grid bounds so this never fails
	pub fn cell_at(&self, position: Vec2) -> &Cell {
		let field_cell = self.dimensions.get_field_cell_from_xy(position);
		&self.cells[self.dimensions.get_index(field_cell)]
	}
	/// In-bounds neighbours of a [FieldCell] in the iteration order of the [DirectionSet]
	pub fn neighbours_of(&self, field_cell: FieldCell, direction_set: DirectionSet) -> Vec<&Cell> {
		self.dimensions
			.get_neighbours(field_cell, direction_set)
			.into_iter()
			.map(|n| &self.cells[self.dimensions.get_index(n)])
			.collect()
	}
	/// Iterate over every [Cell] in flat index order
	pub fn iter(&self) -> impl Iterator<Item = &Cell> {
		self.cells.iter()
	}
}
