//! The CostField contains a flat array of 8-bit values, one per grid cell. The values correspond to
//! the cost of entering that cell. A value of 1 is the default and the cheapest, a value of 255 is a special case that
//! indicates that the field cell is strictly forbidden from being used in a pathing calculation
//! (effectively saying there is a wall or cliff/impassable terrain there). Any other value indicates
//! a harder cost of movement which could be from a slope or marshland or others. A cost of 0 is never
//! stored, entering a cell must always raise the cumulative cost or the cell could not point anywhere.
//!
//! The field is static until the terrain changes, when it does the whole
//! [crate::prelude::NavigationField] gets rebuilt. An example cost field may look:
//!
//! ```text
//!  _____________________________
//! |  1  |  1  |  1  |  1  |  1  |
//! |_____|_____|_____|_____|_____|
//! |  1  | 255 | 255 |  1  |  1  |
//! |_____|_____|_____|_____|_____|
//! |  1  |  1  |  1  |  1  |  1  |
//! |_____|_____|_____|_____|_____|
//! |  1  |  1  |  1  | 56  |  1  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! When loading from a CSV file or an image the first line/pixel row is the top of the grid (the
//! highest row index), mirroring how the data looks on screen.
//!

use crate::prelude::*;
use bevy::prelude::*;

#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CostField {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Flat array of costs indexed by `column + row * width`
	costs: Vec<u8>,
}

impl Field<u8> for CostField {
	/// Get a reference to the field array
	fn get(&self) -> &[u8] {
		&self.costs
	}
	fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	/// Retrieve a field cell value
	fn get_field_cell_value(&self, field_cell: FieldCell) -> u8 {
		self.costs[flat_index(field_cell, self.width, self.height)]
	}
	/// Set a field cell to a value
	fn set_field_cell_value(&mut self, value: u8, field_cell: FieldCell) {
		let index = flat_index(field_cell, self.width, self.height);
		self.costs[index] = value;
	}
}

impl CostField {
	/// Create a uniform [CostField] where every cell costs `1`
	pub fn new(dimensions: &GridDimensions) -> Self {
		CostField {
			width: dimensions.get_width(),
			height: dimensions.get_height(),
			costs: vec![1; dimensions.get_cell_count()],
		}
	}
	/// Create a [CostField] from a flat array of costs, fails if the length of `costs` doesn't match
	/// the grid or any cost is `0`
	pub fn from_costs(dimensions: &GridDimensions, costs: Vec<u8>) -> Result<Self, ConfigurationError> {
		if costs.len() != dimensions.get_cell_count() {
			return Err(ConfigurationError::FieldShape {
				expected: (dimensions.get_width(), dimensions.get_height()),
				found: (costs.len(), 1),
			});
		}
		let field = CostField {
			width: dimensions.get_width(),
			height: dimensions.get_height(),
			costs,
		};
		field.check_costs()?;
		Ok(field)
	}
	/// Cost of entering a cell
	pub fn cost_of(&self, field_cell: FieldCell) -> u8 {
		self.get_field_cell_value(field_cell)
	}
	/// Set the cost of entering a cell, `255` makes it impassable and `0` is raised to `1`
	pub fn set_cost(&mut self, field_cell: FieldCell, cost: u8) {
		self.set_field_cell_value(cost.max(1), field_cell);
	}
	/// Whether the cell can never be entered
	pub fn is_impassable(&self, field_cell: FieldCell) -> bool {
		self.cost_of(field_cell) == IMPASSABLE_COST
	}
	/// Ensure the field covers exactly the grid described by `dimensions`
	pub(crate) fn check_shape(&self, dimensions: &GridDimensions) -> Result<(), ConfigurationError> {
		let expected = (dimensions.get_width(), dimensions.get_height());
		if (self.width, self.height) != expected || self.costs.len() != dimensions.get_cell_count()
		{
			return Err(ConfigurationError::FieldShape {
				expected,
				found: (self.width, self.height),
			});
		}
		Ok(())
	}
	/// Ensure no cell is free to enter
	fn check_costs(&self) -> Result<(), ConfigurationError> {
		match self.costs.iter().position(|c| *c == 0) {
			Some(index) => Err(ConfigurationError::InvalidCost {
				column: index % self.width,
				row: index / self.width,
				value: "0".to_string(),
			}),
			None => Ok(()),
		}
	}
	/// From a `ron` file generate the [CostField]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str, dimensions: &GridDimensions) -> Result<Self, ConfigurationError> {
		let file = std::fs::File::open(path)?;
		let field: CostField = ron::de::from_reader(file)?;
		field.check_shape(dimensions)?;
		field.check_costs()?;
		Ok(field)
	}
	/// From a CSV file of comma separated costs generate the [CostField], the file needs one line per
	/// row with the first line being the top of the grid
	#[cfg(feature = "csv")]
	pub fn from_csv(path: &str, dimensions: &GridDimensions) -> Result<Self, ConfigurationError> {
		let data = std::fs::File::open(path)?;
		let mut rdr = csv::ReaderBuilder::new()
			.has_headers(false)
			.from_reader(data);
		let records = rdr.records().collect::<Result<Vec<_>, csv::Error>>()?;
		let width = records.first().map(|r| r.len()).unwrap_or(0);
		if records.len() != dimensions.get_height()
			|| records.iter().any(|r| r.len() != dimensions.get_width())
		{
			return Err(ConfigurationError::FieldShape {
				expected: (dimensions.get_width(), dimensions.get_height()),
				found: (width, records.len()),
			});
		}
		let mut field = CostField::new(dimensions);
		for (line, record) in records.iter().enumerate() {
			let row = dimensions.get_height() - 1 - line;
			for (column, value) in record.iter().enumerate() {
				let cost = match value.trim().parse::<u8>() {
					Ok(cost) if cost > 0 => cost,
					_ => {
						return Err(ConfigurationError::InvalidCost {
							column,
							row,
							value: value.to_string(),
						})
					}
				};
				field.set_cost(FieldCell::new(column, row), cost);
			}
		}
		Ok(field)
	}
	/// Create a [CostField] from a greyscale image where each pixel represents the cost of a
	/// cell. White is the cheapest (`1`) and black is impassable (`255`)
	#[cfg(feature = "heightmap")]
	pub fn from_heightmap(path: &str, dimensions: &GridDimensions) -> Result<Self, ConfigurationError> {
		use photon_rs::native::open_image;
		let img = open_image(path).map_err(|e| ConfigurationError::Heightmap(e.to_string()))?;
		let img_width = img.get_width() as usize;
		let img_height = img.get_height() as usize;
		if img_width != dimensions.get_width() || img_height != dimensions.get_height() {
			return Err(ConfigurationError::FieldShape {
				expected: (dimensions.get_width(), dimensions.get_height()),
				found: (img_width, img_height),
			});
		}
		// raw pixels start at the top left of the image and come in sets of 4, Red, Green, Blue, Alpha
		let raw_pixels = img.get_raw_pixels();
		let chunk_size = if raw_pixels.len() == img_width * img_height * 4 {
			4
		} else {
			3
		};
		let mut field = CostField::new(dimensions);
		for (i, px) in raw_pixels.chunks(chunk_size).enumerate() {
			let column = i % img_width;
			let row = img_height - 1 - i / img_width;
			// careful of u8 overflow
			let colour_avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
			let value = (255 - colour_avg as u8).clamp(1, 255);
			field.set_cost(FieldCell::new(column, row), value);
		}
		Ok(field)
	}
}
