//! Useful structures and tools used by the fields
//!

use bevy::prelude::*;

/// Cost field value marking a cell as impassable
pub const IMPASSABLE_COST: u8 = 255;
/// Integration field value of a cell the wavefront has not (or cannot) reach
pub const UNREACHABLE: u32 = u32::MAX;

/// Convenience way of accessing the 4 sides of a grid cell in [crate::prelude::IntegrationField] and the 8 directions
/// of movement in [crate::prelude::FlowField].
///
/// The grid grows from its bottom-left corner, `North` is towards `+y` and `East` is towards `+x`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Reflect)]
pub enum Ordinal {
	North,
	East,
	South,
	West,
	NorthEast,
	SouthEast,
	SouthWest,
	NorthWest,
	/// Special case, the goal cell or a cell with no route to the goal
	#[default]
	Zero,
}

/// The orthogonal directions in iteration order
const ORTHOGONAL: [Ordinal; 4] = [Ordinal::North, Ordinal::East, Ordinal::South, Ordinal::West];
/// Every direction in iteration order, orthogonals first then diagonals clockwise from north-east
const ALL: [Ordinal; 8] = [
	Ordinal::North,
	Ordinal::East,
	Ordinal::South,
	Ordinal::West,
	Ordinal::NorthEast,
	Ordinal::SouthEast,
	Ordinal::SouthWest,
	Ordinal::NorthWest,
];

impl Ordinal {
	/// All 8 directions of movement regardless of which [DirectionSet] is in use
	pub fn all() -> &'static [Ordinal; 8] {
		&ALL
	}
	/// The 4 orthogonal directions
	pub fn orthogonal() -> &'static [Ordinal; 4] {
		&ORTHOGONAL
	}
	/// Offset in `(column, row)` grid steps
	pub fn offset(&self) -> (i32, i32) {
		match self {
			Ordinal::North => (0, 1),
			Ordinal::East => (1, 0),
			Ordinal::South => (0, -1),
			Ordinal::West => (-1, 0),
			Ordinal::NorthEast => (1, 1),
			Ordinal::SouthEast => (1, -1),
			Ordinal::SouthWest => (-1, -1),
			Ordinal::NorthWest => (-1, 1),
			Ordinal::Zero => (0, 0),
		}
	}
	/// Whether the direction is one of the 4 diagonals
	pub fn is_diagonal(&self) -> bool {
		matches!(
			self,
			Ordinal::NorthEast | Ordinal::SouthEast | Ordinal::SouthWest | Ordinal::NorthWest
		)
	}
	/// The two orthogonal directions which flank a diagonal, i.e `NorthEast` is flanked by `North` and `East`. Returns [None] for orthogonals and `Zero`
	pub fn flanking(&self) -> Option<(Ordinal, Ordinal)> {
		match self {
			Ordinal::NorthEast => Some((Ordinal::North, Ordinal::East)),
			Ordinal::SouthEast => Some((Ordinal::South, Ordinal::East)),
			Ordinal::SouthWest => Some((Ordinal::South, Ordinal::West)),
			Ordinal::NorthWest => Some((Ordinal::North, Ordinal::West)),
			_ => None,
		}
	}
	/// Returns the opposite [Ordinal] of the current
	pub fn inverse(&self) -> Ordinal {
		match self {
			Ordinal::North => Ordinal::South,
			Ordinal::East => Ordinal::West,
			Ordinal::South => Ordinal::North,
			Ordinal::West => Ordinal::East,
			Ordinal::NorthEast => Ordinal::SouthWest,
			Ordinal::SouthEast => Ordinal::NorthWest,
			Ordinal::SouthWest => Ordinal::NorthEast,
			Ordinal::NorthWest => Ordinal::SouthEast,
			Ordinal::Zero => Ordinal::Zero,
		}
	}
	/// For two cells next to each other it can be useful to find the [Ordinal] point from the `source` to the `target`. Returns [None] if the cells are not adjacent
	pub fn cell_to_cell_direction(target: (usize, usize), source: (usize, usize)) -> Option<Self> {
		let direction = (
			target.0 as i64 - source.0 as i64,
			target.1 as i64 - source.1 as i64,
		);
		match direction {
			(0, 1) => Some(Ordinal::North),
			(1, 1) => Some(Ordinal::NorthEast),
			(1, 0) => Some(Ordinal::East),
			(1, -1) => Some(Ordinal::SouthEast),
			(0, -1) => Some(Ordinal::South),
			(-1, -1) => Some(Ordinal::SouthWest),
			(-1, 0) => Some(Ordinal::West),
			(-1, 1) => Some(Ordinal::NorthWest),
			_ => None,
		}
	}
	/// Unit vector in 2d space of the direction, diagonals are normalised
	pub fn to_2d_unit_vector(&self) -> Vec2 {
		let (x, y) = self.offset();
		Vec2::new(x as f32, y as f32).normalize_or_zero()
	}
	/// Unit vector in 3d space of the direction across the x-z plane, the grid `y` axis runs along `z`
	pub fn to_3d_unit_vector(&self) -> Vec3 {
		let v = self.to_2d_unit_vector();
		Vec3::new(v.x, 0.0, v.y)
	}
}

/// Which neighbours are considered when deriving a direction of movement
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Reflect)]
pub enum DirectionSet {
	/// North, East, South, West
	Orthogonal,
	/// Orthogonals plus the diagonals
	#[default]
	All,
}

impl DirectionSet {
	/// The directions of the set in iteration order
	pub fn ordinals(&self) -> &'static [Ordinal] {
		match self {
			DirectionSet::Orthogonal => &ORTHOGONAL,
			DirectionSet::All => &ALL,
		}
	}
}
