//! Configuration of a crowd, the grid it walks over and how its agents move
//!
//! Settings can be written in code with the `with_*` builders or loaded from a `ron` file (with the
//! `ron` feature):
//!
//! ```text
//! (
//!     grid_size: (64, 64),
//!     world_offset: (-32.0, -32.0),
//!     cell_diameter: 1.0,
//!     direction_set: All,
//!     congestion_damping: 1.6,
//!     speed_range: (1.0, 3.0),
//!     occupancy_policy: VacateOnExit,
//!     goal_interval: Some(10.0),
//!     movement_plane: Xy,
//!     seed: None,
//! )
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// The world plane agents move across, the grid is laid over it
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum MovementPlane {
	/// Grid `x` and `y` are world `x` and `y`, for 2d sprites
	#[default]
	Xy,
	/// Grid `x` and `y` are world `x` and `z`, for 3d ground planes
	Xz,
}

impl MovementPlane {
	/// Project a world translation onto the grid plane
	pub fn to_grid(&self, translation: Vec3) -> Vec2 {
		match self {
			MovementPlane::Xy => translation.truncate(),
			MovementPlane::Xz => Vec2::new(translation.x, translation.z),
		}
	}
	/// Write a grid position into a world translation, the out of plane axis is left untouched
	pub fn to_world(&self, position: Vec2, translation: Vec3) -> Vec3 {
		match self {
			MovementPlane::Xy => Vec3::new(position.x, position.y, translation.z),
			MovementPlane::Xz => Vec3::new(position.x, translation.y, position.y),
		}
	}
}

/// Everything needed to build a navigation entity
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CrowdSettings {
	/// Number of `(columns, rows)`
	grid_size: (usize, usize),
	/// World position of the bottom-left corner of the grid
	world_offset: (f32, f32),
	/// World units spanned by a single cell
	cell_diameter: f32,
	/// Directions agents may move in
	direction_set: DirectionSet,
	/// Divisor applied to speed for each congested neighbour
	congestion_damping: f32,
	/// Inclusive `(min, max)` base speed in world units per second
	speed_range: (f32, f32),
	/// How cells are released as agents leave them
	occupancy_policy: OccupancyPolicy,
	/// Seconds between automatic goal changes, `None` leaves goal changes to events
	goal_interval: Option<f32>,
	/// World plane the grid lies on
	movement_plane: MovementPlane,
	/// Seed of the random numbers used for speeds and goals, `None` seeds from the OS
	seed: Option<u64>,
}

impl Default for CrowdSettings {
	fn default() -> Self {
		CrowdSettings {
			grid_size: (32, 32),
			world_offset: (0.0, 0.0),
			cell_diameter: 1.0,
			direction_set: DirectionSet::All,
			congestion_damping: 1.6,
			speed_range: (1.0, 3.0),
			occupancy_policy: OccupancyPolicy::default(),
			goal_interval: Some(10.0),
			movement_plane: MovementPlane::Xy,
			seed: None,
		}
	}
}

impl CrowdSettings {
	/// Default settings over a grid of `width` by `height` cells
	pub fn new(width: usize, height: usize) -> Self {
		CrowdSettings {
			grid_size: (width, height),
			..Default::default()
		}
	}
	pub fn with_world_offset(mut self, world_offset: Vec2) -> Self {
		self.world_offset = (world_offset.x, world_offset.y);
		self
	}
	pub fn with_cell_diameter(mut self, cell_diameter: f32) -> Self {
		self.cell_diameter = cell_diameter;
		self
	}
	pub fn with_direction_set(mut self, direction_set: DirectionSet) -> Self {
		self.direction_set = direction_set;
		self
	}
	pub fn with_congestion_damping(mut self, congestion_damping: f32) -> Self {
		self.congestion_damping = congestion_damping;
		self
	}
	pub fn with_speed_range(mut self, min: f32, max: f32) -> Self {
		self.speed_range = (min, max);
		self
	}
	pub fn with_occupancy_policy(mut self, occupancy_policy: OccupancyPolicy) -> Self {
		self.occupancy_policy = occupancy_policy;
		self
	}
	pub fn with_goal_interval(mut self, goal_interval: Option<f32>) -> Self {
		self.goal_interval = goal_interval;
		self
	}
	pub fn with_movement_plane(mut self, movement_plane: MovementPlane) -> Self {
		self.movement_plane = movement_plane;
		self
	}
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}
	pub fn get_direction_set(&self) -> DirectionSet {
		self.direction_set
	}
	pub fn get_goal_interval(&self) -> Option<f32> {
		self.goal_interval
	}
	pub fn get_movement_plane(&self) -> MovementPlane {
		self.movement_plane
	}
	pub fn get_seed(&self) -> Option<u64> {
		self.seed
	}
	/// Validated size and placement of the grid
	pub fn get_grid_dimensions(&self) -> Result<GridDimensions, ConfigurationError> {
		GridDimensions::new(
			self.grid_size.0,
			self.grid_size.1,
			self.cell_diameter,
			Vec2::new(self.world_offset.0, self.world_offset.1),
		)
	}
	/// Validated movement tuning
	pub fn get_motion_settings(&self) -> Result<MotionSettings, ConfigurationError> {
		MotionSettings::new(
			self.speed_range,
			self.congestion_damping,
			self.occupancy_policy,
		)
	}
	/// Check every setting, returning the first problem found
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		self.get_grid_dimensions()?;
		self.get_motion_settings()?;
		if let Some(interval) = self.goal_interval {
			if !interval.is_finite() || interval <= 0.0 {
				return Err(ConfigurationError::InvalidGoalInterval(interval));
			}
		}
		Ok(())
	}
	/// Load and validate settings from a `ron` file
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, ConfigurationError> {
		let file = std::fs::File::open(path)?;
		let settings: CrowdSettings = ron::de::from_reader(file)?;
		settings.validate()?;
		Ok(settings)
	}
}
