//! The components which make up a navigation entity. Spawn a [FlowFieldCrowdBundle] and point
//! [CrowdAgent]s at the resulting entity to have them walk the fields it builds
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// Source of random speeds and goals for a navigation entity
#[derive(Component, Debug)]
pub struct CrowdRng(StdRng);

impl CrowdRng {
	/// Seeded for repeatable runs, or from the OS when `seed` is `None`
	pub fn new(seed: Option<u64>) -> Self {
		match seed {
			Some(seed) => CrowdRng(StdRng::seed_from_u64(seed)),
			None => CrowdRng(StdRng::from_os_rng()),
		}
	}
	pub fn get_mut(&mut self) -> &mut StdRng {
		&mut self.0
	}
}

/// Grid, fields and bookkeeping of one crowd
#[derive(Bundle)]
pub struct FlowFieldCrowdBundle {
	/// Cells of the world the crowd walks over
	grid: Grid,
	/// Cost of entering each cell
	cost_field: CostField,
	/// Which agent stands in each cell
	occupancy: OccupancyTracker,
	/// Field the agents are following
	current_field: CurrentNavigationField,
	/// Configuration the entity was built from
	settings: CrowdSettings,
	/// Countdown to the next automatic goal
	goal_timer: GoalTimer,
	/// Random speeds and goals
	rng: CrowdRng,
}

impl FlowFieldCrowdBundle {
	/// Create a new instance of [FlowFieldCrowdBundle] with a uniform [CostField], fails if the settings are invalid
	pub fn new(settings: CrowdSettings) -> Result<Self, ConfigurationError> {
		settings.validate()?;
		let dimensions = settings.get_grid_dimensions()?;
		let grid = Grid::from_dimensions(dimensions);
		let cost_field = CostField::new(&dimensions);
		let occupancy = OccupancyTracker::new(&dimensions);
		Ok(FlowFieldCrowdBundle {
			grid,
			cost_field,
			occupancy,
			current_field: CurrentNavigationField::default(),
			goal_timer: GoalTimer::new(settings.get_goal_interval()),
			rng: CrowdRng::new(settings.get_seed()),
			settings,
		})
	}
	/// Create a new instance of [FlowFieldCrowdBundle] where the [CrowdSettings] are read from disk
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, ConfigurationError> {
		let settings = CrowdSettings::from_ron(path)?;
		FlowFieldCrowdBundle::new(settings)
	}
	/// Replace the uniform [CostField], fails if it doesn't cover the grid
	pub fn with_cost_field(mut self, cost_field: CostField) -> Result<Self, ConfigurationError> {
		cost_field.check_shape(self.grid.get_dimensions())?;
		self.cost_field = cost_field;
		Ok(self)
	}
	/// Build and publish a field towards `goal` straight away rather than waiting for the goal timer
	pub fn with_goal(mut self, goal: Vec2) -> Result<Self, ConfigurationError> {
		self.current_field.rebuild(
			&self.grid,
			&self.cost_field,
			goal,
			self.settings.get_direction_set(),
		)?;
		self.goal_timer.restart();
		Ok(self)
	}
	/// Grid the crowd moves over
	pub fn get_grid(&self) -> &Grid {
		&self.grid
	}
	/// Handle to the published field, empty until a goal is chosen
	pub fn get_current_field(&self) -> &CurrentNavigationField {
		&self.current_field
	}
}
