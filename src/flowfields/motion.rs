//! Moves agents across the grid by following the current [NavigationField].
//!
//! Each physics step every agent:
//!
//! 1. Finds the cell beneath it
//! 2. Records that cell in the [OccupancyTracker]
//! 3. Reads the best direction of the cell, at the goal or on an unreachable cell it stays put
//! 4. Draws a base speed from the configured range
//! 5. Slows down once for every occupied neighbour heading the same way
//! 6. Moves along the direction by `speed * step_duration`
//!
//! Agents are processed one after another and occupancy changes are visible immediately, an agent
//! moved earlier in a step can slow down an agent moved later in the same step.
//!

use crate::prelude::*;
use bevy::prelude::*;
use rand::Rng;

/// Per agent navigation state, the position of the agent lives in its `Transform`
#[derive(Component, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct CrowdAgent {
	/// Entity holding the grid and field this agent navigates
	navigation_entity: Entity,
	/// Under [OccupancyPolicy::Sticky] the first cell the agent was seen in, otherwise the last cell it left
	previous_cell: Option<FieldCell>,
	/// Cell the agent was in at the last step
	current_cell: Option<FieldCell>,
	/// Multiplier of the base speed
	speed_scale: f32,
}

impl CrowdAgent {
	/// Create an agent which navigates the fields of `navigation_entity`
	pub fn new(navigation_entity: Entity) -> Self {
		CrowdAgent {
			navigation_entity,
			previous_cell: None,
			current_cell: None,
			speed_scale: 1.0,
		}
	}
	/// Scale the base speed of the agent
	pub fn with_speed_scale(mut self, speed_scale: f32) -> Self {
		self.speed_scale = speed_scale;
		self
	}
	pub fn get_navigation_entity(&self) -> Entity {
		self.navigation_entity
	}
	pub fn get_previous_cell(&self) -> Option<FieldCell> {
		self.previous_cell
	}
	pub fn get_current_cell(&self) -> Option<FieldCell> {
		self.current_cell
	}
	pub fn get_speed_scale(&self) -> f32 {
		self.speed_scale
	}
}

/// Tuning of agent movement
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSettings {
	/// Inclusive `(min, max)` world units per second an agent may move at before congestion
	speed_range: (f32, f32),
	/// Divisor applied to speed for each congested neighbour
	congestion_damping: f32,
	/// How cells are released as agents leave them
	occupancy_policy: OccupancyPolicy,
}

impl Default for MotionSettings {
	fn default() -> Self {
		MotionSettings {
			speed_range: (1.0, 3.0),
			congestion_damping: 1.6,
			occupancy_policy: OccupancyPolicy::default(),
		}
	}
}

impl MotionSettings {
	/// Create validated [MotionSettings]
	pub fn new(
		speed_range: (f32, f32),
		congestion_damping: f32,
		occupancy_policy: OccupancyPolicy,
	) -> Result<Self, ConfigurationError> {
		let (min, max) = speed_range;
		if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
			return Err(ConfigurationError::InvalidSpeedRange { min, max });
		}
		if !congestion_damping.is_finite() || congestion_damping < 1.0 {
			return Err(ConfigurationError::InvalidCongestionDamping(
				congestion_damping,
			));
		}
		Ok(MotionSettings {
			speed_range,
			congestion_damping,
			occupancy_policy,
		})
	}
	pub fn get_speed_range(&self) -> (f32, f32) {
		self.speed_range
	}
	pub fn get_congestion_damping(&self) -> f32 {
		self.congestion_damping
	}
	pub fn get_occupancy_policy(&self) -> OccupancyPolicy {
		self.occupancy_policy
	}
	/// Draw a base speed from the range
	pub fn sample_speed<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
		let (min, max) = self.speed_range;
		rng.random_range(min..=max)
	}
}

/// Divide `speed` by `damping` once for every occupied neighbour of `field_cell` (all 8 directions)
/// whose best direction matches `direction`
pub fn congestion_throttle(
	speed: f32,
	field_cell: FieldCell,
	direction: Ordinal,
	field: &NavigationField,
	occupancy: &OccupancyTracker,
	damping: f32,
) -> f32 {
	let mut throttled = speed;
	for n in field.get_neighbour_cells(field_cell, DirectionSet::All) {
		if occupancy.is_occupied(n) && field.best_direction(n) == direction {
			throttled /= damping;
		}
	}
	throttled
}

/// Advance a single agent by one step of `step_duration` seconds, returns its new position
#[allow(clippy::too_many_arguments)]
pub fn integrate_agent<R: Rng + ?Sized>(
	entity: Entity,
	agent: &mut CrowdAgent,
	position: Vec2,
	field: &NavigationField,
	occupancy: &mut OccupancyTracker,
	settings: &MotionSettings,
	rng: &mut R,
	step_duration: f32,
) -> Vec2 {
	let cell = field.get_cell_from_world_position(position);
	if agent.previous_cell.is_none() {
		agent.previous_cell = Some(cell);
		occupancy.occupy(cell, entity);
	}
	if settings.occupancy_policy == OccupancyPolicy::VacateOnExit {
		if let Some(old) = agent.current_cell.filter(|old| *old != cell) {
			occupancy.vacate(old, entity);
			agent.previous_cell = Some(old);
		}
	}
	agent.current_cell = Some(cell);
	occupancy.occupy(cell, entity);

	let direction = field.best_direction(cell);
	if direction == Ordinal::Zero {
		return position;
	}
	let base_speed = settings.sample_speed(rng) * agent.speed_scale;
	let speed = congestion_throttle(
		base_speed,
		cell,
		direction,
		field,
		occupancy,
		settings.congestion_damping,
	);
	trace!(
		"{:?} in {:?} heading {:?} at {} (base {})",
		entity,
		cell,
		direction,
		speed,
		base_speed
	);
	position + direction.to_2d_unit_vector() * speed * step_duration
}

/// An agent as seen by a single motion step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrowdMember {
	/// Identity of the agent
	pub entity: Entity,
	/// Navigation state of the agent
	pub agent: CrowdAgent,
	/// Position of the agent in grid space
	pub position: Vec2,
}

/// Advance every member in slice order against the published field. When nothing has been
/// published yet every agent holds position and `false` is returned
pub fn step_agents<R: Rng + ?Sized>(
	members: &mut [CrowdMember],
	current: &CurrentNavigationField,
	occupancy: &mut OccupancyTracker,
	settings: &MotionSettings,
	rng: &mut R,
	step_duration: f32,
) -> bool {
	let Some(field) = current.get() else {
		return false;
	};
	for member in members.iter_mut() {
		member.position = integrate_agent(
			member.entity,
			&mut member.agent,
			member.position,
			field,
			occupancy,
			settings,
			rng,
			step_duration,
		);
	}
	true
}
