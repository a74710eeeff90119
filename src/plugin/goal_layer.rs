//! Logic relating to choosing goals and (re)building the [NavigationField] of a navigation entity.
//!
//! A goal change always rebuilds the whole field, as does any edit to the [CostField].
//!

use std::time::Duration;

use crate::prelude::*;
use bevy::prelude::*;

/// Countdown between automatic goal changes. The first goal is chosen as soon as agents appear
#[derive(Component, Debug, Clone)]
pub struct GoalTimer {
	/// Repeating timer, `None` when goals are only ever set by events
	timer: Option<Timer>,
	/// A goal is due regardless of the timer
	pending: bool,
}

impl GoalTimer {
	/// Timer firing every `interval` seconds, `None` never fires
	pub fn new(interval: Option<f32>) -> Self {
		GoalTimer {
			timer: interval.map(|secs| Timer::from_seconds(secs, TimerMode::Repeating)),
			pending: interval.is_some(),
		}
	}
	/// Start counting down from a full interval again
	pub fn restart(&mut self) {
		self.pending = false;
		if let Some(timer) = self.timer.as_mut() {
			timer.reset();
		}
	}
	/// Advance the countdown, returns `true` when a new goal should be chosen
	pub fn tick(&mut self, delta: Duration) -> bool {
		let Some(timer) = self.timer.as_mut() else {
			return false;
		};
		if self.pending {
			self.pending = false;
			timer.reset();
			return true;
		}
		timer.tick(delta).just_finished()
	}
}

/// Request that the field of a navigation entity is rebuilt towards a new goal
#[derive(Event, Debug, Clone, Copy)]
pub struct EventRebuildNavigationField {
	/// Entity holding the grid and fields
	navigation_entity: Entity,
	/// World position of the new goal, clamped onto the grid
	goal: Vec2,
}

impl EventRebuildNavigationField {
	/// Create a new instance of [EventRebuildNavigationField]
	pub fn new(navigation_entity: Entity, goal: Vec2) -> Self {
		EventRebuildNavigationField {
			navigation_entity,
			goal,
		}
	}
	pub fn get_navigation_entity(&self) -> Entity {
		self.navigation_entity
	}
	pub fn get_goal(&self) -> Vec2 {
		self.goal
	}
}

/// Used to change the cost of a cell, the current field is rebuilt towards its existing goal
#[derive(Event, Debug, Clone, Copy)]
pub struct EventUpdateCostFieldCell {
	/// Entity holding the grid and fields
	navigation_entity: Entity,
	/// FieldCell to update
	cell: FieldCell,
	/// The value the field cell should be assigned
	cost: u8,
}

impl EventUpdateCostFieldCell {
	/// Create a new instance of [EventUpdateCostFieldCell]
	pub fn new(navigation_entity: Entity, cell: FieldCell, cost: u8) -> Self {
		EventUpdateCostFieldCell {
			navigation_entity,
			cell,
			cost,
		}
	}
	pub fn get_navigation_entity(&self) -> Entity {
		self.navigation_entity
	}
	pub fn get_cell(&self) -> FieldCell {
		self.cell
	}
	pub fn get_cost_value(&self) -> u8 {
		self.cost
	}
}

/// Tick each [GoalTimer] and when one fires pick a random goal inside its grid. Like the timer
/// itself nothing happens until at least one agent follows the entity
#[cfg(not(tarpaulin_include))]
pub fn choose_goals(
	time: Res<Time>,
	agents: Query<&CrowdAgent>,
	mut nav_q: Query<(Entity, &mut GoalTimer, &Grid, &mut CrowdRng)>,
	mut event_rebuild: EventWriter<EventRebuildNavigationField>,
) {
	for (entity, mut timer, grid, mut rng) in nav_q.iter_mut() {
		if !agents.iter().any(|a| a.get_navigation_entity() == entity) {
			continue;
		}
		if timer.tick(time.delta()) {
			let goal = grid.get_dimensions().get_random_position(rng.get_mut());
			debug!("Goal timer of {:?} fired, new goal {}", entity, goal);
			event_rebuild.write(EventRebuildNavigationField::new(entity, goal));
		}
	}
}

/// Read [EventUpdateCostFieldCell] and update the values within [CostField], any entity with a
/// published field is asked to rebuild it towards the same goal
#[cfg(not(tarpaulin_include))]
pub fn process_cost_field_updates(
	mut events: EventReader<EventUpdateCostFieldCell>,
	mut nav_q: Query<(&mut CostField, &Grid, &CurrentNavigationField)>,
	mut event_rebuild: EventWriter<EventRebuildNavigationField>,
) {
	// several cells may change at once, only rebuild each entity once
	let mut changed = Vec::new();
	for event in events.read() {
		let entity = event.get_navigation_entity();
		let Ok((mut cost_field, grid, _)) = nav_q.get_mut(entity) else {
			warn!("Cost update for {:?} which has no navigation fields", entity);
			continue;
		};
		if !grid.get_dimensions().contains(event.get_cell()) {
			warn!(
				"Cost update for {:?} outside of the grid of {:?}",
				event.get_cell(),
				entity
			);
			continue;
		}
		cost_field.set_cost(event.get_cell(), event.get_cost_value());
		if !changed.contains(&entity) {
			changed.push(entity);
		}
	}
	for entity in changed {
		if let Ok((_, _, current)) = nav_q.get(entity) {
			if let Some(field) = current.get() {
				event_rebuild.write(EventRebuildNavigationField::new(
					entity,
					field.get_destination(),
				));
			}
		}
	}
}

/// Read [EventRebuildNavigationField] and build then publish the new fields. When several requests
/// for the same entity arrive together only the latest is built
#[cfg(not(tarpaulin_include))]
pub fn process_rebuild_requests(
	mut events: EventReader<EventRebuildNavigationField>,
	mut nav_q: Query<(&Grid, &CostField, &CrowdSettings, &mut CurrentNavigationField)>,
) {
	let mut latest: Vec<EventRebuildNavigationField> = Vec::new();
	for event in events.read() {
		latest.retain(|e| e.get_navigation_entity() != event.get_navigation_entity());
		latest.push(*event);
	}
	for event in latest {
		let entity = event.get_navigation_entity();
		let Ok((grid, cost_field, settings, mut current)) = nav_q.get_mut(entity) else {
			warn!("Rebuild requested for {:?} which has no navigation fields", entity);
			continue;
		};
		if let Err(e) = current.rebuild(
			grid,
			cost_field,
			event.get_goal(),
			settings.get_direction_set(),
		) {
			error!("Failed to build navigation field for {:?}: {}", entity, e);
		}
	}
}
