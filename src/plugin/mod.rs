//! Defines the Bevy [Plugin] for FlowField crowds
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod goal_layer;
pub mod motion_layer;

/// Order of the field maintenance systems within `Update`
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Releasing the cells of removed agents
	Cleanup,
	/// Goal timers and cost edits which raise rebuild requests
	Goal,
	/// Building and publishing fields
	Rebuild,
}

/// Builds fields in `Update` and moves agents in `FixedUpdate`
pub struct FlowFieldCrowdPlugin;

impl Plugin for FlowFieldCrowdPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<DirectionSet>()
			.register_type::<FieldCell>()
			.register_type::<OccupancyPolicy>()
			.register_type::<MovementPlane>()
			.register_type::<CrowdAgent>()
			.add_event::<goal_layer::EventRebuildNavigationField>()
			.add_event::<goal_layer::EventUpdateCostFieldCell>()
			.configure_sets(
				Update,
				(OrderingSet::Cleanup, OrderingSet::Goal, OrderingSet::Rebuild).chain(),
			)
			.add_systems(
				Update,
				(
					motion_layer::release_removed_agents.in_set(OrderingSet::Cleanup),
					(
						goal_layer::choose_goals,
						goal_layer::process_cost_field_updates,
					)
						.in_set(OrderingSet::Goal),
					goal_layer::process_rebuild_requests.in_set(OrderingSet::Rebuild),
				),
			)
			.add_systems(FixedUpdate, motion_layer::move_agents);
	}
}
