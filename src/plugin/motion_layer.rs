//! Drives [CrowdAgent]s across their grids every fixed step and releases the cells of agents which
//! are removed
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Move every agent along the current field of its navigation entity. Agents are processed in
/// [Entity] order so a run is repeatable for a given seed
#[cfg(not(tarpaulin_include))]
pub fn move_agents(
	time: Res<Time<Fixed>>,
	mut nav_q: Query<(
		Entity,
		&CurrentNavigationField,
		&mut OccupancyTracker,
		&CrowdSettings,
		&mut CrowdRng,
	)>,
	mut agent_q: Query<(Entity, &mut CrowdAgent, &mut Transform)>,
) {
	let step_duration = time.timestep().as_secs_f32();
	for (nav_entity, current, mut occupancy, settings, mut rng) in nav_q.iter_mut() {
		if current.get().is_none() {
			continue;
		}
		let motion = match settings.get_motion_settings() {
			Ok(motion) => motion,
			Err(e) => {
				error!("Invalid motion settings on {:?}: {}", nav_entity, e);
				continue;
			}
		};
		let plane = settings.get_movement_plane();
		let mut members: Vec<CrowdMember> = agent_q
			.iter()
			.filter(|(_, agent, _)| agent.get_navigation_entity() == nav_entity)
			.map(|(entity, agent, transform)| CrowdMember {
				entity,
				agent: *agent,
				position: plane.to_grid(transform.translation),
			})
			.collect();
		members.sort_by_key(|m| m.entity);
		step_agents(
			&mut members,
			current,
			&mut occupancy,
			&motion,
			rng.get_mut(),
			step_duration,
		);
		for member in members {
			if let Ok((_, mut agent, mut transform)) = agent_q.get_mut(member.entity) {
				*agent = member.agent;
				transform.translation = plane.to_world(member.position, transform.translation);
			}
		}
	}
}

/// Release the cells held by agents whose [CrowdAgent] was removed or despawned so they no longer
/// slow their neighbours down
#[cfg(not(tarpaulin_include))]
pub fn release_removed_agents(
	mut removed: RemovedComponents<CrowdAgent>,
	mut nav_q: Query<(Entity, &mut OccupancyTracker)>,
) {
	let agents: Vec<Entity> = removed.read().collect();
	if agents.is_empty() {
		return;
	}
	for (nav_entity, mut occupancy) in nav_q.iter_mut() {
		let released = occupancy.vacate_agents(&agents);
		if released > 0 {
			debug!(
				"Released {} cells of removed agents on {:?}",
				released, nav_entity
			);
		}
	}
}
