//! Generates a 50x50 world with 500 agents chasing a goal which moves every 10 seconds, runs
//! without a window and logs the state of the crowd once a second
//!

use bevy::{log::LogPlugin, prelude::*};
use bevy_flowfield_crowd_plugin::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// Number of agents spawned at startup
const AGENT_COUNT: usize = 500;
/// Seconds before the demo exits
const RUN_TIME: f32 = 35.0;

fn main() {
	App::new()
		.add_plugins((MinimalPlugins, LogPlugin::default()))
		.add_plugins(FlowFieldCrowdPlugin)
		.add_systems(Startup, setup_navigation)
		.add_systems(Update, (report, exit_after_run_time))
		.run();
}

/// Spawn the navigation entity and scatter the agents over the grid
fn setup_navigation(mut cmds: Commands) {
	let settings = CrowdSettings::new(50, 50)
		.with_world_offset(Vec2::new(-25.0, -25.0))
		.with_movement_plane(MovementPlane::Xz)
		.with_seed(42);
	let bundle = match FlowFieldCrowdBundle::new(settings) {
		Ok(bundle) => bundle,
		Err(e) => {
			error!("Invalid crowd settings: {}", e);
			return;
		}
	};
	let dimensions = *bundle.get_grid().get_dimensions();
	let nav = cmds.spawn(bundle).id();
	let mut rng = StdRng::seed_from_u64(7);
	for _ in 0..AGENT_COUNT {
		let position = dimensions.get_random_position(&mut rng);
		cmds.spawn((
			CrowdAgent::new(nav),
			Transform::from_xyz(position.x, 0.0, position.y),
		));
	}
}

/// Once a second log where the goal is and how many agents have reached it
fn report(
	time: Res<Time>,
	mut timer: Local<Option<Timer>>,
	nav_q: Query<(&CurrentNavigationField, &OccupancyTracker)>,
	agent_q: Query<&CrowdAgent>,
) {
	let timer = timer.get_or_insert_with(|| Timer::from_seconds(1.0, TimerMode::Repeating));
	if !timer.tick(time.delta()).just_finished() {
		return;
	}
	for (current, occupancy) in &nav_q {
		let Some(field) = current.get() else {
			continue;
		};
		let arrived = agent_q
			.iter()
			.filter(|a| a.get_current_cell() == Some(field.get_goal()))
			.count();
		info!(
			"field v{} goal {:?}: {} of {} agents arrived, {} cells occupied",
			field.get_version(),
			field.get_goal(),
			arrived,
			AGENT_COUNT,
			occupancy.occupied_count()
		);
	}
}

/// Stop the app once the demo has run for long enough
fn exit_after_run_time(time: Res<Time>, mut exit: EventWriter<AppExit>) {
	if time.elapsed_secs() > RUN_TIME {
		exit.write(AppExit::Success);
	}
}
