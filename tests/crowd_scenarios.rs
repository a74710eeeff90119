//! Build fields and move crowds over a range of grids without a Bevy app
//!

use bevy::prelude::*;
use bevy_flowfield_crowd_plugin::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Goal positions at the centre of a cell
fn cell_centre(grid: &Grid, column: usize, row: usize) -> Vec2 {
	grid.get_cell(FieldCell::new(column, row)).get_world_position()
}

/// Cost field with roughly 1 in 5 cells impassable and the rest a random cost between 1 and 9
fn rough_terrain(dimensions: &GridDimensions, rng: &mut StdRng) -> CostField {
	let costs = (0..dimensions.get_cell_count())
		.map(|_| {
			if rng.random_range(0..5) == 0 {
				255
			} else {
				rng.random_range(1..10)
			}
		})
		.collect();
	CostField::from_costs(dimensions, costs).unwrap()
}

#[test]
fn uniform_integration_is_grid_distance() {
	for (width, height) in [(1, 1), (3, 7), (10, 4), (16, 16)] {
		let grid = Grid::new(width, height, 1.0, Vec2::ZERO).unwrap();
		for uniform_cost in [1u8, 3] {
			let cost_field =
				CostField::from_costs(grid.get_dimensions(), vec![uniform_cost; width * height])
					.unwrap();
			for (gx, gy) in [(0, 0), (width - 1, height - 1), (width / 2, height / 3)] {
				let field = NavigationField::build(
					&grid,
					&cost_field,
					cell_centre(&grid, gx, gy),
					DirectionSet::All,
					0,
				)
				.unwrap();
				for cell in grid.iter() {
					let (x, y) = cell.get_field_cell().get_column_row();
					let distance = x.abs_diff(gx) + y.abs_diff(gy);
					assert_eq!(
						(distance * uniform_cost as usize) as u32,
						field.integration_value(cell.get_field_cell()),
						"{}x{} goal ({}, {}) cell ({}, {})",
						width,
						height,
						gx,
						gy,
						x,
						y
					);
				}
			}
		}
	}
}

#[test]
fn goal_is_zero_with_no_direction() {
	let mut rng = StdRng::seed_from_u64(11);
	for _ in 0..20 {
		let grid = Grid::new(12, 9, 0.5, Vec2::new(-3.0, -2.0)).unwrap();
		let cost_field = rough_terrain(grid.get_dimensions(), &mut rng);
		let goal = grid.get_dimensions().get_random_position(&mut rng);
		let field =
			NavigationField::build(&grid, &cost_field, goal, DirectionSet::All, 0).unwrap();
		let goal_cell = field.get_goal();
		assert_eq!(grid.cell_at(goal).get_field_cell(), goal_cell);
		assert_eq!(0, field.integration_value(goal_cell));
		assert_eq!(Ordinal::Zero, field.best_direction(goal_cell));
	}
}

#[test]
fn reachable_cells_descend_to_the_goal() {
	let mut rng = StdRng::seed_from_u64(5);
	for direction_set in [DirectionSet::All, DirectionSet::Orthogonal] {
		for _ in 0..20 {
			let grid = Grid::new(20, 14, 1.0, Vec2::ZERO).unwrap();
			let cost_field = rough_terrain(grid.get_dimensions(), &mut rng);
			let goal = grid.get_dimensions().get_random_position(&mut rng);
			let field =
				NavigationField::build(&grid, &cost_field, goal, direction_set, 0).unwrap();
			let dimensions = grid.get_dimensions();
			for cell in grid.iter() {
				let field_cell = cell.get_field_cell();
				let value = field.integration_value(field_cell);
				if value == UNREACHABLE {
					assert_eq!(Ordinal::Zero, field.best_direction(field_cell));
					continue;
				}
				if value == 0 {
					continue;
				}
				// some 8-connected neighbour is cheaper
				let lower = dimensions
					.get_neighbours(field_cell, DirectionSet::All)
					.iter()
					.any(|n| field.integration_value(*n) < value);
				assert!(lower);
				// and the chosen direction leads to one
				let ord = field.best_direction(field_cell);
				assert_ne!(Ordinal::Zero, ord);
				assert!(direction_set == DirectionSet::All || !ord.is_diagonal());
				let next = field_cell
					.get_neighbour(ord, dimensions.get_width(), dimensions.get_height())
					.unwrap();
				assert!(field.integration_value(next) < value);
			}
		}
	}
}

#[test]
fn following_directions_reaches_the_goal() {
	let mut rng = StdRng::seed_from_u64(21);
	let grid = Grid::new(24, 24, 1.0, Vec2::ZERO).unwrap();
	let cost_field = rough_terrain(grid.get_dimensions(), &mut rng);
	let field = NavigationField::build(
		&grid,
		&cost_field,
		Vec2::new(12.0, 12.0),
		DirectionSet::All,
		0,
	)
	.unwrap();
	let dimensions = grid.get_dimensions();
	for cell in grid.iter() {
		let mut current = cell.get_field_cell();
		if !field.get_integration_field().is_reachable(current) {
			continue;
		}
		let mut hops = 0;
		while !field.is_goal(current) {
			current = current
				.get_neighbour(
					field.best_direction(current),
					dimensions.get_width(),
					dimensions.get_height(),
				)
				.unwrap();
			hops += 1;
			assert!(hops <= dimensions.get_cell_count());
		}
	}
}

#[test]
fn rebuild_is_idempotent() {
	let mut rng = StdRng::seed_from_u64(2);
	let grid = Grid::new(17, 13, 2.0, Vec2::new(-17.0, -13.0)).unwrap();
	let cost_field = rough_terrain(grid.get_dimensions(), &mut rng);
	let goal = Vec2::new(3.3, -4.1);
	let mut current = CurrentNavigationField::default();
	current
		.rebuild(&grid, &cost_field, goal, DirectionSet::All)
		.unwrap();
	let first = current.get().unwrap().clone();
	current
		.rebuild(&grid, &cost_field, goal, DirectionSet::All)
		.unwrap();
	let second = current.get().unwrap();
	assert_eq!(first.get_integration_field(), second.get_integration_field());
	assert_eq!(first.get_flow_field(), second.get_flow_field());
	assert_eq!(Some(1), current.version());
}

#[test]
fn cell_at_is_total() {
	let grid = Grid::new(6, 4, 1.5, Vec2::new(-4.5, -3.0)).unwrap();
	let positions = [
		Vec2::new(0.0, 0.0),
		Vec2::new(-1e9, 1e9),
		Vec2::new(1e9, -1e9),
		Vec2::new(f32::INFINITY, f32::NEG_INFINITY),
		Vec2::new(f32::NAN, 2.0),
		Vec2::new(-4.5, -3.0),
		Vec2::new(4.5, 3.0),
	];
	for position in positions {
		let cell = grid.cell_at(position).get_field_cell();
		assert!(grid.get_dimensions().contains(cell), "{:?}", position);
	}
	assert_eq!(
		FieldCell::new(5, 3),
		grid.cell_at(Vec2::new(4.5, 3.0)).get_field_cell()
	);
	assert_eq!(
		FieldCell::new(0, 0),
		grid.cell_at(Vec2::new(-4.5, -3.0)).get_field_cell()
	);
}

#[test]
fn zero_cost_cells_still_point_at_the_goal() {
	let grid = Grid::new(4, 1, 1.0, Vec2::ZERO).unwrap();
	assert!(CostField::from_costs(grid.get_dimensions(), vec![1, 1, 0, 1]).is_err());
	let mut cost_field = CostField::new(grid.get_dimensions());
	cost_field.set_cost(FieldCell::new(2, 0), 0);
	let field =
		NavigationField::build(&grid, &cost_field, Vec2::new(0.5, 0.5), DirectionSet::All, 0)
			.unwrap();
	let values: Vec<u32> = (0..4)
		.map(|x| field.integration_value(FieldCell::new(x, 0)))
		.collect();
	assert_eq!(vec![0, 1, 2, 3], values);
	for x in 1..4 {
		assert_eq!(Ordinal::West, field.best_direction(FieldCell::new(x, 0)));
	}
}

/// 5x5 uniform grid with the goal in the centre
#[rustfmt::skip]
#[test]
fn centre_goal_diamond() {
	let grid = Grid::new(5, 5, 1.0, Vec2::ZERO).unwrap();
	let cost_field = CostField::new(grid.get_dimensions());
	let field = NavigationField::build(&grid, &cost_field, Vec2::new(2.5, 2.5), DirectionSet::All, 0).unwrap();
	let values: Vec<Vec<u32>> = (0..5).rev().map(|y| {
		(0..5).map(|x| field.integration_value(FieldCell::new(x, y))).collect()
	}).collect();
	let actual = vec![
		vec![4, 3, 2, 3, 4],
		vec![3, 2, 1, 2, 3],
		vec![2, 1, 0, 1, 2],
		vec![3, 2, 1, 2, 3],
		vec![4, 3, 2, 3, 4],
	];
	assert_eq!(actual, values);
	assert_eq!(Ordinal::East, field.best_direction(FieldCell::new(0, 2)));
	assert_eq!(Ordinal::West, field.best_direction(FieldCell::new(4, 2)));
	assert_eq!(Ordinal::North, field.best_direction(FieldCell::new(2, 0)));
	assert_eq!(Ordinal::South, field.best_direction(FieldCell::new(2, 4)));
	assert_eq!(Ordinal::NorthEast, field.best_direction(FieldCell::new(0, 0)));
}

/// Middle row flows East towards a goal at its far end
fn eastward_crowd() -> (Grid, CurrentNavigationField, OccupancyTracker) {
	let grid = Grid::new(8, 3, 1.0, Vec2::ZERO).unwrap();
	let cost_field = CostField::new(grid.get_dimensions());
	let mut current = CurrentNavigationField::default();
	current
		.rebuild(
			&grid,
			&cost_field,
			Vec2::new(7.5, 1.5),
			DirectionSet::Orthogonal,
		)
		.unwrap();
	let occupancy = OccupancyTracker::new(grid.get_dimensions());
	(grid, current, occupancy)
}

fn member(id: u32, navigation_entity: Entity, position: Vec2) -> CrowdMember {
	CrowdMember {
		entity: Entity::from_raw(id),
		agent: CrowdAgent::new(navigation_entity),
		position,
	}
}

#[test]
fn queued_agents_slow_the_follower() {
	let nav = Entity::from_raw(100);
	let (_, current, mut occupancy) = eastward_crowd();
	let field = current.get().unwrap();
	assert_eq!(Ordinal::East, field.best_direction(FieldCell::new(1, 1)));
	assert_eq!(Ordinal::East, field.best_direction(FieldCell::new(1, 2)));
	let settings = MotionSettings::new((1.0, 1.0), 1.6, OccupancyPolicy::VacateOnExit).unwrap();
	let mut rng = StdRng::seed_from_u64(0);
	// two leaders ahead of the follower, both heading East
	let mut members = vec![
		member(1, nav, Vec2::new(1.5, 1.5)),
		member(2, nav, Vec2::new(1.5, 2.5)),
		member(3, nav, Vec2::new(0.5, 1.5)),
	];
	step_agents(&mut members, &current, &mut occupancy, &settings, &mut rng, 0.1);
	let follower_moved = members[2].position.x - 0.5;
	assert!((follower_moved - 0.1 / 2.56).abs() < 1e-5);
	assert_eq!(1.5, members[2].position.y);
}

#[test]
fn agent_on_goal_stays() {
	let nav = Entity::from_raw(100);
	let (_, current, mut occupancy) = eastward_crowd();
	let settings = MotionSettings::default();
	let mut rng = StdRng::seed_from_u64(0);
	let start = Vec2::new(7.1, 1.9);
	let mut members = vec![member(1, nav, start)];
	for _ in 0..10 {
		step_agents(&mut members, &current, &mut occupancy, &settings, &mut rng, 0.5);
	}
	assert_eq!(start, members[0].position);
}

#[test]
fn crowd_converges_on_goal() {
	let nav = Entity::from_raw(100);
	let grid = Grid::new(8, 8, 1.0, Vec2::ZERO).unwrap();
	let cost_field = CostField::new(grid.get_dimensions());
	let mut current = CurrentNavigationField::default();
	current
		.rebuild(&grid, &cost_field, Vec2::new(5.5, 5.5), DirectionSet::All)
		.unwrap();
	let mut occupancy = OccupancyTracker::new(grid.get_dimensions());
	let settings = MotionSettings::default();
	let mut rng = StdRng::seed_from_u64(8);
	let mut members: Vec<CrowdMember> = (0..6)
		.map(|i| {
			let position = grid.get_dimensions().get_random_position(&mut rng);
			member(i, nav, position)
		})
		.collect();
	for _ in 0..2000 {
		step_agents(&mut members, &current, &mut occupancy, &settings, &mut rng, 0.1);
	}
	for m in members.iter() {
		assert_eq!(FieldCell::new(5, 5), grid.cell_at(m.position).get_field_cell());
	}
	// every agent shares the goal cell, the last to be processed holds it
	assert_eq!(1, occupancy.occupied_count());
}
