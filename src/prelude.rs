//! `use bevy_flowfield_crowd_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	error::*,
	fields::{cost_field::*, flow_field::*, integration_field::*, *},
	grid::*,
	motion::*,
	navigation::*,
	occupancy::*,
	utilities::*,
	*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{goal_layer::*, motion_layer::*, *},
	settings::*,
};
