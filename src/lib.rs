//! This is a plugin for Bevy game engine to calculate FlowFields over a uniform grid and move a
//! crowd of agents along them
//!

pub mod bundle;
pub mod flowfields;
pub mod plugin;
pub mod settings;

pub mod prelude;
