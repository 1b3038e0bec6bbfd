pub mod actuator_map;
pub mod classifier;
pub mod emotion;
pub mod history;
pub mod pattern;
