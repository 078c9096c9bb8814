pub mod dirty_guard;
pub mod evaluation_races;
pub mod overlays;
