pub mod controls;
pub mod gesture;
pub mod queue;
