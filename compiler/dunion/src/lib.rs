//! The `dunionc` driver: loads union declarations, and runs the layout
//! planner, the exhaustiveness checker and constructors on them.

pub mod declarations;
pub mod driver;
pub mod settings;
