//! Dunion general utilities that are shared between all of the crates
//! within the workspace.

pub mod crash;
pub mod highlight;
pub mod logging;
pub mod printing;

// Re-export commonly used packages
pub use fxhash;
pub use index_vec;
pub use itertools;
pub use log;
pub use smallvec;
