//! Testing utilities and harness for Syngest

pub mod recording;
pub mod robot;
pub mod robot_assertions;

// Re-export testing utilities
pub use recording::*;
pub use robot::*;

pub mod prelude {
    pub use crate::recording::*;
    pub use crate::robot::*;
    pub use crate::robot_assertions;
}
