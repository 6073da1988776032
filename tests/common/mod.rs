#![allow(dead_code)]

mod assertions;
mod fixtures;
mod helpers;

// Re-export
pub use assertions::{
    assert_record_valid, assert_state_finite, assert_strictly_increasing, assert_trimmed,
};

pub use fixtures::*;
pub use helpers::*;
