pub mod aircraft;

pub use aircraft::config::*;
