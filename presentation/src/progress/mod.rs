//! Progress reporting during a fan-out

pub mod reporter;
