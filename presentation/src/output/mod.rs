//! Console formatting and file export

pub mod console;
pub mod export;
pub mod formatter;
