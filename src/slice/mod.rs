//! Byte views for codec implementations.

mod macros;
mod ro;
mod wo;

pub use ro::ROSlice;
pub use wo::WOSlice;
