mod address;
mod symbol;

pub use address::*;
pub use symbol::*;
