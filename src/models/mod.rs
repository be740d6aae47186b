pub mod crop;
pub mod field;
pub mod rotation;

pub use crop::*;
pub use field::*;
pub use rotation::*;
