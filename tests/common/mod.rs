pub mod host;
pub mod strategies;

pub use host::*;
pub use strategies::*;
