pub mod export;
pub mod model;
pub mod ops;
pub mod search;

pub use model::*;
pub use ops::*;
