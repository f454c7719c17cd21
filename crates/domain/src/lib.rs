pub mod errors;
pub mod tags;
pub mod todo;

pub use errors::*;
pub use tags::*;
pub use todo::*;
