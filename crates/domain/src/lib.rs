pub mod errors;
pub mod identifiers;
pub mod todo;

pub use errors::*;
pub use identifiers::*;
pub use todo::*;
