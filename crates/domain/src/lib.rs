pub mod errors;
pub mod guards;
pub mod policy;
pub mod todo;

pub use errors::*;
pub use guards::*;
pub use policy::*;
pub use todo::*;
