pub mod error;
pub mod registry;
pub mod result;

pub use error::CommonError;
pub use registry::Registry;
pub use result::Result;
