pub mod error;
pub mod function;

pub use error::{ErrorKind, Result, SiftError};
pub use function::{CommitInfo, FunctionDescriptor};
