pub mod error;
pub mod path;

pub use error::PathError;
pub use path::SandboxedPath;
