pub mod error;
pub mod framer;
pub mod interpreter;
pub mod login;
pub mod response;

pub use error::{ResponseError, SessionError};
pub use interpreter::ProtocolInterpreter;
pub use response::Response;
