pub mod core_auth;
pub mod helper;

pub use self::core_auth::{User, UserDirectory};
pub use self::helper::PasswordDigest;
