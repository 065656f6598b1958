// Command parsing and dispatch
pub mod ftpcommand;
pub mod handlers;

// One handler per supported command
pub mod cdup;
pub mod cwd;
pub mod feat;
pub mod mlsd;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;
