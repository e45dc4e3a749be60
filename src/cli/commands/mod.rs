mod init;
mod shell;
mod web;

pub use init::cmd_init;
pub use shell::cmd_shell;
pub use web::cmd_web;
