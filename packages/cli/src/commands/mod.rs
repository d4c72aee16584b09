pub mod build;
pub mod init;
pub mod projects;
pub mod serve;

pub use build::{build, BuildArgs};
pub use init::{init, InitArgs};
pub use projects::{projects, ProjectsArgs};
pub use serve::{serve, ServeArgs};
