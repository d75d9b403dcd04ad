//! compose-helper - per-application docker-compose dispatcher
//!
//! One dispatcher binary serves many applications. Each application is a
//! symlink to the dispatcher named after the app; the name it is invoked by
//! selects a section of `~/.compose_helper/config`, which gives the project
//! directory (and so the compose file) and a default service.
//!
//! - `compose-helper` (via an app symlink): resolve and run a compose command
//! - `compose-register`: create the symlink and the config section

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod ini;
pub mod logging;
pub mod process;
pub mod register;

pub use error::{HelperError, Result};
