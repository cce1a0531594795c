#![deny(warnings)]

#[macro_use]
extern crate serde_derive;

pub use audit::{AuditSink, TracingAuditSink};
pub use cli::{cli_overrides, cli_parser};
pub use command::{find_executable, CommandOutput, CommandRunner, SystemCommandRunner};
pub use config::general::GeneralConfig;
pub use config::user::UserConfig;
pub use config::Config;
pub use error::{Error, Result};
pub use reconcile::Reconciler;
pub use report::Report;
pub use state::{ActualState, DesiredState, Presence};

mod audit;
mod cli;
mod command;
mod config;
mod error;
mod reconcile;
mod report;
mod state;
