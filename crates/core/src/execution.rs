//! Recipe execution module
//!
//! This module handles running recipe command lines through the shell and
//! sequencing recipes according to an execution plan.

pub mod command;
pub mod runner;

pub use command::CommandExecutor;
pub use runner::{RecipeRunner, RecipeRunnerConfig};
