//! Chore Core Library
//!
//! This is the core library for the chore recipe runner. It loads a recipe file,
//! validates it, plans which recipes an invocation runs and executes their
//! command lines one at a time, stopping at the first failure.
//!
//! ## Architecture
//!
//! - [`recipe_manager`] - High-level interface used by the CLI
//! - [`recipe_book`] - Validated recipes and their prerequisite graph
//! - [`execution_plan`] - Ordering of recipes for a single invocation
//! - [`execution`] - Shell command execution and the sequential runner
//! - [`variables`] - `{{ name }}` substitution and one-time variable lookups
//! - [`recipes`] - Recipe colors and a convenience entry point for runs
//! - [`configs`] - Recipe file parsing
//! - [`results`] - Result types for manager operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chore_core::recipe_manager::{RecipeManager, RecipeManagerConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> chore_core::types::ChoreResult<()> {
//! let manager = RecipeManager::new(RecipeManagerConfig {
//!     working_root: PathBuf::from("."),
//!     recipe_file: None,
//! })?;
//!
//! let recipes = manager.list_recipes();
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod execution;
pub mod execution_plan;
pub mod recipe_book;
pub mod recipe_manager;
pub mod recipes;
pub mod results;
pub mod types;
pub mod variables;

// Re-export the main types for easier usage
pub use recipe_manager::{RecipeManager, RecipeManagerConfig, RunOptions};
pub use types::{ChoreError, ChoreResult};
