//! High-level recipe management interface
//!
//! This module provides the [`RecipeManager`] which serves as the primary interface
//! for all recipe operations. It loads and validates the recipe file once and then
//! answers listing, planning, graph and run requests against it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chore_core::recipe_manager::{RecipeManager, RecipeManagerConfig, RunOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> chore_core::types::ChoreResult<()> {
//! let manager = RecipeManager::new(RecipeManagerConfig {
//!     working_root: PathBuf::from("."),
//!     recipe_file: None,
//! })?;
//!
//! // Show what `lint` would run
//! let plan = manager.get_execution_plan(&["lint".to_string()])?;
//!
//! // Run it
//! manager.run(&["lint".to_string()], RunOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::configs::recipes::{parse_recipe_file, DEFAULT_RECIPE_FILE};
use crate::execution::runner::RecipeRunnerConfig;
use crate::execution_plan::{resolve_execution_plan, ExecutionPlan};
use crate::recipe_book::RecipeBook;
use crate::recipes::{get_recipe_color, run_recipes};
use crate::results::{DependencyGraphResult, EvaluatedVariable, RecipeInfo, RecipeListResult};
use crate::types::{ChoreError, ChoreResult};
use crate::variables::VariableResolver;

/// File looked up in the working root when none is given
pub const RECIPE_FILE_NAME: &str = "chore.yml";

/// High-level manager that encapsulates all recipe operations
pub struct RecipeManager {
    pub book: RecipeBook,
    /// Directory commands run in: the directory containing the recipe file
    pub root: PathBuf,
    pub recipe_file: PathBuf,
}

/// Configuration for initializing a recipe manager
pub struct RecipeManagerConfig {
    pub working_root: PathBuf,
    /// Recipe file, relative to `working_root` unless absolute
    pub recipe_file: Option<PathBuf>,
}

/// Options for [`RecipeManager::run`]
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub dry_run: bool,
}

impl RecipeManager {
    /// Load and validate the recipe file
    pub fn new(config: RecipeManagerConfig) -> ChoreResult<Self> {
        let recipe_file = Self::recipe_file_path(&config);
        let root = match recipe_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let content = std::fs::read_to_string(&recipe_file).map_err(|e| {
            ChoreError::Config(format!(
                "Failed to read recipe file {}: {}",
                recipe_file.display(),
                e
            ))
        })?;

        let config = parse_recipe_file(&content).map_err(|e| {
            ChoreError::Config(format!(
                "Failed to parse recipe file {}: {}",
                recipe_file.display(),
                e
            ))
        })?;

        let book = RecipeBook::from_config(config)?;
        debug!(
            file = %recipe_file.display(),
            recipes = book.recipes().len(),
            "loaded recipe file"
        );

        Ok(Self {
            book,
            root,
            recipe_file,
        })
    }

    /// List all recipes in file order
    pub fn list_recipes(&self) -> RecipeListResult {
        let default = self.book.default_recipe();
        let recipes = self
            .book
            .recipes()
            .iter()
            .map(|recipe| RecipeInfo {
                is_default: default == Some(recipe.name.as_str()),
                ..RecipeInfo::from(recipe)
            })
            .collect();

        let (name, description) = self.book.title();
        RecipeListResult {
            recipe_file: self.recipe_file.clone(),
            name: name.map(str::to_string),
            description: description.map(str::to_string),
            recipes,
            recipe_colors: self
                .book
                .recipes()
                .iter()
                .map(|r| (r.name.clone(), get_recipe_color(&r.name)))
                .collect(),
        }
    }

    /// Get the execution plan for the named recipes, or the default recipe
    pub fn get_execution_plan(&self, recipes: &[String]) -> ChoreResult<ExecutionPlan> {
        resolve_execution_plan(&self.book, recipes)
    }

    /// Run the named recipes and their prerequisites
    pub async fn run(&self, recipes: &[String], options: RunOptions) -> ChoreResult<()> {
        let plan = self.get_execution_plan(recipes)?;
        run_recipes(
            &self.book,
            &self.root,
            &plan,
            RecipeRunnerConfig {
                dry_run: options.dry_run,
            },
        )
        .await
    }

    /// Get the prerequisite graph
    pub fn get_dependency_graph(&self) -> DependencyGraphResult {
        DependencyGraphResult {
            graph: self.book.dep_graph.clone(),
        }
    }

    /// Resolve every declared variable, in declaration order
    pub async fn evaluate_variables(&self) -> ChoreResult<Vec<EvaluatedVariable>> {
        let mut resolver =
            VariableResolver::new(&self.root, self.book.file_env(), self.book.variables());

        let mut evaluated = Vec::new();
        for variable in self.book.variables() {
            let value = resolver.resolve(&variable.name).await?;
            evaluated.push(EvaluatedVariable {
                name: variable.name.clone(),
                value: value.to_string(),
            });
        }
        Ok(evaluated)
    }

    fn recipe_file_path(config: &RecipeManagerConfig) -> PathBuf {
        match &config.recipe_file {
            Some(file) => config.working_root.join(file),
            None => config.working_root.join(RECIPE_FILE_NAME),
        }
    }
}

/// Write the bundled toolchain recipes to `path`
pub fn init_recipe_file(path: &Path, force: bool) -> ChoreResult<()> {
    if path.exists() && !force {
        return Err(ChoreError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    std::fs::write(path, DEFAULT_RECIPE_FILE)?;
    Ok(())
}
