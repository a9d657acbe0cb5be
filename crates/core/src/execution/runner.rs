//! High-level recipe runner
//!
//! Runs an [`ExecutionPlan`] strictly in order. The first failing command stops
//! the run and its error, carrying the exit code, is returned unchanged.

use std::path::Path;

use colored::*;
use tracing::{debug, info};

use crate::execution::command::CommandExecutor;
use crate::execution_plan::ExecutionPlan;
use crate::recipe_book::RecipeBook;
use crate::recipes::get_recipe_color;
use crate::types::{ChoreError, ChoreResult};
use crate::variables::VariableResolver;

/// Configuration for the recipe runner
#[derive(Debug, Default, Clone)]
pub struct RecipeRunnerConfig {
    /// Print the substituted command lines instead of running them
    pub dry_run: bool,
}

/// Runs recipes from a validated book, one command at a time
pub struct RecipeRunner<'a> {
    book: &'a RecipeBook,
    root: &'a Path,
    config: RecipeRunnerConfig,
}

impl<'a> RecipeRunner<'a> {
    pub fn new(book: &'a RecipeBook, root: &'a Path, config: RecipeRunnerConfig) -> Self {
        Self { book, root, config }
    }

    /// Resolve the plan's variables, then run each recipe in order
    pub async fn run_plan(
        &self,
        plan: &ExecutionPlan,
        resolver: &mut VariableResolver,
    ) -> ChoreResult<()> {
        resolver.resolve_all(&plan.variables).await?;

        for recipe_name in &plan.recipes {
            self.prepare_recipe(recipe_name, resolver)?
                .run()
                .await?;
        }

        info!(recipes = plan.recipes.len(), "run finished");
        Ok(())
    }

    /// Prepare one recipe: substitute its env and command lines
    fn prepare_recipe(
        &self,
        recipe_name: &str,
        resolver: &VariableResolver,
    ) -> ChoreResult<PreparedRecipe<'a>> {
        let recipe = self
            .book
            .get(recipe_name)
            .ok_or_else(|| ChoreError::Recipe(format!("Recipe '{}' not found", recipe_name)))?;

        let mut env = self.book.file_env();
        for (key, value) in recipe.env.iter().flatten() {
            env.insert(key.clone(), resolver.render(value)?);
        }

        let lines = recipe
            .commands
            .iter()
            .map(|line| resolver.render(line))
            .collect::<ChoreResult<Vec<_>>>()?;

        let executor = CommandExecutor::new(self.root, env)
            .with_echo(!recipe.quiet)
            .with_dry_run(self.config.dry_run);

        Ok(PreparedRecipe {
            name: recipe_name.to_string(),
            lines,
            executor,
        })
    }
}

struct PreparedRecipe<'a> {
    name: String,
    lines: Vec<String>,
    executor: CommandExecutor<'a>,
}

impl PreparedRecipe<'_> {
    async fn run(&self) -> ChoreResult<()> {
        let color = get_recipe_color(&self.name);
        eprintln!(
            "{} {}",
            "▶".bold(),
            format!("Running recipe '{}'", self.name).color(color).bold()
        );

        if self.lines.is_empty() {
            debug!(recipe = %self.name, "recipe has no commands of its own");
        }

        for line in &self.lines {
            self.executor.execute_shell_command(line).await?;
        }

        eprintln!(
            "{} {}",
            "✓".green().bold(),
            format!("Completed {}", self.name).color(color)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::recipes::parse_recipe_file;
    use crate::execution_plan::resolve_execution_plan;

    fn setup(yaml: &str) -> (tempfile::TempDir, RecipeBook) {
        let temp_dir = tempfile::tempdir().unwrap();
        let book = RecipeBook::from_config(parse_recipe_file(yaml).unwrap()).unwrap();
        (temp_dir, book)
    }

    async fn run(
        book: &RecipeBook,
        root: &std::path::Path,
        targets: &[&str],
        dry_run: bool,
    ) -> ChoreResult<()> {
        let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
        let plan = resolve_execution_plan(book, &targets)?;
        let mut resolver = VariableResolver::new(root, book.file_env(), book.variables());
        RecipeRunner::new(book, root, RecipeRunnerConfig { dry_run })
            .run_plan(&plan, &mut resolver)
            .await
    }

    #[tokio::test]
    async fn test_prerequisites_run_before_recipe() {
        let (temp_dir, book) = setup(
            r#"
recipes:
  - name: fmt
    quiet: true
    commands: ["echo fmt >> log"]
  - name: clippy
    quiet: true
    commands: ["echo clippy >> log"]
  - name: lint
    quiet: true
    dependencies: [fmt, clippy]
    commands: ["echo lint >> log"]
"#,
        );

        run(&book, temp_dir.path(), &["lint"], false).await.unwrap();

        let log = std::fs::read_to_string(temp_dir.path().join("log")).unwrap();
        assert_eq!(log, "fmt\nclippy\nlint\n");
    }

    #[tokio::test]
    async fn test_first_failure_stops_the_run() {
        let (temp_dir, book) = setup(
            r#"
recipes:
  - name: fmt
    quiet: true
    commands: ["echo fmt >> log", "exit 4", "echo unreachable >> log"]
  - name: clippy
    quiet: true
    commands: ["echo clippy >> log"]
  - name: lint
    dependencies: [fmt, clippy]
"#,
        );

        let err = run(&book, temp_dir.path(), &["lint"], false)
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 4);
        let log = std::fs::read_to_string(temp_dir.path().join("log")).unwrap();
        assert_eq!(log, "fmt\n");
    }

    #[tokio::test]
    async fn test_variables_are_substituted_into_commands_and_env() {
        let (temp_dir, book) = setup(
            r#"
env:
  CARGO_TARGET_DIR: target/nightly
variables:
  - name: nightly_rustc
    command: echo /toolchains/nightly/bin/rustc
recipes:
  - name: clippy
    quiet: true
    env:
      RUSTC: "{{ nightly_rustc }}"
    commands:
      - echo "$RUSTC $CARGO_TARGET_DIR" >> log
      - echo "{{nightly_rustc}}" >> log
"#,
        );

        run(&book, temp_dir.path(), &["clippy"], false).await.unwrap();

        let log = std::fs::read_to_string(temp_dir.path().join("log")).unwrap();
        assert_eq!(
            log,
            "/toolchains/nightly/bin/rustc target/nightly\n/toolchains/nightly/bin/rustc\n"
        );
    }

    #[tokio::test]
    async fn test_recipe_env_overrides_file_env() {
        let (temp_dir, book) = setup(
            r#"
env:
  CARGO_TARGET_DIR: target/nightly
  RUSTFLAGS: -Dwarnings
recipes:
  - name: clippy
    quiet: true
    commands: ["echo \"$CARGO_TARGET_DIR\" >> log"]
  - name: test
    quiet: true
    env:
      CARGO_TARGET_DIR: target
    commands: ["echo \"$CARGO_TARGET_DIR $RUSTFLAGS\" >> log"]
"#,
        );

        run(&book, temp_dir.path(), &["clippy", "test"], false)
            .await
            .unwrap();

        let log = std::fs::read_to_string(temp_dir.path().join("log")).unwrap();
        assert_eq!(log, "target/nightly\ntarget -Dwarnings\n");
    }

    #[tokio::test]
    async fn test_unplanned_variables_are_not_resolved() {
        let (temp_dir, book) = setup(
            r#"
variables:
  - name: broken
    command: exit 9
recipes:
  - name: fmt
    quiet: true
    commands: ["echo fmt >> log"]
  - name: clippy
    commands: ["echo {{ broken }}"]
"#,
        );

        run(&book, temp_dir.path(), &["fmt"], false).await.unwrap();

        let err = run(&book, temp_dir.path(), &["clippy"], false)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 9);
    }

    #[tokio::test]
    async fn test_dry_run_runs_nothing() {
        let (temp_dir, book) = setup(
            r#"
recipes:
  - name: test
    commands: ["touch ran"]
"#,
        );

        run(&book, temp_dir.path(), &["test"], true).await.unwrap();

        assert!(!temp_dir.path().join("ran").exists());
    }
}
