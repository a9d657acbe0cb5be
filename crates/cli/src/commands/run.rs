use anyhow::Result;
use chore_core::recipe_manager::{RecipeManager, RunOptions};

/// Run recipes, returning the core error untouched so its exit code survives
pub async fn execute(manager: &RecipeManager, recipes: &[String], dry_run: bool) -> Result<()> {
    manager.run(recipes, RunOptions { dry_run }).await?;
    Ok(())
}
