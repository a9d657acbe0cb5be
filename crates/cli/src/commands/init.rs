use std::path::Path;

use anyhow::Result;
use colored::*;
use chore_core::recipe_manager::{init_recipe_file, RecipeManagerConfig, RECIPE_FILE_NAME};

pub fn execute(config: &RecipeManagerConfig, force: bool) -> Result<()> {
    let path = config
        .working_root
        .join(config.recipe_file.as_deref().unwrap_or(Path::new(RECIPE_FILE_NAME)));

    init_recipe_file(&path, force)?;

    println!(
        "{} {}",
        "✓".green().bold(),
        format!("Wrote {}", path.display())
    );
    Ok(())
}
