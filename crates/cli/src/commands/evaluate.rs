use anyhow::Result;
use colored::*;
use chore_core::recipe_manager::RecipeManager;

pub async fn execute(manager: &RecipeManager) -> Result<()> {
    let variables = manager.evaluate_variables().await?;

    if variables.is_empty() {
        println!("{}", "No variables defined".dimmed());
        return Ok(());
    }

    let width = variables.iter().map(|v| v.name.len()).max().unwrap_or(0);
    for variable in variables {
        let name = format!("{:width$}", variable.name, width = width);
        println!("{} := {}", name.bold(), variable.value);
    }

    Ok(())
}
