use anyhow::{Context, Result};
use colored::*;
use chore_core::recipe_manager::RecipeManager;
use chore_core::recipes::get_recipe_color;

pub fn execute(manager: &RecipeManager, recipes: &[String]) -> Result<()> {
    let plan = manager
        .get_execution_plan(recipes)
        .context("Failed to get execution plan")?;

    println!(
        "{} {}",
        "Execution plan for".bold(),
        plan.requested.join(", ").cyan()
    );

    println!("\n{}:", "Execution order".bold());
    for (i, recipe_name) in plan.recipes.iter().enumerate() {
        println!(
            "  {}. {}",
            i + 1,
            recipe_name.color(get_recipe_color(recipe_name))
        );
    }

    if !plan.variables.is_empty() {
        println!("\n{}:", "Variables resolved before running".bold());
        for name in &plan.variables {
            println!("  {}", name.dimmed());
        }
    }

    Ok(())
}
