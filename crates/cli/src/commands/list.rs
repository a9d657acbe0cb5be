use anyhow::Result;
use colored::*;
use chore_core::recipe_manager::RecipeManager;

pub fn execute(manager: &RecipeManager) -> Result<()> {
    let result = manager.list_recipes();

    let heading = match &result.name {
        Some(name) => format!("Recipes: {}", name),
        None => "Recipes".to_string(),
    };
    println!(
        "{} {}",
        heading.bold().underline(),
        format!("({})", result.recipe_file.display()).dimmed()
    );
    if let Some(description) = &result.description {
        println!("{}", description.dimmed());
    }

    if result.recipes.is_empty() {
        println!("  {}", "No recipes found".dimmed());
        return Ok(());
    }

    for recipe in &result.recipes {
        let name = match result.recipe_colors.get(&recipe.name) {
            Some(color) => recipe.name.color(*color).bold(),
            None => recipe.name.bold(),
        };
        let marker = if recipe.is_default {
            " (default)".green().to_string()
        } else {
            String::new()
        };

        match &recipe.description {
            Some(description) => println!("{}{} {}", name, marker, description.dimmed()),
            None => println!("{}{}", name, marker),
        }

        if !recipe.dependencies.is_empty() {
            println!(
                "  {} {}",
                "depends on:".dimmed(),
                recipe.dependencies.join(", ")
            );
        }
    }

    Ok(())
}
