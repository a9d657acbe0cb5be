use std::collections::BTreeSet;

use crate::recipe_book::RecipeBook;
use crate::types::{ChoreError, ChoreResult};

/// Result of resolving which recipes an invocation runs, and in what order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Recipes named on the command line, or the default recipe
    pub requested: Vec<String>,
    /// Every recipe to run, prerequisites first, each once
    pub recipes: Vec<String>,
    /// Variables referenced by the planned recipes
    pub variables: BTreeSet<String>,
}

/// Resolve the recipes to run for `requested`, falling back to the default
/// recipe when nothing is requested
pub fn resolve_execution_plan(
    book: &RecipeBook,
    requested: &[String],
) -> ChoreResult<ExecutionPlan> {
    let requested = if requested.is_empty() {
        let default = book
            .default_recipe()
            .ok_or_else(|| ChoreError::Recipe("No recipes are defined".to_string()))?;
        vec![default.to_string()]
    } else {
        requested.to_vec()
    };

    let recipes = book.resolve_execution_order(&requested)?;

    let variables = recipes
        .iter()
        .flat_map(|name| book.variables_for(name))
        .cloned()
        .collect();

    Ok(ExecutionPlan {
        requested,
        recipes,
        variables,
    })
}
