//! Result types for recipe manager operations

use std::collections::HashMap;
use std::path::PathBuf;

use colored::Color;

use crate::configs::recipes::RecipeConfig;

/// Information about a recipe as shown by `list`
#[derive(Debug, Clone)]
pub struct RecipeInfo {
    pub name: String,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
    pub command_count: usize,
    pub is_default: bool,
}

/// Result of listing the recipes in a file
#[derive(Debug)]
pub struct RecipeListResult {
    /// Path the recipes were loaded from
    pub recipe_file: PathBuf,
    pub name: Option<String>,
    pub description: Option<String>,
    pub recipes: Vec<RecipeInfo>,
    pub recipe_colors: HashMap<String, Color>,
}

/// Result of getting the prerequisite graph
#[derive(Debug)]
pub struct DependencyGraphResult {
    pub graph: petgraph::Graph<String, ()>,
}

/// A variable together with its resolved value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedVariable {
    pub name: String,
    pub value: String,
}

impl From<&RecipeConfig> for RecipeInfo {
    fn from(recipe: &RecipeConfig) -> Self {
        Self {
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            dependencies: recipe.dependencies().to_vec(),
            command_count: recipe.commands.len(),
            is_default: false, // Set by the caller, which knows the default recipe
        }
    }
}
