use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{ChoreError, ChoreResult};

/// The recipe file bundled with chore, wrapping the usual Rust toolchain commands
pub const DEFAULT_RECIPE_FILE: &str = include_str!("default_recipes.yml");

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecipeConfig {
    pub name: String,
    pub description: Option<String>,
    /// Shell command lines, run in order with `sh -c`
    #[serde(default)]
    pub commands: Vec<String>,
    /// Recipes that must run first, in listed order
    pub dependencies: Option<Vec<String>>,
    /// Extra environment for this recipe's commands. Values may reference variables.
    pub env: Option<BTreeMap<String, String>>,
    /// Do not echo command lines before running them
    #[serde(default)]
    pub quiet: bool,
}

/// A name bound either to a literal value or to the trimmed output of a command
/// that runs at most once per invocation.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VariableConfig {
    pub name: String,
    pub command: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecipeFileConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Recipe to run when none is named. Falls back to the first recipe.
    pub default: Option<String>,
    /// Environment exported to every command, including variable lookups
    pub env: Option<BTreeMap<String, String>>,
    pub variables: Option<Vec<VariableConfig>>,
    pub recipes: Vec<RecipeConfig>,
}

impl RecipeConfig {
    pub fn dependencies(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or_default()
    }
}

pub fn parse_recipe_file(yaml_str: &str) -> ChoreResult<RecipeFileConfig> {
    let config: RecipeFileConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// JSON schema describing the recipe file format
pub fn recipe_file_schema() -> ChoreResult<String> {
    let schema = schemars::schema_for!(RecipeFileConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| ChoreError::Config(format!("Failed to render schema: {}", e)))
}
