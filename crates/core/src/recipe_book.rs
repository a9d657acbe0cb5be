//! Validated view of a recipe file
//!
//! A [`RecipeBook`] is only constructed from a configuration that satisfies
//! every load-time rule: unique recipe and variable names, prerequisites that
//! exist, variable references that resolve and an acyclic prerequisite graph.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;

use crate::configs::recipes::{RecipeConfig, RecipeFileConfig, VariableConfig};
use crate::types::{ChoreError, ChoreResult};
use crate::variables::{is_valid_name, referenced_variables};

#[derive(Debug)]
pub struct RecipeBook {
    config: RecipeFileConfig,
    index: HashMap<String, usize>,
    /// Variables referenced by each recipe's own commands and env
    recipe_variables: HashMap<String, BTreeSet<String>>,
    /// Edge `recipe -> prerequisite`
    pub dep_graph: DiGraph<String, ()>,
}

impl RecipeBook {
    pub fn from_config(config: RecipeFileConfig) -> ChoreResult<Self> {
        let mut index = HashMap::new();
        for (position, recipe) in config.recipes.iter().enumerate() {
            if recipe.name.trim().is_empty() {
                return Err(ChoreError::Config("Recipe names cannot be empty".to_string()));
            }
            if index.insert(recipe.name.clone(), position).is_some() {
                return Err(ChoreError::Config(format!(
                    "Recipe '{}' is defined more than once",
                    recipe.name
                )));
            }
        }

        let variable_names = validate_variables(config.variables.as_deref().unwrap_or_default())?;

        for (key, value) in config.env.iter().flatten() {
            let references = referenced_variables(value).map(|names| !names.is_empty());
            if references.unwrap_or(false) {
                return Err(ChoreError::Config(format!(
                    "File-level env '{}' cannot reference variables",
                    key
                )));
            }
        }

        let mut recipe_variables = HashMap::new();
        for recipe in &config.recipes {
            let mut seen_deps = HashSet::new();
            for dep in recipe.dependencies() {
                if !seen_deps.insert(dep) {
                    return Err(ChoreError::Config(format!(
                        "Recipe '{}' lists prerequisite '{}' more than once",
                        recipe.name, dep
                    )));
                }
                if !index.contains_key(dep) {
                    return Err(ChoreError::Config(format!(
                        "Recipe '{}' depends on '{}' which was not found",
                        recipe.name, dep
                    )));
                }
            }

            let used = variables_used_by(recipe)?;
            if let Some(unknown) = used.iter().find(|name| !variable_names.contains(*name)) {
                return Err(ChoreError::Config(format!(
                    "Recipe '{}' references undefined variable '{}'",
                    recipe.name, unknown
                )));
            }
            recipe_variables.insert(recipe.name.clone(), used);
        }

        if let Some(default) = &config.default {
            if !index.contains_key(default) {
                return Err(ChoreError::Config(format!(
                    "Default recipe '{}' was not found",
                    default
                )));
            }
        }

        let dep_graph = build_dependency_graph(&config.recipes, &index);
        let cycles = find_cycles(&dep_graph);
        if !cycles.is_empty() {
            return Err(ChoreError::Config(format!(
                "Circular dependency detected: {}",
                describe_cycles(&cycles)
            )));
        }

        Ok(Self {
            config,
            index,
            recipe_variables,
            dep_graph,
        })
    }

    /// Name and description from the top of the recipe file
    pub fn title(&self) -> (Option<&str>, Option<&str>) {
        (
            self.config.name.as_deref(),
            self.config.description.as_deref(),
        )
    }

    pub fn recipes(&self) -> &[RecipeConfig] {
        &self.config.recipes
    }

    pub fn get(&self, name: &str) -> Option<&RecipeConfig> {
        self.index.get(name).map(|&i| &self.config.recipes[i])
    }

    pub fn variables(&self) -> &[VariableConfig] {
        self.config.variables.as_deref().unwrap_or_default()
    }

    /// Environment exported to every command
    pub fn file_env(&self) -> BTreeMap<String, String> {
        self.config.env.clone().unwrap_or_default()
    }

    /// The recipe run when none is named
    pub fn default_recipe(&self) -> Option<&str> {
        self.config
            .default
            .as_deref()
            .or_else(|| self.config.recipes.first().map(|r| r.name.as_str()))
    }

    /// Variables the given recipe's own commands and env reference
    pub fn variables_for(&self, name: &str) -> impl Iterator<Item = &String> {
        self.recipe_variables.get(name).into_iter().flatten()
    }

    /// Order in which `targets` and their prerequisites run
    ///
    /// Prerequisites run before the recipe that names them, in listed order.
    /// Every recipe appears once, at its first position.
    pub fn resolve_execution_order(&self, targets: &[String]) -> ChoreResult<Vec<String>> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();

        for target in targets {
            if !self.index.contains_key(target) {
                return Err(ChoreError::Recipe(format!("Recipe '{}' not found", target)));
            }
            self.visit(target, &mut visited, &mut order);
        }

        Ok(order)
    }

    fn visit(&self, name: &str, visited: &mut HashSet<String>, order: &mut Vec<String>) {
        if !visited.insert(name.to_string()) {
            return;
        }
        if let Some(recipe) = self.get(name) {
            for dep in recipe.dependencies() {
                self.visit(dep, visited, order);
            }
        }
        order.push(name.to_string());
    }
}

fn validate_variables(variables: &[VariableConfig]) -> ChoreResult<HashSet<String>> {
    let mut names = HashSet::new();
    for variable in variables {
        if !is_valid_name(&variable.name) {
            return Err(ChoreError::Config(format!(
                "Invalid variable name '{}'",
                variable.name
            )));
        }
        if !names.insert(variable.name.clone()) {
            return Err(ChoreError::Config(format!(
                "Variable '{}' is defined more than once",
                variable.name
            )));
        }
        if variable.command.is_some() == variable.value.is_some() {
            return Err(ChoreError::Config(format!(
                "Variable '{}' must have exactly one of 'command' or 'value'",
                variable.name
            )));
        }
    }
    Ok(names)
}

fn variables_used_by(recipe: &RecipeConfig) -> ChoreResult<BTreeSet<String>> {
    let mut used = BTreeSet::new();
    let templates = recipe
        .commands
        .iter()
        .chain(recipe.env.iter().flat_map(|env| env.values()));
    for template in templates {
        let names = referenced_variables(template).map_err(|e| {
            ChoreError::Config(format!("Recipe '{}': {}", recipe.name, e))
        })?;
        used.extend(names);
    }
    Ok(used)
}

fn build_dependency_graph(
    recipes: &[RecipeConfig],
    index: &HashMap<String, usize>,
) -> DiGraph<String, ()> {
    let mut graph = DiGraph::<String, ()>::new();
    let nodes: Vec<NodeIndex> = recipes
        .iter()
        .map(|recipe| graph.add_node(recipe.name.clone()))
        .collect();

    for (from, recipe) in recipes.iter().enumerate() {
        for dep in recipe.dependencies() {
            if let Some(&to) = index.get(dep) {
                graph.add_edge(nodes[from], nodes[to], ());
            }
        }
    }

    graph
}

/// Strongly connected components with more than one recipe, plus self-loops
fn find_cycles(graph: &DiGraph<String, ()>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = kosaraju_scc(graph)
        .into_iter()
        .filter_map(|component| {
            if component.len() > 1 {
                let mut cycle = component
                    .iter()
                    .map(|node| graph[*node].clone())
                    .collect::<Vec<_>>();
                cycle.sort();
                Some(cycle)
            } else {
                let node = component[0];
                if graph.contains_edge(node, node) {
                    Some(vec![graph[node].clone()])
                } else {
                    None
                }
            }
        })
        .collect();

    cycles.sort();
    cycles
}

fn describe_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|cycle| {
            let mut path = cycle.clone();
            if let Some(first) = path.first().cloned() {
                path.push(first);
            }
            path.join(" -> ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::recipes::parse_recipe_file;

    fn book(yaml: &str) -> ChoreResult<RecipeBook> {
        RecipeBook::from_config(parse_recipe_file(yaml).unwrap())
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    const TOOLCHAIN: &str = r#"
variables:
  - name: nightly_rustc
    command: rustup which --toolchain nightly rustc
recipes:
  - name: fmt
    commands: [cargo fmt]
  - name: clippy
    env:
      RUSTC: "{{ nightly_rustc }}"
    commands: [cargo clippy]
  - name: clippy-fix
    commands: [cargo clippy --fix]
  - name: lint
    dependencies: [fmt, clippy]
  - name: fix
    dependencies: [fmt, clippy-fix]
  - name: test
    commands: [cargo test]
"#;

    #[test]
    fn test_prerequisites_run_first_in_listed_order() {
        let book = book(TOOLCHAIN).unwrap();
        assert_eq!(
            book.resolve_execution_order(&names(&["lint"])).unwrap(),
            names(&["fmt", "clippy", "lint"])
        );
    }

    #[test]
    fn test_shared_prerequisites_run_once() {
        let book = book(TOOLCHAIN).unwrap();
        assert_eq!(
            book.resolve_execution_order(&names(&["lint", "fix", "fmt"]))
                .unwrap(),
            names(&["fmt", "clippy", "lint", "clippy-fix", "fix"])
        );
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let book = book(TOOLCHAIN).unwrap();
        let err = book
            .resolve_execution_order(&names(&["deploy"]))
            .unwrap_err();
        assert!(err.to_string().contains("Recipe 'deploy' not found"));
    }

    #[test]
    fn test_default_recipe_falls_back_to_first() {
        let book = book(TOOLCHAIN).unwrap();
        assert_eq!(book.default_recipe(), Some("fmt"));
    }

    #[test]
    fn test_variables_are_tracked_per_recipe() {
        let book = book(TOOLCHAIN).unwrap();
        assert_eq!(
            book.variables_for("clippy").collect::<Vec<_>>(),
            vec!["nightly_rustc"]
        );
        assert_eq!(book.variables_for("fmt").count(), 0);
    }

    #[test]
    fn test_duplicate_recipe_names_are_rejected() {
        let err = book(
            r#"
recipes:
  - name: fmt
  - name: fmt
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("defined more than once"));
    }

    #[test]
    fn test_repeated_prerequisite_is_rejected() {
        let err = book(
            r#"
recipes:
  - name: show
  - name: twice
    dependencies: [show, show]
"#,
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("Recipe 'twice' lists prerequisite 'show' more than once"));
    }

    #[test]
    fn test_dangling_prerequisite_is_rejected() {
        let err = book(
            r#"
recipes:
  - name: lint
    dependencies: [fmt]
"#,
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("Recipe 'lint' depends on 'fmt' which was not found"));
    }

    #[test]
    fn test_undefined_variable_is_rejected() {
        let err = book(
            r#"
recipes:
  - name: clippy
    commands: ["{{ nightly_clippy }} --version"]
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("undefined variable 'nightly_clippy'"));
    }

    #[test]
    fn test_variable_needs_exactly_one_source() {
        let err = book(
            r#"
variables:
  - name: both
    command: echo a
    value: b
recipes: []
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn test_missing_default_is_rejected() {
        let err = book(
            r#"
default: ci
recipes:
  - name: test
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Default recipe 'ci'"));
    }

    #[test]
    fn test_cycles_are_reported() {
        let err = book(
            r#"
recipes:
  - name: a
    dependencies: [b]
  - name: b
    dependencies: [a]
  - name: c
    dependencies: [c]
"#,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Circular dependency detected"));
        assert!(message.contains("a -> b -> a"));
        assert!(message.contains("c -> c"));
    }

    #[test]
    fn test_file_env_cannot_reference_variables() {
        let err = book(
            r#"
env:
  RUSTC: "{{ rustc }}"
variables:
  - name: rustc
    value: rustc
recipes: []
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("File-level env 'RUSTC'"));
    }

    #[test]
    fn test_graph_has_edge_per_prerequisite() {
        let book = book(TOOLCHAIN).unwrap();
        assert_eq!(book.dep_graph.node_count(), 6);
        assert_eq!(book.dep_graph.edge_count(), 4);
    }
}
