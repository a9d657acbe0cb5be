//! Variable substitution and one-time toolchain lookups
//!
//! Command lines and recipe environment values may reference variables as
//! `{{ name }}`. A literal `{{` is written `{{{{`. Variables backed by a command
//! are resolved lazily, at most once per [`VariableResolver`], by running the
//! command through the shell and capturing its trimmed standard output.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::debug;

use crate::configs::recipes::VariableConfig;
use crate::execution::command::shell_command;
use crate::types::{ChoreError, ChoreResult};

/// A piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    Text(&'a str),
    Variable(&'a str),
}

/// Split a template into literal text and variable references
pub fn parse_template(template: &str) -> ChoreResult<Vec<Fragment<'_>>> {
    let mut fragments = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        if rest[start..].starts_with("{{{{") {
            fragments.push(Fragment::Text(&rest[..start + 2]));
            rest = &rest[start + 4..];
            continue;
        }

        if start > 0 {
            fragments.push(Fragment::Text(&rest[..start]));
        }

        let after_open = &rest[start + 2..];
        let end = after_open.find("}}").ok_or_else(|| {
            ChoreError::Variable(format!("Unterminated '{{{{' in '{}'", template))
        })?;

        let name = after_open[..end].trim();
        if !is_valid_name(name) {
            return Err(ChoreError::Variable(format!(
                "Invalid variable reference '{{{{{}}}}}' in '{}'",
                &after_open[..end],
                template
            )));
        }

        fragments.push(Fragment::Variable(name));
        rest = &after_open[end + 2..];
    }

    if !rest.is_empty() {
        fragments.push(Fragment::Text(rest));
    }

    Ok(fragments)
}

/// Names of all variables a template references, without duplicates
pub fn referenced_variables(template: &str) -> ChoreResult<BTreeSet<String>> {
    Ok(parse_template(template)?
        .into_iter()
        .filter_map(|fragment| match fragment {
            Fragment::Variable(name) => Some(name.to_string()),
            Fragment::Text(_) => None,
        })
        .collect())
}

/// Replace every variable reference in `template` using `lookup`
pub fn substitute<'v, F>(template: &str, lookup: F) -> ChoreResult<String>
where
    F: Fn(&str) -> Option<&'v str>,
{
    let mut output = String::with_capacity(template.len());
    for fragment in parse_template(template)? {
        match fragment {
            Fragment::Text(text) => output.push_str(text),
            Fragment::Variable(name) => {
                let value = lookup(name).ok_or_else(|| {
                    ChoreError::Variable(format!("Variable '{}' has no value", name))
                })?;
                output.push_str(value);
            }
        }
    }
    Ok(output)
}

/// Variable names start with a letter or `_` and continue with
/// alphanumerics, `_` or `-`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Resolves variables on demand and remembers their values
pub struct VariableResolver {
    root: PathBuf,
    env: BTreeMap<String, String>,
    definitions: HashMap<String, VariableConfig>,
    resolved: HashMap<String, String>,
}

impl VariableResolver {
    pub fn new(root: &Path, env: BTreeMap<String, String>, variables: &[VariableConfig]) -> Self {
        Self {
            root: root.to_path_buf(),
            env,
            definitions: variables
                .iter()
                .map(|v| (v.name.clone(), v.clone()))
                .collect(),
            resolved: HashMap::new(),
        }
    }

    /// Value of an already resolved variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.resolved.get(name).map(String::as_str)
    }

    /// Resolve every named variable that is not resolved yet
    pub async fn resolve_all<'n, I>(&mut self, names: I) -> ChoreResult<()>
    where
        I: IntoIterator<Item = &'n String>,
    {
        for name in names {
            self.resolve(name).await?;
        }
        Ok(())
    }

    /// Resolve a variable, running its lookup command on first use only
    pub async fn resolve(&mut self, name: &str) -> ChoreResult<&str> {
        if !self.resolved.contains_key(name) {
            let definition = self.definitions.get(name).ok_or_else(|| {
                ChoreError::Variable(format!("Variable '{}' is not defined", name))
            })?;

            let value = match (&definition.value, &definition.command) {
                (Some(value), _) => value.clone(),
                (None, Some(command)) => self.run_lookup(name, command).await?,
                (None, None) => {
                    return Err(ChoreError::Variable(format!(
                        "Variable '{}' has neither a command nor a value",
                        name
                    )))
                }
            };

            debug!(variable = name, value = %value, "resolved variable");
            self.resolved.insert(name.to_string(), value);
        }

        Ok(self.resolved[name].as_str())
    }

    /// Substitute a template using already resolved values
    pub fn render(&self, template: &str) -> ChoreResult<String> {
        substitute(template, |name| self.get(name))
    }

    async fn run_lookup(&self, name: &str, command: &str) -> ChoreResult<String> {
        debug!(variable = name, command, "running variable lookup");

        let output = shell_command(command, &self.root, &self.env)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| {
                ChoreError::Variable(format!(
                    "Failed to run lookup for variable '{}': {}",
                    name, e
                ))
            })?;

        if !output.status.success() {
            return Err(ChoreError::CommandFailed {
                command: command.to_string(),
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| {
            ChoreError::Variable(format!(
                "Lookup for variable '{}' produced non UTF-8 output",
                name
            ))
        })?;

        Ok(stdout.trim_end_matches(['\n', '\r']).to_string())
    }
}
