use thiserror::Error;

/// The main error type for chore operations
#[derive(Debug, Error)]
pub enum ChoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Recipe error: {0}")]
    Recipe(String),

    #[error("Variable error: {0}")]
    Variable(String),

    /// An external command exited unsuccessfully. `code` is `None` when the
    /// child was terminated by a signal.
    #[error("Command '{command}' failed with exit code {}", display_code(.code))]
    CommandFailed { command: String, code: Option<i32> },
}

impl ChoreError {
    /// Exit status the process should report for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ChoreError::CommandFailed { code: Some(code), .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none (terminated by signal)".to_string())
}

/// Result type alias for chore operations
pub type ChoreResult<T> = Result<T, ChoreError>;
