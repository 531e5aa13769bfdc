//! Command-line execution for the `y` binary.
//!
//! The binary itself only parses arguments and moves bytes; everything
//! observable lives here so it can be exercised without a process:
//! load the document, evaluate each expression in order against it, and
//! serialize the final document.

use std::fmt;
use std::io;

use crate::{
    document::{self, DocumentError},
    evaluator::{EvalError, Evaluator},
    lexer::Lexer,
    output::{to_yaml_with, EmitOptions},
    parser::{ParseError, Parser},
};

/// Options for one invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Expressions to evaluate, in order
    pub expressions: Vec<String>,
    /// Output formatting
    pub emit: EmitOptions,
}

/// Errors that can occur during CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// The document could not be loaded
    Document(DocumentError),
    /// An expression failed to parse
    Parse { expression: String, error: ParseError },
    /// An expression failed to evaluate
    Eval { expression: String, error: EvalError },
    /// IO error reading the source or writing the result
    Io(io::Error),
    /// In-place editing requested for standard input
    InPlaceStdin,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Document(e) => write!(f, "{}", e),
            CliError::Parse { expression, error } => {
                write!(f, "syntax error in '{}': {}", expression, error)
            }
            CliError::Eval { expression, error } => {
                write!(f, "error evaluating '{}': {}", expression, error)
            }
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::InPlaceStdin => write!(f, "cannot edit standard input in place"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Document(e) => Some(e),
            CliError::Parse { error, .. } => Some(error),
            CliError::Eval { error, .. } => Some(error),
            CliError::Io(e) => Some(e),
            CliError::InPlaceStdin => None,
        }
    }
}

impl From<DocumentError> for CliError {
    fn from(e: DocumentError) -> Self {
        CliError::Document(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Evaluate every expression against the document in `source` and return
/// the serialized result document.
///
/// Expressions share one document; each one sees the mutations of those
/// before it. The first failure aborts the run, so a failing invocation
/// emits nothing.
pub fn execute(source: &str, options: &RunOptions) -> Result<String, CliError> {
    let mut evaluator = Evaluator::new();
    evaluator.load(document::load_str(source)?);

    for expression in &options.expressions {
        let mut parser =
            Parser::new(Lexer::new(expression)).map_err(|error| CliError::Parse {
                expression: expression.clone(),
                error,
            })?;
        let parsed = parser.parse().map_err(|error| CliError::Parse {
            expression: expression.clone(),
            error,
        })?;
        evaluator.interpret(&parsed).map_err(|error| CliError::Eval {
            expression: expression.clone(),
            error,
        })?;
    }

    Ok(to_yaml_with(evaluator.root(), options.emit))
}
