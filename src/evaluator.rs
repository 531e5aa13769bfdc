use std::fmt;

use crate::{
    ast::{Expr, MathOp, Subreference},
    reference::{Reference, Step},
    value::Value,
};

/// The result of one evaluation step: a plain value, or a reference into
/// the document.
///
/// References flow through pipes un-dereferenced so later stages can keep
/// descending or assign through them; callers that want a plain value
/// collapse with [`Evaluated::resolve`], which is idempotent.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    Value(Value),
    Reference(Reference),
}

impl Evaluated {
    /// Collapse to a plain value. Dereferencing a plain value returns it
    /// unchanged; an absent reference reads as null.
    pub fn resolve(&self) -> Value {
        match self {
            Evaluated::Value(value) => value.clone(),
            Evaluated::Reference(reference) => reference.resolve(),
        }
    }

    /// Begin a new reference chain from this context.
    ///
    /// Rebasing from a reference snapshots its recorded path; rebasing from
    /// a plain value produces a detached reference that can be read but not
    /// written through.
    fn rebase(&self) -> Reference {
        match self {
            Evaluated::Reference(reference) => reference.clone(),
            Evaluated::Value(value) => Reference::detached(value.clone()),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Evaluated::Value(value) => value.type_name(),
            Evaluated::Reference(_) => "reference",
        }
    }
}

/// Errors that can occur during expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A path step or operator applied to a value of the wrong kind
    TypeError(String),

    /// Assignment target did not evaluate to a reference
    InvalidAssignmentTarget(String),

    /// Assignment through a reference with no writable location
    /// (the bare root, or a reference detached from the document)
    UnsupportedAssignment(String),

    /// Division or modulo by zero
    DivisionByZero,

    /// Arithmetic produced a non-finite result
    NonFiniteResult(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "type error: {}", msg),
            EvalError::InvalidAssignmentTarget(found) => {
                write!(f, "can only assign to a reference, got {}", found)
            }
            EvalError::UnsupportedAssignment(msg) => {
                write!(f, "unsupported assignment: {}", msg)
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::NonFiniteResult(op) => {
                write!(f, "'{}' produced a non-finite result", op)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// The expression interpreter.
///
/// Owns the loaded document root and walks parsed expressions against it.
/// Every node evaluates to a pair of result and write flag; the flag is
/// true only when the node actually mutated the document. The implicit
/// context (`.`) is an explicit parameter threaded through the recursive
/// calls, so a pipe or reference substituting its own context can never
/// leak it into sibling evaluations.
///
/// # Examples
///
/// ```
/// use y_lang::{document, Evaluator, Lexer, Parser, Value};
///
/// let mut evaluator = Evaluator::new();
/// evaluator.load(document::load_str("a:\n  b: 7").unwrap());
///
/// let mut parser = Parser::new(Lexer::new(".a.b")).unwrap();
/// let expr = parser.parse().unwrap();
///
/// assert_eq!(evaluator.interpret(&expr).unwrap(), Value::Number(7.0));
/// ```
pub struct Evaluator {
    root: Value,
}

impl Evaluator {
    /// Creates an evaluator holding an empty document.
    pub fn new() -> Self {
        Evaluator {
            root: Value::Mapping(indexmap::IndexMap::new()),
        }
    }

    /// Install a document root to evaluate against.
    pub fn load(&mut self, root: Value) {
        self.root = root;
    }

    /// The current document root, including any mutations applied so far.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Evaluate an expression and return its dereferenced value together
    /// with the write flag.
    pub fn eval_expression(&mut self, expr: &Expr) -> Result<(Value, bool), EvalError> {
        let context = Evaluated::Reference(Reference::to_root(&self.root));
        let (result, wrote) = self.eval(expr, &context)?;
        Ok((result.resolve(), wrote))
    }

    /// Evaluate an expression the way the command surface does: after a
    /// write, the visible result is the whole mutated document.
    pub fn interpret(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        let (value, wrote) = self.eval_expression(expr)?;
        if wrote {
            return Ok(self.root.clone());
        }
        Ok(value)
    }

    fn eval(&mut self, expr: &Expr, context: &Evaluated) -> Result<(Evaluated, bool), EvalError> {
        match expr {
            Expr::Pipe(stages) => self.eval_pipe(stages, context),
            Expr::Assignment { target, source } => self.eval_assignment(target, source, context),
            Expr::Math { op, left, right } => self.eval_math(*op, left, right, context),
            Expr::Call { name: _, args } => {
                // Extension seam: arguments are evaluated left to right for
                // their effects, the call itself produces null.
                for arg in args {
                    self.eval(arg, context)?;
                }
                Ok((Evaluated::Value(Value::Null), false))
            }
            Expr::ReferenceRoot(steps) => {
                let mut reference = Reference::to_root(&self.root);
                apply_steps(&mut reference, steps)?;
                Ok((Evaluated::Reference(reference), false))
            }
            Expr::ReferenceContext(steps) => {
                let mut reference = context.rebase();
                apply_steps(&mut reference, steps)?;
                Ok((Evaluated::Reference(reference), false))
            }
            Expr::Number(n) => Ok((Evaluated::Value(Value::Number(*n)), false)),
            Expr::String(s) => Ok((Evaluated::Value(Value::String(s.clone())), false)),
            Expr::Boolean(b) => Ok((Evaluated::Value(Value::Boolean(*b)), false)),
            Expr::Null => Ok((Evaluated::Value(Value::Null), false)),
        }
    }

    /// Thread the context through the stages in order.
    ///
    /// Each stage sees the previous stage's un-dereferenced result as its
    /// context; the pipe itself reports the last stage's result and write
    /// flag. The caller's context is untouched.
    fn eval_pipe(
        &mut self,
        stages: &[Expr],
        context: &Evaluated,
    ) -> Result<(Evaluated, bool), EvalError> {
        let mut current = context.clone();
        let mut outcome = (current.clone(), false);
        for stage in stages {
            outcome = self.eval(stage, &current)?;
            current = outcome.0.clone();
        }
        Ok(outcome)
    }

    /// Evaluate the target without dereferencing, the source with full
    /// dereferencing against the ambient context, then write.
    ///
    /// The assignment's own value is the assigned source value, so a pipe
    /// stage after an assignment sees what was stored, not the document.
    fn eval_assignment(
        &mut self,
        target: &Expr,
        source: &Expr,
        context: &Evaluated,
    ) -> Result<(Evaluated, bool), EvalError> {
        let (sink, _) = self.eval(target, context)?;
        let reference = match sink {
            Evaluated::Reference(reference) => reference,
            other => {
                return Err(EvalError::InvalidAssignmentTarget(
                    other.describe().to_string(),
                ))
            }
        };
        let (value, _) = self.eval(source, context)?;
        let value = value.resolve();
        reference.set(&mut self.root, value.clone())?;
        Ok((Evaluated::Value(value), true))
    }

    fn eval_math(
        &mut self,
        op: MathOp,
        left: &Expr,
        right: &Expr,
        context: &Evaluated,
    ) -> Result<(Evaluated, bool), EvalError> {
        let (left_value, _) = self.eval(left, context)?;
        let (right_value, _) = self.eval(right, context)?;
        let (left_value, right_value) = (left_value.resolve(), right_value.resolve());

        let (a, b) = match (left_value.as_number(), right_value.as_number()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(EvalError::TypeError(format!(
                    "cannot apply '{}' to {} and {}",
                    op.symbol(),
                    left_value.type_name(),
                    right_value.type_name()
                )))
            }
        };

        let result = match op {
            MathOp::Add => a + b,
            MathOp::Subtract => a - b,
            MathOp::Multiply => a * b,
            MathOp::Divide => {
                if b == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                a / b
            }
            MathOp::Modulo => {
                if b == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                a % b
            }
            MathOp::Power => a.powf(b),
        };

        if !result.is_finite() {
            return Err(EvalError::NonFiniteResult(op.symbol().to_string()));
        }
        Ok((Evaluated::Value(Value::Number(result)), false))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_steps(reference: &mut Reference, steps: &[Subreference]) -> Result<(), EvalError> {
    for step in steps {
        match step {
            Subreference::ByKey(key) => reference.descend(Step::Key(key.clone()))?,
            Subreference::ByIndex(index) => reference.descend(Step::Index(*index))?,
            // Identity passthrough, reserved for whole-sequence semantics
            Subreference::ArrayMarker => {}
        }
    }
    Ok(())
}
