use crate::ast::MathOp;

/// Abstract Syntax Tree node representing a parsed expression.
///
/// The AST is the internal representation of an expression after parsing.
/// It captures structure only; whether a given assignment target is valid,
/// or a path step fits the value it lands on, is decided at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Pipe chain with at least two stages
    ///
    /// Stages evaluate left to right; each stage sees the previous stage's
    /// (un-dereferenced) result as its context. A chain is kept as one flat
    /// stage list, never as nested pairs.
    ///
    /// # Example
    /// ```text
    /// .a | .b | [0]
    /// ```
    Pipe(Vec<Expr>),

    /// Assignment
    ///
    /// The target may be any expression syntactically; it must evaluate to
    /// a reference. The source is evaluated against the ambient context.
    ///
    /// # Example
    /// ```text
    /// .a.b.c[0] = 123
    /// ```
    Assignment {
        target: Box<Expr>,
        source: Box<Expr>,
    },

    /// Arithmetic operation
    Math {
        op: MathOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call
    ///
    /// Arguments evaluate left to right. Calls currently produce null; the
    /// form is an extension seam for a future function library.
    ///
    /// # Example
    /// ```text
    /// custom_fn(1 + 2, 3)
    /// ```
    Call { name: String, args: Vec<Expr> },

    /// Reference anchored at the document root (`$`), with zero or more
    /// navigation steps
    ///
    /// # Examples
    /// ```text
    /// $
    /// $.a.b[0]
    /// ```
    ReferenceRoot(Vec<Subreference>),

    /// Reference anchored at the current context, with zero or more
    /// navigation steps
    ///
    /// Zero steps is the bare `.`.
    ///
    /// # Examples
    /// ```text
    /// .
    /// .a.b
    /// [0]
    /// ```
    ReferenceContext(Vec<Subreference>),

    // Constants
    /// Number literal, always a float regardless of the source spelling
    Number(f64),

    /// String literal with the outer quotes stripped and the interior kept
    /// verbatim (no escape processing)
    String(String),

    /// Boolean literal
    Boolean(bool),

    /// Null literal
    Null,
}

/// One navigation step within a reference chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Subreference {
    /// Mapping lookup by key (`.name` or `."quoted name"`)
    ByKey(String),

    /// Sequence lookup by index (`[0]`)
    ByIndex(usize),

    /// Empty brackets (`[]`); identity passthrough, reserved for future
    /// whole-sequence operations
    ArrayMarker,
}
