/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
    /// Modulo (`%`)
    Modulo,
    /// Exponentiation (`^`)
    Power,
}

impl MathOp {
    /// The source-text symbol, for error messages.
    pub fn symbol(&self) -> &'static str {
        match self {
            MathOp::Add => "+",
            MathOp::Subtract => "-",
            MathOp::Multiply => "*",
            MathOp::Divide => "/",
            MathOp::Modulo => "%",
            MathOp::Power => "^",
        }
    }
}
