use indexmap::IndexMap;

/// A runtime value in the Y language.
///
/// This covers the scalar and container types a YAML document can hold.
/// There is a single number type: every numeric literal and every
/// arithmetic result is a float, regardless of how the source text spelled
/// it. Mappings preserve insertion order, which is what keeps a loaded
/// document's key order stable across edits.
///
/// # Examples
///
/// ```
/// use y_lang::Value;
/// use indexmap::IndexMap;
///
/// let null = Value::Null;
/// let boolean = Value::Boolean(true);
/// let number = Value::Number(42.0);
/// let string = Value::String("hello".to_string());
///
/// let sequence = Value::Sequence(vec![Value::Number(1.0), Value::Number(2.0)]);
///
/// let mut entries = IndexMap::new();
/// entries.insert("key".to_string(), Value::String("value".to_string()));
/// let mapping = Value::Mapping(entries);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// YAML null
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Number(f64),

    /// UTF-8 string
    String(String),

    /// Ordered list of values, addressed by index
    Sequence(Vec<Value>),

    /// Key-to-value mapping, preserving insertion order
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Get as a number, if this value is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}
