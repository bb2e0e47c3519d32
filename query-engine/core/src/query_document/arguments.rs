use super::{ArgumentDecodeError, VariableBindings};
use graphql_parser::query::Value;
use std::collections::BTreeMap;

/// Outcome of compiling one piece of an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compiled {
    /// The piece was written to the buffer.
    Written,
    /// The piece referenced an unbound variable and was left out; the
    /// enclosing piece is unaffected.
    Skipped,
    /// The piece referenced the unbound variable and has to be left out by
    /// the enclosing piece.
    Missing(String),
}

/// Where the compiler currently is, syntactically.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    object: bool,
    array: bool,
    argument: bool,
    attribute: bool,
    /// The context produces a value, so literal tokens belong in the output.
    value: bool,
    /// No element has been written in this context yet.
    first: bool,
}

impl Context {
    fn on_base() -> Self {
        Context {
            first: true,
            ..Default::default()
        }
    }

    fn on_argument() -> Self {
        Context {
            argument: true,
            first: true,
            ..Default::default()
        }
    }

    fn on_array() -> Self {
        Context {
            array: true,
            value: true,
            first: true,
            ..Default::default()
        }
    }

    fn on_object() -> Self {
        Context {
            object: true,
            first: true,
            ..Default::default()
        }
    }

    fn on_attribute() -> Self {
        Context {
            attribute: true,
            first: true,
            ..Default::default()
        }
    }

    /// Values keep the object and array flags of their surroundings, which
    /// is what tells an array element apart from an argument value.
    fn on_value(parent: &Context) -> Self {
        Context {
            object: parent.object,
            array: parent.array,
            value: true,
            first: true,
            ..Default::default()
        }
    }

    fn emits_leaves(&self) -> bool {
        self.object || self.argument || self.attribute || self.value
    }
}

/// Compiles the arguments of one field into a JSON object, resolving
/// variables against `variables`.
///
/// A reference to an unbound variable removes the smallest enclosing piece
/// that can be dropped: an array element, an object field or a whole
/// argument. Everything around it is compiled as if the piece was never
/// written.
///
/// ```text
/// (a: $x, b: [$y, 1, $z])   with x = 10, z = "zz", y unbound
/// {"a":10,"b":[1,"zz"]}
/// ```
pub struct ArgumentCompiler<'v> {
    variables: &'v VariableBindings,
    stack: Vec<Context>,
    buffer: String,
    /// First literal that has no JSON form, e.g. an overflowing float.
    unrepresentable: Option<String>,
}

impl<'v> ArgumentCompiler<'v> {
    pub fn new(variables: &'v VariableBindings) -> Self {
        ArgumentCompiler {
            variables,
            stack: Vec::new(),
            buffer: String::new(),
            unrepresentable: None,
        }
    }

    #[tracing::instrument(name = "compile_arguments", skip_all, fields(arguments = arguments.len()))]
    pub fn compile(mut self, arguments: &[(String, Value<'_, String>)]) -> Result<String, ArgumentDecodeError> {
        self.stack.push(Context::on_base());
        self.leaf("(");
        self.buffer.push('{');

        for (name, value) in arguments {
            self.argument(name, value);
        }

        self.buffer.push('}');
        self.leaf(")");
        self.stack.pop();

        debug_assert!(self.stack.is_empty());

        if let Some(literal) = self.unrepresentable {
            return Err(ArgumentDecodeError::UnrepresentableLiteral { literal });
        }

        tracing::debug!(buffer = self.buffer.as_str(), "compiled arguments");

        Ok(self.buffer)
    }

    /// `name: value` in the argument list.
    fn argument(&mut self, name: &str, value: &Value<'_, String>) -> Compiled {
        let mark = self.buffer.len();
        let first = self.separate();

        self.stack.push(Context::on_argument());
        self.attribute_name(name);
        self.leaf(":");
        let outcome = self.value(value);
        self.stack.pop();

        match outcome {
            Compiled::Missing(variable) => {
                self.roll_back(mark, first);
                tracing::trace!(argument = name, variable = variable.as_str(), "dropping argument");
                Compiled::Skipped
            }
            outcome => outcome,
        }
    }

    /// Any value position: argument value, array element or object field
    /// value.
    fn value(&mut self, value: &Value<'_, String>) -> Compiled {
        let mark = self.buffer.len();
        let first = self.separate();
        let parent = self.top();

        self.stack.push(Context::on_value(&parent));
        let outcome = match value {
            Value::Variable(name) => self.variable(name),
            Value::List(items) => self.array(items),
            Value::Object(fields) => self.object(fields),
            Value::Int(n) => match n.as_i64() {
                Some(n) => self.literal(&n.to_string()),
                None => self.unrepresentable(format!("{n:?}")),
            },
            Value::Float(f) => match serde_json::Number::from_f64(*f) {
                Some(n) => self.literal(&n.to_string()),
                None => self.unrepresentable(f.to_string()),
            },
            Value::String(s) | Value::Enum(s) => self.literal(&serde_json::Value::String(s.clone()).to_string()),
            Value::Boolean(b) => self.literal(if *b { "true" } else { "false" }),
            Value::Null => self.literal("null"),
        };
        self.stack.pop();

        match outcome {
            Compiled::Missing(variable) => {
                self.roll_back(mark, first);

                if parent.array {
                    tracing::trace!(variable = variable.as_str(), "dropping array element");
                    Compiled::Skipped
                } else {
                    Compiled::Missing(variable)
                }
            }
            outcome => outcome,
        }
    }

    fn array(&mut self, items: &[Value<'_, String>]) -> Compiled {
        self.stack.push(Context::on_array());
        self.leaf("[");

        for item in items {
            self.value(item);
        }

        self.leaf("]");
        self.stack.pop();

        Compiled::Written
    }

    fn object(&mut self, fields: &BTreeMap<String, Value<'_, String>>) -> Compiled {
        self.stack.push(Context::on_object());
        self.leaf("{");

        for (name, value) in fields {
            self.object_field(name, value);
        }

        self.leaf("}");
        self.stack.pop();

        Compiled::Written
    }

    /// `name: value` inside an object literal.
    fn object_field(&mut self, name: &str, value: &Value<'_, String>) -> Compiled {
        let mark = self.buffer.len();
        let first = self.separate();

        self.stack.push(Context::on_object());
        self.attribute_name(name);
        self.leaf(":");
        let outcome = self.value(value);
        self.stack.pop();

        match outcome {
            Compiled::Missing(variable) => {
                self.roll_back(mark, first);
                tracing::trace!(field = name, variable = variable.as_str(), "dropping object field");
                Compiled::Skipped
            }
            outcome => outcome,
        }
    }

    fn attribute_name(&mut self, name: &str) {
        self.stack.push(Context::on_attribute());
        self.buffer.push('"');
        self.leaf(name);
        self.buffer.push('"');
        self.stack.pop();
    }

    fn variable(&mut self, name: &str) -> Compiled {
        match self.variables.get(name) {
            Some(literal) => {
                self.leaf(literal);
                Compiled::Written
            }
            None => {
                tracing::warn!(variable = name, "variable is not bound, omitting the value that references it");
                Compiled::Missing(name.to_owned())
            }
        }
    }

    fn literal(&mut self, text: &str) -> Compiled {
        self.leaf(text);
        Compiled::Written
    }

    /// Nothing is written; `compile` fails once the walk is over.
    fn unrepresentable(&mut self, literal: String) -> Compiled {
        tracing::warn!(literal = literal.as_str(), "literal has no JSON representation");
        self.unrepresentable.get_or_insert(literal);
        Compiled::Skipped
    }

    fn leaf(&mut self, token: &str) {
        if self.top().emits_leaves() {
            self.buffer.push_str(token);
        }
    }

    /// Writes the comma in front of every element but the first of the
    /// current context. Returns the previous `first` flag.
    fn separate(&mut self) -> bool {
        let Some(top) = self.stack.last_mut() else {
            return true;
        };

        let first = top.first;
        top.first = false;

        if !first {
            self.buffer.push(',');
        }

        first
    }

    fn roll_back(&mut self, mark: usize, first: bool) {
        self.buffer.truncate(mark);

        if let Some(top) = self.stack.last_mut() {
            top.first = first;
        }
    }

    fn top(&self) -> Context {
        self.stack.last().copied().unwrap_or_default()
    }
}
