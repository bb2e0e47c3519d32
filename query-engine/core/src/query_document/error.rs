use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("The document does not contain any operation.")]
    NoOperation,

    #[error("Operation '{0}' does not match any query.")]
    UnknownOperationName(String),

    #[error("The schema has no root type for operation `{0}`.")]
    UnknownOperation(String),

    #[error("Field `{field}` not found on type `{type_name}`.")]
    UnknownField { field: String, type_name: String },

    #[error("Fragment `{0}` is not defined.")]
    UnknownFragment(String),

    #[error("Fragment `{0}` is defined more than once.")]
    DuplicateFragment(String),

    #[error("Fragment `{0}` spreads itself.")]
    FragmentCycle(String),

    #[error("Fragment on `{found}` cannot be spread on type `{expected}`.")]
    TypeConditionMismatch { expected: String, found: String },

    #[error("Field `{field}` of type `{type_name}` is a leaf and cannot have a selection set.")]
    SelectionSetOnScalar { field: String, type_name: String },

    #[error("Field `{field}` of type `{type_name}` must have a selection of subfields.")]
    MissingSelectionSet { field: String, type_name: String },

    #[error("Field `{field}` does not accept arguments.")]
    UnexpectedArguments { field: String },

    #[error("Selection depth exceeds the configured maximum of {max_depth}.")]
    DepthLimitExceeded { max_depth: usize },

    #[error("Variables must be passed as a JSON object, got {0}.")]
    InvalidVariables(String),

    #[error("Invalid arguments for field `{field}`: {source}")]
    ArgumentDecode {
        field: String,
        #[source]
        source: ArgumentDecodeError,
    },

    #[error("Binding `{field}` was completed before all of its children.")]
    IncompleteBinding { field: String },

    #[error("Selection frames are unbalanced.")]
    UnbalancedFrames,
}

#[derive(Debug, Error)]
pub enum ArgumentDecodeError {
    #[error("Compiled arguments are not valid JSON: {source} (in `{buffer}`)")]
    MalformedJson {
        buffer: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Literal `{literal}` has no JSON representation.")]
    UnrepresentableLiteral { literal: String },

    #[error("Argument `{argument}` is not defined on `{type_name}`.")]
    UnknownArgument { argument: String, type_name: String },

    #[error("Invalid value for `{path}`: expected {expected}, found {found}.")]
    InvalidValue {
        path: String,
        expected: String,
        found: String,
    },
}
