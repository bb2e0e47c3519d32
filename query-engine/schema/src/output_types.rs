use crate::{EnumType, InputObjectTypeId, ScalarType};
use std::fmt;

/// Index of an object type inside its [`QuerySchema`](crate::QuerySchema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectTypeId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputType {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(ObjectTypeId),
    List(Box<OutputType>),
}

impl OutputType {
    pub fn scalar(typ: ScalarType) -> Self {
        OutputType::Scalar(typ)
    }

    pub fn object(id: ObjectTypeId) -> Self {
        OutputType::Object(id)
    }

    pub fn list(containing: OutputType) -> Self {
        OutputType::List(Box::new(containing))
    }

    pub fn enum_type(containing: EnumType) -> Self {
        OutputType::Enum(containing)
    }

    /// Recurses through list wrappers until an object type is found.
    pub fn as_object_type(&self) -> Option<ObjectTypeId> {
        match self {
            OutputType::Object(id) => Some(*id),
            OutputType::List(inner) => inner.as_object_type(),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        self.as_object_type().is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub(crate) name: String,
    pub(crate) fields: Vec<OutputField>,
}

impl ObjectType {
    pub(crate) fn new(name: String) -> Self {
        ObjectType {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn find_field(&self, name: &str) -> Option<&OutputField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct OutputField {
    pub(crate) name: String,
    pub field_type: OutputType,

    /// Shape of the arguments the field accepts, if any. Arguments are decoded
    /// into a record of this input object type.
    pub(crate) arguments: Option<InputObjectTypeId>,
}

impl OutputField {
    pub fn new(name: impl Into<String>, field_type: OutputType) -> Self {
        OutputField {
            name: name.into(),
            field_type,
            arguments: None,
        }
    }

    pub fn with_arguments(mut self, arguments: InputObjectTypeId) -> Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &OutputType {
        &self.field_type
    }

    pub fn arguments(&self) -> Option<InputObjectTypeId> {
        self.arguments
    }
}

impl fmt::Display for ObjectTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
