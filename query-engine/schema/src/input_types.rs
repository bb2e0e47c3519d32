use crate::{EnumType, ScalarType};

/// Index of an input object type inside its [`QuerySchema`](crate::QuerySchema).
/// Input objects double as the argument shapes of output fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputObjectTypeId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(InputObjectTypeId),
    List(Box<InputType>),
}

impl InputType {
    pub fn scalar(typ: ScalarType) -> Self {
        InputType::Scalar(typ)
    }

    pub fn object(id: InputObjectTypeId) -> Self {
        InputType::Object(id)
    }

    pub fn list(containing: InputType) -> Self {
        InputType::List(Box::new(containing))
    }

    pub fn enum_type(containing: EnumType) -> Self {
        InputType::Enum(containing)
    }
}

#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub(crate) name: String,
    pub(crate) fields: Vec<InputField>,
}

impl InputObjectType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn find_field(&self, name: &str) -> Option<&InputField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct InputField {
    pub(crate) name: String,
    pub field_type: InputType,
}

impl InputField {
    pub fn new(name: impl Into<String>, field_type: InputType) -> Self {
        InputField {
            name: name.into(),
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &InputType {
        &self.field_type
    }
}
