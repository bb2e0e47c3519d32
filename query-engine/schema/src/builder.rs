use crate::{
    InputField, InputObjectType, InputObjectTypeId, ObjectType, ObjectTypeId, OutputField, QuerySchema,
};
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaBuildError {
    #[error("Type `{0}` is declared more than once.")]
    DuplicateType(String),

    #[error("Field `{field}` is declared more than once on type `{type_name}`.")]
    DuplicateField { type_name: String, field: String },

    #[error("Operation `{0}` has no root type.")]
    MissingRoot(String),
}

/// Assembles a [`QuerySchema`].
///
/// Object types are declared first and receive their fields afterwards, which
/// allows fields to reference types that are declared later or recursively.
#[derive(Debug, Default)]
pub struct QuerySchemaBuilder {
    objects: Vec<ObjectType>,
    input_objects: Vec<InputObjectType>,
    roots: IndexMap<String, ObjectTypeId>,
}

impl QuerySchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_object(&mut self, name: impl Into<String>) -> ObjectTypeId {
        self.objects.push(ObjectType::new(name.into()));
        ObjectTypeId(self.objects.len() - 1)
    }

    pub fn set_fields(&mut self, id: ObjectTypeId, fields: Vec<OutputField>) {
        self.objects[id.0].fields = fields;
    }

    pub fn object(&mut self, name: impl Into<String>, fields: Vec<OutputField>) -> ObjectTypeId {
        let id = self.declare_object(name);
        self.set_fields(id, fields);
        id
    }

    pub fn declare_input_object(&mut self, name: impl Into<String>) -> InputObjectTypeId {
        self.input_objects.push(InputObjectType {
            name: name.into(),
            fields: Vec::new(),
        });

        InputObjectTypeId(self.input_objects.len() - 1)
    }

    pub fn set_input_fields(&mut self, id: InputObjectTypeId, fields: Vec<InputField>) {
        self.input_objects[id.0].fields = fields;
    }

    pub fn input_object(&mut self, name: impl Into<String>, fields: Vec<InputField>) -> InputObjectTypeId {
        let id = self.declare_input_object(name);
        self.set_input_fields(id, fields);
        id
    }

    /// Registers `id` as the root type of `operation`.
    pub fn root(&mut self, operation: impl Into<String>, id: ObjectTypeId) -> &mut Self {
        self.roots.insert(operation.into(), id);
        self
    }

    pub fn build(self) -> Result<QuerySchema, SchemaBuildError> {
        let mut names = IndexSet::new();

        let type_names = self
            .objects
            .iter()
            .map(|o| o.name.as_str())
            .chain(self.input_objects.iter().map(|i| i.name.as_str()));

        for name in type_names {
            if !names.insert(name) {
                return Err(SchemaBuildError::DuplicateType(name.to_owned()));
            }
        }

        for object in &self.objects {
            let mut fields = IndexSet::new();

            for field in &object.fields {
                if !fields.insert(field.name.as_str()) {
                    return Err(SchemaBuildError::DuplicateField {
                        type_name: object.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        for input in &self.input_objects {
            let mut fields = IndexSet::new();

            for field in &input.fields {
                if !fields.insert(field.name.as_str()) {
                    return Err(SchemaBuildError::DuplicateField {
                        type_name: input.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        if self.roots.is_empty() {
            return Err(SchemaBuildError::MissingRoot(crate::constants::operations::QUERY.to_owned()));
        }

        Ok(QuerySchema {
            objects: self.objects,
            input_objects: self.input_objects,
            roots: self.roots,
        })
    }
}
