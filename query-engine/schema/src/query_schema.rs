use crate::{InputObjectType, InputObjectTypeId, ObjectType, ObjectTypeId};
use indexmap::IndexMap;

/// The output and input type catalog that query documents are bound against.
///
/// Types live in two arenas and reference each other through
/// [`ObjectTypeId`] and [`InputObjectTypeId`], so recursive types need no
/// reference counting. Root operation types (`query`, `mutation`, ...) are
/// looked up by operation name.
#[derive(Debug, Clone)]
pub struct QuerySchema {
    pub(crate) objects: Vec<ObjectType>,
    pub(crate) input_objects: Vec<InputObjectType>,
    pub(crate) roots: IndexMap<String, ObjectTypeId>,
}

impl QuerySchema {
    /// Resolves the root object type of an operation, e.g. `query`.
    pub fn root_object(&self, operation: &str) -> Option<ObjectTypeId> {
        self.roots.get(operation).copied()
    }

    pub fn object(&self, id: ObjectTypeId) -> &ObjectType {
        &self.objects[id.0]
    }

    pub fn input_object(&self, id: InputObjectTypeId) -> &InputObjectType {
        &self.input_objects[id.0]
    }
}
