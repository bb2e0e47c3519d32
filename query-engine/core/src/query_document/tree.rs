use super::{ArgumentRecord, BindingError};
use indexmap::IndexMap;
use schema::{EnumType, InputObjectTypeId, ObjectTypeId, OutputType, QuerySchema, ScalarType};
use std::fmt;

/// Index of a binding inside its [`SelectionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionNodeId(usize);

impl fmt::Display for SelectionNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// One requested field occurrence.
///
/// The bound type comes from looking up `name` on the parent's object type.
/// The alias only changes the name the field is exposed under.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionNode {
    name: String,
    alias: Option<String>,
    field_type: OutputType,
    argument_shape: Option<InputObjectTypeId>,
    arguments: ArgumentRecord,
    children: Vec<SelectionNodeId>,
    output: Option<OutputBindingMap>,
    /// Position among all completed bindings of the tree.
    completed: Option<usize>,
}

impl SelectionNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The alias if there is one, else the declared name.
    pub fn effective_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.name.as_str())
    }

    pub fn field_type(&self) -> &OutputType {
        &self.field_type
    }

    pub fn argument_shape(&self) -> Option<InputObjectTypeId> {
        self.argument_shape
    }

    pub fn arguments(&self) -> &ArgumentRecord {
        &self.arguments
    }

    pub fn children(&self) -> &[SelectionNodeId] {
        &self.children
    }

    /// The finished map of the selection set below this node. Only object
    /// typed nodes have one, once they are completed.
    pub fn output(&self) -> Option<&OutputBindingMap> {
        self.output.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }

    /// When the binding was completed, counted from zero over the whole tree.
    /// Siblings complete in document order, children before their parent.
    pub fn completion_index(&self) -> Option<usize> {
        self.completed
    }
}

/// Output shape of one field, pointing at the child level for objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputShape {
    Scalar(ScalarType),
    Enum(EnumType),
    Object(SelectionNodeId),
    List(Box<OutputShape>),
}

impl OutputShape {
    fn of(field_type: &OutputType, node: SelectionNodeId) -> Self {
        match field_type {
            OutputType::Scalar(s) => OutputShape::Scalar(*s),
            OutputType::Enum(e) => OutputShape::Enum(e.clone()),
            OutputType::Object(_) => OutputShape::Object(node),
            OutputType::List(inner) => OutputShape::List(Box::new(Self::of(inner, node))),
        }
    }
}

/// The finished artifact of one selection set level.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBindingMap {
    object: ObjectTypeId,
    output: IndexMap<String, OutputShape>,
    bindings: IndexMap<String, SelectionNodeId>,
}

impl OutputBindingMap {
    /// The object type selected over.
    pub fn object(&self) -> ObjectTypeId {
        self.object
    }

    /// Effective field name to output shape, in document order.
    pub fn output(&self) -> &IndexMap<String, OutputShape> {
        &self.output
    }

    /// The binding that produced the output field `name`.
    pub fn binding(&self, name: &str) -> Option<SelectionNodeId> {
        self.bindings.get(name).copied()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, SelectionNodeId)> {
        self.bindings.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Arena holding every binding of one bound operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionTree {
    nodes: Vec<SelectionNode>,
    completions: usize,
}

impl SelectionTree {
    pub fn node(&self, id: SelectionNodeId) -> &SelectionNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn insert_root(&mut self, operation: &str, root: ObjectTypeId) -> SelectionNodeId {
        self.push(SelectionNode {
            name: operation.to_owned(),
            alias: None,
            field_type: OutputType::object(root),
            argument_shape: None,
            arguments: ArgumentRecord::default(),
            children: Vec::new(),
            output: None,
            completed: None,
        })
    }

    /// Registers a new binding for the field `name` under the level `parent`.
    /// Every call creates a new binding, also for repeated names.
    pub(crate) fn register_child(
        &mut self,
        schema: &QuerySchema,
        parent: SelectionNodeId,
        name: &str,
        alias: Option<&str>,
    ) -> Result<SelectionNodeId, BindingError> {
        let object = self.level_object(parent)?;
        let object_type = schema.object(object);

        let field = object_type.find_field(name).ok_or_else(|| BindingError::UnknownField {
            field: name.to_owned(),
            type_name: object_type.name().to_owned(),
        })?;

        let id = self.push(SelectionNode {
            name: name.to_owned(),
            alias: alias.map(ToOwned::to_owned),
            field_type: field.field_type().clone(),
            argument_shape: field.arguments(),
            arguments: ArgumentRecord::default(),
            children: Vec::new(),
            output: None,
            completed: None,
        });

        self.nodes[parent.0].children.push(id);

        Ok(id)
    }

    pub(crate) fn set_arguments(&mut self, id: SelectionNodeId, arguments: ArgumentRecord) {
        self.nodes[id.0].arguments = arguments;
    }

    /// The object type a level selects over.
    pub(crate) fn level_object(&self, id: SelectionNodeId) -> Result<ObjectTypeId, BindingError> {
        self.node(id)
            .field_type
            .as_object_type()
            .ok_or(BindingError::UnbalancedFrames)
    }

    /// Materializes the output map of a level. Every child has to be
    /// completed already.
    pub(crate) fn complete_level(&mut self, id: SelectionNodeId) -> Result<(), BindingError> {
        let node = self.node(id);

        if node.output.is_some() {
            return Err(BindingError::UnbalancedFrames);
        }

        let object = self.level_object(id)?;
        let mut output = IndexMap::with_capacity(node.children.len());
        let mut bindings = IndexMap::with_capacity(node.children.len());

        for &child_id in &node.children {
            let child = self.node(child_id);

            if !child.is_completed() {
                return Err(BindingError::IncompleteBinding {
                    field: child.effective_name().to_owned(),
                });
            }

            // Repeated names keep the first occurrence.
            let name = child.effective_name();
            if !bindings.contains_key(name) {
                output.insert(name.to_owned(), OutputShape::of(&child.field_type, child_id));
                bindings.insert(name.to_owned(), child_id);
            }
        }

        self.nodes[id.0].output = Some(OutputBindingMap {
            object,
            output,
            bindings,
        });

        Ok(())
    }

    /// Freezes a binding. Object typed bindings need their level completed
    /// first.
    pub(crate) fn complete_field(&mut self, id: SelectionNodeId) -> Result<(), BindingError> {
        let node = &mut self.nodes[id.0];

        if node.field_type.is_object() && node.output.is_none() {
            return Err(BindingError::IncompleteBinding {
                field: node.effective_name().to_owned(),
            });
        }

        if node.completed.is_none() {
            node.completed = Some(self.completions);
            self.completions += 1;
        }

        Ok(())
    }

    fn push(&mut self, node: SelectionNode) -> SelectionNodeId {
        self.nodes.push(node);
        SelectionNodeId(self.nodes.len() - 1)
    }
}

/// A bound operation: its selection tree and the root binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSelection {
    tree: SelectionTree,
    root: SelectionNodeId,
    output: OutputBindingMap,
}

impl BoundSelection {
    pub(crate) fn new(tree: SelectionTree, root: SelectionNodeId) -> Result<Self, BindingError> {
        let output = tree
            .node(root)
            .output()
            .cloned()
            .ok_or_else(|| BindingError::IncompleteBinding {
                field: tree.node(root).name().to_owned(),
            })?;

        Ok(BoundSelection { tree, root, output })
    }

    pub fn tree(&self) -> &SelectionTree {
        &self.tree
    }

    pub fn root(&self) -> SelectionNodeId {
        self.root
    }

    /// The operation the selection was bound for, e.g. `query`.
    pub fn operation(&self) -> &str {
        self.tree.node(self.root).name()
    }

    pub fn node(&self, id: SelectionNodeId) -> &SelectionNode {
        self.tree.node(id)
    }

    /// Output map of the root selection set.
    pub fn output(&self) -> &OutputBindingMap {
        &self.output
    }

    /// Output map of the level below `id`, if `id` is object typed.
    pub fn level(&self, id: SelectionNodeId) -> Option<&OutputBindingMap> {
        self.tree.node(id).output()
    }

    /// Follows effective names from the root, e.g. `["posts", "author"]`.
    pub fn find(&self, path: &[&str]) -> Option<&SelectionNode> {
        let mut current = self.root;

        for name in path {
            current = self.tree.node(current).output()?.binding(name)?;
        }

        Some(self.tree.node(current))
    }
}
