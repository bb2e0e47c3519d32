use super::*;
use crate::QueryCoreConfig;
use graphql_parser::query::{
    Definition, Document, Field, FragmentSpread, InlineFragment, OperationDefinition, Selection, SelectionSet,
    TypeCondition,
};
use schema::{ObjectTypeId, QuerySchema};

/// An open entry of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// A selection set level, fields register on it.
    Level(SelectionNodeId),
    /// A field binding waiting for completion.
    Field(SelectionNodeId),
    /// A fragment walked in place. Completing it does nothing.
    Fragment,
}

/// Walks one operation's selection set against the schema and produces its
/// [`BoundSelection`].
pub struct SelectionTreeBuilder<'q, 'a> {
    schema: &'q QuerySchema,
    variables: &'q VariableBindings,
    fragments: &'q FragmentRegistry<'q, 'a>,
    config: &'q QueryCoreConfig,
    tree: SelectionTree,
    stack: Vec<Frame>,
    /// Names of the fragments currently being walked, innermost last.
    active_fragments: Vec<&'q str>,
}

impl<'q, 'a> SelectionTreeBuilder<'q, 'a> {
    pub fn new(
        schema: &'q QuerySchema,
        variables: &'q VariableBindings,
        fragments: &'q FragmentRegistry<'q, 'a>,
        config: &'q QueryCoreConfig,
    ) -> Self {
        SelectionTreeBuilder {
            schema,
            variables,
            fragments,
            config,
            tree: SelectionTree::default(),
            stack: Vec::new(),
            active_fragments: Vec::new(),
        }
    }

    /// Binds `selection_set` as the selection of `operation`, or of the
    /// configured default operation.
    #[tracing::instrument(name = "build_selection_tree", skip_all, fields(operation = tracing::field::Empty))]
    pub fn build(
        mut self,
        operation: Option<&str>,
        selection_set: &'q SelectionSet<'a, String>,
    ) -> Result<BoundSelection, BindingError> {
        let operation = operation.unwrap_or(self.config.default_operation.as_str());
        tracing::Span::current().record("operation", operation);

        let root_type = self
            .schema
            .root_object(operation)
            .ok_or_else(|| BindingError::UnknownOperation(operation.to_owned()))?;

        let root = self.tree.insert_root(operation, root_type);

        self.stack.push(Frame::Field(root));
        self.stack.push(Frame::Level(root));
        self.walk(selection_set)?;
        self.pop_and_complete()?;
        self.pop_and_complete()?;

        if !self.stack.is_empty() {
            return Err(BindingError::UnbalancedFrames);
        }

        tracing::debug!(bindings = self.tree.len() - 1, "selection tree complete");

        BoundSelection::new(self.tree, root)
    }

    fn walk(&mut self, selection_set: &'q SelectionSet<'a, String>) -> Result<(), BindingError> {
        for selection in &selection_set.items {
            match selection {
                Selection::Field(field) => self.visit_field(field)?,
                Selection::FragmentSpread(spread) => self.visit_fragment_spread(spread)?,
                Selection::InlineFragment(fragment) => self.visit_inline_fragment(fragment)?,
            }
        }

        Ok(())
    }

    fn visit_field(&mut self, field: &'q Field<'a, String>) -> Result<(), BindingError> {
        let parent = self.current_level()?;
        let name = field.name.as_str();
        let alias = field.alias.as_deref();

        tracing::trace!(field = name, alias, "visiting field");

        let child = self.tree.register_child(self.schema, parent, name, alias)?;
        self.stack.push(Frame::Field(child));

        if !field.arguments.is_empty() {
            self.compile_arguments(child, field)?;
        }

        let has_selection = !field.selection_set.items.is_empty();
        let is_object = self.tree.node(child).field_type().is_object();

        match (is_object, has_selection) {
            (true, true) => {
                self.stack.push(Frame::Level(child));
                self.check_depth()?;
                self.walk(&field.selection_set)?;
                self.pop_and_complete()?;
            }
            (true, false) => {
                return Err(BindingError::MissingSelectionSet {
                    field: name.to_owned(),
                    type_name: self.level_name(parent)?,
                });
            }
            (false, true) => {
                return Err(BindingError::SelectionSetOnScalar {
                    field: name.to_owned(),
                    type_name: self.level_name(parent)?,
                });
            }
            (false, false) => (),
        }

        self.pop_and_complete()
    }

    fn compile_arguments(&mut self, child: SelectionNodeId, field: &'q Field<'a, String>) -> Result<(), BindingError> {
        let Some(shape) = self.tree.node(child).argument_shape() else {
            return Err(BindingError::UnexpectedArguments {
                field: field.name.clone(),
            });
        };

        let arguments = ArgumentCompiler::new(self.variables)
            .compile(&field.arguments)
            .and_then(|buffer| decode_arguments(&buffer, shape, self.schema))
            .map_err(|source| BindingError::ArgumentDecode {
                field: field.name.clone(),
                source,
            })?;

        self.tree.set_arguments(child, arguments);

        Ok(())
    }

    fn visit_fragment_spread(&mut self, spread: &'q FragmentSpread<'a, String>) -> Result<(), BindingError> {
        let name = spread.fragment_name.as_str();

        let fragment = self
            .fragments
            .get(name)
            .ok_or_else(|| BindingError::UnknownFragment(name.to_owned()))?;

        if self.active_fragments.contains(&name) {
            return Err(BindingError::FragmentCycle(name.to_owned()));
        }

        tracing::trace!(fragment = name, "spreading fragment");

        self.check_type_condition(&fragment.type_condition)?;

        self.active_fragments.push(name);
        self.stack.push(Frame::Fragment);
        self.walk(&fragment.selection_set)?;
        self.pop_and_complete()?;
        self.active_fragments.pop();

        Ok(())
    }

    fn visit_inline_fragment(&mut self, fragment: &'q InlineFragment<'a, String>) -> Result<(), BindingError> {
        if let Some(condition) = &fragment.type_condition {
            self.check_type_condition(condition)?;
        }

        self.stack.push(Frame::Fragment);
        self.walk(&fragment.selection_set)?;
        self.pop_and_complete()
    }

    fn check_type_condition(&self, condition: &TypeCondition<'a, String>) -> Result<(), BindingError> {
        let level = self.current_level()?;
        let expected = self.level_name(level)?;
        let found = type_condition(condition);

        if found != expected {
            return Err(BindingError::TypeConditionMismatch {
                expected,
                found: found.to_owned(),
            });
        }

        Ok(())
    }

    /// Pops the innermost frame and completes what it stands for.
    fn pop_and_complete(&mut self) -> Result<(), BindingError> {
        match self.stack.pop() {
            Some(Frame::Level(id)) => self.tree.complete_level(id),
            Some(Frame::Field(id)) => self.tree.complete_field(id),
            Some(Frame::Fragment) => Ok(()),
            None => Err(BindingError::UnbalancedFrames),
        }
    }

    /// The innermost open level, looking through fragment frames.
    fn current_level(&self) -> Result<SelectionNodeId, BindingError> {
        match self.stack.iter().rev().find(|frame| **frame != Frame::Fragment) {
            Some(Frame::Level(id)) => Ok(*id),
            _ => Err(BindingError::UnbalancedFrames),
        }
    }

    fn level_name(&self, level: SelectionNodeId) -> Result<String, BindingError> {
        let object: ObjectTypeId = self.tree.level_object(level)?;
        Ok(self.schema.object(object).name().to_owned())
    }

    fn check_depth(&self) -> Result<(), BindingError> {
        let Some(max_depth) = self.config.max_depth else {
            return Ok(());
        };

        // The root level does not count.
        let depth = self
            .stack
            .iter()
            .filter(|frame| matches!(frame, Frame::Level(_)))
            .count()
            .saturating_sub(1);

        if depth > max_depth.get() {
            return Err(BindingError::DepthLimitExceeded {
                max_depth: max_depth.get(),
            });
        }

        Ok(())
    }
}

/// Binds one operation of a parsed document.
///
/// With an `operation_name`, the operation of that name is bound. Without
/// one, the first operation of the document is. Variables without a value
/// fall back to the defaults the operation declares.
pub fn bind_document<'a>(
    schema: &QuerySchema,
    document: &Document<'a, String>,
    operation_name: Option<&str>,
    variables: &VariableBindings,
    config: &QueryCoreConfig,
) -> Result<BoundSelection, BindingError> {
    let fragments = FragmentRegistry::from_document(document)?;
    let operation = find_operation(document, operation_name)?;

    let mut variables = variables.clone();
    variables.apply_defaults(variable_definitions(operation));

    let builder = SelectionTreeBuilder::new(schema, &variables, &fragments, config);
    builder.build(Some(operation_type(operation)), operation_selection_set(operation))
}

fn find_operation<'d, 'a>(
    document: &'d Document<'a, String>,
    operation_name: Option<&str>,
) -> Result<&'d OperationDefinition<'a, String>, BindingError> {
    let mut operations = document.definitions.iter().filter_map(|definition| match definition {
        Definition::Operation(operation) => Some(operation),
        Definition::Fragment(_) => None,
    });

    match operation_name {
        Some(name) => operations
            .find(|operation| operation_name_matches(operation, name))
            .ok_or_else(|| BindingError::UnknownOperationName(name.to_owned())),
        None => operations.next().ok_or(BindingError::NoOperation),
    }
}

fn operation_name_matches(operation: &OperationDefinition<'_, String>, name: &str) -> bool {
    operation_name(operation).is_some_and(|n| n == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::query::parse_query;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use query_value::QueryValue;
    use schema::{
        EnumType, InputField, InputType, OutputField, OutputType, QuerySchemaBuilder, ScalarType,
    };

    /// Query { post(id), posts(take, status), version }
    /// Post { id, title, status, author, comments }
    /// User { id, name, posts }
    /// Comment { id, body }
    fn blog_schema() -> QuerySchema {
        let mut builder = QuerySchemaBuilder::new();

        let status = EnumType::new("Status", ["DRAFT", "PUBLISHED"]);
        let post = builder.declare_object("Post");
        let user = builder.declare_object("User");
        let comment = builder.declare_object("Comment");
        let query = builder.declare_object("Query");
        let mutation = builder.declare_object("Mutation");

        let post_args = builder.input_object("PostArgs", vec![InputField::new("id", InputType::scalar(ScalarType::ID))]);
        let posts_args = builder.input_object(
            "PostsArgs",
            vec![
                InputField::new("take", InputType::scalar(ScalarType::Int)),
                InputField::new("skip", InputType::scalar(ScalarType::Int)),
                InputField::new("status", InputType::enum_type(status.clone())),
                InputField::new("ids", InputType::list(InputType::scalar(ScalarType::ID))),
            ],
        );

        builder.set_fields(
            post,
            vec![
                OutputField::new("id", OutputType::scalar(ScalarType::ID)),
                OutputField::new("title", OutputType::scalar(ScalarType::String)),
                OutputField::new("status", OutputType::enum_type(status)),
                OutputField::new("author", OutputType::object(user)),
                OutputField::new("comments", OutputType::list(OutputType::object(comment))),
            ],
        );
        builder.set_fields(
            user,
            vec![
                OutputField::new("id", OutputType::scalar(ScalarType::ID)),
                OutputField::new("name", OutputType::scalar(ScalarType::String)),
                OutputField::new("posts", OutputType::list(OutputType::object(post))).with_arguments(posts_args),
            ],
        );
        builder.set_fields(
            comment,
            vec![
                OutputField::new("id", OutputType::scalar(ScalarType::ID)),
                OutputField::new("body", OutputType::scalar(ScalarType::String)),
            ],
        );
        builder.set_fields(
            query,
            vec![
                OutputField::new("post", OutputType::object(post)).with_arguments(post_args),
                OutputField::new("posts", OutputType::list(OutputType::object(post))).with_arguments(posts_args),
                OutputField::new("version", OutputType::scalar(ScalarType::String)),
            ],
        );
        builder.set_fields(
            mutation,
            vec![OutputField::new("publish", OutputType::object(post)).with_arguments(post_args)],
        );

        builder.root("query", query).root("mutation", mutation);
        builder.build().unwrap()
    }

    fn bind(query: &str) -> Result<BoundSelection, BindingError> {
        bind_with(query, &VariableBindings::new(), &QueryCoreConfig::default())
    }

    fn bind_with(
        query: &str,
        variables: &VariableBindings,
        config: &QueryCoreConfig,
    ) -> Result<BoundSelection, BindingError> {
        let schema = blog_schema();
        let document = parse_query::<String>(query).unwrap();

        bind_document(&schema, &document, None, variables, config)
    }

    /// Renders the tree as indented `name: alias(args)` lines.
    fn outline(selection: &BoundSelection) -> String {
        fn render(selection: &BoundSelection, id: SelectionNodeId, depth: usize, out: &mut String) {
            for &child in selection.node(id).children() {
                let node = selection.node(child);
                out.push_str(&"  ".repeat(depth));
                out.push_str(node.name());

                if let Some(alias) = node.alias() {
                    out.push_str(&format!(" as {alias}"));
                }

                if !node.arguments().is_empty() {
                    let args: Vec<String> = node.arguments().iter().map(|(k, v)| format!("{k}={v}")).collect();
                    out.push_str(&format!("({})", args.join(", ")));
                }

                out.push('\n');
                render(selection, child, depth + 1, out);
            }
        }

        let mut out = String::new();
        render(selection, selection.root(), 0, &mut out);
        out
    }

    #[test]
    fn tree_mirrors_the_selection_nesting() {
        let selection = bind(indoc! {r#"
            {
              version
              posts(take: 2) {
                id
                author { name }
                comments { body }
              }
            }
        "#})
        .unwrap();

        expect_test::expect![[r#"
            version
            posts(take=2)
              id
              author
                name
              comments
                body
        "#]]
        .assert_eq(&outline(&selection));

        assert_eq!(selection.operation(), "query");
        assert_eq!(selection.tree().len(), 8);
        assert!(selection.tree().node(selection.root()).is_completed());
    }

    #[test]
    fn output_map_points_at_child_levels() {
        let selection = bind("{ posts { id status author { id } } version }").unwrap();
        let root = selection.output();

        assert_eq!(root.output().keys().collect::<Vec<_>>(), vec!["posts", "version"]);
        assert_eq!(root.output()["version"], OutputShape::Scalar(ScalarType::String));

        let posts = root.binding("posts").unwrap();
        assert_eq!(root.output()["posts"], OutputShape::List(Box::new(OutputShape::Object(posts))));

        let posts_level = selection.level(posts).unwrap();
        let author = posts_level.binding("author").unwrap();

        assert_eq!(posts_level.output()["author"], OutputShape::Object(author));
        assert!(matches!(posts_level.output()["status"], OutputShape::Enum(ref e) if e.name() == "Status"));
        assert_eq!(selection.level(author).unwrap().output().len(), 1);
        assert!(selection.level(posts_level.binding("id").unwrap()).is_none());
    }

    #[test]
    fn aliases_create_distinct_bindings_of_the_same_field() {
        let selection = bind(r#"{ first: post(id: "1") { title } second: post(id: "2") { title } }"#).unwrap();
        let root = selection.output();

        let first = selection.node(root.binding("first").unwrap());
        let second = selection.node(root.binding("second").unwrap());

        assert_eq!(first.name(), "post");
        assert_eq!(second.name(), "post");
        assert_eq!(first.field_type(), second.field_type());
        assert_eq!(first.arguments().get("id"), Some(&QueryValue::from("1")));
        assert_eq!(second.arguments().get("id"), Some(&QueryValue::from("2")));
    }

    #[test]
    fn duplicate_effective_names_keep_both_bindings() {
        let selection = bind(r#"{ p: post(id: "1") { id } p: post(id: "2") { title } }"#).unwrap();
        let root = selection.node(selection.root());

        let (first, second) = (selection.node(root.children()[0]), selection.node(root.children()[1]));

        assert_eq!(root.children().len(), 2);
        assert_eq!(first.arguments().get("id"), Some(&QueryValue::from("1")));
        assert_eq!(second.arguments().get("id"), Some(&QueryValue::from("2")));

        // `id` of the first `p` completes before the first `p`, `title` after it.
        assert_eq!(first.completion_index(), Some(1));
        assert_eq!(second.completion_index(), Some(3));
        assert_eq!(root.completion_index(), Some(4));

        let winner = selection.output().binding("p").unwrap();
        assert_eq!(winner, root.children()[0]);
        assert_eq!(selection.output().output().len(), 1);
    }

    #[test]
    fn unknown_fields_fail_the_whole_operation() {
        let err = bind("{ posts { id headline } }").unwrap_err();

        assert_eq!(err.to_string(), "Field `headline` not found on type `Post`.");
    }

    #[test]
    fn aliases_do_not_affect_type_resolution() {
        assert!(bind("{ title: version posts { version: title } }").is_ok());

        let err = bind("{ posts { title: version } }").unwrap_err();
        assert!(matches!(err, BindingError::UnknownField { ref field, .. } if field == "version"));
    }

    #[test]
    fn fragment_spreads_bind_like_inlined_selections() {
        let spread = bind(indoc! {r#"
            query {
              posts(take: 1) {
                id
                ...PostFields
                comments { id }
              }
            }

            fragment PostFields on Post {
              title
              author { ...UserFields }
            }

            fragment UserFields on User { id name }
        "#})
        .unwrap();

        let inlined = bind(indoc! {r#"
            query {
              posts(take: 1) {
                id
                title
                author { id name }
                comments { id }
              }
            }
        "#})
        .unwrap();

        assert_eq!(spread, inlined);
    }

    #[test]
    fn inline_fragments_are_walked_in_place() {
        let fragment = bind("{ posts { id ... on Post { title } ... { status } } }").unwrap();
        let inlined = bind("{ posts { id title status } }").unwrap();

        assert_eq!(fragment, inlined);
    }

    #[test]
    fn fragment_type_conditions_must_match() {
        let err = bind(indoc! {r#"
            { posts { ...UserFields } }
            fragment UserFields on User { id }
        "#})
        .unwrap_err();

        assert!(matches!(
            err,
            BindingError::TypeConditionMismatch { ref expected, ref found } if expected == "Post" && found == "User"
        ));

        let err = bind("{ posts { ... on Comment { id } } }").unwrap_err();
        assert!(matches!(err, BindingError::TypeConditionMismatch { .. }));
    }

    #[test]
    fn unknown_and_cyclic_fragments_are_errors() {
        let err = bind("{ posts { ...Nope } }").unwrap_err();
        assert!(matches!(err, BindingError::UnknownFragment(ref name) if name == "Nope"));

        let err = bind(indoc! {r#"
            { posts { ...A } }
            fragment A on Post { id author { posts { ...A } } }
        "#})
        .unwrap_err();
        assert!(matches!(err, BindingError::FragmentCycle(ref name) if name == "A"));
    }

    #[test]
    fn the_same_fragment_may_be_spread_twice() {
        let selection = bind(indoc! {r#"
            { posts { ...F } post(id: 1) { ...F } }
            fragment F on Post { id }
        "#})
        .unwrap();

        assert_eq!(selection.tree().len(), 5);
    }

    #[test]
    fn leaf_and_object_selection_sets_are_checked() {
        let err = bind("{ version { length } }").unwrap_err();
        assert!(
            matches!(err, BindingError::SelectionSetOnScalar { ref field, ref type_name } if field == "version" && type_name == "Query")
        );

        let err = bind("{ posts }").unwrap_err();
        assert!(matches!(err, BindingError::MissingSelectionSet { ref field, .. } if field == "posts"));
    }

    #[test]
    fn arguments_on_fields_without_a_shape_are_rejected() {
        let err = bind("{ version(format: SHORT) }").unwrap_err();

        assert!(matches!(err, BindingError::UnexpectedArguments { ref field } if field == "version"));
    }

    #[test]
    fn unbound_variables_drop_only_their_argument() {
        let variables = VariableBindings::new().with("take", "3");
        let selection = bind_with(
            "query ($take: Int, $skip: Int) { posts(take: $take, skip: $skip) { id } }",
            &variables,
            &QueryCoreConfig::default(),
        )
        .unwrap();

        let posts = selection.find(&["posts"]).unwrap();

        assert_eq!(posts.arguments().len(), 1);
        assert_eq!(posts.arguments().get("take"), Some(&QueryValue::Int(3)));
        assert_eq!(posts.arguments().get("skip"), None);
    }

    #[test]
    fn declared_defaults_apply_to_unbound_variables() {
        let selection = bind_with(
            r#"query ($take: Int = 10, $ids: [ID] = ["a", "b"]) { posts(take: $take, ids: $ids) { id } }"#,
            &VariableBindings::new(),
            &QueryCoreConfig::default(),
        )
        .unwrap();

        let posts = selection.find(&["posts"]).unwrap();

        assert_eq!(posts.arguments().get("take"), Some(&QueryValue::Int(10)));
        assert_eq!(
            posts.arguments().get("ids"),
            Some(&QueryValue::List(vec![QueryValue::from("a"), QueryValue::from("b")]))
        );
    }

    #[test]
    fn argument_decode_errors_name_the_field() {
        let err = bind("{ posts(status: ARCHIVED) { id } }").unwrap_err();

        assert!(matches!(
            err,
            BindingError::ArgumentDecode { ref field, source: ArgumentDecodeError::InvalidValue { .. } } if field == "posts"
        ));
    }

    #[test]
    fn operations_are_picked_by_name() {
        let schema = blog_schema();
        let document = parse_query::<String>(indoc! {r#"
            query Read { version }
            mutation Publish { publish(id: 1) { id status } }
        "#})
        .unwrap();
        let config = QueryCoreConfig::default();
        let variables = VariableBindings::new();

        let selection = bind_document(&schema, &document, Some("Publish"), &variables, &config).unwrap();
        assert_eq!(selection.operation(), "mutation");
        assert!(selection.find(&["publish", "status"]).is_some());

        let selection = bind_document(&schema, &document, None, &variables, &config).unwrap();
        assert_eq!(selection.operation(), "query");

        let err = bind_document(&schema, &document, Some("Delete"), &variables, &config).unwrap_err();
        assert!(matches!(err, BindingError::UnknownOperationName(ref name) if name == "Delete"));
    }

    #[test]
    fn documents_without_operations_are_rejected() {
        let err = bind("fragment F on Post { id }").unwrap_err();

        assert!(matches!(err, BindingError::NoOperation));
    }

    #[test]
    fn operations_without_a_root_type_are_rejected() {
        let err = bind("subscription { version }").unwrap_err();

        assert!(matches!(err, BindingError::UnknownOperation(ref op) if op == "subscription"));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let config = QueryCoreConfig::default().with_max_depth(2);
        let query = "{ posts { author { posts { id } } } }";

        let err = bind_with(query, &VariableBindings::new(), &config).unwrap_err();
        assert!(matches!(err, BindingError::DepthLimitExceeded { max_depth: 2 }));

        let config = QueryCoreConfig::default().with_max_depth(3);
        assert!(bind_with(query, &VariableBindings::new(), &config).is_ok());
    }

    #[test]
    fn builder_binds_a_bare_selection_set() {
        let schema = blog_schema();
        let document = parse_query::<String>("{ publish(id: 1) { id } }").unwrap();
        let Definition::Operation(operation) = &document.definitions[0] else {
            panic!("expected an operation");
        };

        let fragments = FragmentRegistry::new();
        let variables = VariableBindings::new();
        let config = QueryCoreConfig::default();

        let builder = SelectionTreeBuilder::new(&schema, &variables, &fragments, &config);
        let selection = builder
            .build(Some("mutation"), operation_selection_set(operation))
            .unwrap();

        assert_eq!(selection.operation(), "mutation");
        assert!(selection.find(&["publish", "id"]).is_some());
    }
}
