use super::BindingError;
use graphql_parser::query::{Definition, Document, FragmentDefinition, SelectionSet, TypeCondition};
use std::collections::HashMap;

/// Named fragments of one document, looked up by name during the walk.
#[derive(Debug, Default)]
pub struct FragmentRegistry<'q, 'a> {
    fragments: HashMap<&'q str, &'q FragmentDefinition<'a, String>>,
}

impl<'q, 'a> FragmentRegistry<'q, 'a> {
    pub fn new() -> Self {
        FragmentRegistry {
            fragments: HashMap::new(),
        }
    }

    pub fn from_document(document: &'q Document<'a, String>) -> Result<Self, BindingError> {
        let mut registry = Self::new();

        for definition in &document.definitions {
            if let Definition::Fragment(fragment) = definition {
                registry.register(fragment)?;
            }
        }

        Ok(registry)
    }

    pub fn register(&mut self, fragment: &'q FragmentDefinition<'a, String>) -> Result<(), BindingError> {
        if self.fragments.insert(fragment.name.as_str(), fragment).is_some() {
            return Err(BindingError::DuplicateFragment(fragment.name.clone()));
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&'q FragmentDefinition<'a, String>> {
        self.fragments.get(name).copied()
    }

    pub fn selection_set(&self, name: &str) -> Option<&'q SelectionSet<'a, String>> {
        self.get(name).map(|fragment| &fragment.selection_set)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// The type a fragment applies to.
pub fn type_condition<'d>(condition: &'d TypeCondition<'_, String>) -> &'d str {
    match condition {
        TypeCondition::On(name) => name.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_parser::query::parse_query;
    use indoc::indoc;

    #[test]
    fn fragments_are_registered_by_name() {
        let document = parse_query::<String>(indoc! {r#"
            query { post { ...PostFields } }
            fragment PostFields on Post { id title }
            fragment AuthorFields on User { id }
        "#})
        .unwrap();

        let registry = FragmentRegistry::from_document(&document).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.selection_set("PostFields").unwrap().items.len(), 2);
        assert_eq!(type_condition(&registry.get("AuthorFields").unwrap().type_condition), "User");
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn duplicate_fragment_names_are_rejected() {
        let document = parse_query::<String>(indoc! {r#"
            query { post { ...PostFields } }
            fragment PostFields on Post { id }
            fragment PostFields on Post { title }
        "#})
        .unwrap();

        assert!(matches!(
            FragmentRegistry::from_document(&document),
            Err(BindingError::DuplicateFragment(ref name)) if name == "PostFields"
        ));
    }
}
