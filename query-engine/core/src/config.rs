use crate::CoreResult;
use schema::constants::operations;
use serde::Deserialize;
use std::num::NonZeroUsize;

/// Settings for binding query documents.
///
/// ```json
/// { "defaultOperation": "query", "maxDepth": 12 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct QueryCoreConfig {
    /// Operation whose root type is used when none is named, e.g. for the
    /// `{ ... }` shorthand.
    pub default_operation: String,

    /// Deepest allowed nesting of selection sets below the root. The root
    /// selection set has depth zero, the selection set of one of its fields
    /// depth one, and so on.
    pub max_depth: Option<NonZeroUsize>,
}

impl Default for QueryCoreConfig {
    fn default() -> Self {
        Self {
            default_operation: operations::QUERY.to_owned(),
            max_depth: None,
        }
    }
}

impl QueryCoreConfig {
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = NonZeroUsize::new(max_depth);
        self
    }
}
