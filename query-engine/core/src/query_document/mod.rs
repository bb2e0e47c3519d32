//! Binding of GraphQL query documents against a [`QuerySchema`](schema::QuerySchema).
//!
//! A document is bound in a single depth-first walk:
//!
//! 1. The operation's root object type is resolved from the schema.
//! 2. Every field of a selection set is registered on the enclosing level,
//!    its arguments are compiled to JSON and decoded against the field's
//!    argument shape.
//! 3. Nested selection sets open a new level; fragments are walked in place.
//! 4. Levels are completed bottom-up into [`OutputBindingMap`]s.

mod arguments;
mod builder;
mod decode;
mod error;
mod extract;
mod fragments;
mod tree;
mod variables;

pub use arguments::*;
pub use builder::*;
pub use decode::*;
pub use error::*;
pub use extract::*;
pub use fragments::*;
pub use tree::*;
pub use variables::*;
