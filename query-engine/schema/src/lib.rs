#![deny(rust_2018_idioms, unsafe_code)]

mod builder;
mod enum_type;
mod input_types;
mod output_types;
mod query_schema;
mod scalar_type;

pub use builder::*;
pub use enum_type::*;
pub use input_types::*;
pub use output_types::*;
pub use query_schema::*;
pub use scalar_type::*;

pub mod constants {
    pub mod operations {
        pub const QUERY: &str = "query";
        pub const MUTATION: &str = "mutation";
        pub const SUBSCRIPTION: &str = "subscription";
    }
}
