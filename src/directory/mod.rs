pub mod resolver;

pub use resolver::{
    DisplayNameResolver, DisplayNames, InMemoryDisplayNameResolver, PostgresDisplayNameResolver,
};
