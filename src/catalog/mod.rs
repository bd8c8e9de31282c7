pub mod actions;
pub mod builder;
pub mod config;
pub mod paths;
pub mod query;
pub mod record;
pub mod similarity;
pub mod store;
pub mod tokens;
pub mod tree;
