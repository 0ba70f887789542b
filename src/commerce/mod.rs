pub mod gateway;
pub mod mutator;
pub mod types;
