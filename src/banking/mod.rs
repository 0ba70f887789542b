pub mod gateway;
pub mod transfer;
pub mod types;
