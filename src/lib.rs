pub mod error;
pub mod extract;
pub mod import;
pub mod query;
pub mod request;
pub mod source;
pub mod store;
