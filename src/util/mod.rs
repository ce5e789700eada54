pub mod links;
pub mod sanitize;
