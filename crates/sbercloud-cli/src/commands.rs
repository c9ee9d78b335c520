pub mod resolve;
pub mod resources;
pub mod schema;
pub mod validate;
