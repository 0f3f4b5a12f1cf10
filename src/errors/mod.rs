//! Error handling for keystone.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod extract_error;
pub mod materialize_error;
pub mod resolve_error;

pub use extract_error::ExtractError;
pub use materialize_error::MaterializeError;
pub use resolve_error::ResolveError;
