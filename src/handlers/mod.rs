//! Content-type handlers
//!
//! A handler decides what a resolved document means: how it is
//! post-processed after resolution, which value it exposes, and how it is
//! indexed.
//!
//! ## Key Components
//!
//! - [`ContentHandler`] - Trait implemented per content type
//! - [`DefaultHandler`] - Fallback for unregistered types and bare values
//! - [`JsonHandler`] - `application/json` with JSON Pointer fragments
//! - [`HandlerRegistry`] - Content type to handler mapping
//!
//! ## Example
//!
//! ```rust,ignore
//! use hyperdoc::handlers::{HandlerRegistry, JsonHandler};
//!
//! let mut registry = HandlerRegistry::with_defaults();
//! registry.add_content_type("application/schema+json", Arc::new(JsonHandler));
//! ```

mod default;
mod json;
mod registry;
mod traits;

pub use default::DefaultHandler;
pub use json::JsonHandler;
pub use registry::{HandlerRegistry, RegistryError};
pub use traits::ContentHandler;
