pub mod catalog;
pub mod model;
pub mod source;

pub use catalog::Catalog;
pub use model::{MediaItem, MediaKind, Project};
pub use source::{ProjectSource, RemoteEndpoints};
