//! Sandboxed filesystem layer: path containment plus the operations
//! exposed over HTTP (list, create, move, copy, delete).

pub mod ops;
pub mod resolver;
pub mod types;

pub use ops::Storage;
pub use resolver::PathResolver;
pub use types::FileItem;
