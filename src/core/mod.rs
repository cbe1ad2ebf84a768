//! core
//!
//! Domain model: snapshot document, tree types, path addressing, command
//! parsing, code synthesis, and configuration. Nothing in this layer
//! touches the filesystem except document and config loading.

pub mod command;
pub mod config;
pub mod path;
pub mod project;
pub mod synth;
pub mod tree;
pub mod types;

pub use command::{parse, ParseError};
pub use config::{Config, ConfigError};
pub use path::{contains, enumerate, find_owning_component, Address, Locus};
pub use project::{LoadError, ProjectDocument};
pub use synth::render_component;
pub use tree::{ComponentDef, ComponentNode, DirectoryNode, Element, Import, Node, Relation, Step};
pub use types::{AstPath, Fingerprint, OpId, TransformCommand};
