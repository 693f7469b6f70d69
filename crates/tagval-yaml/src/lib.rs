//! # tagval-yaml
//!
//! YAML parsing into a node tree that keeps the source position of every
//! node.
//!
//! The tree is what the validation layer aligns struct fields against: each
//! [`YamlWithSourceInfo`] knows its [`NodeKind`], its 1-based line and column,
//! the literal text of scalars, and for mappings the key/value entries in the
//! order they were written.
//!
//! ## Example
//!
//! ```rust
//! use tagval_yaml::{parse, NodeKind};
//!
//! let content = r#"
//! name: John Doe
//! age: 30
//! "#;
//!
//! let doc = parse(content).unwrap();
//! assert_eq!(doc.kind(), NodeKind::Mapping);
//!
//! let age = doc.get_hash_value("age").unwrap();
//! assert_eq!(age.scalar_text(), Some("30"));
//! println!("age at {}:{}", age.line(), age.column());
//! ```

mod error;
mod parser;
mod source_info;
mod yaml_with_source_info;

pub use error::{Error, Result};
pub use parser::{parse, parse_file};
pub use source_info::SourceInfo;
pub use yaml_with_source_info::{NodeKind, YamlHashEntry, YamlWithSourceInfo};
