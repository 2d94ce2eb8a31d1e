//! Extracts documentation comment blocks and their annotations from
//! source files and sorts them into pages.

pub mod annotation;
pub mod config;
pub mod error;
pub mod indexing;
pub mod io;
pub mod parsing;
pub mod sorter;
pub mod types;

// Explicit exports for better API clarity
pub use annotation::{AnnotationRegistry, AnnotationValue, DocBlock};
pub use config::Settings;
pub use error::{DocError, DocResult};
pub use indexing::{DocGenerator, DocOutput, GenerateResult};
pub use parsing::{DocFile, DocParser};
pub use sorter::{SortedDocs, sort};
pub use types::{BlockKind, Diagnostic, FileInfo, LineRange};
