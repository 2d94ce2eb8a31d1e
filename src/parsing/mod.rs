//! Source parsing: comment styles, block extraction and annotation parsing

pub mod blocks;
pub mod normalize;
pub mod parser;
pub mod style;

pub use blocks::{BlockError, RawBlock, extract_body, extract_header};
pub use normalize::{dedent, normalize, normalize_text};
pub use parser::{DocFile, DocParser, ExtractedBlocks, read_source};
pub use style::{CommentStyle, Delimiters, StyleRegistry};
