pub mod generator;
pub mod progress;
pub mod walker;

pub use generator::{DocGenerator, DocOutput, GenerateResult, write_output};
pub use progress::GenerateStats;
pub use walker::{FileWalker, IGNORE_FILE};
