//! Runs the parser over a set of paths and assembles the output

use super::progress::GenerateStats;
use super::walker::FileWalker;
use crate::Settings;
use crate::error::{DocError, DocResult, ErrorContext};
use crate::parsing::{DocFile, DocParser, read_source};
use crate::sorter::{SortedDocs, sort};
use crate::types::Diagnostic;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Generated documentation
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DocOutput {
    /// Parsed files grouped by file type
    Raw(BTreeMap<String, Vec<DocFile>>),
    /// Blocks sorted onto pages, with navigation
    Sorted(SortedDocs),
}

impl DocOutput {
    /// Group parsed files by file type
    pub fn raw(files: Vec<DocFile>) -> Self {
        let mut grouped: BTreeMap<String, Vec<DocFile>> = BTreeMap::new();
        for file in files {
            grouped
                .entry(file.info.file_type.clone())
                .or_default()
                .push(file);
        }
        DocOutput::Raw(grouped)
    }
}

#[derive(Debug)]
pub struct GenerateResult {
    pub output: DocOutput,
    pub stats: GenerateStats,
    /// Warnings from parsing and sorting, in file order
    pub diagnostics: Vec<Diagnostic>,
}

pub struct DocGenerator {
    settings: Arc<Settings>,
    parser: DocParser,
    walker: FileWalker,
}

impl DocGenerator {
    /// Generator rooted at the workspace root, or the current directory
    pub fn new(settings: Arc<Settings>) -> DocResult<Self> {
        let root = settings
            .workspace_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_root(settings, root)
    }

    /// Generator whose `files` and `ignore` globs are relative to `root`
    pub fn with_root(settings: Arc<Settings>, root: impl AsRef<Path>) -> DocResult<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| root.as_ref().to_path_buf());
        let parser = DocParser::new(settings.clone())?;
        let walker = FileWalker::new(settings.clone(), root);
        Ok(Self {
            settings,
            parser,
            walker,
        })
    }

    pub fn parser(&self) -> &DocParser {
        &self.parser
    }

    pub fn root(&self) -> &Path {
        self.walker.root()
    }

    /// Files to parse under `paths`, or under the root when `paths` is empty
    pub fn collect_files(&self, paths: &[PathBuf]) -> DocResult<Vec<PathBuf>> {
        let roots: Vec<PathBuf> = if paths.is_empty() {
            vec![self.root().to_path_buf()]
        } else {
            paths
                .iter()
                .map(|path| {
                    path.canonicalize().map_err(|source| DocError::FileRead {
                        path: path.clone(),
                        source,
                    })
                })
                .collect::<DocResult<_>>()?
        };

        let files = self.walker.walk_all(&roots)?;
        if files.is_empty() {
            return Err(DocError::NoFiles { roots });
        }
        Ok(files)
    }

    /// Parse `files` on a pool of `parallel_threads` threads. The result
    /// keeps the order of `files`.
    pub fn parse_files(&self, files: &[PathBuf]) -> DocResult<(Vec<DocFile>, GenerateStats)> {
        let mut stats = GenerateStats::new();

        let threads = match self.settings.parallel_threads {
            0 => num_cpus::get(),
            n => n,
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| DocError::General(format!("Failed to start parser threads: {e}")))?;

        tracing::debug!("[generator] parsing {} files on {threads} threads", files.len());

        let results: Vec<(&PathBuf, DocResult<DocFile>)> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let parsed = read_source(path)
                        .map(|source| self.parser.parse_source(&self.walker.display_path(path), &source));
                    (path, parsed)
                })
                .collect()
        });

        let mut parsed = Vec::with_capacity(results.len());
        for (path, result) in results {
            match result {
                Ok(file) => {
                    stats.files_parsed += 1;
                    stats.blocks_found += file.body.len() + usize::from(file.header.is_some());
                    parsed.push(file);
                }
                Err(e) => {
                    tracing::warn!("[generator] {e}");
                    stats.add_error(path.clone(), e.to_string());
                }
            }
        }

        Ok((parsed, stats))
    }

    /// Parse every file under `paths` and build the output
    pub fn generate(&self, paths: &[PathBuf]) -> DocResult<GenerateResult> {
        let files = self.collect_files(paths)?;
        let (parsed, mut stats) = self.parse_files(&files)?;

        let mut diagnostics: Vec<Diagnostic> = parsed
            .iter()
            .flat_map(|file| file.diagnostics.iter().cloned())
            .collect();

        let output = if self.settings.raw {
            DocOutput::raw(parsed)
        } else {
            let (sorted, sort_diagnostics) = sort(&parsed, &self.settings.page_fallback);
            diagnostics.extend(sort_diagnostics);
            DocOutput::Sorted(sorted)
        };

        stats.warnings = diagnostics.len();
        stats.stop_timing();

        Ok(GenerateResult {
            output,
            stats,
            diagnostics,
        })
    }
}

/// Write `output` as pretty JSON, creating parent directories
pub fn write_output(output: &DocOutput, path: &Path) -> DocResult<()> {
    let write_error = |source: std::io::Error| DocError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    let json = serde_json::to_string_pretty(output).context("Failed to serialize output")?;
    std::fs::write(path, json).map_err(write_error)?;

    tracing::info!("[generator] wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BUTTON: &str = "////\n/// @name Buttons\n/// @page components/buttons\n////\n\n/// @name Primary\n/// @description The main button\n.button {}\n";

    fn workspace() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("button.scss"), BUTTON).unwrap();
        fs::write(
            src.join("util.js"),
            "/// @name clamp\n/// @page utils\nfunction clamp() {}\n",
        )
        .unwrap();
        fs::write(src.join("notes.js"), "// nothing documented here\n").unwrap();
        temp_dir
    }

    fn settings(raw: bool) -> Arc<Settings> {
        Arc::new(Settings {
            raw,
            parallel_threads: 2,
            ..Settings::default()
        })
    }

    #[test]
    fn test_generate_sorted() {
        let temp_dir = workspace();
        let generator = DocGenerator::with_root(settings(false), temp_dir.path()).unwrap();
        let result = generator.generate(&[]).unwrap();

        assert_eq!(result.stats.files_parsed, 3);
        assert_eq!(result.stats.blocks_found, 3);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

        let DocOutput::Sorted(sorted) = result.output else {
            panic!("expected sorted output");
        };
        let buttons = sorted.pages["components"].subpages.get("buttons").unwrap();
        assert_eq!(buttons.header.name(), Some("Buttons"));
        assert_eq!(buttons.body[0].name(), Some("Primary"));
        assert_eq!(sorted.pages["utils"].body[0].name(), Some("clamp"));
        assert_eq!(sorted.nav.len(), 2);
    }

    #[test]
    fn test_generate_raw_groups_by_type() {
        let temp_dir = workspace();
        let generator = DocGenerator::with_root(settings(true), temp_dir.path()).unwrap();
        let result = generator.generate(&[]).unwrap();

        let DocOutput::Raw(grouped) = &result.output else {
            panic!("expected raw output");
        };
        assert_eq!(grouped["scss"].len(), 1);
        assert_eq!(grouped["scss"][0].info.path, "src/button.scss");
        assert_eq!(grouped["js"].len(), 2);
        assert_eq!(grouped["js"][0].info.path, "src/notes.js");
        assert!(grouped["js"][0].body.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_counted() {
        let temp_dir = workspace();
        fs::write(temp_dir.path().join("src/binary.js"), [0xff, 0xfe, 0x00]).unwrap();

        let generator = DocGenerator::with_root(settings(false), temp_dir.path()).unwrap();
        let result = generator.generate(&[]).unwrap();
        assert_eq!(result.stats.files_parsed, 3);
        assert_eq!(result.stats.files_failed, 1);
        assert!(result.stats.errors[0].1.contains("UTF-8"));
    }

    #[test]
    fn test_no_files_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let generator = DocGenerator::with_root(settings(false), temp_dir.path()).unwrap();
        let err = generator.generate(&[]).unwrap_err();
        assert!(matches!(err, DocError::NoFiles { .. }));
    }

    #[test]
    fn test_explicit_paths() {
        let temp_dir = workspace();
        let generator = DocGenerator::with_root(settings(true), temp_dir.path()).unwrap();
        let file = temp_dir.path().join("src/util.js");
        let files = generator.collect_files(&[file]).unwrap();
        assert_eq!(files.len(), 1);

        let missing = temp_dir.path().join("src/missing.js");
        assert!(matches!(
            generator.collect_files(&[missing]),
            Err(DocError::FileRead { .. })
        ));
    }

    #[test]
    fn test_write_output() {
        let temp_dir = workspace();
        let generator = DocGenerator::with_root(settings(false), temp_dir.path()).unwrap();
        let result = generator.generate(&[]).unwrap();

        let out = temp_dir.path().join("out/docs.json");
        write_output(&result.output, &out).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert!(json["nav"].is_array());
        assert_eq!(json["pages"]["utils"]["body"][0]["name"], "clamp");
    }
}
