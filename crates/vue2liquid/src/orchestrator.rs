//! Orchestrator for converting a batch of components.

use crate::cli::Args;
use crate::config::Config;
use crate::output::OutputFormatter;
use liquid_codegen::{convert_sfc, ConvertError};
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use walkdir::WalkDir;

/// A component found during discovery.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path below the root it was found in; a file given directly is
    /// relative to its own directory.
    pub relative: PathBuf,
}

/// What happened to a successfully processed file.
#[derive(Debug)]
pub enum Outcome {
    Written(PathBuf),
    /// Held back for `--stdout`.
    Printed(String),
    Skipped(String),
}

/// Per-file result, in discovery order.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<Outcome>,
}

/// Result of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of files processed.
    pub file_count: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Time taken.
    pub duration_ms: u64,
}

/// Orchestrator for running vue2liquid.
pub struct Orchestrator {
    config: Config,
    stdout: bool,
    fail_fast: bool,
    formatter: OutputFormatter,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(cwd: &Path, args: Args) -> Result<Self> {
        let config = Config::load(cwd, &args)?;
        let formatter = OutputFormatter::new(args.output, args.stdout);

        Ok(Self {
            config,
            stdout: args.stdout,
            fail_fast: args.fail_fast,
            formatter,
        })
    }

    /// Convert every discovered component and print the report.
    pub fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();

        let files = self.find_vue_files()?;
        tracing::debug!(count = files.len(), "found components");

        let reports = self.convert_all(&files);

        let mut summary = RunSummary {
            file_count: reports.len(),
            ..RunSummary::default()
        };
        for report in &reports {
            match &report.result {
                Ok(Outcome::Written(_)) | Ok(Outcome::Printed(_)) => summary.converted += 1,
                Ok(Outcome::Skipped(_)) => summary.skipped += 1,
                Err(_) => summary.failed += 1,
            }
            if let Ok(Outcome::Printed(liquid)) = &report.result {
                print!("{}", liquid);
            }
            self.formatter.print_file(report);
        }
        summary.duration_ms = start.elapsed().as_millis() as u64;

        self.formatter.print_summary(&summary);
        Ok(summary)
    }

    /// Convert files in parallel. With `--fail-fast`, files not yet started
    /// when a failure is seen are left out of the result.
    fn convert_all(&self, files: &[SourceFile]) -> Vec<FileReport> {
        let failed = AtomicBool::new(false);

        files
            .par_iter()
            .filter_map(|file| {
                if self.fail_fast && failed.load(Ordering::Relaxed) {
                    return None;
                }
                let result = self.convert_file(file);
                if result.is_err() {
                    failed.store(true, Ordering::Relaxed);
                }
                Some(FileReport {
                    path: file.path.clone(),
                    result,
                })
            })
            .collect()
    }

    /// Find all Vue files below the configured roots.
    fn find_vue_files(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();

        for root in &self.config.roots {
            if root.is_file() {
                let relative = root
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| root.clone());
                files.push(SourceFile {
                    path: root.clone(),
                    relative,
                });
                continue;
            }
            if !root.is_dir() {
                return Err(miette!("no such file or directory: {}", root.display()));
            }

            for entry in WalkDir::new(root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                let relative = path.strip_prefix(root).unwrap_or(path);
                if self.config.should_process(relative) {
                    files.push(SourceFile {
                        path: path.to_path_buf(),
                        relative: relative.to_path_buf(),
                    });
                }
            }
        }

        Ok(files)
    }

    /// Convert a single component.
    fn convert_file(&self, file: &SourceFile) -> Result<Outcome> {
        let source = fs::read_to_string(&file.path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", file.path.display()))?;

        let liquid = match convert_sfc(&source, &self.config.options) {
            Ok(liquid) => liquid,
            Err(ConvertError::NoTemplate) => {
                tracing::warn!(path = %file.path.display(), "no <template> block, skipping");
                return Ok(Outcome::Skipped("no <template> block".to_string()));
            }
            Err(e) => {
                return Err(e)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("failed to convert {}", file.path.display()))
            }
        };

        if self.stdout {
            return Ok(Outcome::Printed(liquid));
        }

        let output = self.config.output_path(&file.path, &file.relative);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&output, liquid)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {}", output.display()))?;
        tracing::debug!(path = %output.display(), "written");

        Ok(Outcome::Written(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn orchestrator(dir: &Path, extra: &[&str]) -> Orchestrator {
        let argv = ["vue2liquid", "--output", "json"]
            .into_iter()
            .chain(extra.iter().copied());
        Orchestrator::new(dir, Args::parse_from(argv)).unwrap()
    }

    #[test]
    fn test_converts_next_to_components() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(
            root,
            "components/Banner.vue",
            "<template>\n  <div v-if=\"isVisible\">{{ message }}</div>\n</template>\n",
        );
        write(root, "node_modules/lib/Ignored.vue", "<template><p/></template>");
        write(root, "components/notes.md", "# notes");

        let summary = orchestrator(root, &[]).run().unwrap();
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.converted, 1);

        let liquid = fs::read_to_string(root.join("components/Banner.liquid")).unwrap();
        assert_eq!(
            liquid,
            "{% if is_visible %}\n  <div>\n    {{ message }}\n  </div>\n{% endif %}\n"
        );
        assert!(!root.join("node_modules/lib/Ignored.liquid").exists());
    }

    #[test]
    fn test_out_dir_mirrors_layout() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "src/cart/Line.vue", "<template><span>x</span></template>");

        let out = root.join("snippets");
        let out_arg = out.to_string_lossy().to_string();
        let src_arg = root.join("src").to_string_lossy().to_string();
        orchestrator(root, &[&src_arg, "--out-dir", &out_arg])
            .run()
            .unwrap();

        assert!(out.join("cart/Line.liquid").exists());
        assert!(!root.join("src/cart/Line.liquid").exists());
    }

    #[test]
    fn test_skips_and_failures_are_counted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "Logic.vue", "<script>export default {}</script>");
        write(root, "Broken.vue", "<template><div></template>");
        write(root, "Good.vue", "<template><p>ok</p></template>");

        let summary = orchestrator(root, &[]).run().unwrap();
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert!(!root.join("Broken.liquid").exists());
    }

    #[test]
    fn test_stdout_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "Good.vue", "<template><p>ok</p></template>");

        let summary = orchestrator(root, &["--stdout"]).run().unwrap();
        assert_eq!(summary.converted, 1);
        assert!(!root.join("Good.liquid").exists());
    }

    #[test]
    fn test_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope").to_string_lossy().to_string();
        assert!(orchestrator(temp_dir.path(), &[&missing]).run().is_err());
    }
}
