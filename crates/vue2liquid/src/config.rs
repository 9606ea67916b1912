//! Run configuration derived from the command line.

use crate::cli::Args;
use globset::{Glob, GlobSet, GlobSetBuilder};
use liquid_codegen::ConvertOptions;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};

const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**", "**/dist/**", "**/.git/**"];

/// Configuration for one vue2liquid run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Files and directories to convert.
    pub roots: Vec<PathBuf>,
    /// Destination root; `None` writes next to each component.
    pub out_dir: Option<PathBuf>,
    pub options: ConvertOptions,
    ignore: GlobSet,
}

impl Config {
    /// Build the configuration, resolving relative paths against `cwd`.
    pub fn load(cwd: &Path, args: &Args) -> Result<Self> {
        let resolve = |path: &PathBuf| {
            if path.is_absolute() {
                path.clone()
            } else {
                cwd.join(path)
            }
        };

        let roots = if args.paths.is_empty() {
            vec![cwd.to_path_buf()]
        } else {
            args.paths.iter().map(resolve).collect()
        };

        let mut builder = GlobSetBuilder::new();
        let patterns = DEFAULT_IGNORES
            .iter()
            .copied()
            .chain(args.ignore.iter().map(String::as_str));
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid ignore pattern `{}`", pattern))?;
            builder.add(glob);
        }
        let ignore = builder.build().into_diagnostic()?;

        Ok(Self {
            roots,
            out_dir: args.out_dir.as_ref().map(resolve),
            options: ConvertOptions {
                line_width: args.line_width,
                ..ConvertOptions::default()
            },
            ignore,
        })
    }

    /// Check if a discovered file should be converted. `relative` is the
    /// path below the root it was found in.
    pub fn should_process(&self, relative: &Path) -> bool {
        relative.extension().is_some_and(|e| e == "vue") && !self.ignore.is_match(relative)
    }

    /// Where the Liquid output for `relative` (found under some root, or
    /// given directly as `path`) is written.
    pub fn output_path(&self, path: &Path, relative: &Path) -> PathBuf {
        match &self.out_dir {
            Some(dir) => dir.join(relative).with_extension("liquid"),
            None => path.with_extension("liquid"),
        }
    }
}
