//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Convert Vue single-file components to Shopify Liquid templates
#[derive(Parser, Debug, Clone)]
#[command(name = "vue2liquid")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Component files or directories to convert (default: current directory)
    pub paths: Vec<PathBuf>,

    /// Write `.liquid` files under this directory, mirroring the input layout
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print converted templates to stdout instead of writing files
    #[arg(long, conflicts_with = "out_dir")]
    pub stdout: bool,

    /// Ignore patterns (glob)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Column at which long class attributes are wrapped
    #[arg(long, default_value_t = 80)]
    pub line_width: usize,

    /// Report format
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Stop after the first file that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Format of the conversion report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["vue2liquid"]);
        assert!(args.paths.is_empty());
        assert_eq!(args.line_width, 80);
        assert_eq!(args.output, OutputFormat::Human);
        assert!(!args.stdout);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "vue2liquid",
            "src/components",
            "--out-dir",
            "snippets",
            "--ignore",
            "**/legacy/**",
            "--output",
            "json",
            "--fail-fast",
            "-v",
        ]);
        assert_eq!(args.paths, vec![PathBuf::from("src/components")]);
        assert_eq!(args.out_dir, Some(PathBuf::from("snippets")));
        assert_eq!(args.ignore, vec!["**/legacy/**".to_string()]);
        assert_eq!(args.output, OutputFormat::Json);
        assert!(args.fail_fast && args.verbose);
    }

    #[test]
    fn test_stdout_conflicts_with_out_dir() {
        let result = Args::try_parse_from(["vue2liquid", "--stdout", "--out-dir", "x"]);
        assert!(result.is_err());
    }
}
