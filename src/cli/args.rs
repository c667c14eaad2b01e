//! Command line argument parsing for the Lectern CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::ml::bundle::BundleVariant;

/// Lectern - multi-label document classification for English and Vietnamese
#[derive(Parser, Debug, Clone)]
#[command(name = "lectern")]
#[command(about = "Multi-label document classification for English and Vietnamese")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LecternArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Model directory, overriding the configured one
    #[arg(long, env = "LECTERN_MODEL_DIR", value_name = "DIR", global = true)]
    pub model_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LecternArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from a CSV file and store it as a new version
    Train(TrainArgs),

    /// Predict the categories of a text
    Predict(PredictArgs),

    /// Extract the highest-weighted terms of a text
    Tags(TagsArgs),

    /// List stored model versions
    Versions(VersionsArgs),
}

/// Which bundle shape to work with.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantArg {
    /// Text features, margin confidences
    Text,
    /// Text and filename features, calibrated probabilities
    Filename,
}

impl From<VariantArg> for BundleVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Text => BundleVariant::TextOnly,
            VariantArg::Filename => BundleVariant::TextWithFilename,
        }
    }
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// CSV file with text,categories,language[,filename] columns
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Bundle variant to train (default: from config)
    #[arg(long)]
    pub variant: Option<VariantArg>,

    /// CSV delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Text to classify; `-` reads standard input
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Language. The filename variant accepts only `en` and `vi`.
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Original filename of the document
    #[arg(long)]
    pub filename: Option<String>,

    /// Minimum confidence (default: from config)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Bundle variant to predict with (default: from config)
    #[arg(long)]
    pub variant: Option<VariantArg>,
}

/// Arguments for tag extraction
#[derive(Parser, Debug, Clone)]
pub struct TagsArgs {
    /// Text to extract tags from; `-` reads standard input
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Language
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Number of tags (default: from config)
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,
}

/// Arguments for listing versions
#[derive(Parser, Debug, Clone)]
pub struct VersionsArgs {
    /// Bundle variant to list (default: from config)
    #[arg(long)]
    pub variant: Option<VariantArg>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_args() {
        let args = LecternArgs::try_parse_from([
            "lectern",
            "--model-dir",
            "/tmp/models",
            "train",
            "data.csv",
            "--variant",
            "filename",
        ])
        .unwrap();

        assert_eq!(args.model_dir, Some(PathBuf::from("/tmp/models")));
        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.data_file, PathBuf::from("data.csv"));
            assert_eq!(train_args.variant, Some(VariantArg::Filename));
            assert_eq!(train_args.delimiter, ',');
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_predict_args() {
        let args = LecternArgs::try_parse_from([
            "lectern",
            "predict",
            "Sorting algorithms",
            "--language",
            "vi",
            "--threshold",
            "0.5",
            "--filename",
            "week1.pdf",
        ])
        .unwrap();

        if let Command::Predict(predict_args) = args.command {
            assert_eq!(predict_args.text, "Sorting algorithms");
            assert_eq!(predict_args.language, "vi");
            assert_eq!(predict_args.threshold, Some(0.5));
            assert_eq!(predict_args.filename.as_deref(), Some("week1.pdf"));
            assert_eq!(predict_args.variant, None);
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = LecternArgs::try_parse_from(["lectern", "versions"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags, after the subcommand
        let args = LecternArgs::try_parse_from(["lectern", "versions", "-vv"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args = LecternArgs::try_parse_from(["lectern", "--quiet", "versions"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args = LecternArgs::try_parse_from(["lectern", "--format", "json", "versions"]).unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
    }

    #[test]
    fn test_variant_conversion() {
        assert_eq!(BundleVariant::from(VariantArg::Text), BundleVariant::TextOnly);
        assert_eq!(
            BundleVariant::from(VariantArg::Filename),
            BundleVariant::TextWithFilename
        );
    }
}
