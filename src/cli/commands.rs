//! Command implementations for the Lectern CLI.

use std::io::Read;
use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ClassifierConfig;
use crate::document::converter::csv::CsvRecordReader;
use crate::document::document::Document;
use crate::document::language::Language;
use crate::error::Result;
use crate::ml::bundle::BundleVariant;
use crate::pipeline::prediction::{PredictionPipeline, PredictionRequest};
use crate::pipeline::training::TrainingPipeline;
use crate::storage::model_store::ModelStore;

/// Execute a CLI command.
pub fn execute_command(args: LecternArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Train(train_args) => train(train_args, config, &args),
        Command::Predict(predict_args) => predict(predict_args, config, &args),
        Command::Tags(tags_args) => tags(tags_args, config, &args),
        Command::Versions(versions_args) => versions(versions_args, config, &args),
    }
}

/// Build the effective configuration from the config file and flags.
pub fn load_config(args: &LecternArgs) -> Result<ClassifierConfig> {
    let mut config = match &args.config {
        Some(path) => ClassifierConfig::from_file(path)?,
        None => ClassifierConfig::default(),
    };
    if let Some(dir) = &args.model_dir {
        config = config.with_model_dir(dir);
    }
    Ok(config)
}

fn with_variant(config: ClassifierConfig, variant: Option<VariantArg>) -> ClassifierConfig {
    match variant {
        Some(variant) => config.with_variant(variant.into()),
        None => config,
    }
}

/// Resolve `-` to standard input.
fn read_text(text: &str) -> Result<String> {
    if text == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(text.to_string())
    }
}

/// Train and store a new model.
fn train(args: &TrainArgs, config: ClassifierConfig, cli_args: &LecternArgs) -> Result<()> {
    let config = with_variant(config, args.variant);
    let start_time = Instant::now();

    let records = CsvRecordReader::new()
        .with_delimiter(args.delimiter)
        .read_path(&args.data_file)?;

    let pipeline = TrainingPipeline::new(config)?;
    let version = pipeline.train(&records)?;
    let model = pipeline.handle().require()?;

    output_result(
        "Model trained successfully",
        &TrainingResult {
            version: version.to_string(),
            variant: model.bundle.variant().to_string(),
            documents: records.len(),
            categories: model.bundle.classes().len(),
            features: model.bundle.extractor().n_features(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Predict categories with the latest stored model.
fn predict(args: &PredictArgs, config: ClassifierConfig, cli_args: &LecternArgs) -> Result<()> {
    let config = with_variant(config, args.variant);
    let text = read_text(&args.text)?;

    let (version, predictions) = match config.variant {
        BundleVariant::TextWithFilename => {
            let threshold = args.threshold.unwrap_or(config.threshold);
            let pipeline = PredictionPipeline::load(config)?;
            let request = PredictionRequest {
                text,
                filename: args.filename.clone(),
                language: args.language.clone(),
            };
            let predictions = pipeline.predict_with_threshold(&request, threshold)?;
            (pipeline.active_version(), predictions)
        }
        BundleVariant::TextOnly => {
            let pipeline = TrainingPipeline::open(config)?;
            let language = Language::from_training_label(&args.language);
            let mut document = Document::new(text, language);
            document.filename = args.filename.clone();
            let predictions = pipeline.predict_document(&document, args.threshold)?;
            (pipeline.active_version(), predictions)
        }
    };

    output_result(
        "Predicted categories",
        &PredictionResult {
            version: version.map(|v| v.to_string()),
            predictions,
        },
        cli_args,
    )
}

/// Extract tags with the latest stored text-only model.
fn tags(args: &TagsArgs, config: ClassifierConfig, cli_args: &LecternArgs) -> Result<()> {
    let text = read_text(&args.text)?;
    let pipeline = TrainingPipeline::open(config)?;
    let language = Language::from_training_label(&args.language);
    let tags = pipeline.extract_tags(&text, language, args.top_n)?;

    output_result("Extracted tags", &TagsResult { tags }, cli_args)
}

/// List the stored versions of a variant.
fn versions(args: &VersionsArgs, config: ClassifierConfig, cli_args: &LecternArgs) -> Result<()> {
    let config = with_variant(config, args.variant);
    let store = ModelStore::new(config.store.clone(), config.variant)?;
    let versions = store.list_versions()?;

    output_result(
        "Stored model versions",
        &VersionsResult {
            variant: config.variant.to_string(),
            directory: store.directory().display().to_string(),
            versions: versions.iter().map(ToString::to_string).collect(),
        },
        cli_args,
    )
}
