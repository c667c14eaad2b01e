//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{LecternArgs, OutputFormat};
use crate::error::Result;
use crate::pipeline::CategoryPrediction;

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub version: String,
    pub variant: String,
    pub documents: usize,
    pub categories: usize,
    pub features: usize,
    pub duration_ms: u64,
}

/// Result structure for prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResult {
    pub version: Option<String>,
    pub predictions: Vec<CategoryPrediction>,
}

/// Result structure for tag extraction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TagsResult {
    pub tags: Vec<String>,
}

/// Result structure for version listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionsResult {
    pub variant: String,
    pub directory: String,
    pub versions: Vec<String>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &LecternArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &LecternArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;

    if let Some(predictions) = value.get("predictions").and_then(|p| p.as_array()) {
        output_predictions_human(predictions);
    } else {
        output_generic_human(&value);
    }
    Ok(())
}

/// Output predictions as an aligned list.
fn output_predictions_human(predictions: &[serde_json::Value]) {
    if predictions.is_empty() {
        println!("No category reached the threshold.");
        return;
    }

    let width = predictions
        .iter()
        .filter_map(|p| p.get("category").and_then(|c| c.as_str()))
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);

    for prediction in predictions {
        let category = prediction
            .get("category")
            .and_then(|c| c.as_str())
            .unwrap_or("");
        let confidence = prediction
            .get("confidence")
            .and_then(|c| c.as_f64())
            .unwrap_or(0.0);
        println!("{category:<width$}  {confidence:.3}");
    }
}

/// Generic human-readable output.
fn output_generic_human(value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LecternArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(
            format_value(&serde_json::Value::String("test".to_string())),
            "test"
        );
        assert_eq!(
            format_value(&serde_json::Value::Number(serde_json::Number::from(42))),
            "42"
        );
        assert_eq!(format_value(&serde_json::Value::Null), "none");
        assert_eq!(
            format_value(&serde_json::json!(["lecture", "algorithms"])),
            "[lecture, algorithms]"
        );
    }

    #[test]
    fn test_prediction_result_serializes() {
        let result = PredictionResult {
            version: Some("20240101_000000".to_string()),
            predictions: vec![CategoryPrediction {
                category: "lecture".to_string(),
                confidence: 0.73,
            }],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["predictions"][0]["category"], "lecture");
        assert_eq!(value["version"], "20240101_000000");
    }
}
