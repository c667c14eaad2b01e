//! One-vs-rest multi-label classification.
//!
//! One binary linear classifier per category, trained independently and in
//! parallel. Scores come out in category index order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};
use crate::ml::calibration::PlattScaling;
use crate::ml::features::FeatureMatrix;
use crate::ml::labels::LabelMatrix;
use crate::ml::svm::{LinearSvc, SvmConfig};

/// How raw decision values become confidences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceMode {
    /// Logistic squashing of the raw margin: `1 / (1 + exp(-margin))`.
    Margin,
    /// Per-category Platt-calibrated probability.
    Probability,
}

impl std::fmt::Display for ConfidenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceMode::Margin => write!(f, "margin"),
            ConfidenceMode::Probability => write!(f, "probability"),
        }
    }
}

/// Logistic function.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Binary scorer for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum CategoryScorer {
    Linear {
        svc: LinearSvc,
        calibration: Option<PlattScaling>,
    },
    /// Every training document agreed on this category.
    Constant { positive: bool },
}

impl CategoryScorer {
    fn decision(&self, row: &[f64]) -> f64 {
        match self {
            CategoryScorer::Linear { svc, .. } => svc.decision(row),
            CategoryScorer::Constant { positive: true } => 1.0,
            CategoryScorer::Constant { positive: false } => -1.0,
        }
    }

    fn confidence(&self, row: &[f64], mode: ConfidenceMode) -> f64 {
        match (self, mode) {
            (_, ConfidenceMode::Margin) => sigmoid(self.decision(row)),
            (
                CategoryScorer::Linear {
                    svc,
                    calibration: Some(platt),
                },
                ConfidenceMode::Probability,
            ) => platt.probability(svc.decision(row)),
            (CategoryScorer::Linear { svc, calibration: None }, ConfidenceMode::Probability) => {
                sigmoid(svc.decision(row))
            }
            (CategoryScorer::Constant { positive }, ConfidenceMode::Probability) => {
                if *positive { 1.0 } else { 0.0 }
            }
        }
    }
}

/// One-vs-rest ensemble of linear classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneVsRestClassifier {
    mode: ConfidenceMode,
    n_features: usize,
    scorers: Vec<CategoryScorer>,
}

impl OneVsRestClassifier {
    /// Train one binary classifier per label column.
    pub fn fit(
        x: &FeatureMatrix,
        y: &LabelMatrix,
        config: &SvmConfig,
        mode: ConfidenceMode,
    ) -> Result<Self> {
        if x.is_empty() {
            return Err(LecternError::invalid_training_data("no training samples"));
        }
        if x.n_rows() != y.n_rows() {
            return Err(LecternError::invalid_training_data(format!(
                "{} feature rows but {} label rows",
                x.n_rows(),
                y.n_rows()
            )));
        }
        if y.n_classes() == 0 {
            return Err(LecternError::invalid_training_data("no categories to learn"));
        }
        config.validate()?;

        let scorers = (0..y.n_classes())
            .into_par_iter()
            .map(|class| fit_category(x, &y.column(class), class, config, mode))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Trained {} one-vs-rest classifiers on {} samples x {} features",
            scorers.len(),
            x.n_rows(),
            x.n_features()
        );

        Ok(OneVsRestClassifier {
            mode,
            n_features: x.n_features(),
            scorers,
        })
    }

    /// Raw decision values, one row per sample, one column per category.
    pub fn decision_function(&self, x: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        self.check_width(x)?;
        Ok(x.rows()
            .iter()
            .map(|row| self.scorers.iter().map(|s| s.decision(row)).collect())
            .collect())
    }

    /// Confidences in `[0, 1]` under this classifier's confidence mode.
    pub fn score(&self, x: &FeatureMatrix) -> Result<Vec<Vec<f64>>> {
        self.check_width(x)?;
        Ok(x.rows()
            .iter()
            .map(|row| {
                self.scorers
                    .iter()
                    .map(|s| s.confidence(row, self.mode))
                    .collect()
            })
            .collect())
    }

    fn check_width(&self, x: &FeatureMatrix) -> Result<()> {
        if x.n_features() != self.n_features {
            return Err(LecternError::FeatureDimensionMismatch {
                expected: self.n_features,
                actual: x.n_features(),
            });
        }
        Ok(())
    }

    pub fn mode(&self) -> ConfidenceMode {
        self.mode
    }

    pub fn n_classes(&self) -> usize {
        self.scorers.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

fn fit_category(
    x: &FeatureMatrix,
    targets: &[bool],
    class: usize,
    config: &SvmConfig,
    mode: ConfidenceMode,
) -> Result<CategoryScorer> {
    let positives = targets.iter().filter(|&&t| t).count();
    if positives == 0 || positives == targets.len() {
        let positive = positives > 0;
        log::warn!(
            "Category {class} is {} for every training document; scoring it as a constant",
            if positive { "present" } else { "absent" }
        );
        return Ok(CategoryScorer::Constant { positive });
    }

    let svc = LinearSvc::fit(x, targets, config)?;
    let calibration = match mode {
        ConfidenceMode::Margin => None,
        ConfidenceMode::Probability => {
            let decisions: Vec<f64> = x.rows().iter().map(|row| svc.decision(row)).collect();
            Some(PlattScaling::fit(&decisions, targets))
        }
    };

    Ok(CategoryScorer::Linear { svc, calibration })
}
