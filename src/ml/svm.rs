//! Binary linear support vector classifier.
//!
//! Trained with dual coordinate descent (Hsieh et al., 2008). The intercept
//! is learned as the weight of an extra constant feature, so it is
//! regularized like every other weight.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};
use crate::ml::features::FeatureMatrix;

/// Loss minimized by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SvmLoss {
    /// Standard hinge loss. Support vectors sit exactly on the margin.
    Hinge,
    /// Squared hinge loss.
    SquaredHinge,
}

/// Per-class weighting of the penalty `C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// Every sample weighs the same.
    Uniform,
    /// Weight each class by `n_samples / (2 * n_class_samples)`.
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvmConfig {
    /// Regularization parameter. Larger values fit the training data harder.
    pub c: f64,
    pub loss: SvmLoss,
    pub class_weight: ClassWeight,
    /// Maximum number of passes over the training data.
    pub max_iter: usize,
    /// Stop when the projected gradient spread falls below this value.
    pub tol: f64,
    /// Seed for the per-pass sample permutation.
    pub seed: u64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            loss: SvmLoss::Hinge,
            class_weight: ClassWeight::Balanced,
            max_iter: 1000,
            tol: 1e-4,
            seed: 42,
        }
    }
}

impl SvmConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(LecternError::invalid_config(format!(
                "C must be a positive number, got {}",
                self.c
            )));
        }
        if self.max_iter == 0 {
            return Err(LecternError::invalid_config("max_iter must be positive"));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(LecternError::invalid_config("tol must be positive"));
        }
        Ok(())
    }
}

/// A fitted linear decision function `w . x + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvc {
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearSvc {
    /// Fit on rows of `x` with binary targets `y`.
    ///
    /// Both classes must be present.
    pub fn fit(x: &FeatureMatrix, y: &[bool], config: &SvmConfig) -> Result<Self> {
        let n = x.n_rows();
        if n == 0 {
            return Err(LecternError::invalid_training_data("no training samples"));
        }
        if y.len() != n {
            return Err(LecternError::invalid_training_data(format!(
                "{} samples but {} targets",
                n,
                y.len()
            )));
        }

        let n_pos = y.iter().filter(|&&label| label).count();
        let n_neg = n - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(LecternError::invalid_training_data(
                "binary classifier needs both positive and negative samples",
            ));
        }

        let (c_pos, c_neg) = match config.class_weight {
            ClassWeight::Uniform => (config.c, config.c),
            ClassWeight::Balanced => (
                config.c * n as f64 / (2.0 * n_pos as f64),
                config.c * n as f64 / (2.0 * n_neg as f64),
            ),
        };

        // Sparse view of the rows; TF-IDF rows are mostly zeros.
        let samples: Vec<Vec<(usize, f64)>> = x
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, v)| **v != 0.0)
                    .map(|(j, v)| (j, *v))
                    .collect()
            })
            .collect();

        let targets: Vec<f64> = y.iter().map(|&label| if label { 1.0 } else { -1.0 }).collect();

        // Upper bound and diagonal shift of the dual problem per sample.
        let (upper, diag): (Vec<f64>, Vec<f64>) = y
            .iter()
            .map(|&label| {
                let c = if label { c_pos } else { c_neg };
                match config.loss {
                    SvmLoss::Hinge => (c, 0.0),
                    SvmLoss::SquaredHinge => (f64::INFINITY, 0.5 / c),
                }
            })
            .unzip();

        // Squared norms, counting the constant bias feature.
        let qd: Vec<f64> = samples
            .iter()
            .zip(&diag)
            .map(|(sample, d)| sample.iter().map(|(_, v)| v * v).sum::<f64>() + 1.0 + d)
            .collect();

        let mut weights = vec![0.0; x.n_features()];
        let mut bias = 0.0;
        let mut alpha = vec![0.0; n];
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut converged = false;
        let mut passes = 0;

        while passes < config.max_iter {
            passes += 1;
            order.shuffle(&mut rng);

            let mut pg_max = f64::NEG_INFINITY;
            let mut pg_min = f64::INFINITY;

            for &i in &order {
                let yi = targets[i];
                let margin: f64 =
                    samples[i].iter().map(|(j, v)| weights[*j] * v).sum::<f64>() + bias;
                let g = yi * margin - 1.0 + diag[i] * alpha[i];

                let pg = if alpha[i] == 0.0 {
                    g.min(0.0)
                } else if alpha[i] == upper[i] {
                    g.max(0.0)
                } else {
                    g
                };

                pg_max = pg_max.max(pg);
                pg_min = pg_min.min(pg);

                if pg.abs() > 1e-12 {
                    let previous = alpha[i];
                    alpha[i] = (alpha[i] - g / qd[i]).clamp(0.0, upper[i]);
                    let step = (alpha[i] - previous) * yi;
                    for (j, v) in &samples[i] {
                        weights[*j] += step * v;
                    }
                    bias += step;
                }
            }

            if pg_max - pg_min <= config.tol {
                converged = true;
                break;
            }
        }

        if converged {
            log::debug!("Linear SVC converged after {passes} passes");
        } else {
            log::warn!(
                "Linear SVC did not converge within {} passes; consider raising max_iter",
                config.max_iter
            );
        }

        Ok(LinearSvc {
            weights,
            intercept: bias,
        })
    }

    /// Signed distance-like score of one row. Positive means the class applies.
    pub fn decision(&self, row: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(row)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercept
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        let width = rows[0].len();
        FeatureMatrix::from_rows(rows, width).unwrap()
    }

    #[test]
    fn test_two_orthogonal_points_sit_on_the_margin() {
        let x = matrix(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let svc = LinearSvc::fit(&x, &[true, false], &SvmConfig::default()).unwrap();

        assert!((svc.decision(&[1.0, 0.0]) - 1.0).abs() < 1e-3);
        assert!((svc.decision(&[0.0, 1.0]) + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_squared_hinge_shrinks_margins() {
        let x = matrix(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let config = SvmConfig {
            loss: SvmLoss::SquaredHinge,
            ..SvmConfig::default()
        };
        let svc = LinearSvc::fit(&x, &[true, false], &config).unwrap();

        let positive = svc.decision(&[1.0, 0.0]);
        assert!(positive > 0.0 && positive < 1.0);
        assert!(svc.decision(&[0.0, 1.0]) < 0.0);
    }

    #[test]
    fn test_separable_data() {
        let x = matrix(vec![
            vec![1.0, 0.1],
            vec![0.9, 0.2],
            vec![0.8, 0.0],
            vec![0.1, 1.0],
            vec![0.0, 0.9],
            vec![0.2, 0.8],
        ]);
        let y = [true, true, true, false, false, false];
        let svc = LinearSvc::fit(&x, &y, &SvmConfig::default()).unwrap();

        for (row, label) in x.rows().iter().zip(y) {
            assert_eq!(svc.decision(row) > 0.0, label);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let x = matrix(vec![
            vec![1.0, 0.5, 0.0],
            vec![0.3, 1.0, 0.2],
            vec![0.0, 0.4, 1.0],
            vec![0.7, 0.0, 0.7],
        ]);
        let y = [true, false, false, true];
        let first = LinearSvc::fit(&x, &y, &SvmConfig::default()).unwrap();
        let second = LinearSvc::fit(&x, &y, &SvmConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let x = matrix(vec![vec![1.0], vec![0.5]]);
        assert!(matches!(
            LinearSvc::fit(&x, &[true, true], &SvmConfig::default()),
            Err(LecternError::InvalidTrainingData(_))
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(SvmConfig::default().validate().is_ok());
        let config = SvmConfig {
            c: 0.0,
            ..SvmConfig::default()
        };
        assert!(matches!(config.validate(), Err(LecternError::InvalidConfig(_))));
    }
}
