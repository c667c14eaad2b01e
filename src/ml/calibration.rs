//! Platt scaling of decision values into probabilities.
//!
//! Fits `P(y = 1 | f) = 1 / (1 + exp(a * f + b))` by Newton's method with
//! backtracking line search, following Lin, Lin and Weng (2007). Targets
//! are smoothed toward the class priors so a perfectly separated training
//! set does not push the sigmoid to a step function.

use serde::{Deserialize, Serialize};

const MAX_ITERATIONS: usize = 100;
const MIN_STEP: f64 = 1e-10;
const HESSIAN_RIDGE: f64 = 1e-12;
const GRADIENT_EPSILON: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattScaling {
    a: f64,
    b: f64,
}

impl PlattScaling {
    pub fn new(a: f64, b: f64) -> Self {
        PlattScaling { a, b }
    }

    /// Fit on decision values and their true labels.
    pub fn fit(decisions: &[f64], labels: &[bool]) -> Self {
        let prior1 = labels.iter().filter(|&&l| l).count() as f64;
        let prior0 = labels.len() as f64 - prior1;

        let hi_target = (prior1 + 1.0) / (prior1 + 2.0);
        let lo_target = 1.0 / (prior0 + 2.0);
        let targets: Vec<f64> = labels
            .iter()
            .map(|&l| if l { hi_target } else { lo_target })
            .collect();

        let mut a = 0.0;
        let mut b = ((prior0 + 1.0) / (prior1 + 1.0)).ln();
        let mut fval = objective(decisions, &targets, a, b);

        for _ in 0..MAX_ITERATIONS {
            let mut h11 = HESSIAN_RIDGE;
            let mut h22 = HESSIAN_RIDGE;
            let mut h21 = 0.0;
            let mut g1 = 0.0;
            let mut g2 = 0.0;

            for (&f, &t) in decisions.iter().zip(&targets) {
                let (p, q) = probabilities(f * a + b);
                let d2 = p * q;
                h11 += f * f * d2;
                h22 += d2;
                h21 += f * d2;
                let d1 = t - p;
                g1 += f * d1;
                g2 += d1;
            }

            if g1.abs() < GRADIENT_EPSILON && g2.abs() < GRADIENT_EPSILON {
                break;
            }

            let det = h11 * h22 - h21 * h21;
            let da = -(h22 * g1 - h21 * g2) / det;
            let db = -(-h21 * g1 + h11 * g2) / det;
            let gd = g1 * da + g2 * db;

            let mut step = 1.0;
            while step >= MIN_STEP {
                let new_a = a + step * da;
                let new_b = b + step * db;
                let new_f = objective(decisions, &targets, new_a, new_b);
                if new_f < fval + 1e-4 * step * gd {
                    a = new_a;
                    b = new_b;
                    fval = new_f;
                    break;
                }
                step /= 2.0;
            }

            if step < MIN_STEP {
                log::warn!("Platt scaling line search failed; keeping current parameters");
                break;
            }
        }

        PlattScaling { a, b }
    }

    /// Calibrated probability of the positive class.
    pub fn probability(&self, decision: f64) -> f64 {
        probabilities(decision * self.a + self.b).0
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}

/// `(1 / (1 + exp(z)), 1 - that)`, evaluated without overflow.
fn probabilities(z: f64) -> (f64, f64) {
    if z >= 0.0 {
        let e = (-z).exp();
        (e / (1.0 + e), 1.0 / (1.0 + e))
    } else {
        let e = z.exp();
        (1.0 / (1.0 + e), e / (1.0 + e))
    }
}

/// Negative log-likelihood of the smoothed targets.
fn objective(decisions: &[f64], targets: &[f64], a: f64, b: f64) -> f64 {
    decisions
        .iter()
        .zip(targets)
        .map(|(&f, &t)| {
            let z = f * a + b;
            if z >= 0.0 {
                t * z + (-z).exp().ln_1p()
            } else {
                (t - 1.0) * z + z.exp().ln_1p()
            }
        })
        .sum()
}
