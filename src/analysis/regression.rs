//! Regression Module
//! Ordinary-least-squares fit for the scatter-plot trendlines.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// OLS line through a set of (x, y) points, with the usual summary
/// statistics for the slope.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Two-sided p-value for slope != 0 (Student's t, n - 2 df).
    pub p_value: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit y = a + b*x by least squares. Returns None when fewer than three
/// points remain or x has no variance.
pub fn fit_ols(points: &[(f64, f64)]) -> Option<LinearFit> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let nf = n as f64;

    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / nf;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let (r_squared, p_value) = if syy == 0.0 {
        // Flat response: the fit is exact and carries no slope evidence.
        (1.0, 1.0)
    } else {
        let r = sxy / (sxx * syy).sqrt();
        let r2 = r * r;
        let df = nf - 2.0;
        let p = if 1.0 - r2 < f64::EPSILON {
            0.0
        } else {
            let t = r.abs() * (df / (1.0 - r2)).sqrt();
            match StudentsT::new(0.0, 1.0, df) {
                Ok(dist) => 2.0 * (1.0 - dist.cdf(t)),
                Err(_) => f64::NAN,
            }
        };
        (r2, p)
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        p_value,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_is_recovered() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        let fit = fit_ols(&points).unwrap();

        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!(fit.p_value < 1e-6);
    }

    #[test]
    fn noisy_fit_reports_a_probability() {
        let points = [
            (1.0, 2.1),
            (2.0, 3.9),
            (3.0, 6.2),
            (4.0, 7.8),
            (5.0, 10.1),
        ];
        let fit = fit_ols(&points).unwrap();

        assert!(fit.slope > 1.5 && fit.slope < 2.5);
        assert!(fit.p_value > 0.0 && fit.p_value < 0.05);
        assert_eq!(fit.n, 5);
    }

    #[test]
    fn degenerate_inputs_yield_no_fit() {
        assert!(fit_ols(&[(1.0, 2.0), (2.0, 3.0)]).is_none());
        assert!(fit_ols(&[(1.0, 2.0), (1.0, 3.0), (1.0, 4.0)]).is_none());
    }

    #[test]
    fn prediction_uses_slope_and_intercept() {
        let fit = LinearFit {
            slope: 2.0,
            intercept: 1.0,
            r_squared: 1.0,
            p_value: 0.0,
            n: 3,
        };
        assert!((fit.predict(4.0) - 9.0).abs() < 1e-12);
    }
}
