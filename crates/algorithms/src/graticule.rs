//! Graticule (coordinate grid) interval estimation from polygon area.
//!
//! Maps a polygon's area to a recommended grid-line spacing in angular
//! degrees by fitting a two-parameter power law `f(a) = k·a^b` to a small
//! fixed calibration table of known map sizes, evaluating it at the input
//! area, then pulling the value toward a target spacing and clamping it into
//! a narrow display band. The blend and clamp exist because extrapolating a
//! five-point fit far outside its sampled domain is unstable; the band keeps
//! any output usable as a graticule spacing.
//!
//! The fit is a deterministic Levenberg-Marquardt least-squares solve with an
//! analytic Jacobian, seeded from the closed-form log-linear regression.

use cartopress_core::{Error, Result};

/// Calibration areas in hectares
pub const CALIBRATION_AREAS_HA: [f64; 5] = [0.1, 1.0, 4.5, 9.5, 35.0];

/// Grid intervals (degrees) empirically chosen for the calibration areas
pub const CALIBRATION_INTERVALS_DEG: [f64; 5] = [0.0015, 0.001, 0.001, 0.00275, 0.00225];

/// Spacing the fitted value is pulled toward
pub const TARGET_INTERVAL_DEG: f64 = 0.001;

/// Weight of the fitted value in the blend (the remainder goes to the target)
pub const BLEND_WEIGHT: f64 = 0.85;

/// Lower clamp of the output band (degrees)
pub const MIN_INTERVAL_DEG: f64 = 0.001;

/// Upper clamp of the output band (degrees)
pub const MAX_INTERVAL_DEG: f64 = 0.0011;

/// Iteration cap for the curve fit
pub const MAX_FIT_ITERATIONS: usize = 20_000;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Recommended grid spacing for both axes, in degrees.
///
/// The model is isotropic, so both components are always equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInterval {
    pub x_degrees: f64,
    pub y_degrees: f64,
}

/// Fitted power-law parameters: `f(x) = k·x^b`
#[derive(Debug, Clone, Copy)]
pub struct PowerLawFit {
    pub k: f64,
    pub b: f64,
    /// Residual sum of squares at the solution
    pub rss: f64,
    /// Iterations spent by the solver
    pub iterations: usize,
}

impl PowerLawFit {
    /// Evaluate the fitted curve at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.k * x.powf(self.b)
    }
}

/// Estimate the graticule interval for a polygon of the given area.
///
/// # Arguments
/// * `polygon_area_m2` — polygon area in square metres; must be finite and
///   positive (the calibration model is undefined at and below zero)
///
/// # Returns
/// [`GridInterval`] with equal x/y spacing, always inside
/// [[`MIN_INTERVAL_DEG`], [`MAX_INTERVAL_DEG`]].
///
/// The calibration fit is recomputed on every call; the function is pure and
/// holds no shared state.
pub fn estimate_interval(polygon_area_m2: f64) -> Result<GridInterval> {
    if !polygon_area_m2.is_finite() || polygon_area_m2 <= 0.0 {
        return Err(Error::InvalidParameter {
            name: "polygon_area_m2",
            value: polygon_area_m2.to_string(),
            reason: "area must be finite and positive".into(),
        });
    }

    let area_ha = polygon_area_m2 / SQUARE_METERS_PER_HECTARE;

    let fit = fit_power_law(&CALIBRATION_AREAS_HA, &CALIBRATION_INTERVALS_DEG)?;
    let raw = fit.evaluate(area_ha);

    let blended = BLEND_WEIGHT * raw + (1.0 - BLEND_WEIGHT) * TARGET_INTERVAL_DEG;
    let interval = blended.clamp(MIN_INTERVAL_DEG, MAX_INTERVAL_DEG);

    Ok(GridInterval {
        x_degrees: interval,
        y_degrees: interval,
    })
}

/// Fit `f(x) = k·x^b` to sample data by nonlinear least squares.
///
/// Levenberg-Marquardt with the analytic Jacobian
/// (`∂f/∂k = x^b`, `∂f/∂b = k·x^b·ln x`), seeded from the log-linear
/// regression of `ln y` on `ln x`. The solve is deterministic: the same data
/// always produces the same parameters.
///
/// # Errors
/// `InvalidParameter` for unusable data (fewer than 2 points, mismatched
/// lengths, non-positive values); `FitDiverged` when the iteration cap is
/// reached without convergence. A diverged fit is never returned partially.
pub fn fit_power_law(xs: &[f64], ys: &[f64]) -> Result<PowerLawFit> {
    if xs.len() != ys.len() {
        return Err(Error::InvalidParameter {
            name: "ys",
            value: ys.len().to_string(),
            reason: format!("length must match xs ({})", xs.len()),
        });
    }
    if xs.len() < 2 {
        return Err(Error::InvalidParameter {
            name: "xs",
            value: xs.len().to_string(),
            reason: "need at least 2 points to fit a power law".into(),
        });
    }
    if xs.iter().chain(ys.iter()).any(|&v| !v.is_finite() || v <= 0.0) {
        return Err(Error::InvalidParameter {
            name: "xs/ys",
            value: "non-positive".into(),
            reason: "power-law fitting needs finite positive samples".into(),
        });
    }

    // Closed-form seed: least squares of ln y = ln k + b·ln x
    let n = xs.len() as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let (lx, ly) = (x.ln(), y.ln());
        sx += lx;
        sy += ly;
        sxx += lx * lx;
        sxy += lx * ly;
    }
    let denom = n * sxx - sx * sx;
    if denom.abs() < f64::EPSILON {
        return Err(Error::Algorithm(
            "degenerate sample set: all x values equal".into(),
        ));
    }
    let mut b = (n * sxy - sx * sy) / denom;
    let mut k = ((sy - b * sx) / n).exp();

    let rss_at = |k: f64, b: f64| -> f64 {
        xs.iter()
            .zip(ys)
            .map(|(&x, &y)| {
                let r = k * x.powf(b) - y;
                r * r
            })
            .sum()
    };

    const REL_TOL: f64 = 1e-15;
    const LAMBDA_MIN: f64 = 1e-12;
    const LAMBDA_MAX: f64 = 1e12;
    const GRAD_TOL: f64 = 1e-10;

    let mut lambda = 1e-3;
    let mut rss = rss_at(k, b);

    for iteration in 0..MAX_FIT_ITERATIONS {
        // Normal equations J^T J and gradient J^T r for the 2-parameter model
        let (mut j11, mut j12, mut j22) = (0.0, 0.0, 0.0);
        let (mut g1, mut g2) = (0.0, 0.0);
        for (&x, &y) in xs.iter().zip(ys) {
            let f = k * x.powf(b);
            let r = f - y;
            let dk = x.powf(b);
            let db = f * x.ln();
            j11 += dk * dk;
            j12 += dk * db;
            j22 += db * db;
            g1 += dk * r;
            g2 += db * r;
        }

        let grad_norm = (g1 * g1 + g2 * g2).sqrt();
        if grad_norm < GRAD_TOL {
            return Ok(PowerLawFit { k, b, rss, iterations: iteration });
        }

        // Damped 2x2 solve
        let a11 = j11 * (1.0 + lambda);
        let a22 = j22 * (1.0 + lambda);
        let det = a11 * a22 - j12 * j12;
        if det.abs() < f64::MIN_POSITIVE {
            lambda = (lambda * 10.0).min(LAMBDA_MAX);
            continue;
        }
        let dk_step = (-g1 * a22 + g2 * j12) / det;
        let db_step = (-g2 * a11 + g1 * j12) / det;

        let (k_new, b_new) = (k + dk_step, b + db_step);
        let rss_new = rss_at(k_new, b_new);

        if rss_new.is_finite() && rss_new < rss {
            let improvement = rss - rss_new;
            k = k_new;
            b = b_new;
            rss = rss_new;
            lambda = (lambda * 0.5).max(LAMBDA_MIN);
            if improvement <= REL_TOL * rss.max(f64::MIN_POSITIVE) {
                return Ok(PowerLawFit { k, b, rss, iterations: iteration });
            }
        } else {
            lambda *= 2.0;
            if lambda > LAMBDA_MAX {
                // Damping saturated: no step improves the fit any further.
                // At a genuine optimum the gradient is tiny; anything else is
                // a failed solve and must not be returned.
                if grad_norm < GRAD_TOL * (1.0 + rss) {
                    return Ok(PowerLawFit { k, b, rss, iterations: iteration });
                }
                return Err(Error::FitDiverged { iterations: iteration });
            }
        }
    }

    Err(Error::FitDiverged { iterations: MAX_FIT_ITERATIONS })
}
