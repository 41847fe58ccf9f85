//! Log-linear trend fit over a single window.
//!
//! ln(close) is regressed on the bar index 0..n-1 by ordinary least squares.
//! The slope is reported alongside r² and an "angle": atan(slope * 100) in
//! degrees, so a monthly log-slope of 0.01 reads as 45 degrees.
//!
//! Windows with fewer than [`MIN_WINDOW_BARS`] bars, or containing a close
//! that is not strictly positive, produce [`WindowMetric::insufficient`].

use crate::domain::ohlcv::PriceBar;

pub const MIN_WINDOW_BARS: usize = 3;

/// Slope multiplier applied before the arctangent.
pub const ANGLE_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowMetric {
    pub angle: f64,
    pub r_squared: f64,
    pub slope: f64,
    /// False for the all-zero placeholder produced when a window is too short.
    pub valid: bool,
}

impl WindowMetric {
    pub fn insufficient() -> Self {
        Self {
            angle: 0.0,
            r_squared: 0.0,
            slope: 0.0,
            valid: false,
        }
    }
}

/// Least-squares fit of `y` against 0..n-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    /// Pearson correlation, 0 when either variable has zero variance.
    pub r: f64,
}

pub fn fit_index(y: &[f64]) -> Option<LinearFit> {
    if y.len() < 2 {
        return None;
    }

    // Shift by the first value so a constant series has exactly zero variance.
    let base = y[0];
    let n = y.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let shifted_mean = y.iter().map(|v| v - base).sum::<f64>() / n;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (i, &val) in y.iter().enumerate() {
        let dx = i as f64 - x_mean;
        let dy = (val - base) - shifted_mean;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }

    let slope = ss_xy / ss_xx;
    let r = if ss_yy == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_xx * ss_yy).sqrt()).clamp(-1.0, 1.0)
    };

    Some(LinearFit { slope, r })
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn slope_to_angle(slope: f64) -> f64 {
    (slope * ANGLE_SCALE).atan().to_degrees().clamp(-90.0, 90.0)
}

pub fn analyze_window(window: &[PriceBar]) -> WindowMetric {
    if window.len() < MIN_WINDOW_BARS {
        return WindowMetric::insufficient();
    }
    if window.iter().any(|b| !b.close.is_finite() || b.close <= 0.0) {
        tracing::debug!("non-positive close in window of {} bars", window.len());
        return WindowMetric::insufficient();
    }

    let log_prices: Vec<f64> = window.iter().map(|b| b.close.ln()).collect();
    let Some(fit) = fit_index(&log_prices) else {
        return WindowMetric::insufficient();
    };

    WindowMetric {
        angle: round_to(slope_to_angle(fit.slope), 2),
        r_squared: round_to(fit.r * fit.r, 4),
        slope: round_to(fit.slope, 6),
        valid: true,
    }
}
