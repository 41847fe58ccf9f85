//! Seven-horizon trend geometry profile.
//!
//! Fits every [`Horizon`] over the trailing slice of a monthly series and
//! derives two composite signals:
//! - acceleration = angle(3M) - angle(1Y), rounded to 2 decimals
//! - phoenix signal = angle(10Y) < 0 and angle(6M) > 25

use crate::domain::ohlcv::PriceBar;
use crate::domain::trend::{analyze_window, round_to, WindowMetric};
use crate::domain::window::trailing;
use std::fmt;

/// 6M angle above which a long-term downtrend counts as a phoenix.
pub const PHOENIX_6M_ANGLE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Horizon {
    Y35,
    Y10,
    Y5,
    Y3,
    Y1,
    M6,
    M3,
}

impl Horizon {
    /// Longest first.
    pub const ALL: [Horizon; 7] = [
        Horizon::Y35,
        Horizon::Y10,
        Horizon::Y5,
        Horizon::Y3,
        Horizon::Y1,
        Horizon::M6,
        Horizon::M3,
    ];

    pub fn months(self) -> usize {
        match self {
            Horizon::Y35 => 420,
            Horizon::Y10 => 120,
            Horizon::Y5 => 60,
            Horizon::Y3 => 36,
            Horizon::Y1 => 12,
            Horizon::M6 => 6,
            Horizon::M3 => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Horizon::Y35 => "35Y",
            Horizon::Y10 => "10Y",
            Horizon::Y5 => "5Y",
            Horizon::Y3 => "3Y",
            Horizon::Y1 => "1Y",
            Horizon::M6 => "6M",
            Horizon::M3 => "3M",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryProfile {
    metrics: [WindowMetric; 7],
    pub acceleration: f64,
    pub phoenix_signal: bool,
}

impl GeometryProfile {
    /// Assemble a profile from per-horizon metrics, deriving the composites.
    pub fn from_metrics(metrics: [WindowMetric; 7]) -> Self {
        let angle = |h: Horizon| metrics[h.index()].angle;
        let acceleration = round_to(angle(Horizon::M3) - angle(Horizon::Y1), 2);
        let phoenix_signal = angle(Horizon::Y10) < 0.0 && angle(Horizon::M6) > PHOENIX_6M_ANGLE;
        Self {
            metrics,
            acceleration,
            phoenix_signal,
        }
    }

    pub fn metric(&self, horizon: Horizon) -> &WindowMetric {
        &self.metrics[horizon.index()]
    }

    pub fn angle(&self, horizon: Horizon) -> f64 {
        self.metric(horizon).angle
    }

    pub fn r_squared(&self, horizon: Horizon) -> f64 {
        self.metric(horizon).r_squared
    }

    /// (horizon, metric) pairs, longest horizon first.
    pub fn iter(&self) -> impl Iterator<Item = (Horizon, &WindowMetric)> {
        Horizon::ALL.into_iter().map(move |h| (h, self.metric(h)))
    }

    /// Number of horizons backed by enough history to fit.
    pub fn valid_horizons(&self) -> usize {
        self.metrics.iter().filter(|m| m.valid).count()
    }
}

/// Build the profile for a monthly series. `None` when the series is empty.
pub fn build_profile(monthly: &[PriceBar]) -> Option<GeometryProfile> {
    if monthly.is_empty() {
        return None;
    }

    let metrics = Horizon::ALL.map(|h| analyze_window(trailing(monthly, h.months())));
    let profile = GeometryProfile::from_metrics(metrics);

    tracing::debug!(
        bars = monthly.len(),
        valid = profile.valid_horizons(),
        acceleration = profile.acceleration,
        phoenix = profile.phoenix_signal,
        "geometry profile built"
    );

    Some(profile)
}
