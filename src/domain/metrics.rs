//! Performance metrics over a daily strategy return series.
//!
//! All ratios are guarded: a zero standard deviation gives a Sharpe of 0, a
//! series without losing days uses an average loss of 1, and the Kelly
//! fraction is floored at 0.

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const RISK_FREE_RATE: f64 = 0.02;

/// Average loss assumed when no day lost money.
const DEFAULT_AVG_LOSS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    pub total_return: f64,
    pub cagr: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub kelly_fraction: f64,
}

impl Metrics {
    /// `returns` holds one entry per bar after the first; `equity` holds one
    /// entry per bar, starting at `initial_capital`.
    pub fn compute(returns: &[f64], equity: &[f64], initial_capital: f64) -> Self {
        let final_equity = equity.last().copied().unwrap_or(initial_capital);
        let total_return = if initial_capital > 0.0 {
            final_equity / initial_capital - 1.0
        } else {
            0.0
        };

        let years = equity.len() as f64 / TRADING_DAYS_PER_YEAR;
        let cagr = if years > 0.0 && total_return.is_finite() {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let max_drawdown = drawdown_curve(equity)
            .into_iter()
            .fold(0.0_f64, f64::min);

        let sharpe_ratio = sharpe(returns, RISK_FREE_RATE);

        let (win_rate, avg_win, avg_loss) = win_loss(returns);
        let profit_factor = avg_win / avg_loss;
        let kelly_fraction = kelly(win_rate, profit_factor);

        Metrics {
            total_return,
            cagr,
            sharpe_ratio,
            max_drawdown,
            win_rate,
            avg_win,
            avg_loss,
            profit_factor,
            kelly_fraction,
        }
    }
}

/// equity[t] / max(equity[0..=t]) - 1
pub fn drawdown_curve(equity: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            if peak > 0.0 {
                value / peak - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); 0 below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Annualized (mean * 252 - rf) / (std * sqrt(252)).
pub fn sharpe(returns: &[f64], risk_free_rate: f64) -> f64 {
    let std = sample_std(returns);
    if std > 0.0 {
        (mean(returns) * TRADING_DAYS_PER_YEAR - risk_free_rate)
            / (std * TRADING_DAYS_PER_YEAR.sqrt())
    } else {
        0.0
    }
}

/// (win rate, average win, absolute average loss). Flat days count toward
/// the win-rate denominator.
pub fn win_loss(returns: &[f64]) -> (f64, f64, f64) {
    let wins: Vec<f64> = returns.iter().copied().filter(|&r| r > 0.0).collect();
    let losses: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();

    let win_rate = if returns.is_empty() {
        0.0
    } else {
        wins.len() as f64 / returns.len() as f64
    };
    let avg_win = mean(&wins);
    let avg_loss = if losses.is_empty() {
        DEFAULT_AVG_LOSS
    } else {
        mean(&losses).abs()
    };

    (win_rate, avg_win, avg_loss)
}

/// win_rate - (1 - win_rate) / profit_factor, never below 0.
pub fn kelly(win_rate: f64, profit_factor: f64) -> f64 {
    let raw = if profit_factor > 0.0 {
        win_rate - (1.0 - win_rate) / profit_factor
    } else {
        0.0
    };
    raw.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn drawdown_tracks_running_peak() {
        let curve = drawdown_curve(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        assert_eq!(curve[0], 0.0);
        assert_eq!(curve[1], 0.0);
        assert_relative_eq!(curve[2], 90.0 / 110.0 - 1.0);
        assert_relative_eq!(curve[4], 80.0 / 110.0 - 1.0);
        assert!(curve.iter().all(|&d| d <= 0.0));
    }

    #[test]
    fn max_drawdown_is_most_negative_point() {
        let returns = vec![0.1, -0.18, 0.05, -0.16, 0.25];
        let equity = vec![100.0, 110.0, 90.0, 95.0, 80.0, 100.0];
        let m = Metrics::compute(&returns, &equity, 100.0);
        assert_relative_eq!(m.max_drawdown, 80.0 / 110.0 - 1.0);
    }

    #[test]
    fn total_return_and_cagr() {
        let mut equity = vec![100.0; 252];
        equity[251] = 110.0;
        let returns = vec![0.0; 251];
        let m = Metrics::compute(&returns, &equity, 100.0);
        assert_relative_eq!(m.total_return, 0.10, epsilon = 1e-12);
        // exactly one year of bars
        assert_relative_eq!(m.cagr, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn flat_series_has_zero_ratios() {
        let equity = vec![1_000.0; 30];
        let returns = vec![0.0; 29];
        let m = Metrics::compute(&returns, &equity, 1_000.0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_eq!(m.cagr, 0.0);
        assert_eq!(m.max_drawdown, 0.0);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.avg_loss, 1.0);
        assert_eq!(m.profit_factor, 0.0);
        assert_eq!(m.kelly_fraction, 0.0);
    }

    #[test]
    fn sample_std_known_values() {
        // mean 5, squared deviations sum 32, n-1 = 7
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sample_std(&v), (32.0_f64 / 7.0).sqrt());
        assert_eq!(sample_std(&[1.0]), 0.0);
        assert_eq!(sample_std(&[]), 0.0);
    }

    #[test]
    fn sharpe_matches_formula() {
        let returns = [0.01, -0.005, 0.002, 0.004];
        let expected = (mean(&returns) * 252.0 - 0.02) / (sample_std(&returns) * 252f64.sqrt());
        assert_relative_eq!(sharpe(&returns, 0.02), expected);
    }

    #[test]
    fn win_loss_counts_flat_days() {
        let (win_rate, avg_win, avg_loss) = win_loss(&[0.02, -0.01, 0.0, 0.04]);
        assert_relative_eq!(win_rate, 0.5);
        assert_relative_eq!(avg_win, 0.03);
        assert_relative_eq!(avg_loss, 0.01);
    }

    #[test]
    fn win_loss_defaults_avg_loss() {
        let (win_rate, avg_win, avg_loss) = win_loss(&[0.02, 0.04]);
        assert_relative_eq!(win_rate, 1.0);
        assert_relative_eq!(avg_win, 0.03);
        assert_eq!(avg_loss, 1.0);
    }

    #[test]
    fn kelly_is_floored() {
        assert_relative_eq!(kelly(0.6, 2.0), 0.6 - 0.4 / 2.0);
        assert_eq!(kelly(0.2, 0.5), 0.0);
        assert_eq!(kelly(0.7, 0.0), 0.0);
    }

    #[test]
    fn empty_inputs() {
        let m = Metrics::compute(&[], &[], 100.0);
        assert_eq!(m.total_return, 0.0);
        assert_eq!(m.cagr, 0.0);
        assert_eq!(m.max_drawdown, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
    }
}
