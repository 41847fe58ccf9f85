//! Plain-text report adapter implementing ReportPort.
//!
//! Writes fixed-width tables to any `io::Write` sink (stdout in the CLI).

use std::io::Write;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TitanError;
use crate::domain::geometry::GeometryProfile;
use crate::domain::rating::RatingResult;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter<W: Write> {
    out: W,
    /// Trailing equity points printed under each backtest.
    curve_points: usize,
}

impl<W: Write> TextReportAdapter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            curve_points: 0,
        }
    }

    pub fn with_curve_points(mut self, curve_points: usize) -> Self {
        self.curve_points = curve_points;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_curve_tail(&mut self, result: &BacktestResult) -> Result<(), TitanError> {
        if self.curve_points == 0 || result.equity_curve.is_empty() {
            return Ok(());
        }

        let skip = result.equity_curve.len().saturating_sub(self.curve_points);
        writeln!(self.out, "  {:<12} {:>16} {:>10}", "Date", "Equity", "Drawdown")?;
        for (point, dd) in result
            .equity_curve
            .iter()
            .zip(&result.drawdown_curve)
            .skip(skip)
        {
            writeln!(
                self.out,
                "  {:<12} {:>16.2} {:>9.2}%",
                point.date.to_string(),
                point.value,
                dd.value * 100.0
            )?;
        }
        Ok(())
    }
}

impl<W: Write> ReportPort for TextReportAdapter<W> {
    fn write_rating(
        &mut self,
        symbol: &str,
        profile: Option<&GeometryProfile>,
        rating: &RatingResult,
    ) -> Result<(), TitanError> {
        writeln!(
            self.out,
            "{}: {} - {} {}",
            symbol, rating.level, rating.name, rating.color
        )?;
        writeln!(self.out, "  {}", rating.description)?;

        let Some(profile) = profile else {
            return Ok(());
        };

        writeln!(
            self.out,
            "  {:<8} {:>8} {:>8} {:>10}",
            "Horizon", "Angle", "R2", "Slope"
        )?;
        for (horizon, metric) in profile.iter() {
            if metric.valid {
                writeln!(
                    self.out,
                    "  {:<8} {:>8.2} {:>8.4} {:>10.6}",
                    horizon.label(),
                    metric.angle,
                    metric.r_squared,
                    metric.slope
                )?;
            } else {
                writeln!(
                    self.out,
                    "  {:<8} {:>8} {:>8} {:>10}",
                    horizon.label(),
                    "-",
                    "-",
                    "-"
                )?;
            }
        }
        writeln!(
            self.out,
            "  Acceleration: {:.2}  Phoenix: {}",
            profile.acceleration,
            if profile.phoenix_signal { "yes" } else { "no" }
        )?;
        Ok(())
    }

    fn write_backtest(&mut self, symbol: &str, result: &BacktestResult) -> Result<(), TitanError> {
        writeln!(self.out, "{}: {}", symbol, result.strategy)?;
        writeln!(self.out, "  Total Return:    {:>10.2}%", result.total_return * 100.0)?;
        writeln!(self.out, "  CAGR:            {:>10.2}%", result.cagr * 100.0)?;
        writeln!(self.out, "  Sharpe Ratio:    {:>10.3}", result.sharpe_ratio)?;
        writeln!(self.out, "  Max Drawdown:    {:>10.2}%", result.max_drawdown * 100.0)?;
        writeln!(self.out, "  Win Rate:        {:>10.2}%", result.win_rate * 100.0)?;
        writeln!(self.out, "  Profit Factor:   {:>10.3}", result.profit_factor)?;
        writeln!(self.out, "  Kelly Fraction:  {:>10.3}", result.kelly_fraction)?;
        writeln!(self.out, "  Trading Days:    {:>10}", result.trade_count)?;
        writeln!(self.out, "  Position Changes:{:>10}", result.position_changes)?;
        writeln!(self.out, "  Latest Price:    {:>10.2}", result.latest_price)?;
        self.write_curve_tail(result)
    }

    fn write_strategy_ranking(
        &mut self,
        symbol: &str,
        results: &[BacktestResult],
    ) -> Result<(), TitanError> {
        writeln!(self.out, "{}: {} strategies ranked by CAGR", symbol, results.len())?;
        writeln!(
            self.out,
            "  {:>3}  {:<36} {:>9} {:>8} {:>9} {:>8}",
            "#", "Strategy", "CAGR", "Sharpe", "MaxDD", "Kelly"
        )?;
        for (rank, result) in results.iter().enumerate() {
            writeln!(
                self.out,
                "  {:>3}  {:<36} {:>8.2}% {:>8.3} {:>8.2}% {:>8.3}",
                rank + 1,
                result.strategy.to_string(),
                result.cagr * 100.0,
                result.sharpe_ratio,
                result.max_drawdown * 100.0,
                result.kelly_fraction
            )?;
        }
        Ok(())
    }
}
