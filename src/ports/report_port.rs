//! Report output port.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TitanError;
use crate::domain::geometry::GeometryProfile;
use crate::domain::rating::RatingResult;

pub trait ReportPort {
    fn write_rating(
        &mut self,
        symbol: &str,
        profile: Option<&GeometryProfile>,
        rating: &RatingResult,
    ) -> Result<(), TitanError>;

    fn write_backtest(&mut self, symbol: &str, result: &BacktestResult) -> Result<(), TitanError>;

    /// Default implementation: writes each result in ranking order.
    fn write_strategy_ranking(
        &mut self,
        symbol: &str,
        results: &[BacktestResult],
    ) -> Result<(), TitanError> {
        for result in results {
            self.write_backtest(symbol, result)?;
        }
        Ok(())
    }
}
