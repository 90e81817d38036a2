//! Price chart rendering

use crate::api::yahoo::{DailyClose, YahooFinanceClient};
use crate::error::{MarketError, Result};
use crate::providers::ChartRenderer;
use async_trait::async_trait;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const CHART_WIDTH: u32 = 1000;
const CHART_HEIGHT: u32 = 500;

/// Renders a closing-price line chart to a PNG file
///
/// Price history comes from Yahoo Finance; rendering runs on the blocking
/// thread pool since plotters does synchronous file IO.
pub struct PriceChartRenderer {
    yahoo: Arc<YahooFinanceClient>,
    history_days: u32,
}

impl PriceChartRenderer {
    /// Create a renderer charting the last `history_days` calendar days
    pub fn new(yahoo: Arc<YahooFinanceClient>, history_days: u32) -> Self {
        Self {
            yahoo,
            history_days,
        }
    }

    /// Path the chart for `ticker` is written to inside `output_dir`
    pub fn chart_path(output_dir: &Path, ticker: &str) -> PathBuf {
        output_dir.join(format!("{ticker}_chart.png"))
    }
}

#[async_trait]
impl ChartRenderer for PriceChartRenderer {
    async fn render_price_chart(&self, ticker: &str, output_dir: &Path) -> Result<PathBuf> {
        let closes = self.yahoo.daily_closes(ticker, self.history_days).await?;

        if closes.is_empty() {
            return Err(MarketError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: "no price history to chart".to_string(),
            });
        }

        let path = Self::chart_path(output_dir, ticker);
        let title = format!("{ticker} Price Trend");

        debug!(%ticker, points = closes.len(), "rendering price chart");

        let dir = output_dir.to_path_buf();
        let render_path = path.clone();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir).map_err(|e| {
                MarketError::ChartError(format!("failed to create {}: {e}", dir.display()))
            })?;
            draw_line_chart(&render_path, &title, &closes)
        })
        .await
        .map_err(|e| MarketError::ChartError(format!("chart render task failed: {e}")))??;

        Ok(path)
    }
}

fn draw_line_chart(path: &Path, title: &str, closes: &[DailyClose]) -> Result<()> {
    let (Some(first), Some(last)) = (closes.first(), closes.last()) else {
        return Err(MarketError::ChartError("empty price series".to_string()));
    };

    let x_start = first.date;
    // A single-day series still needs a non-empty x range
    let x_end = if last.date > first.date {
        last.date
    } else {
        first.date.succ_opt().unwrap_or(first.date)
    };

    let mut low = f64::MAX;
    let mut high = f64::MIN;
    for point in closes {
        low = low.min(point.close);
        high = high.max(point.close);
    }
    // Flat series still need a visible y band
    let pad = ((high - low) * 0.05).max(1.0);

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(to_chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_start..x_end, (low - pad)..(high + pad))
        .map_err(to_chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price")
        .x_labels(8)
        .x_label_formatter(&|date| date.format("%b %Y").to_string())
        .draw()
        .map_err(to_chart_error)?;

    chart
        .draw_series(LineSeries::new(
            closes.iter().map(|point| (point.date, point.close)),
            &BLUE,
        ))
        .map_err(to_chart_error)?
        .label("Closing Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(to_chart_error)?;

    root.present().map_err(to_chart_error)?;
    Ok(())
}

fn to_chart_error(e: impl std::fmt::Display) -> MarketError {
    MarketError::ChartError(e.to_string())
}
