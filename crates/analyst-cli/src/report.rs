//! Report formatting for completed analyses

use analyst_core::AnalysisState;

/// Full report block for one ticker
pub fn verbose_report(state: &AnalysisState) -> String {
    let mut out = String::new();

    out.push_str("\n=== Stock Analysis Results ===\n");
    out.push_str(&format!("Ticker: {}\n", state.ticker()));
    out.push_str(&format!("Analysis Type: {}\n", state.analysis_type()));

    out.push_str("\nFundamentals:\n");
    for (label, value) in state.fundamentals().metrics() {
        match value {
            Some(value) => out.push_str(&format!("  {label}: {value}\n")),
            None => out.push_str(&format!("  {label}: N/A\n")),
        }
    }

    if !state.charts().is_empty() {
        out.push_str("\nCharts Generated:\n");
        for chart in state.charts() {
            out.push_str(&format!("  {}\n", chart.display()));
        }
    }

    if !state.pros_cons().is_empty() {
        out.push_str("\nPros and Cons Analysis:\n");
        out.push_str(state.pros_cons());
        out.push('\n');
    }

    if !state.news().is_empty() {
        out.push_str("\nRecent News:\n");
        for article in state.news() {
            out.push_str(&format!("  {}\n", article.title));
            if !article.url.is_empty() {
                out.push_str(&format!("  URL: {}\n", article.url));
            }
            out.push('\n');
        }
    }

    out
}

/// One-line summary for one ticker, with a short narrative digest
pub fn summary_report(state: &AnalysisState) -> String {
    let mut out = String::new();

    match state.charts().first() {
        Some(chart) => out.push_str(&format!(
            "\n[{}] Analysis completed - Chart saved to {}",
            state.ticker(),
            chart.display()
        )),
        None => out.push_str(&format!("\n[{}] Analysis completed", state.ticker())),
    }

    let digest: Vec<&str> = state.pros_cons().lines().take(3).collect();
    if !digest.is_empty() {
        out.push_str(&format!("\nSummary: {}", digest.join(" ")));
    }

    out
}
