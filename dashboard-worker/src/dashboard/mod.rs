//! Dashboard module - Trading bot web interface
//!
//! Server-rendered page: every request renders the full dashboard from the
//! latest store snapshot. Separated into submodules:
//!
//! # Architecture
//! - `html.rs`: Page sections (sidebar, metrics, tables, force buy)
//! - `chart.rs`: Equity curve as inline SVG
//! - `format.rs`: Money, percent and HTML escaping helpers
//! - `css.rs`: Styling with CSS custom properties
//! - `js.rs`: Busy state and force-buy button label

mod chart;
mod css;
mod format;
mod html;
mod js;

use crate::view::DashboardView;

use format::escape;

/// Generate the complete dashboard HTML page
pub fn render_page(view: &DashboardView) -> String {
    let refresh = view
        .refresh_after
        .map(|seconds| {
            format!(
                r#"<meta http-equiv="refresh" content="{seconds};url=/?year={}">"#,
                escape(&view.equity_year)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<div class="layout">
    {sidebar}
    <main class="main">
        <header>
            <h1>📈 Crypto Trader Dashboard</h1>
        </header>
        {notices}
        {metrics}
        {performance}
        <section class="columns">
            {holdings}
            {trades}
        </section>
        {watchlist}
    </main>
</div>"#,
        sidebar = html::sidebar(view),
        notices = html::notices(&view.notices),
        metrics = html::metrics(view.metrics.as_ref()),
        performance = html::performance(view),
        holdings = html::holdings(view.holdings.as_deref()),
        trades = html::trades(&view.trades),
        watchlist = html::watchlist(&view.watchlist, &view.force_buy_candidates, &view.equity_year),
    );

    page("Crypto Trader Dashboard", &refresh, &body)
}

/// Page shown when the Worker cannot be configured; nothing else renders
pub fn config_error_page(message: &str) -> String {
    let body = format!(
        r#"<main class="main">
    <header><h1>📈 Crypto Trader Dashboard</h1></header>
    <div class="notice notice-error">{}</div>
</main>"#,
        escape(message)
    );
    page("Crypto Trader Dashboard - Configuration Error", "", &body)
}

fn page(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {head_extra}
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{body}
    <script>
{js}
    </script>
</body>
</html>"#,
        css = css::STYLES,
        js = js::SCRIPT
    )
}
