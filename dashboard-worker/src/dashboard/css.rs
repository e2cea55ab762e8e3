//! Dashboard CSS styles
//!
//! Dark theme driven by CSS custom properties. Layout is a settings sidebar
//! next to the main column.

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

:root {
    --bg: #0e1117;
    --card: #1e2130;
    --sidebar: #161b22;
    --border: #30363d;
    --text: #c9d1d9;
    --text-dim: #8b949e;
    --green: #3fb950;
    --teal: #00cc96;
    --red: #f85149;
    --blue: #58a6ff;
    --yellow: #d29922;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    min-height: 100vh;
}

.layout { display: flex; min-height: 100vh; }

/* Sidebar */
.sidebar {
    width: 320px;
    flex-shrink: 0;
    background: var(--sidebar);
    border-right: 1px solid var(--border);
    padding: 20px;
}

.sidebar h2 { font-size: 18px; margin-bottom: 16px; }
.sidebar h3 {
    font-size: 12px;
    color: var(--text-dim);
    text-transform: uppercase;
    letter-spacing: 0.5px;
    margin: 16px 0 8px;
}

.sidebar-footer {
    margin-top: 24px;
    padding-top: 16px;
    border-top: 1px solid var(--border);
    font-size: 12px;
    color: var(--text-dim);
}

/* Forms */
label { display: block; font-size: 12px; color: var(--text-dim); margin: 8px 0 4px; }

input, textarea, select {
    width: 100%;
    background: var(--bg);
    color: var(--text);
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 8px;
    font-size: 13px;
    font-family: inherit;
}

textarea { resize: vertical; }

/* Buttons */
.btn {
    display: inline-block;
    padding: 8px 16px;
    border-radius: 6px;
    border: none;
    font-size: 13px;
    font-weight: 500;
    cursor: pointer;
    text-decoration: none;
    transition: all 0.2s;
}

.btn:disabled { opacity: 0.6; cursor: not-allowed; }
.btn-primary { background: var(--blue); color: #fff; }
.btn-primary:hover:not(:disabled) { background: #4c9aed; }
.btn-secondary { background: var(--border); color: var(--text); }
.btn-secondary:hover:not(:disabled) { background: #3d444d; }
.btn-block { width: 100%; margin-top: 12px; text-align: center; }

/* Main column */
.main { flex: 1; padding: 24px; min-width: 0; }

header {
    margin-bottom: 16px;
    padding-bottom: 16px;
    border-bottom: 1px solid var(--border);
}

h1 { font-size: 24px; font-weight: 600; }
.last-update { font-size: 13px; color: var(--text-dim); margin-top: 6px; }
.last-update code { color: var(--text); }

section { margin-top: 24px; }
.section-title { font-size: 16px; font-weight: 600; margin-bottom: 12px; }

/* Notices */
.notice {
    padding: 10px 14px;
    border-radius: 8px;
    font-size: 13px;
    margin-bottom: 8px;
    white-space: pre-wrap;
}

.notice-success { background: rgba(63, 185, 80, 0.15); color: var(--green); }
.notice-warning { background: rgba(210, 153, 34, 0.15); color: var(--yellow); }
.notice-error { background: rgba(248, 81, 73, 0.15); color: var(--red); }

/* Metrics */
.metrics {
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 16px;
}

.metric {
    background: var(--card);
    padding: 15px;
    border-radius: 10px;
    box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
}

.metric-label { font-size: 12px; color: var(--text-dim); text-transform: uppercase; }
.metric-value { font-size: 24px; font-weight: 700; margin-top: 4px; }
.metric-delta { font-size: 13px; margin-top: 2px; }

/* Colors */
.positive { color: var(--green); }
.negative { color: var(--red); }
.neutral { color: var(--text-dim); }

/* Cards */
.card {
    background: var(--card);
    border-radius: 10px;
    padding: 16px;
    overflow-x: auto;
}

.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }

.empty { color: var(--text-dim); font-size: 13px; padding: 8px 0; }

/* Chart */
.equity-chart { width: 100%; height: 280px; display: block; }
.chart-area { fill: rgba(0, 204, 150, 0.25); stroke: none; }
.chart-line { fill: none; stroke: var(--teal); stroke-width: 2; vector-effect: non-scaling-stroke; }
.chart-dot { fill: var(--teal); }
.chart-axis { stroke: var(--border); stroke-width: 1; vector-effect: non-scaling-stroke; }
.chart-label { fill: var(--text-dim); font-size: 12px; }

/* Tables */
.data-table { width: 100%; border-collapse: collapse; font-size: 13px; }

.data-table th,
.data-table td {
    text-align: left;
    padding: 8px;
    border-bottom: 1px solid var(--border);
    white-space: nowrap;
}

.data-table th {
    color: var(--text-dim);
    font-weight: 500;
    font-size: 12px;
    text-transform: uppercase;
}

.data-table td.num { text-align: right; font-variant-numeric: tabular-nums; }
.data-table td.wrap { white-space: normal; }
.data-table tr:last-child td { border-bottom: none; }
.data-table a { color: var(--blue); }

/* Status pill */
.status {
    padding: 2px 8px;
    border-radius: 10px;
    font-size: 11px;
    font-weight: 600;
    text-transform: uppercase;
    background: rgba(139, 148, 158, 0.2);
    color: var(--text-dim);
}

.status-bought { background: rgba(63, 185, 80, 0.2); color: var(--green); }
.status-pending { background: rgba(210, 153, 34, 0.2); color: var(--yellow); }

/* Force buy */
.force-buy {
    display: flex;
    gap: 12px;
    align-items: flex-end;
    margin-top: 16px;
}

.force-buy label { margin-top: 0; }
.force-buy .field { width: 240px; }

.spinner { display: none; font-size: 13px; color: var(--text-dim); }
.busy .spinner { display: inline; }

/* Responsive */
@media (max-width: 900px) {
    .layout { flex-direction: column; }
    .sidebar { width: 100%; border-right: none; border-bottom: 1px solid var(--border); }
    .metrics { grid-template-columns: repeat(2, 1fr); }
    .columns { grid-template-columns: 1fr; }
}
";
