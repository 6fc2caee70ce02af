use std::{fmt::Write, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use serde::Deserialize;

use crate::{
    analysis::{Report, Scope},
    charts::ChartSpec,
    error::AnalyzerError,
    spotify::SpotifySession,
    types::{RecordSet, TimeWindow},
    utils::{self, DEFAULT_TOP_N, MAX_LIMIT, TOP_N_RANGE},
};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub window: Option<String>,
    pub evolution: Option<String>,
    pub top_n: Option<usize>,
}

impl DashboardQuery {
    /// Resolves the sidebar selection. The first visit defaults to short term.
    pub fn scope(&self) -> Result<Scope, AnalyzerError> {
        let window = match self.window.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(w) => Some(w.parse::<TimeWindow>()?),
        };
        let evolution = self.evolution.is_some();

        if window.is_none() && !evolution && self.top_n.is_none() {
            return Ok(Scope::SingleWindow(TimeWindow::Short));
        }
        Scope::from_selection(window, evolution)
    }

    pub fn top_n(&self) -> Result<usize, AnalyzerError> {
        let n = self.top_n.unwrap_or(DEFAULT_TOP_N);
        if TOP_N_RANGE.contains(&n) {
            Ok(n)
        } else {
            Err(AnalyzerError::InvalidArgument(format!(
                "top_n must be between {} and {}",
                TOP_N_RANGE.start(),
                TOP_N_RANGE.end()
            )))
        }
    }
}

pub async fn dashboard(
    Query(params): Query<DashboardQuery>,
    Extension(session): Extension<Arc<SpotifySession>>,
) -> Html<String> {
    let body = match build_report(&params, session.as_ref()).await {
        Ok(report) => render_report(&report),
        Err(e) => format!("<div class=\"error\">{}</div>", escape_html(&e.to_string())),
    };

    Html(render_page(&params, &body))
}

async fn build_report(
    params: &DashboardQuery,
    session: &SpotifySession,
) -> Result<Report, AnalyzerError> {
    let scope = params.scope()?;
    let top_n = params.top_n()?;
    Report::build(session, scope, Some(top_n), MAX_LIMIT).await
}

fn render_report(report: &Report) -> String {
    let mut out = String::new();
    for (i, chart) in report.charts().iter().enumerate() {
        let _ = write!(
            out,
            "<div class=\"chart\" id=\"chart-{i}\"></div><script>vegaEmbed('#chart-{i}', {spec});</script>",
            i = i,
            spec = script_json(chart),
        );
    }
    out.push_str(&render_records(&report.records));
    out
}

fn render_records(records: &RecordSet) -> String {
    let mut out = String::from(
        "<details><summary>Show raw data</summary><table><tr><th>range</th><th>title</th><th>artist</th><th>popularity</th><th>length</th><th>genres</th></tr>",
    );
    for e in records.items() {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            e.item.time_window,
            escape_html(&e.item.title),
            escape_html(&e.item.creator_name),
            e.item.popularity,
            utils::format_duration(e.item.duration_ms),
            escape_html(&e.genres.join(", ")),
        );
    }
    out.push_str("</table></details>");
    out
}

/// Full HTML page: the sidebar form, prefilled from `params`, around `body`.
pub fn render_page(params: &DashboardQuery, body: &str) -> String {
    let selected = params
        .window
        .as_deref()
        .and_then(|w| w.parse::<TimeWindow>().ok());
    let mut options = String::from("<option value=\"\">-</option>");
    for w in TimeWindow::ALL {
        let _ = write!(
            options,
            "<option value=\"{v}\"{sel}>{label}</option>",
            v = w.as_api_str(),
            sel = if selected == Some(w) { " selected" } else { "" },
            label = w.label(),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Spotify Listening Analyzer</title>
<script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
<style>
body {{ display: flex; font-family: sans-serif; margin: 0; }}
aside {{ width: 16rem; padding: 1rem; background: #f4f4f4; min-height: 100vh; }}
main {{ flex: 1; padding: 1rem; }}
.chart {{ width: 100%; margin-bottom: 2rem; }}
.error {{ color: #b00020; font-weight: bold; }}
td, th {{ padding: 0.2rem 0.6rem; text-align: left; }}
</style></head>
<body>
<aside><h3>Spotify Analyzer</h3>
<form method="get" action="/">
<label>Time range<br><select name="window" id="window">{options}</select></label><br><br>
<label><input type="checkbox" name="evolution" id="evolution"{evolution}> Show evolution over time</label><br><br>
<label>Top N genres: <output id="top_n_out">{top_n}</output><br>
<input type="range" name="top_n" min="{min}" max="{max}" value="{top_n}" oninput="top_n_out.value=this.value"></label><br><br>
<button type="submit">Analyze</button>
</form>
<script>
document.getElementById('evolution').addEventListener('change', function () {{
  if (this.checked) {{ document.getElementById('window').value = ''; }}
}});
</script>
</aside>
<main><h1>Spotify Listening Analyzer</h1>
{body}
</main></body></html>"#,
        options = options,
        evolution = if params.evolution.is_some() { " checked" } else { "" },
        top_n = params.top_n.unwrap_or(DEFAULT_TOP_N),
        min = TOP_N_RANGE.start(),
        max = TOP_N_RANGE.end(),
        body = body,
    )
}

/// JSON safe to inline inside a `<script>` element.
fn script_json(chart: &ChartSpec) -> String {
    chart.to_vega_lite().to_string().replace("</", "<\\/")
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
