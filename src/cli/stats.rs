use serde_json::Value;

use crate::{
    analysis::{Report, Scope},
    charts::{ChartRenderer, TableRenderer, VegaLiteRenderer},
    error, success,
    types::TimeWindow,
};

use super::{fetch_records, load_session};

/// Prints the four window metrics, as tables or as Vega-Lite specs.
pub async fn stats(
    window: Option<TimeWindow>,
    evolution: bool,
    top_n: usize,
    limit: u32,
    json: bool,
) {
    let scope = match Scope::from_selection(window, evolution) {
        Ok(scope) => scope,
        Err(e) => error!("{}", e),
    };

    let session = load_session().await;
    let records = match fetch_records(&session, scope, limit).await {
        Ok(records) => records,
        Err(e) => error!("Cannot load tracks. Err: {}", e),
    };

    let report = match Report::from_records(records, scope, Some(top_n)) {
        Ok(report) => report,
        Err(e) => error!("Cannot compute statistics. Err: {}", e),
    };

    if json {
        let specs: Vec<Value> = report
            .charts()
            .iter()
            .map(|c| VegaLiteRenderer.render(c))
            .collect();
        match serde_json::to_string_pretty(&specs) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize charts. Err: {}", e),
        }
        return;
    }

    for chart in report.charts() {
        println!("{}\n", TableRenderer.render(&chart));
    }

    success!(
        "Analyzed {} tracks across {} time range(s)",
        report.records.len(),
        report.records.windows().len()
    );
}
