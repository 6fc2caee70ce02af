use serde_json::{Map, Value, json};
use tabled::builder::Builder;

use super::{ChartKind, ChartSpec, Encoding, FieldKind};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Turns a [`ChartSpec`] into something a frontend can display.
pub trait ChartRenderer {
    type Output;

    fn render(&self, chart: &ChartSpec) -> Self::Output;
}

/// Renders Vega-Lite v5 JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct VegaLiteRenderer;

impl ChartRenderer for VegaLiteRenderer {
    type Output = Value;

    fn render(&self, chart: &ChartSpec) -> Value {
        let mut encoding = Map::new();

        let mark = match chart.kind {
            ChartKind::Bar | ChartKind::HorizontalBar | ChartKind::GroupedBar => {
                encoding.insert("x".into(), channel(&chart.x));
                encoding.insert("y".into(), channel(&chart.y));
                if chart.kind == ChartKind::GroupedBar {
                    if let Some(color) = &chart.color {
                        encoding.insert("xOffset".into(), json!({ "field": color.field }));
                    }
                }
                "bar"
            }
            ChartKind::Heatmap => {
                encoding.insert("x".into(), channel(&chart.x));
                encoding.insert("y".into(), channel(&chart.y));
                "rect"
            }
            ChartKind::Radar => {
                encoding.insert(
                    "theta".into(),
                    json!({ "field": "slice", "type": "quantitative", "stack": true }),
                );
                encoding.insert(
                    "radius".into(),
                    json!({
                        "field": chart.y.field,
                        "type": "quantitative",
                        "scale": { "type": "linear", "zero": true, "domain": [0, 1] }
                    }),
                );
                "arc"
            }
        };

        if let Some(color) = &chart.color {
            encoding.insert("color".into(), channel(color));
        }

        let mut doc = json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": chart.title,
            "width": "container",
            "data": { "values": chart.data },
            "mark": { "type": mark, "tooltip": true },
            "encoding": Value::Object(encoding),
        });

        if chart.kind == ChartKind::Radar {
            doc["transform"] = json!([{ "calculate": "1", "as": "slice" }]);
        }

        doc
    }
}

fn channel(enc: &Encoding) -> Value {
    let mut ch = json!({
        "field": enc.field,
        "type": match enc.kind {
            FieldKind::Nominal => "nominal",
            FieldKind::Quantitative => "quantitative",
        },
    });
    if enc.keep_order {
        ch["sort"] = Value::Null;
    }
    ch
}

/// Renders the rows behind a chart as a plain text table.
///
/// Columns are the bound fields (x, y, color) first, then any remaining
/// fields of the first row.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer;

impl ChartRenderer for TableRenderer {
    type Output = String;

    fn render(&self, chart: &ChartSpec) -> String {
        let mut columns: Vec<&str> = Vec::new();
        let bound = [Some(&chart.x), Some(&chart.y), chart.color.as_ref()];
        for enc in bound.into_iter().flatten() {
            if !columns.contains(&enc.field.as_str()) {
                columns.push(enc.field.as_str());
            }
        }
        if let Some(Value::Object(first)) = chart.data.first() {
            for key in first.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key.as_str());
                }
            }
        }

        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|c| c.to_string()));
        for row in &chart.data {
            builder.push_record(columns.iter().map(|c| cell(row.get(*c))));
        }

        format!("{}\n{}", chart.title, builder.build())
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.is_f64() => format!("{:.3}", n.as_f64().unwrap_or_default()),
        Some(other) => other.to_string(),
    }
}
