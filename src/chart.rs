// Chart composition: candlestick series for two concatenated candle weeks,
// overlaid with the previous week's volume profile as horizontal bars on
// secondary axes. Emits a self-contained HTML document with the data embedded
// as JSON for plotly.js.

use serde_json::json;

use crate::data::table::{RecordTable, Value};
use crate::error::ChartError;
use crate::schema::{RecordKind, SchemaRegistry};

/// Renders the combined chart to an HTML string. Expects the candle table's
/// open-time column to already be formatted text (see
/// `RecordTable::format_open_time`).
pub fn render(
    registry: &SchemaRegistry,
    candles: &RecordTable,
    volume: &RecordTable,
    title: &str,
) -> Result<String, ChartError> {
    if candles.kind() != RecordKind::Candle {
        return Err(ChartError::Config(format!(
            "candlestick series needs a candle table, got {:?}",
            candles.kind()
        )));
    }
    if volume.kind() != RecordKind::VolumeProfile {
        return Err(ChartError::Config(format!(
            "volume-profile series needs a volume-profile table, got {:?}",
            volume.kind()
        )));
    }

    let times = text_column(registry, candles, "openTime")?;
    let open = float_column(registry, candles, "open")?;
    let high = float_column(registry, candles, "high")?;
    let low = float_column(registry, candles, "low")?;
    let close = float_column(registry, candles, "close")?;
    let prices = float_column(registry, volume, "price")?;
    let quantities = float_column(registry, volume, "quantity")?;

    let data = json!([
        {
            "type": "candlestick",
            "x": times,
            "open": open,
            "high": high,
            "low": low,
            "close": close,
            "xaxis": "x",
            "yaxis": "y",
            "showlegend": false
        },
        {
            "type": "bar",
            "base": 0,
            "x": quantities,
            "y": prices,
            "orientation": "h",
            "xaxis": "x2",
            "yaxis": "y2",
            "showlegend": false,
            "marker": { "color": "#000" }
        }
    ]);
    let layout = json!({
        "title": { "text": title },
        "xaxis": {
            "side": "bottom",
            "title": { "text": "Date" },
            "showticklabels": true,
            "overlaying": "x2"
        },
        "yaxis": {
            "side": "left",
            "title": { "text": "Price" },
            "showticklabels": true,
            "overlaying": "y2"
        },
        "xaxis2": {
            "side": "top",
            "title": { "text": "Volume" },
            "rangeslider": { "visible": false },
            "showticklabels": true
        },
        "yaxis2": {
            "showticklabels": false,
            "side": "right",
            "matches": "y"
        }
    });

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
    <style>
        html, body {{ margin: 0; padding: 0; width: 100%; height: 100%; }}
        #chart {{ width: 100%; height: 100%; }}
    </style>
</head>
<body>
    <div id="chart"></div>
    <script>
        const data = {data};
        const layout = {layout};
        Plotly.newPlot('chart', data, layout, {{ responsive: true }});
    </script>
</body>
</html>
"##,
        title = title,
        data = data,
        layout = layout,
    ))
}

fn column_by_name<'a>(
    registry: &SchemaRegistry,
    table: &'a RecordTable,
    name: &str,
) -> Result<&'a [Value], ChartError> {
    let key = registry
        .key_for(table.kind(), name)
        .ok_or_else(|| ChartError::Config(format!("{:?} records have no field named '{}'", table.kind(), name)))?;
    table
        .column(key)
        .ok_or_else(|| ChartError::DataFormat(format!("table is missing its '{}' column", key)))
}

fn float_column(registry: &SchemaRegistry, table: &RecordTable, name: &str) -> Result<Vec<f64>, ChartError> {
    column_by_name(registry, table, name)?
        .iter()
        .map(|v| match v {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Text(t) => Err(ChartError::DataFormat(format!(
                "field '{}' holds text '{}', expected a number",
                name, t
            ))),
        })
        .collect()
}

fn text_column(registry: &SchemaRegistry, table: &RecordTable, name: &str) -> Result<Vec<String>, ChartError> {
    column_by_name(registry, table, name)?
        .iter()
        .map(|v| match v {
            Value::Text(t) => Ok(t.clone()),
            other => Err(ChartError::DataFormat(format!(
                "field '{}' holds {:?}, expected formatted text",
                name, other
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tables() -> (SchemaRegistry, RecordTable, RecordTable) {
        let registry = SchemaRegistry::new();

        let mut candles = RecordTable::new(RecordKind::Candle, registry.keys(RecordKind::Candle).collect());
        candles.push_row(vec![
            Value::Int(1_609_459_200_000),
            Value::Float(29000.5),
            Value::Float(29100.0),
            Value::Float(28900.25),
            Value::Float(29050.75),
            Value::Float(123.45),
            Value::Int(1_609_459_259_999),
            Value::Float(3_581_000.12),
            Value::Int(1500),
            Value::Float(60.5),
            Value::Float(1_755_000.3),
            Value::Text("0".to_string()),
            Value::Int(53),
        ]);

        let mut volume =
            RecordTable::new(RecordKind::VolumeProfile, registry.keys(RecordKind::VolumeProfile).collect());
        volume.push_row(vec![Value::Float(29000.0), Value::Float(5.0)]);
        volume.push_row(vec![Value::Float(29010.0), Value::Float(3.5)]);

        (registry, candles, volume)
    }

    #[test]
    fn test_render_embeds_series_data() {
        let (registry, mut candles, volume) = sample_tables();
        candles.format_open_time().unwrap();

        let html = render(&registry, &candles, &volume, "BTC-USDT test chart").unwrap();
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("\"candlestick\""));
        assert!(html.contains("29000.5"));
        assert!(html.contains("29010.0"));
        assert!(html.contains("BTC-USDT test chart"));
        // Volume profile rides on the secondary axes, horizontally.
        assert!(html.contains("\"orientation\":\"h\""));
        assert!(html.contains("\"x2\""));
    }

    #[test]
    fn test_render_requires_formatted_open_time() {
        let (registry, candles, volume) = sample_tables();
        // format_open_time not applied: the raw epoch integers cannot feed the
        // date axis.
        let err = render(&registry, &candles, &volume, "t").unwrap_err();
        assert!(matches!(err, ChartError::DataFormat(_)));
    }

    #[test]
    fn test_weekly_pipeline_end_to_end() {
        use crate::config::Settings;
        use crate::data;
        use std::fs;

        let dir = tempfile::tempdir().unwrap();
        let ohlc_dir = dir.path().join("ohlc");
        let vol_dir = dir.path().join("vol");
        fs::create_dir_all(&ohlc_dir).unwrap();
        fs::create_dir_all(&vol_dir).unwrap();

        let header = "Open time,Open,High,Low,Close,Volume,Close time,Quote asset volume,Number of trades,Taker buy base asset volume,Taker buy quote asset volume,Ignore,Calendar week";
        fs::write(
            ohlc_dir.join("8.csv"),
            format!("{header}\n1609459200000,29000.5,29100.0,28900.25,29050.75,123.45,1609459259999,3581000.12,1500,60.5,1755000.3,0,8\n"),
        )
        .unwrap();
        fs::write(
            ohlc_dir.join("9.csv"),
            format!("{header}\n1610064000000,29150.0,29300.0,29100.0,29250.5,87.2,1610064059999,2551000.0,900,40.1,1172000.9,0,9\n"),
        )
        .unwrap();
        fs::write(vol_dir.join("8.csv"), "price,quantity\n29000.0,5.0\n29010.0,3.5\n").unwrap();

        let settings = Settings {
            ohlc_dir,
            volume_dir: vol_dir,
            ..Settings::default()
        };
        let files = settings.week_files(9).unwrap();
        let registry = SchemaRegistry::new();

        let volume = data::load(&registry, RecordKind::VolumeProfile, &files.volume_prev).unwrap();
        let prev = data::load(&registry, RecordKind::Candle, &files.ohlc_prev).unwrap();
        let current = data::load(&registry, RecordKind::Candle, &files.ohlc_current).unwrap();
        let mut candles = RecordTable::concat(prev, current).unwrap();
        assert_eq!(candles.len(), 2);
        candles.format_open_time().unwrap();

        let html = render(&registry, &candles, &volume, "BTC-USDT weeks 8 | 9").unwrap();
        assert!(html.contains("29250.5"));
        assert!(html.contains("29010.0"));
    }

    #[test]
    fn test_render_rejects_swapped_tables() {
        let (registry, mut candles, volume) = sample_tables();
        candles.format_open_time().unwrap();
        let err = render(&registry, &volume, &candles, "t").unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }
}
