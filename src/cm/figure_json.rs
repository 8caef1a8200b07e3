// Conversion of the maps to plotly figures.

use crate::cm::*;

use serde_json::json;

fn colorscale_to_json(scale: &ColorScale) -> JSValue {
    let stops: Vec<JSValue> = scale
        .stops
        .iter()
        .map(|s| json!([s.position, s.color]))
        .collect();
    JSValue::Array(stops)
}

fn layer_to_json(layer: &ChoroplethLayer) -> JSValue {
    json!({
        "type": "choropleth",
        "locationmode": layer.location_mode.as_str(),
        "locations": layer.locations,
        "text": layer.text,
        "z": layer.z,
        "zmin": layer.zmin,
        "zmax": layer.zmax,
        "colorscale": colorscale_to_json(&layer.colorscale),
        "reversescale": false,
        "colorbar": {
            "thickness": 15,
            "tickvals": layer.colorscale.tickvals,
            "ticktext": layer.colorscale.ticktext,
            "tickprefix": "",
            "title": {"text": "Level"}
        },
        "marker": {"line": {"color": "darkgray", "width": 0.5}}
    })
}

/// The plotly figure (`data` and `layout`) of a map.
pub fn figure_to_json(fig: &Figure) -> JSValue {
    let data: Vec<JSValue> = fig.layers.iter().map(layer_to_json).collect();
    json!({
        "data": data,
        "layout": {
            "title": {
                "text": fig.title,
                "x": 0.46,
                "y": 0.95,
                "xanchor": "center",
                "yanchor": "top"
            },
            "geo": {
                "scope": "world",
                "showframe": true,
                "showcoastlines": true,
                "projection": {"type": fig.projection.name()}
            },
            "annotations": [{
                "text": fig.annotation,
                "x": 0.5,
                "y": -0.05,
                "xanchor": "center",
                "yanchor": "bottom",
                "showarrow": false
            }],
            "margin": {"r": 0, "l": 0, "b": 40, "t": 40}
        }
    })
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A standalone page with the map, the description of the levels and the credits.
pub fn figure_to_html(fig: &Figure, fig_js: &JSValue) -> String {
    let levels: Vec<String> = CountermeasureLevel::ALL
        .iter()
        .map(|l| format!("      <div>{} = {}</div>", l.code(), html_escape(l.description())))
        .collect();
    // "</" must not close the script element early.
    let fig_str = fig_js.to_string().replace("</", "<\\/");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
</head>
<body>
  <h1>Coronavirus counter-measures: global status</h1>
  <div style="display: flex">
    <div id="map" style="width: 66%"></div>
    <div style="width: 33%; padding: 20px; font-size: 12px">
      <h3>Intervention levels</h3>
{levels}
      <p>Data: <a href="https://github.com/OlivierLej/Coronavirus_CounterMeasures/blob/master/dataset.csv">Daily Status</a></p>
    </div>
  </div>
  <script>
    const fig = {fig};
    Plotly.newPlot("map", fig.data, fig.layout);
  </script>
</body>
</html>
"#,
        title = html_escape(&fig.title),
        levels = levels.join("\n"),
        fig = fig_str
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use countermeasure_maps::builder::Builder;

    fn figure() -> Figure {
        let mut b = Builder::new(&["country_id", "country_name", "20200501"]).unwrap();
        b.add_row(&["TX", "Texas", "3"]).unwrap();
        b.add_row(&["BRA", "Brazil", "4"]).unwrap();
        Dashboard::new(b.build().unwrap())
            .render("2020-05-01", Palette::Shikari, Projection::Eckert4)
            .unwrap()
    }

    #[test]
    fn plotly_figure() {
        let js = figure_to_json(&figure());
        let data = js["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["locationmode"], "USA-states");
        assert_eq!(data[0]["locations"][0], "TX");
        assert_eq!(data[0]["z"][0], 3);
        assert_eq!(data[1]["locationmode"], "ISO-3");
        assert_eq!(data[1]["text"][0], "Brazil");
        assert_eq!(data[1]["zmax"], 6.0);
        assert_eq!(data[1]["colorscale"].as_array().unwrap().len(), 12);
        assert_eq!(data[1]["colorscale"][0][1], "#2f2f2f");
        assert_eq!(data[1]["colorbar"]["ticktext"][5], "5");
        assert_eq!(js["layout"]["geo"]["projection"]["type"], "eckert4");
        assert_eq!(
            js["layout"]["title"]["text"],
            "Coronavirus counter-measures: 2020-05-01"
        );
    }

    #[test]
    fn html_page() {
        let fig = figure();
        let page = figure_to_html(&fig, &figure_to_json(&fig));
        assert!(page.contains("<div>5 = All-day lockdown"));
        assert!(page.contains("\"locationmode\":\"ISO-3\""));
        // The links of the annotation are escaped in the script.
        assert!(!page.contains("</a>\""));
    }
}
