//! The single HTML page served at `/`.
//!
//! All figures are drawn client-side by Plotly from the JSON returned by
//! `/api/forecast`.

use cityweather_core::{DashboardSettings, Horizon};

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Weather with Map</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
<style>
  body { font-family: sans-serif; width: 80%; margin: 0 auto; }
  h1 { text-align: center; }
  .row { margin-bottom: 20px; }
  .chart { margin-bottom: 40px; }
  .error { color: red; margin-bottom: 20px; }
  #map { margin-bottom: 50px; }
  label.days { display: inline-block; margin-right: 10px; }
</style>
</head>
<body>
<h1>Weather forecast and route map</h1>
<form id="forecast-form">
  <div class="row">
    <label for="cities-input">Cities (comma-separated):</label>
    <input id="cities-input" name="cities" type="text" value="{{CITIES}}" style="width: 70%">
  </div>
  <div class="row">
    <span>Forecast horizon (days):</span>
{{HORIZONS}}
  </div>
  <button type="submit">Show forecast</button>
</form>
<div id="status" style="margin-top: 30px">Nothing loaded yet. Press the button.</div>
<div id="results"></div>
<script>
const form = document.getElementById("forecast-form");
const results = document.getElementById("results");
const status = document.getElementById("status");

form.addEventListener("submit", async (event) => {
  event.preventDefault();
  const params = new URLSearchParams(new FormData(form));
  status.textContent = "Loading...";
  results.replaceChildren();

  let dashboard;
  try {
    const res = await fetch("/api/forecast?" + params.toString());
    if (!res.ok) throw new Error("HTTP " + res.status);
    dashboard = await res.json();
  } catch (err) {
    status.textContent = "Request failed: " + err.message;
    return;
  }
  status.textContent = "";

  if (dashboard.map) {
    const div = document.createElement("div");
    div.id = "map";
    results.appendChild(div);
    Plotly.newPlot(div, dashboard.map.data, dashboard.map.layout);
  }

  for (const panel of dashboard.panels) {
    const div = document.createElement("div");
    results.appendChild(div);
    if (panel.status === "ready") {
      div.className = "chart";
      Plotly.newPlot(div, panel.chart.data, panel.chart.layout);
    } else {
      div.className = "error";
      div.textContent = panel.message;
    }
  }
});
</script>
</body>
</html>
"#;

pub fn render(settings: &DashboardSettings) -> String {
    let horizons: String = Horizon::all()
        .iter()
        .map(|h| {
            let checked = if *h == settings.default_days { " checked" } else { "" };
            let unit = if h.days() == 1 { "day" } else { "days" };
            format!(
                "    <label class=\"days\"><input type=\"radio\" name=\"days\" value=\"{h}\"{checked}> {h} {unit}</label>\n"
            )
        })
        .collect();

    TEMPLATE
        .replace("{{CITIES}}", &escape_attr(&settings.default_cities))
        .replace("{{HORIZONS}}\n", &horizons)
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
