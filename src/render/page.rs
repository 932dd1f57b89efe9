//! Page rendering - input region + result region

use super::escape::escape_html;
use super::gauge::GaugeSpec;
use crate::binder::{Control, PredictionResult, RenderedForm, ResultPanel, Widget};

pub const PAGE_TITLE: &str = "Inadvertent Intraoperative Hypothermia (IIH) Risk Prediction";
pub const IDLE_PROMPT: &str = "Click 'Calculate Risk' to see the result.";
pub const CALCULATE_LABEL: &str = "Calculate Risk";

/// What the page body shows
#[derive(Debug)]
pub enum PageBody<'a> {
    /// Artifacts failed to load; no inputs, no calculate action
    Unavailable { reason: &'a str },
    Ready {
        form: &'a RenderedForm,
        panel: &'a ResultPanel,
    },
}

pub fn render_page(body: PageBody<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Hypothermia Prediction Tool</title>\n");
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<div class=\"main-header\">{}</div>\n", escape_html(PAGE_TITLE)));

    match body {
        PageBody::Unavailable { reason } => {
            html.push_str(&format!(
                "<div class=\"banner banner-error\" role=\"alert\"><strong>Model unavailable.</strong> {}</div>\n",
                escape_html(reason)
            ));
        }
        PageBody::Ready { form, panel } => {
            html.push_str("<div class=\"layout\">\n");
            html.push_str(&render_input_region(form));
            html.push_str(&render_result_region(panel));
            html.push_str("</div>\n");
            html.push_str(SCRIPT);
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_input_region(form: &RenderedForm) -> String {
    let mut html = String::new();
    html.push_str("<section class=\"panel inputs\">\n<h3>Patient Parameters</h3>\n");
    html.push_str("<form id=\"risk-form\" method=\"post\" action=\"/calculate\">\n<div class=\"columns\">\n");

    for column in form.columns() {
        html.push_str("<div class=\"column\">\n");
        for widget in column {
            html.push_str(&render_widget(widget));
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>\n");
    html.push_str(&format!(
        "<button type=\"submit\" class=\"calculate\">{}</button>\n",
        escape_html(CALCULATE_LABEL)
    ));
    html.push_str("</form>\n</section>\n");
    html
}

fn render_widget(widget: &Widget) -> String {
    let name = escape_html(&widget.feature);
    let mut html = format!(
        "<div class=\"field\" data-feature=\"{name}\">\n<div class=\"custom-label\">{name}</div>\n"
    );

    match &widget.control {
        Control::Radio { choices } => {
            html.push_str("<div class=\"radio-group\">\n");
            for (i, choice) in choices.iter().enumerate() {
                let id = format!("{}-{}", name, i);
                html.push_str(&format!(
                    "<label for=\"{id}\"><input type=\"radio\" id=\"{id}\" name=\"{name}\" value=\"{code}\"{checked}> {label}</label>\n",
                    code = choice.code,
                    checked = if choice.selected { " checked" } else { "" },
                    label = escape_html(&choice.label),
                ));
            }
            html.push_str("</div>\n");
        }
        Control::Slider { min, max, step, value } => {
            html.push_str(&format!(
                "<input type=\"range\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\">\n<output class=\"slider-value\">{value}</output>\n"
            ));
        }
    }

    html.push_str("</div>\n");
    html
}

fn render_result_region(panel: &ResultPanel) -> String {
    let mut html = String::new();
    html.push_str("<section class=\"panel result\">\n<h3>Prediction Result</h3>\n");

    match panel {
        ResultPanel::Idle => {
            html.push_str(&format!("<div class=\"info\">{}</div>\n", escape_html(IDLE_PROMPT)));
        }
        ResultPanel::Displayed(result) => html.push_str(&render_result(result)),
        ResultPanel::Failed { message, previous } => {
            if let Some(result) = previous {
                html.push_str(&render_result(result));
            }
            html.push_str(&format!(
                "<div class=\"banner banner-error\" role=\"alert\">{}</div>\n",
                escape_html(message)
            ));
        }
    }

    html.push_str("</section>\n");
    html
}

fn render_result(result: &PredictionResult) -> String {
    let gauge = GaugeSpec::for_percent(result.percent);
    format!(
        "{}\n<div class=\"tier {}\"><strong>{}</strong>: {}</div>\n",
        gauge.render(),
        result.tier.css_class(),
        escape_html(result.tier.label()),
        escape_html(&result.display_percent()),
    )
}

const STYLE: &str = r#"<style>
  body { font-family: system-ui, sans-serif; margin: 0; padding: 2rem; color: #333; }
  .main-header { text-align: center; color: #333; margin-bottom: 20px; font-weight: 700; font-size: 28px; }
  .layout { display: grid; grid-template-columns: 2fr 1fr; gap: 2rem; }
  .panel { background-color: #f8f9fa; border: 1px solid #ddd; border-radius: 8px; padding: 15px; }
  .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  .custom-label { font-size: 16px; font-weight: 600; color: #444; margin-top: 15px; margin-bottom: 5px; }
  .radio-group { display: flex; flex-wrap: wrap; gap: 0.75rem; }
  input[type=range] { width: 80%; accent-color: #2ca02c; }
  button.calculate { background-color: #2ca02c; color: white; font-size: 18px; height: 3em;
    border: none; border-radius: 8px; width: 100%; font-weight: bold; margin-top: 1.5rem; cursor: pointer; }
  .info { background: #e8f0fe; padding: 0.75rem; border-radius: 6px; }
  .banner { padding: 0.75rem; border-radius: 6px; margin: 0.75rem 0; }
  .banner-error, .tier-high { background: #fde8e8; color: #8a1c1c; }
  .tier { padding: 0.75rem; border-radius: 6px; margin-top: 0.75rem; }
  .tier-low { background: #e6f4ea; color: #1e6b2e; }
  .tier-medium { background: #fff4e5; color: #8a5a00; }
  .gauge-title { text-align: center; font-size: 20px; margin-bottom: 0.5rem; }
  .gauge-track { position: relative; height: 24px; background: #f0f2f6; border-radius: 12px; overflow: hidden; }
  .gauge-bar { height: 100%; }
  .gauge-threshold { position: absolute; top: 0; width: 3px; height: 100%; background: black; }
  .gauge-axis { display: flex; justify-content: space-between; font-size: 12px; color: #666; }
  .gauge-number { text-align: center; font-size: 40px; color: #333; }
</style>
"#;

const SCRIPT: &str = r#"<script>
document.querySelectorAll('#risk-form input').forEach(function (el) {
  el.addEventListener('input', function () {
    if (el.type === 'range') { el.nextElementSibling.textContent = el.value; }
  });
  el.addEventListener('change', function () {
    fetch('/api/v1/session/inputs', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ feature: el.name, value: parseFloat(el.value) })
    });
  });
});
</script>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{render_inputs, StickyValues};
    use crate::model::FeatureOrder;
    use crate::schema::Schema;

    fn form() -> RenderedForm {
        let order = FeatureOrder::new(
            ["Duration_of_operation", "Operating_room_temperature"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        render_inputs(&order, &Schema::builtin(), &StickyValues::new())
    }

    #[test]
    fn test_unavailable_page_has_no_inputs() {
        let html = render_page(PageBody::Unavailable { reason: "artifact not found: <model>" });
        assert!(html.contains("Model unavailable."));
        assert!(html.contains("artifact not found: &lt;model&gt;"));
        assert!(!html.contains("<input"));
        assert!(!html.contains(CALCULATE_LABEL));
    }

    #[test]
    fn test_ready_page_escapes_labels() {
        let form = form();
        let html = render_page(PageBody::Ready { form: &form, panel: &ResultPanel::Idle });
        assert!(html.contains("&gt;60 min (Code: 1)"));
        assert!(!html.contains(">60 min (Code: 1)</label>"));
        assert!(html.contains(IDLE_PROMPT.replace('\'', "&#39;").as_str()));
        assert!(html.contains("type=\"range\" name=\"Operating_room_temperature\" min=\"18\" max=\"30\" step=\"0.1\" value=\"22\""));
        assert!(html.contains("value=\"0\" checked"));
    }

    #[test]
    fn test_failed_panel_keeps_previous_result() {
        let form = form();
        let panel = ResultPanel::Failed {
            message: "Prediction Error: shape mismatch".to_string(),
            previous: Some(PredictionResult::from_probability(0.81)),
        };
        let html = render_page(PageBody::Ready { form: &form, panel: &panel });
        assert!(html.contains("Prediction Error: shape mismatch"));
        assert!(html.contains("<strong>High Risk</strong>: 81.0%"));
    }
}
