//! Gauge inputs
//!
//! Only the numbers and the bar color are chosen here; drawing is CSS.

use serde::Serialize;

pub const LOW_COLOR: &str = "#2ca02c";
pub const HIGH_COLOR: &str = "#d62728";

/// Percent at which the bar switches to [`HIGH_COLOR`]
pub const COLOR_SWITCH_PERCENT: f64 = 50.0;

pub const AXIS_MIN: f64 = 0.0;
pub const AXIS_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeSpec {
    pub value: f64,
    pub bar_color: &'static str,
    pub axis_min: f64,
    pub axis_max: f64,
    /// Marker line position, equal to value
    pub threshold: f64,
}

impl GaugeSpec {
    pub fn for_percent(percent: f64) -> Self {
        let value = percent.clamp(AXIS_MIN, AXIS_MAX);
        Self {
            value,
            bar_color: bar_color(value),
            axis_min: AXIS_MIN,
            axis_max: AXIS_MAX,
            threshold: value,
        }
    }

    pub fn render(&self) -> String {
        format!(
            r#"<div class="gauge" role="meter" aria-valuemin="{min}" aria-valuemax="{max}" aria-valuenow="{value:.1}">
  <div class="gauge-title">Probability</div>
  <div class="gauge-track">
    <div class="gauge-bar" style="width: {value:.1}%; background-color: {color};"></div>
    <div class="gauge-threshold" style="left: {threshold:.1}%;"></div>
  </div>
  <div class="gauge-axis"><span>{min}</span><span>{max}</span></div>
  <div class="gauge-number">{value:.1}%</div>
</div>"#,
            min = self.axis_min,
            max = self.axis_max,
            value = self.value,
            threshold = self.threshold,
            color = self.bar_color,
        )
    }
}

pub fn bar_color(percent: f64) -> &'static str {
    if percent < COLOR_SWITCH_PERCENT {
        LOW_COLOR
    } else {
        HIGH_COLOR
    }
}
