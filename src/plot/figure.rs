//! Serializable Plotly figure model.
//!
//! Only the attributes the report uses are modelled. Unset options are
//! skipped during serialization so Plotly.js falls back to its own defaults.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub name: String,
    pub hoverinfo: &'static str,
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<&'static str>,
    pub line: Line,
    pub hoverlabel: HoverLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoverLabel {
    pub bgcolor: &'static str,
    pub bordercolor: &'static str,
    pub font: Font,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticklabelmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showspikes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikemode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikesnap: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikedash: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikethickness: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikecolor: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub traceorder: &'static str,
    pub font: Font,
}

/// A filled rectangle spanning a date range across the full height of an axis.
#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x0: NaiveDate,
    pub x1: NaiveDate,
    pub y0: f64,
    pub y1: f64,
    pub fillcolor: &'static str,
    pub opacity: f64,
    pub layer: &'static str,
    pub line: ShapeLine,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShapeLine {
    pub width: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub text: &'static str,
    pub textangle: i32,
    pub x: NaiveDate,
    pub y: f64,
    pub xref: &'static str,
    pub yref: &'static str,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    pub showarrow: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    pub hovermode: &'static str,
    pub hoverdistance: i32,
    pub spikedistance: i32,
    pub autosize: bool,
    pub font: Font,
    pub legend: Legend,
    pub plot_bgcolor: &'static str,
    pub paper_bgcolor: &'static str,
    pub shapes: Vec<Shape>,
    pub annotations: Vec<Annotation>,
}
