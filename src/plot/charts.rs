//! Chart figures for the report.
//!
//! Two layouts show the same data and shading:
//!
//! - `Separate`: a consumption chart and a change chart, each its own figure
//! - `Combined`: one figure with consumption on top and change below, sharing the date axis

use chrono::NaiveDate;

use crate::domain::{ChartLayout, DailySeries, SeriesColumn};
use crate::plot::figure::{
    Annotation, Axis, Figure, Font, HoverLabel, Layout, Legend, Line, Shape, ShapeLine, Title, Trace,
};
use crate::plot::hover::create_hovertext;

const CONSUMPTION_COLUMNS: [SeriesColumn; 2] = [SeriesColumn::Current, SeriesColumn::Prior];
const CHANGE_COLUMNS: [SeriesColumn; 2] = [SeriesColumn::Change, SeriesColumn::SmoothedChange];

const CONSUMPTION_Y_RANGE: [f64; 2] = [-0.2, 17.0];
const CHANGE_Y_RANGE: [f64; 2] = [-0.14, 0.14];

/// Which horizontal edge of a shaded region its label hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Which vertical edge of the plot area labels sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
}

/// A shaded date range with a rotated label.
#[derive(Debug, Clone, Copy)]
pub struct Shading {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub color: &'static str,
    pub opacity: f64,
    pub label: &'static str,
    pub edge: Edge,
}

/// The two historical periods highlighted on every chart.
pub fn shadings() -> [Shading; 2] {
    [
        Shading {
            start: date(2020, 3, 28),
            end: date(2020, 4, 15),
            color: "mediumslateblue",
            opacity: 0.08,
            label: "Uusimaa lockdown",
            edge: Edge::Right,
        },
        Shading {
            start: date(2020, 3, 17),
            end: date(2020, 6, 15),
            color: "purple",
            opacity: 0.05,
            label: "Valmiuslaki",
            edge: Edge::Left,
        },
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Constant, known-valid calendar dates.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Build the figures for `layout`, in report order.
pub fn build_figures(series: &DailySeries, layout: ChartLayout) -> Vec<Figure> {
    match layout {
        ChartLayout::Separate => vec![consumption_figure(series), change_figure(series)],
        ChartLayout::Combined => vec![combined_figure(series)],
    }
}

/// Current and prior consumption as lines.
pub fn consumption_figure(series: &DailySeries) -> Figure {
    let data = CONSUMPTION_COLUMNS
        .iter()
        .map(|&c| trace(series, c, None))
        .collect();

    let (shapes, annotations) = shading_overlays("y domain", Placement::Bottom);
    Figure {
        data,
        layout: base_layout(
            "Energy consumption",
            y_axis("Consumption (GWh)", CONSUMPTION_Y_RANGE, None),
            shapes,
            annotations,
        ),
    }
}

/// Relative and smoothed relative change as filled areas.
pub fn change_figure(series: &DailySeries) -> Figure {
    let data = CHANGE_COLUMNS.iter().map(|&c| trace(series, c, None)).collect();

    let (shapes, annotations) = shading_overlays("y domain", Placement::Top);
    Figure {
        data,
        layout: base_layout(
            "Change in energy consumption",
            y_axis("Change in consumpt.", CHANGE_Y_RANGE, Some("+%")),
            shapes,
            annotations,
        ),
    }
}

/// Consumption on the top row, change on the bottom row, one shared date axis.
pub fn combined_figure(series: &DailySeries) -> Figure {
    let mut data: Vec<Trace> = CONSUMPTION_COLUMNS
        .iter()
        .map(|&c| trace(series, c, None))
        .collect();
    data.extend(CHANGE_COLUMNS.iter().map(|&c| trace(series, c, Some("y2"))));

    let (mut shapes, mut annotations) = shading_overlays("y domain", Placement::Bottom);
    let (lower_shapes, lower_annotations) = shading_overlays("y2 domain", Placement::Top);
    shapes.extend(lower_shapes);
    annotations.extend(lower_annotations);

    let mut top = y_axis("Consumption (GWh)", CONSUMPTION_Y_RANGE, None);
    top.domain = Some([0.55, 1.0]);
    let mut bottom = y_axis("Change in consumpt.", CHANGE_Y_RANGE, Some("+%"));
    bottom.domain = Some([0.0, 0.45]);

    let mut layout = base_layout("Energy consumption and its change", top, shapes, annotations);
    layout.xaxis.anchor = Some("y2");
    layout.yaxis2 = Some(bottom);
    Figure { data, layout }
}

fn trace(series: &DailySeries, column: SeriesColumn, yaxis: Option<&'static str>) -> Trace {
    let color = column.color();
    Trace {
        kind: "scatter",
        x: series.dates(),
        y: series.column(column),
        name: column.label(&series.columns).to_string(),
        hoverinfo: "text",
        text: create_hovertext(series, column),
        fill: column.is_change().then_some("tozeroy"),
        line: Line { color },
        hoverlabel: HoverLabel {
            bgcolor: "white",
            bordercolor: color,
            font: Font {
                family: Some("Sans Serif"),
                size: None,
                color: Some("#474747"),
            },
        },
        xaxis: yaxis.map(|_| "x"),
        yaxis,
    }
}

fn y_axis(title: &str, range: [f64; 2], tickformat: Option<&'static str>) -> Axis {
    Axis {
        title: Some(Title::new(title)),
        range: Some(range),
        gridcolor: Some("white"),
        tickformat,
        ..Axis::default()
    }
}

fn date_axis() -> Axis {
    Axis {
        title: Some(Title::new("Date")),
        showgrid: Some(true),
        gridcolor: Some("white"),
        tickformat: Some("%b"),
        ticklabelmode: Some("period"),
        dtick: Some("M1"),
        showspikes: Some(true),
        spikemode: Some("across"),
        spikesnap: Some("cursor"),
        spikedash: Some("solid"),
        spikethickness: Some(1),
        spikecolor: Some("#2b2b2b"),
        ..Axis::default()
    }
}

/// Layout shared by every figure, styled after ggplot2 (grey panel, white grid).
fn base_layout(title: &str, yaxis: Axis, shapes: Vec<Shape>, annotations: Vec<Annotation>) -> Layout {
    Layout {
        title: Title::new(title),
        xaxis: date_axis(),
        yaxis,
        yaxis2: None,
        hovermode: "x",
        hoverdistance: -1,
        spikedistance: -1,
        autosize: true,
        font: Font {
            family: Some("Open Sans"),
            size: Some(16),
            color: Some("gray"),
        },
        legend: Legend {
            x: 0.0,
            y: 0.7,
            traceorder: "normal",
            font: Font {
                size: Some(12),
                ..Font::default()
            },
        },
        plot_bgcolor: "rgb(237,237,237)",
        paper_bgcolor: "white",
        shapes,
        annotations,
    }
}

/// Shaded rectangles plus labels for one y axis (`yref` is e.g. `"y domain"`).
fn shading_overlays(yref: &'static str, placement: Placement) -> (Vec<Shape>, Vec<Annotation>) {
    let (y, yanchor) = match placement {
        Placement::Top => (1.0, "top"),
        Placement::Bottom => (0.0, "bottom"),
    };

    shadings()
        .iter()
        .map(|s| {
            let shape = Shape {
                kind: "rect",
                xref: "x",
                yref,
                x0: s.start,
                x1: s.end,
                y0: 0.0,
                y1: 1.0,
                fillcolor: s.color,
                opacity: s.opacity,
                layer: "below",
                line: ShapeLine { width: 0 },
            };
            let (x, xanchor) = match s.edge {
                Edge::Left => (s.start, "left"),
                Edge::Right => (s.end, "right"),
            };
            let annotation = Annotation {
                text: s.label,
                textangle: 270,
                x,
                y,
                xref: "x",
                yref,
                xanchor,
                yanchor,
                showarrow: false,
            };
            (shape, annotation)
        })
        .unzip()
}
