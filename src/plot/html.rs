//! Serialize figures into embeddable HTML fragments.
//!
//! Each fragment is a self-contained `<div>` holding the chart container and a
//! `Plotly.newPlot` call. Only the first fragment of a report loads Plotly.js,
//! either inlined from a local bundle or referenced by URL; the rest rely on
//! it being present on the page.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::debug;

use crate::error::{AppError, EXIT_IO};
use crate::plot::figure::Figure;

/// Plotly.js bundle referenced by the first fragment when no local bundle is given.
pub const DEFAULT_PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.0.min.js";

/// How the first fragment loads Plotly.js.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotlyScript {
    /// Library source embedded in the page.
    Inline(String),
    /// `src` URL of an external script.
    Remote(String),
}

impl PlotlyScript {
    /// Inline the bundle at `bundle` if given, otherwise reference `src`.
    pub fn resolve(bundle: Option<&Path>, src: &str) -> Result<Self, AppError> {
        match bundle {
            Some(path) => {
                let code = fs::read_to_string(path).map_err(|e| {
                    AppError::new(EXIT_IO, format!("Failed to read Plotly.js bundle '{}': {e}", path.display()))
                })?;
                debug!(path = %path.display(), bytes = code.len(), "inlining Plotly.js");
                Ok(PlotlyScript::Inline(code))
            }
            None => Ok(PlotlyScript::Remote(src.to_string())),
        }
    }

    fn to_html(&self) -> String {
        match self {
            PlotlyScript::Inline(code) => format!(
                "<script type=\"text/javascript\">\n{}\n</script>\n",
                escape_script_close(code)
            ),
            PlotlyScript::Remote(src) => format!("<script src=\"{src}\" charset=\"utf-8\"></script>\n"),
        }
    }
}

/// File name of the `index`-th (0-based) fragment.
pub fn fragment_file_name(index: usize) -> String {
    format!("plot{}.html", index + 1)
}

/// Element id of the `index`-th (0-based) chart.
pub fn chart_id(index: usize) -> String {
    format!("chart-{}", index + 1)
}

/// JSON for embedding inside a `<script>` element.
fn script_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to serialize chart: {e}")))?;
    // "</" would terminate the surrounding script element early.
    Ok(raw.replace("</", "<\\/"))
}

/// Break up any `</script` (any case) in library code.
///
/// Unlike JSON, arbitrary JavaScript may use `</` outside string literals, so
/// only closing script tags are rewritten. They can only occur inside string,
/// template or regex literals, where `<\/` reads the same.
fn escape_script_close(code: &str) -> String {
    const NEEDLE: &str = "</script";
    let lower = code.to_ascii_lowercase();
    let mut out = String::with_capacity(code.len());
    let mut last = 0;
    for (pos, _) in lower.match_indices(NEEDLE) {
        out.push_str(&code[last..pos]);
        out.push_str("<\\/");
        last = pos + 2;
    }
    out.push_str(&code[last..]);
    out
}

/// Render one figure as an HTML fragment.
pub fn render_fragment(figure: &Figure, div_id: &str, plotly: Option<&PlotlyScript>) -> Result<String, AppError> {
    let data = script_json(&figure.data)?;
    let layout = script_json(&figure.layout)?;
    let config = script_json(&json!({ "responsive": true }))?;

    let mut out = String::from("<div>\n");
    if let Some(script) = plotly {
        out.push_str(&script.to_html());
    }
    out.push_str(&format!(
        "<div id=\"{div_id}\" class=\"plotly-graph-div\" style=\"height:100%; width:100%;\"></div>\n"
    ));
    out.push_str("<script type=\"text/javascript\">\n");
    out.push_str(&format!("Plotly.newPlot(\"{div_id}\", {data}, {layout}, {config});\n"));
    out.push_str("</script>\n</div>\n");
    Ok(out)
}

/// Render every figure and write one fragment file per figure into `out_dir`.
///
/// Returns the written paths in report order.
pub fn write_fragments(figures: &[Figure], out_dir: &Path, plotly: &PlotlyScript) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create '{}': {e}", out_dir.display())))?;

    let mut paths = Vec::with_capacity(figures.len());
    for (i, figure) in figures.iter().enumerate() {
        let script = (i == 0).then_some(plotly);
        let html = render_fragment(figure, &chart_id(i), script)?;

        let path = out_dir.join(fragment_file_name(i));
        fs::write(&path, html)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write fragment '{}': {e}", path.display())))?;
        debug!(path = %path.display(), traces = figure.data.len(), "wrote chart fragment");
        paths.push(path);
    }
    Ok(paths)
}
