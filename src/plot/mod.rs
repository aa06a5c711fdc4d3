//! Presentation stage: Plotly figures, hover text, and HTML fragments.

pub mod charts;
pub mod figure;
pub mod hover;
pub mod html;

pub use charts::build_figures;
pub use html::{DEFAULT_PLOTLY_SRC, PlotlyScript, fragment_file_name, render_fragment, write_fragments};
