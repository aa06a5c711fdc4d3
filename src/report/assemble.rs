//! Assemble the final HTML report.
//!
//! The narrative markdown becomes the document body; the chart fragments
//! replace the `[PLOTS]` paragraph and the stylesheet is inlined into the
//! head. Fragment files are deleted once the report is on disk.

use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use pulldown_cmark_escape::escape_html_body_text;
use tracing::{debug, info};

use crate::error::{AppError, EXIT_IO, EXIT_REPORT};

/// Paragraph marking where the charts go.
pub const PLOTS_PLACEHOLDER: &str = "<p>[PLOTS]</p>";

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH
}

/// Convert markdown to an HTML body fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, markdown_options()));
    out
}

/// Plain text of the first level-1 heading, if any.
pub fn document_title(markdown: &str) -> Option<String> {
    let mut in_title = false;
    let mut title = String::new();
    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { level: HeadingLevel::H1, .. }) => in_title = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_title => break,
            Event::Text(text) | Event::Code(text) if in_title => title.push_str(&text),
            _ => {}
        }
    }
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Wrap a body fragment in a standalone document.
pub fn html_document(title: &str, body: &str) -> Result<String, AppError> {
    let mut escaped = String::with_capacity(title.len());
    escape_html_body_text(&mut escaped, title)
        .map_err(|e| AppError::new(EXIT_REPORT, format!("Failed to escape report title: {e}")))?;
    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n\
         <title>{escaped}</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    ))
}

/// Replace the placeholder paragraph with the concatenated fragments.
pub fn splice_fragments(document: &str, fragments: &[String]) -> Result<String, AppError> {
    if !document.contains(PLOTS_PLACEHOLDER) {
        return Err(AppError::new(
            EXIT_REPORT,
            format!("Report shell has no `{PLOTS_PLACEHOLDER}` placeholder."),
        ));
    }
    Ok(document.replace(PLOTS_PLACEHOLDER, &fragments.concat()))
}

/// Inline `css` as a `<style>` element right before `</head>`.
pub fn inline_stylesheet(document: &str, css: &str) -> Result<String, AppError> {
    if !document.contains("</head>") {
        return Err(AppError::new(EXIT_REPORT, "Report shell has no `</head>` to inline the stylesheet into."));
    }
    Ok(document.replacen("</head>", &format!("\n<style>\n{css}\n</style>\n</head>"), 1))
}

/// Build the report at `report` and delete the consumed fragment files.
pub fn assemble_report(
    readme: &Path,
    stylesheet: &Path,
    fragments: &[PathBuf],
    report: &Path,
) -> Result<(), AppError> {
    let markdown = fs::read_to_string(readme)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to read narrative '{}': {e}", readme.display())))?;
    let css = fs::read_to_string(stylesheet)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to read stylesheet '{}': {e}", stylesheet.display())))?;
    let fragment_html = fragments
        .iter()
        .map(|path| {
            fs::read_to_string(path).map_err(|e| {
                AppError::new(EXIT_REPORT, format!("Missing chart fragment '{}': {e}", path.display()))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let title = document_title(&markdown).unwrap_or_else(|| {
        readme
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Report".to_string())
    });

    let document = html_document(&title, &markdown_to_html(&markdown))?;
    let document = splice_fragments(&document, &fragment_html)?;
    let document = inline_stylesheet(&document, &css)?;

    fs::write(report, document)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write report '{}': {e}", report.display())))?;
    info!(report = %report.display(), fragments = fragments.len(), "wrote report");

    for path in fragments {
        fs::remove_file(path)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to delete fragment '{}': {e}", path.display())))?;
        debug!(path = %path.display(), "deleted fragment");
    }
    Ok(())
}
