//! HTML Coverage Formatter
//!
//! Per-file pages reproduce the source text exactly, with every coverage
//! location wrapped in a colored span:
//!
//! ```text
//! <html>
//! <pre>
//! x = <span title="Hit 3 times" style="background-color: #c4ffc5;">1 + 2</span>;
//! y = <span style="background-color: #ff9696;">f(x)</span>;
//! </pre>
//! </html>
//! ```
//!
//! Stripping the span tags and unescaping `&lt;`/`&gt;` yields the original
//! source byte for byte. Locations must be disjoint; an overlap aborts the
//! page.

use crate::coverage::report::{format_percent, CoverageSummary, FileCoverage};
use crate::reporter::escape_xml;
use crate::result::{SpecrunError, SpecrunResult};
use std::fmt::Write;

const COVERED_STYLE: &str = "background-color: #c4ffc5;";
const UNCOVERED_STYLE: &str = "background-color: #ff9696;";
const CELL_STYLE: &str = "border: 1px solid lightgray; padding: 10px";

/// Render the coverage page for one file
///
/// # Errors
///
/// Returns [`SpecrunError::OverlappingLocations`] if a location starts before
/// the end of the previous one, and [`SpecrunError::LocationOutOfRange`] if a
/// location does not address the source text
pub fn render_file(coverage: &FileCoverage) -> SpecrunResult<String> {
    let text = coverage.source_text.as_str();
    let index = LineIndex::new(text);
    let file = coverage.file_path.display().to_string();

    let mut body = String::with_capacity(text.len() * 2);
    let (mut line, mut col) = (1, 1);
    let mut cursor = 0;

    for (location, &hits) in &coverage.location_hits {
        if location.starts_before(line, col) {
            return Err(SpecrunError::OverlappingLocations {
                file,
                location: *location,
                line,
                col,
            });
        }
        let out_of_range = || SpecrunError::LocationOutOfRange {
            file: file.clone(),
            location: *location,
        };
        let start = index
            .offset(location.start_line, location.start_col)
            .ok_or_else(out_of_range)?;
        let end = index
            .offset(location.end_line, location.end_col)
            .filter(|&end| end >= start)
            .ok_or_else(out_of_range)?;

        body.push_str(&escape_markup(&text[cursor..start]));
        if hits > 0 {
            let _ = write!(
                body,
                r#"<span title="Hit {hits} times" style="{COVERED_STYLE}">"#
            );
        } else {
            let _ = write!(body, r#"<span style="{UNCOVERED_STYLE}">"#);
        }
        body.push_str(&escape_markup(&text[start..end]));
        body.push_str("</span>");

        cursor = end;
        (line, col) = location.end();
    }
    body.push_str(&escape_markup(&text[cursor..]));

    Ok(format!("<html>\n<pre>\n{body}\n</pre>\n</html>"))
}

/// Render the coverage index page
#[must_use]
pub fn render_index(summary: &CoverageSummary) -> String {
    let mut html = String::new();
    html.push_str("<html data-theme=\"vdm\">\n");
    html.push_str("  <head>\n");
    html.push_str("    <meta charset=\"UTF-8\"/>\n");
    html.push_str("    <title>Coverage statistics</title>\n");
    html.push_str("  </head>\n");
    html.push_str("  <body>\n");
    html.push_str("    <h1>Coverage statistics</h1>\n");
    html.push_str("    <h2>Overall coverage</h2>\n");
    let _ = writeln!(
        html,
        "    <p>Overall {} of {} locations were hit: <b>{}</b></p>",
        summary.covered,
        summary.total,
        format_percent(summary.percent())
    );
    html.push_str("    <h2>Breakdown by module</h2>\n");
    html.push_str("    <table>\n");
    html.push_str("      <tr>\n");
    for heading in ["File", "Covered locations", "Total locations", "%"] {
        let _ = writeln!(html, "        <th style=\"{CELL_STYLE}\">{heading}</th>");
    }
    html.push_str("      </tr>\n");

    for file in &summary.files {
        html.push_str("      <tr>\n");
        let _ = writeln!(
            html,
            "        <td style=\"{CELL_STYLE}\"><a href=\"{}\">{}</a></td>",
            escape_xml(&file.page_name),
            escape_xml(&file.file_name)
        );
        let _ = writeln!(html, "        <td style=\"{CELL_STYLE}\">{}</td>", file.covered);
        let _ = writeln!(html, "        <td style=\"{CELL_STYLE}\">{}</td>", file.total);
        let _ = writeln!(
            html,
            "        <td style=\"{CELL_STYLE}\">{}</td>",
            format_percent(file.percent())
        );
        html.push_str("      </tr>\n");
    }

    html.push_str("    </table>\n");
    html.push_str("  </body>\n");
    html.push_str("</html>\n");
    html
}

/// Escape the characters that would be read as markup inside `<pre>`
fn escape_markup(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Maps 1-based `(line, col)` positions to byte offsets
struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Byte offset of a position. Columns count characters; one past the
    /// last character of a line addresses its line break.
    fn offset(&self, line: u32, col: u32) -> Option<usize> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.text.len(), |next| next - 1);
        let line_text = &self.text[start..end];
        let col = (col as usize).saturating_sub(1);

        line_text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line_text.len()))
            .nth(col)
            .map(|i| start + i)
    }
}
