//! Plain text table preview.

use crate::model::{Scalar, Table};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::options::TextOptions;

/// Render a table as aligned plain text.
///
/// Shows at most `max_rows` rows and `max_columns` columns and notes how
/// much was left out. An empty table renders as `(no rows)`.
pub fn to_text(table: &Table, options: &TextOptions) -> String {
    if table.column_count() == 0 {
        return "(no rows)".to_string();
    }

    let shown_cols = table.column_count().min(options.max_columns);
    let shown_rows = table.row_count().min(options.max_rows);

    let header: Vec<String> = table.columns()[..shown_cols]
        .iter()
        .map(|c| truncate(c, options.max_cell_width))
        .collect();

    let body: Vec<Vec<String>> = table.rows()[..shown_rows]
        .iter()
        .map(|row| {
            row[..shown_cols]
                .iter()
                .map(|value| truncate(&cell_text(value, options), options.max_cell_width))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut output = String::new();
    push_line(&mut output, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut output, &rule, &widths);
    for row in &body {
        push_line(&mut output, row, &widths);
    }

    if shown_rows < table.row_count() {
        output.push_str(&format!(
            "... {} more row(s)\n",
            table.row_count() - shown_rows
        ));
    }
    if shown_cols < table.column_count() {
        output.push_str(&format!(
            "... {} more column(s)\n",
            table.column_count() - shown_cols
        ));
    }

    output.trim_end().to_string()
}

fn cell_text(value: &Scalar, options: &TextOptions) -> String {
    match value {
        Scalar::Null => options.null_marker.clone(),
        other => other.to_string().replace(['\n', '\r', '\t'], " "),
    }
}

fn push_line(output: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.width());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    output.push_str(padded.join(" | ").trim_end());
    output.push('\n');
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }

    let mut result = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}
