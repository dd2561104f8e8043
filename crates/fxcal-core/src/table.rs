//! Plain-text table rendering.

/// Render rows as right-aligned fixed-width columns under a header row.
///
/// Column width is the widest cell of the column (header included), counted
/// in chars. Columns are separated by two spaces and lines by `\n`, with no
/// trailing newline.
pub fn render_table<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.as_ref().chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line(headers.iter().copied(), &widths));
    for row in rows {
        lines.push(render_line(row.iter().map(|c| c.as_ref()), &widths));
    }
    lines.join("\n")
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{cell}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ")
}
