#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN_WIDTH: usize = 4;

/// Render an aligned plain-text table. Numeric cells are right-aligned.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    shrink_to_fit(&mut widths, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string();

    let mut lines = vec![header_line.clone(), "-".repeat(header_line.chars().count())];
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
                let aligned = pad(&cell, *width, looks_numeric(&cell));
                if options.color {
                    colorize(&aligned, &cell)
                } else {
                    aligned
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Narrow the widest column one character at a time until the row fits.
fn shrink_to_fit(widths: &mut [usize], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * 2;

    while widths.iter().sum::<usize>() + separators > max_width {
        let Some((index, _)) = widths
            .iter()
            .enumerate()
            .filter(|(_, width)| **width > MIN_COLUMN_WIDTH)
            .max_by_key(|(_, width)| **width)
        else {
            break;
        };
        widths[index] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '.'))
        && trimmed != "-"
}

/// Color cells whose content names a gate outcome.
fn colorize(aligned: &str, cell: &str) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "true" | "allowed" | "authorized" | "adopted" | "confirmed" => "32",
        "loading" | "unknown" => "33",
        "false" | "denied" | "unauthorized" | "unprovisioned" | "tenant_mismatch" => "31",
        _ => return aligned.to_string(),
    };
    format!("\u{1b}[{code}m{aligned}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn aligns_columns_and_right_aligns_numbers() {
        let rows = vec![
            vec!["rice".to_string(), "4".to_string()],
            vec!["blankets".to_string(), "12".to_string()],
        ];
        let rendered = render(&["item", "stock"], &rows, PLAIN);
        assert_eq!(
            rendered,
            "item      stock\n---------------\nrice          4\nblankets     12"
        );
    }

    #[test]
    fn shrinks_widest_column_to_fit() {
        let rows = vec![vec!["a very long item name".to_string(), "1".to_string()]];
        let rendered = render(
            &["item", "stock"],
            &rows,
            TableOptions {
                max_width: Some(16),
                color: false,
            },
        );
        assert!(rendered.lines().all(|line| line.chars().count() <= 16));
        assert!(rendered.contains('…'));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let rendered = render(&["a", "b"], &[vec!["x".to_string()]], PLAIN);
        assert!(rendered.lines().nth(2).unwrap().ends_with('-'));
    }

    #[test]
    fn color_wraps_outcome_words() {
        assert_eq!(colorize("denied", "denied"), "\u{1b}[31mdenied\u{1b}[0m");
        assert_eq!(colorize("rice", "rice"), "rice");
    }
}
