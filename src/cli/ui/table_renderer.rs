use colored::Colorize;

use crate::core::grid::GridSession;
use crate::core::navigation::Focus;
use crate::domain::{format_amount, Column, GridRow};

const ROW_MARKER: &str = "> ";
const NO_MARKER: &str = "  ";
const CELL_PADDING: usize = 1;
const MIN_WIDTHS: [usize; 7] = [10, 6, 8, 6, 18, 10, 10];

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

fn alignment(column: Column) -> Alignment {
    match column {
        Column::Debit | Column::Credit => Alignment::Right,
        _ => Alignment::Left,
    }
}

/// Plain text grid with the focused cell bracketed. `highlight` adds
/// terminal colors for the interactive editor.
pub fn render_grid(session: &GridSession, highlight: bool) -> String {
    render_grid_with_input(session, highlight, None)
}

/// Same as [`render_grid`], showing `input` in the focused cell instead of
/// its stored text.
pub fn render_grid_with_input(
    session: &GridSession,
    highlight: bool,
    input: Option<&str>,
) -> String {
    let focus = session.focus();
    let cells: Vec<Vec<String>> = session
        .rows()
        .enumerate()
        .map(|(row, line)| row_cells(row, &line, focus, input))
        .collect();
    let widths = compute_widths(&cells);

    let mut lines = Vec::with_capacity(cells.len() + 2);
    let titles: Vec<String> = Column::ALL.iter().map(|c| c.title().to_string()).collect();
    let header = format!("{NO_MARKER}{:>3} {}", "#", render_row(&titles, &widths));
    lines.push(if highlight {
        header.bold().to_string()
    } else {
        header
    });
    lines.push(format!(
        "{NO_MARKER}{}",
        "-".repeat(4 + widths.iter().map(|w| w + 2 * CELL_PADDING + 1).sum::<usize>())
    ));

    for (row, (row_cells, line)) in cells.iter().zip(session.rows()).enumerate() {
        let marker = if row == focus.row { ROW_MARKER } else { NO_MARKER };
        let rendered = format!("{marker}{:>3} {}", row, render_row(row_cells, &widths));
        lines.push(match (highlight, line.is_header(), row == focus.row) {
            (true, _, true) => rendered.reversed().to_string(),
            (true, true, false) => rendered.bright_cyan().to_string(),
            _ => rendered,
        });
    }
    lines.join("\n")
}

/// One-line totals summary.
pub fn render_totals(session: &GridSession) -> String {
    let totals = session.totals();
    let state = if totals.is_balanced() {
        "balanced".to_string()
    } else {
        format!("gap {}", format_amount(totals.gap().abs()))
    };
    format!(
        "Debit: {}  Credit: {}  ({})",
        format_amount(totals.debit),
        format_amount(totals.credit),
        state
    )
}

fn row_cells(row: usize, line: &GridRow<'_>, focus: Focus, input: Option<&str>) -> Vec<String> {
    Column::ALL
        .iter()
        .map(|column| {
            let text = line.cell_text(*column);
            if row == focus.row && *column == focus.column {
                format!("[{}]", input.unwrap_or(&text))
            } else {
                text
            }
        })
        .collect()
}

fn compute_widths(cells: &[Vec<String>]) -> Vec<usize> {
    Column::ALL
        .iter()
        .map(|column| {
            let idx = column.index();
            let mut width = column.title().chars().count().max(MIN_WIDTHS[idx]);
            for row in cells {
                if let Some(cell) = row.get(idx) {
                    width = width.max(cell.chars().count());
                }
            }
            width
        })
        .collect()
}

fn render_row(row: &[String], widths: &[usize]) -> String {
    Column::ALL
        .iter()
        .map(|column| {
            let idx = column.index();
            let text = row.get(idx).map(String::as_str).unwrap_or("");
            render_cell(text, widths[idx], alignment(*column))
        })
        .collect::<Vec<_>>()
        .join("|")
        .trim_end()
        .to_string()
}

fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let pad = " ".repeat(CELL_PADDING);
    let fill = width.saturating_sub(text.chars().count());
    match alignment {
        Alignment::Left => format!("{pad}{text}{}{pad}", " ".repeat(fill)),
        Alignment::Right => format!("{pad}{}{text}{pad}", " ".repeat(fill)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::domain::ChartOfAccounts;
    use chrono::NaiveDate;

    fn grid() -> GridSession {
        GridSession::new(FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
    }

    #[test]
    fn focused_cell_is_bracketed() {
        let mut session = grid();
        session
            .set_cell(1, Column::Debit, "100.00", &ChartOfAccounts::default())
            .unwrap();
        session.focus_cell(1, Column::Debit).unwrap();
        let text = render_grid(&session, false);
        assert!(text.contains("[100.00]"));
        assert!(text.contains("2024-06-01"));
        assert!(text.lines().nth(3).unwrap().starts_with(ROW_MARKER));
    }

    #[test]
    fn pending_input_replaces_focused_text() {
        let session = grid();
        let text = render_grid_with_input(&session, false, Some("15/06"));
        assert!(text.contains("[15/06]"));
        assert!(!text.contains("2024-06-01"));
    }

    #[test]
    fn totals_line_reports_gap() {
        let mut session = grid();
        session
            .set_cell(1, Column::Debit, "150", &ChartOfAccounts::default())
            .unwrap();
        assert_eq!(
            render_totals(&session),
            "Debit: 150.00  Credit: 0.00  (gap 150.00)"
        );
    }
}
