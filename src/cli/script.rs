use std::fmt;

use shell_words::split;

use crate::cli::output;
use crate::cli::state::EntryState;
use crate::cli::ui::{navigation::parse_key_name, table_renderer};
use crate::domain::Column;
use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub const COMMANDS: [&str; 12] = [
    "journal", "period", "key", "type", "click", "remove", "show", "totals", "issues", "save",
    "help", "quit",
];

/// Runs one script line against the entry state.
pub fn handle_line(state: &mut EntryState, line: &str) -> Result<LoopControl, CliError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    dispatch(state, &raw.to_lowercase(), &args)
}

fn dispatch(state: &mut EntryState, command: &str, args: &[&str]) -> Result<LoopControl, CliError> {
    match command {
        "journal" => {
            let code = required(args, 0, "journal <code>")?;
            state.select_journal(code)?;
            output::info(format!("Context: {}", state.context_line()));
        }
        "period" => {
            let raw = required(args, 0, "period <number>")?;
            let number = raw
                .parse::<u8>()
                .map_err(|_| CliError::Input(format!("invalid period number `{raw}`")))?;
            state.select_period_number(number)?;
            output::info(format!("Context: {}", state.context_line()));
        }
        "key" => {
            let name = required(args, 0, "key <name>")?;
            let key = parse_key_name(name)
                .ok_or_else(|| CliError::Input(format!("unknown key `{name}`")))?;
            let transition = state.handle_key(key)?;
            output::info(format!(
                "Focus: row {}, {}",
                transition.focus.row,
                transition.focus.column.title()
            ));
        }
        "type" => {
            state.type_text(&args.join(" "))?;
        }
        "click" => {
            let row = required(args, 0, "click <row> <column>")?;
            let row = row
                .parse::<usize>()
                .map_err(|_| CliError::Input(format!("invalid row `{row}`")))?;
            let column = parse_column(required(args, 1, "click <row> <column>")?)?;
            state.focus_cell(row, column)?;
        }
        "remove" => {
            state.remove_focused_line()?;
        }
        "show" => {
            output::section(state.context_line());
            println!(
                "{}",
                table_renderer::render_grid_with_input(&state.grid, false, state.pending_input())
            );
        }
        "totals" => {
            output::info(table_renderer::render_totals(&state.grid));
        }
        "issues" => {
            let issues = state.issues();
            if issues.is_empty() {
                output::info("No issues found.");
            }
            for issue in issues {
                output::warning(issue);
            }
        }
        "save" => {
            let receipts = state.save()?;
            let numbers: Vec<&str> = receipts.iter().map(|r| r.number.as_str()).collect();
            output::success(format!(
                "Saved {} transaction(s): {}",
                receipts.len(),
                numbers.join(", ")
            ));
        }
        "help" => {
            output::info(format!("Commands: {}", COMMANDS.join(", ")));
        }
        "quit" | "exit" => return Ok(LoopControl::Exit),
        other => {
            return Err(CliError::Input(format!("unknown command `{other}`")));
        }
    }
    Ok(LoopControl::Continue)
}

fn required<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CliError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CliError::Input(format!("usage: {usage}")))
}

/// Accepts a column name (`debit`, `account`...) or its zero-based index.
pub fn parse_column(text: &str) -> Result<Column, CliError> {
    if let Ok(index) = text.parse::<usize>() {
        return Column::from_index(index)
            .ok_or_else(|| CliError::Input(format!("invalid column `{text}`")));
    }
    let column = match text.to_ascii_lowercase().as_str() {
        "date" => Column::Date,
        "piece" => Column::Piece,
        "account" => Column::Account,
        "counterparty" => Column::Counterparty,
        "description" => Column::Description,
        "debit" => Column::Debit,
        "credit" => Column::Credit,
        _ => return Err(CliError::Input(format!("invalid column `{text}`"))),
    };
    Ok(column)
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_parse_by_name_or_index() {
        assert_eq!(parse_column("Debit").unwrap(), Column::Debit);
        assert_eq!(parse_column("2").unwrap(), Column::Account);
        assert!(parse_column("9").is_err());
        assert!(parse_column("amount").is_err());
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line("type \"Achat fournitures\"").unwrap();
        assert_eq!(tokens, vec!["type", "Achat fournitures"]);
        assert!(parse_command_line("type \"open").is_err());
    }
}
