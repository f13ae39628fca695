use crate::config::{Config, ConfigManager};
use crate::core::{
    clock::Clock,
    diagnostics::{self, LineIssue},
    grid::GridSession,
    navigation::{GridKey, Transition},
    submission::{self, SessionContext},
};
use crate::domain::{Column, GridRow, PeriodId};
use crate::errors::{CliError, GridError};
use crate::storage::{
    JsonOutbox, JsonReferenceStore, ReferenceData, SubmissionReceipt, TransactionSink,
};

/// Everything one entry session works with: the grid, resident reference
/// data, the selected journal/period and the submission sink.
pub struct EntryState {
    pub grid: GridSession,
    pub reference: ReferenceData,
    pub context: SessionContext,
    sink: Box<dyn TransactionSink>,
    date_input: Option<DateInput>,
}

/// Header date text typed key by key. Partial dates do not parse, so the
/// text is only written to the grid when focus leaves the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DateInput {
    row: usize,
    text: String,
}

impl EntryState {
    pub fn new(
        reference: ReferenceData,
        sink: Box<dyn TransactionSink>,
        clock: impl Clock + 'static,
    ) -> Self {
        let context = SessionContext::new(Some(reference.fiscal_year.clone()));
        Self {
            grid: GridSession::new(clock),
            reference,
            context,
            sink,
            date_input: None,
        }
    }

    /// Loads reference data and opens the outbox configured for `config`.
    /// Preselects the configured journal and the open period containing
    /// today, when there is one.
    pub fn open(
        manager: &ConfigManager,
        config: &Config,
        clock: impl Clock + 'static,
    ) -> Result<Self, CliError> {
        let store = JsonReferenceStore::open(
            &manager.reference_file(config),
            Some(config.account_page_size),
        )?;
        let reference = ReferenceData::load(&store)?;
        let outbox = JsonOutbox::new(
            manager.outbox_dir(config),
            &reference.journals,
            &reference.fiscal_year,
        )?;
        let today = clock.today();
        let mut state = Self::new(reference, Box::new(outbox), clock);

        if let Some(code) = config.default_journal.as_deref() {
            if let Err(err) = state.select_journal(code) {
                tracing::warn!(%err, "configured journal unavailable");
            }
        }
        let current = state
            .reference
            .fiscal_year
            .period_for(today)
            .filter(|period| state.reference.fiscal_year.is_entry_allowed(period))
            .map(|period| period.id);
        if let Some(period_id) = current {
            state.context.select_period(period_id)?;
        }
        Ok(state)
    }

    pub fn select_journal(&mut self, code: &str) -> Result<(), CliError> {
        let journal = self
            .reference
            .journal_by_code(code)
            .cloned()
            .ok_or_else(|| CliError::Input(format!("unknown journal `{code}`")))?;
        self.context.select_journal(journal);
        Ok(())
    }

    pub fn select_period_number(&mut self, number: u8) -> Result<(), CliError> {
        let id: PeriodId = self
            .reference
            .fiscal_year
            .period_by_number(number)
            .map(|period| period.id)
            .ok_or_else(|| CliError::Input(format!("unknown period `{number}`")))?;
        self.context.select_period(id)?;
        Ok(())
    }

    /// Commits pending date text, then moves. Focus stays put when the
    /// text is not a date.
    pub fn handle_key(&mut self, key: GridKey) -> Result<Transition, GridError> {
        self.commit_input()?;
        self.grid.apply_key(key)
    }

    /// Replaces the text of the focused cell.
    pub fn type_text(&mut self, text: &str) -> Result<(), GridError> {
        self.date_input = None;
        let focus = self.grid.focus();
        self.grid
            .set_cell(focus.row, focus.column, text, &self.reference.chart)
    }

    /// Appends one character to the focused cell.
    pub fn push_char(&mut self, ch: char) -> Result<(), GridError> {
        self.edit_focused(|text| text.push(ch))
    }

    pub fn pop_char(&mut self) -> Result<(), GridError> {
        self.edit_focused(|text| {
            text.pop();
        })
    }

    /// Date text typed but not yet written to the grid.
    pub fn pending_input(&self) -> Option<&str> {
        self.date_input.as_ref().map(|input| input.text.as_str())
    }

    /// Writes pending date text to its cell. On a parse error the text is
    /// kept so it can be corrected.
    pub fn commit_input(&mut self) -> Result<(), GridError> {
        let Some(input) = self.date_input.as_ref() else {
            return Ok(());
        };
        self.grid
            .set_cell(input.row, Column::Date, &input.text, &self.reference.chart)?;
        self.date_input = None;
        Ok(())
    }

    pub fn focus_cell(&mut self, row: usize, column: Column) -> Result<(), GridError> {
        self.commit_input()?;
        self.grid.focus_cell(row, column).map(|_| ())
    }

    pub fn remove_focused_line(&mut self) -> Result<(), GridError> {
        self.date_input = None;
        self.grid.remove_line(self.grid.focus().row)
    }

    pub fn save(&mut self) -> Result<Vec<SubmissionReceipt>, CliError> {
        self.commit_input()?;
        let receipts =
            submission::submit_session(&mut self.grid, &self.context, self.sink.as_mut())?;
        Ok(receipts)
    }

    pub fn issues(&self) -> Vec<LineIssue> {
        diagnostics::diagnostics(&self.grid, &self.reference.chart, self.context.period())
    }

    /// "AC - Achats / Juin 2024" style context line.
    pub fn context_line(&self) -> String {
        let journal = self
            .context
            .journal()
            .map(|journal| journal.display_name())
            .unwrap_or_else(|| "no journal".into());
        let period = match (self.context.fiscal_year(), self.context.period()) {
            (Some(year), Some(period)) => year.period_label(period),
            _ => "no period".into(),
        };
        format!("{journal} / {period}")
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) -> Result<(), GridError> {
        let focus = self.grid.focus();
        let on_date = focus.column == Column::Date
            && self.grid.row(focus.row).is_some_and(|row| row.is_header());
        if !on_date {
            let mut text = self.focused_text();
            edit(&mut text);
            return self.type_text(&text);
        }
        let mut text = match self.date_input.take() {
            Some(input) if input.row == focus.row => input.text,
            _ => self.focused_text(),
        };
        edit(&mut text);
        self.date_input = Some(DateInput {
            row: focus.row,
            text,
        });
        Ok(())
    }

    fn focused_text(&self) -> String {
        let focus = self.grid.focus();
        self.grid
            .row(focus.row)
            .map(|row: GridRow<'_>| row.cell_text(focus.column))
            .unwrap_or_default()
    }
}
