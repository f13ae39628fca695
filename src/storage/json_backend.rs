use std::{
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        format_amount, within_epsilon, Account, FiscalYear, FiscalYearStatus, Journal, JournalId,
        Period, PeriodId, TransactionPayload, MAX_AMOUNT,
    },
    errors::ReferenceDataError,
};

use super::{AccountPage, ReferenceDataSource, Result, SinkError, SubmissionReceipt, TransactionSink};

const RECORD_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_PAGE_SIZE: usize = 100;

/// On-disk shape of a reference-data snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceFile {
    #[serde(default)]
    pub journals: Vec<Journal>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub fiscal_years: Vec<FiscalYear>,
}

/// Reference data served from a JSON snapshot, paging the chart of
/// accounts the way the REST service does.
#[derive(Debug, Clone)]
pub struct JsonReferenceStore {
    data: ReferenceFile,
    page_size: usize,
}

impl JsonReferenceStore {
    pub fn open(path: &Path, page_size: Option<usize>) -> Result<Self> {
        if !path.exists() {
            return Err(ReferenceDataError::Unavailable(format!(
                "reference file `{}` not found",
                path.display()
            )));
        }
        let raw = fs::read_to_string(path)?;
        let data: ReferenceFile = serde_json::from_str(&raw)?;
        Ok(Self::from_data(data, page_size))
    }

    pub fn from_data(data: ReferenceFile, page_size: Option<usize>) -> Self {
        Self {
            data,
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        }
    }
}

impl ReferenceDataSource for JsonReferenceStore {
    fn journals(&self) -> Result<Vec<Journal>> {
        Ok(self
            .data
            .journals
            .iter()
            .filter(|journal| journal.is_active)
            .cloned()
            .collect())
    }

    fn account_page(&self, page: usize) -> Result<AccountPage> {
        let start = page.saturating_mul(self.page_size);
        let accounts: Vec<Account> = self
            .data
            .accounts
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        let has_more = start + accounts.len() < self.data.accounts.len();
        Ok(AccountPage { accounts, has_more })
    }

    fn open_fiscal_year(&self) -> Result<Option<FiscalYear>> {
        Ok(self
            .data
            .fiscal_years
            .iter()
            .find(|year| year.status == FiscalYearStatus::Open)
            .cloned())
    }
}

/// Stored form of one created transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxRecord {
    pub id: i64,
    pub number: String,
    pub payload: TransactionPayload,
}

/// Transaction sink writing one JSON record per created transaction into a
/// directory, numbered per journal and year (`AC240001`).
#[derive(Debug, Clone)]
pub struct JsonOutbox {
    dir: PathBuf,
    journal_codes: HashMap<JournalId, String>,
    periods: HashMap<PeriodId, Period>,
}

impl JsonOutbox {
    pub fn new(
        dir: impl Into<PathBuf>,
        journals: &[Journal],
        fiscal_year: &FiscalYear,
    ) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            journal_codes: journals
                .iter()
                .map(|journal| (journal.id, journal.code.clone()))
                .collect(),
            periods: fiscal_year
                .periods
                .iter()
                .map(|period| (period.id, period.clone()))
                .collect(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every stored record, ordered by id.
    pub fn records(&self) -> std::result::Result<Vec<OutboxRecord>, SinkError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let raw = fs::read_to_string(&path)?;
            records.push(serde_json::from_str::<OutboxRecord>(&raw)?);
        }
        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    fn next_number(&self, prefix: &str) -> std::result::Result<String, SinkError> {
        let last = self
            .records()?
            .iter()
            .filter_map(|record| record.number.strip_prefix(prefix))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(format!("{}{:04}", prefix, last + 1))
    }
}

impl TransactionSink for JsonOutbox {
    fn create(
        &mut self,
        payload: &TransactionPayload,
    ) -> std::result::Result<SubmissionReceipt, SinkError> {
        let period = self
            .periods
            .get(&payload.period_id)
            .ok_or_else(|| SinkError::new(format!("Unknown period {}", payload.period_id)))?;
        validate_payload(payload, period, Utc::now().date_naive())?;
        let code = self
            .journal_codes
            .get(&payload.journal_id)
            .ok_or_else(|| SinkError::new(format!("Unknown journal {}", payload.journal_id)))?;
        let number = self.next_number(&number_prefix(code, payload.transaction_date))?;
        let id = self.records()?.last().map(|record| record.id).unwrap_or(0) + 1;

        let record = OutboxRecord {
            id,
            number: number.clone(),
            payload: payload.clone(),
        };
        let path = self.dir.join(format!("{}.{}", number, RECORD_EXTENSION));
        write_atomic(&path, &serde_json::to_string_pretty(&record)?)?;
        tracing::info!(%number, id, "transaction stored in outbox");
        Ok(SubmissionReceipt { id, number })
    }
}

fn number_prefix(journal_code: &str, date: NaiveDate) -> String {
    format!("{}{:02}", journal_code, date.year().rem_euclid(100))
}

/// Same per-transaction rules the submission service enforces.
fn validate_payload(
    payload: &TransactionPayload,
    period: &Period,
    today: NaiveDate,
) -> std::result::Result<(), SinkError> {
    let date = payload.transaction_date;
    if date > today {
        return Err(SinkError::new("Transaction date cannot be in the future"));
    }
    if !period.contains(date) {
        return Err(SinkError::new(format!(
            "Transaction date must fall between {} and {}",
            period.start_date, period.end_date
        )));
    }
    if payload.lines.len() < 2 {
        return Err(SinkError::new("A transaction needs at least 2 lines"));
    }
    for line in &payload.lines {
        if line.debit_amount.is_zero() && line.credit_amount.is_zero() {
            return Err(SinkError::new("A line needs either a debit or a credit"));
        }
        if line.debit_amount.abs() > MAX_AMOUNT || line.credit_amount.abs() > MAX_AMOUNT {
            return Err(SinkError::new(format!(
                "Amounts are limited to {}",
                format_amount(MAX_AMOUNT)
            )));
        }
    }
    let debit = payload.total_debit();
    let credit = payload.total_credit();
    if !within_epsilon(debit, credit) {
        return Err(SinkError::new(format!(
            "Transaction is not balanced. Debit: {}, Credit: {}, Gap: {}",
            format_amount(debit),
            format_amount(credit),
            format_amount(debit.saturating_sub(credit).abs())
        )));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JournalType, PayloadLine, PeriodStatus};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn payload(debit: i64, credit: i64) -> TransactionPayload {
        TransactionPayload {
            journal_id: 1,
            period_id: 6,
            fiscal_year_id: 1,
            transaction_date: date(2024, 6, 1),
            description: "Achat fournitures".into(),
            reference: "F-001".into(),
            lines: vec![
                PayloadLine {
                    account_id: 1,
                    description: "Achat fournitures".into(),
                    debit_amount: Decimal::new(debit, 0),
                    credit_amount: Decimal::ZERO,
                    reference: String::new(),
                },
                PayloadLine {
                    account_id: 2,
                    description: "Achat fournitures".into(),
                    debit_amount: Decimal::ZERO,
                    credit_amount: Decimal::new(credit, 0),
                    reference: String::new(),
                },
            ],
        }
    }

    fn outbox() -> (JsonOutbox, TempDir) {
        let temp = TempDir::new().unwrap();
        let journals = vec![Journal::new(1, "AC", "Achats", JournalType::Purchases)];
        let year = FiscalYear {
            id: 1,
            code: "2024".into(),
            label: "Exercice 2024".into(),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
            status: FiscalYearStatus::Open,
            periods: vec![Period {
                id: 6,
                number: 6,
                start_date: date(2024, 6, 1),
                end_date: date(2024, 6, 30),
                status: PeriodStatus::Open,
            }],
        };
        let outbox = JsonOutbox::new(temp.path().join("outbox"), &journals, &year).unwrap();
        (outbox, temp)
    }

    #[test]
    fn numbers_follow_journal_and_year() {
        let (mut outbox, _temp) = outbox();
        let first = outbox.create(&payload(100, 100)).unwrap();
        let second = outbox.create(&payload(50, 50)).unwrap();
        assert_eq!(first.number, "AC240001");
        assert_eq!(second.number, "AC240002");
        assert_eq!(second.id, 2);
        assert_eq!(outbox.records().unwrap().len(), 2);
    }

    #[test]
    fn rejects_unbalanced_transaction() {
        let (mut outbox, _temp) = outbox();
        let err = outbox.create(&payload(150, 100)).unwrap_err();
        assert_eq!(
            err.message(),
            Some("Transaction is not balanced. Debit: 150.00, Credit: 100.00, Gap: 50.00")
        );
        assert!(outbox.records().unwrap().is_empty());
    }

    #[test]
    fn rejects_line_without_amount() {
        let (mut outbox, _temp) = outbox();
        let mut zero_line = payload(100, 100);
        zero_line.lines.push(PayloadLine {
            account_id: 3,
            description: String::new(),
            debit_amount: Decimal::ZERO,
            credit_amount: Decimal::ZERO,
            reference: String::new(),
        });
        let err = outbox.create(&zero_line).unwrap_err();
        assert_eq!(err.message(), Some("A line needs either a debit or a credit"));
    }

    #[test]
    fn rejects_date_outside_period() {
        let (mut outbox, _temp) = outbox();
        let mut july = payload(100, 100);
        july.transaction_date = date(2024, 7, 2);
        let err = outbox.create(&july).unwrap_err();
        assert_eq!(
            err.message(),
            Some("Transaction date must fall between 2024-06-01 and 2024-06-30")
        );
        let mut unknown = payload(100, 100);
        unknown.period_id = 9;
        assert_eq!(
            outbox.create(&unknown).unwrap_err().message(),
            Some("Unknown period 9")
        );
        assert!(outbox.records().unwrap().is_empty());
    }

    #[test]
    fn rejects_future_date() {
        let today = date(2024, 6, 10);
        let period = Period {
            id: 6,
            number: 6,
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 30),
            status: PeriodStatus::Open,
        };
        let mut later = payload(100, 100);
        later.transaction_date = date(2024, 6, 11);
        let err = validate_payload(&later, &period, today).unwrap_err();
        assert_eq!(err.message(), Some("Transaction date cannot be in the future"));
        later.transaction_date = today;
        assert!(validate_payload(&later, &period, today).is_ok());
    }

    #[test]
    fn rejects_amounts_over_the_limit() {
        let period = Period {
            id: 6,
            number: 6,
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 30),
            status: PeriodStatus::Open,
        };
        let mut huge = payload(0, 0);
        huge.lines[0].debit_amount = Decimal::MAX;
        huge.lines[1].credit_amount = Decimal::MAX;
        let err = validate_payload(&huge, &period, date(2024, 6, 30)).unwrap_err();
        assert_eq!(err.message(), Some("Amounts are limited to 9999999999999.99"));
    }

    #[test]
    fn account_pages_cover_whole_chart() {
        let data = ReferenceFile {
            accounts: (0..5)
                .map(|idx| {
                    Account::new(
                        idx,
                        format!("6010000{idx}"),
                        "Achats",
                        crate::domain::AccountType::Charge,
                    )
                })
                .collect(),
            ..ReferenceFile::default()
        };
        let store = JsonReferenceStore::from_data(data, Some(2));
        assert!(store.account_page(0).unwrap().has_more);
        assert!(store.account_page(1).unwrap().has_more);
        let last = store.account_page(2).unwrap();
        assert_eq!(last.accounts.len(), 1);
        assert!(!last.has_more);
    }
}
