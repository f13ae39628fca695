use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type FiscalYearId = i64;
pub type PeriodId = i64;

const MONTHS_FR: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FiscalYearStatus {
    Preparation,
    #[serde(rename = "OUVERT")]
    Open,
    #[serde(rename = "CLOTURE_PROVISOIRE")]
    ProvisionalClose,
    #[serde(rename = "CLOTURE")]
    Closed,
    #[serde(rename = "ARCHIVE")]
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PeriodStatus {
    #[serde(rename = "OUVERTE")]
    Open,
    #[serde(rename = "CLOTUREE")]
    Closed,
    #[serde(rename = "VERROUILLEE")]
    Locked,
}

/// Monthly subdivision of a fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    pub id: PeriodId,
    pub number: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Fiscal year (`Exercice`) with its embedded periods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FiscalYear {
    pub id: FiscalYearId,
    pub code: String,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: FiscalYearStatus,
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl FiscalYear {
    /// Postings are accepted while open, and during provisional close for
    /// inventory adjustments.
    pub fn accepts_entries(&self) -> bool {
        matches!(
            self.status,
            FiscalYearStatus::Open | FiscalYearStatus::ProvisionalClose
        )
    }

    pub fn period(&self, id: PeriodId) -> Option<&Period> {
        self.periods.iter().find(|period| period.id == id)
    }

    pub fn period_by_number(&self, number: u8) -> Option<&Period> {
        self.periods.iter().find(|period| period.number == number)
    }

    pub fn period_for(&self, date: NaiveDate) -> Option<&Period> {
        self.periods.iter().find(|period| period.contains(date))
    }

    pub fn is_entry_allowed(&self, period: &Period) -> bool {
        period.status == PeriodStatus::Open && self.accepts_entries()
    }

    pub fn open_periods(&self) -> impl Iterator<Item = &Period> {
        self.periods
            .iter()
            .filter(move |period| self.is_entry_allowed(period))
    }

    /// "Juin 2024" style label for a period of this fiscal year.
    pub fn period_label(&self, period: &Period) -> String {
        let month = MONTHS_FR
            .get(usize::from(period.number.saturating_sub(1)))
            .copied()
            .unwrap_or("?");
        format!("{} {}", month, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fiscal_year(status: FiscalYearStatus) -> FiscalYear {
        FiscalYear {
            id: 1,
            code: "2024".into(),
            label: "Exercice 2024".into(),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
            status,
            periods: vec![
                Period {
                    id: 10,
                    number: 5,
                    start_date: date(2024, 5, 1),
                    end_date: date(2024, 5, 31),
                    status: PeriodStatus::Closed,
                },
                Period {
                    id: 11,
                    number: 6,
                    start_date: date(2024, 6, 1),
                    end_date: date(2024, 6, 30),
                    status: PeriodStatus::Open,
                },
            ],
        }
    }

    #[test]
    fn entry_requires_open_period_and_year() {
        let open = fiscal_year(FiscalYearStatus::Open);
        let ids: Vec<_> = open.open_periods().map(|p| p.id).collect();
        assert_eq!(ids, vec![11]);

        let provisional = fiscal_year(FiscalYearStatus::ProvisionalClose);
        assert_eq!(provisional.open_periods().count(), 1);

        let closed = fiscal_year(FiscalYearStatus::Closed);
        assert_eq!(closed.open_periods().count(), 0);
    }

    #[test]
    fn finds_period_for_date_and_labels_it() {
        let year = fiscal_year(FiscalYearStatus::Open);
        let june = year.period_for(date(2024, 6, 15)).unwrap();
        assert_eq!(june.id, 11);
        assert_eq!(year.period_label(june), "Juin 2024");
        assert!(year.period_for(date(2024, 7, 1)).is_none());
    }

    #[test]
    fn statuses_use_server_codes() {
        let json = serde_json::to_string(&FiscalYearStatus::ProvisionalClose).unwrap();
        assert_eq!(json, "\"CLOTURE_PROVISOIRE\"");
        let status: PeriodStatus = serde_json::from_str("\"OUVERTE\"").unwrap();
        assert_eq!(status, PeriodStatus::Open);
    }
}
