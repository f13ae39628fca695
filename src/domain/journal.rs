use serde::{Deserialize, Serialize};

pub type JournalId = i64;

/// OHADA journal kinds, keyed by their two-letter code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JournalType {
    #[serde(rename = "AC")]
    Purchases,
    #[serde(rename = "VT")]
    Sales,
    #[serde(rename = "BQ")]
    Bank,
    #[serde(rename = "CA")]
    Cash,
    #[serde(rename = "PA")]
    Payroll,
    #[serde(rename = "FI")]
    Tax,
    #[serde(rename = "SO")]
    Social,
    #[serde(rename = "ST")]
    Stock,
    #[serde(rename = "IM")]
    FixedAssets,
    #[serde(rename = "PR")]
    Provisions,
    #[serde(rename = "AN")]
    OpeningBalances,
    #[serde(rename = "CL")]
    Closing,
    #[serde(rename = "OD")]
    Miscellaneous,
    #[serde(rename = "EX")]
    OffBook,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Journal {
    pub id: JournalId,
    pub code: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: JournalType,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Journal {
    pub fn new(
        id: JournalId,
        code: impl Into<String>,
        label: impl Into<String>,
        kind: JournalType,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            label: label.into(),
            kind,
            is_active: true,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} - {}", self.code, self.label)
    }
}
