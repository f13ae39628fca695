use serde::{Deserialize, Serialize};

pub type AccountId = i64;

/// Balance side an account normally carries in the OHADA chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    #[default]
    #[serde(rename = "debiteur")]
    Debit,
    #[serde(rename = "crediteur")]
    Credit,
    Variable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Actif,
    Passif,
    Charge,
    Produit,
}

/// Chart-of-accounts entry (`Compte`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub code: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    #[serde(default)]
    pub normal_balance: NormalBalance,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Account {
    pub fn new(
        id: AccountId,
        code: impl Into<String>,
        label: impl Into<String>,
        kind: AccountType,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            label: label.into(),
            kind,
            normal_balance: NormalBalance::default(),
            is_active: true,
        }
    }

    pub fn with_normal_balance(mut self, side: NormalBalance) -> Self {
        self.normal_balance = side;
        self
    }

    /// OHADA class, i.e. the first digit of the code (1-9).
    pub fn class(&self) -> Option<u8> {
        self.code
            .chars()
            .next()
            .and_then(|ch| ch.to_digit(10))
            .map(|digit| digit as u8)
    }
}

/// The full chart of accounts, held resident in the order the reference
/// service returned it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartOfAccounts {
    accounts: Vec<Account>,
}

impl ChartOfAccounts {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn extend(&mut self, accounts: impl IntoIterator<Item = Account>) {
        self.accounts.extend(accounts);
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// First account, in source order, whose code starts with `prefix`.
    /// Matching is case-sensitive; an empty prefix matches nothing.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Account> {
        if prefix.is_empty() {
            return None;
        }
        self.accounts
            .iter()
            .find(|account| account.code.starts_with(prefix))
    }
}
