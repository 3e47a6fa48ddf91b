//! Sort keys and the sort options menu

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::Transaction;

/// Field a report can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Date,
    VoucherNo,
    AccountId,
    AccountName,
    Branch,
    Type,
    Amount,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Id,
        SortField::Date,
        SortField::VoucherNo,
        SortField::AccountId,
        SortField::AccountName,
        SortField::Branch,
        SortField::Type,
        SortField::Amount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Date => "date",
            SortField::VoucherNo => "voucherNo",
            SortField::AccountId => "accountId",
            SortField::AccountName => "accountName",
            SortField::Branch => "branch",
            SortField::Type => "type",
            SortField::Amount => "amount",
        }
    }

    /// Ascending comparison of two transactions on this field
    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.cmp(&b.amount),
            SortField::VoucherNo => locale_compare(&a.voucher_no, &b.voucher_no),
            SortField::AccountId => locale_compare(&a.account_id, &b.account_id),
            SortField::AccountName => locale_compare(&a.account_name, &b.account_name),
            SortField::Branch => locale_compare(&a.branch, &b.branch),
            SortField::Type => {
                locale_compare(a.transaction_type.as_str(), b.transaction_type.as_str())
            }
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .iter()
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid sort field: {}", s))
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Apply the direction to an ascending ordering
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Active sort: field plus direction, written as `field-direction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortKey {
    fn default() -> Self {
        Self::new(SortField::Date, SortDirection::Desc)
    }
}

impl SortKey {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Directed comparison of two transactions
    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        self.direction.apply(self.field.compare(a, b))
    }

    /// Menu label for this key, or "Sort by" when it is not a menu entry
    pub fn label(&self) -> &'static str {
        SORT_OPTIONS
            .iter()
            .find(|option| option.key == *self)
            .map(|option| option.label)
            .unwrap_or("Sort by")
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("Invalid sort key: {}", s))?;
        Ok(SortKey::new(field.parse()?, direction.parse()?))
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.field, self.direction)
    }
}

impl Serialize for SortKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Entry in the sort options menu
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SortOption {
    #[serde(rename = "value")]
    pub key: SortKey,
    pub label: &'static str,
}

/// The sort menu offered to users
pub const SORT_OPTIONS: [SortOption; 6] = [
    SortOption { key: SortKey::new(SortField::Date, SortDirection::Desc), label: "Date: Newest First" },
    SortOption { key: SortKey::new(SortField::Date, SortDirection::Asc), label: "Date: Oldest First" },
    SortOption { key: SortKey::new(SortField::Amount, SortDirection::Desc), label: "Amount: High to Low" },
    SortOption { key: SortKey::new(SortField::Amount, SortDirection::Asc), label: "Amount: Low to High" },
    SortOption { key: SortKey::new(SortField::AccountName, SortDirection::Asc), label: "Account Name: A-Z" },
    SortOption { key: SortKey::new(SortField::AccountName, SortDirection::Desc), label: "Account Name: Z-A" },
];

thread_local! {
    static COLLATOR: Option<Collator> = Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(|e| log::warn!("Root collation unavailable, falling back to case-folded order: {}", e))
        .ok();
}

/// Locale-aware string comparison using the Unicode root collation.
/// Strings the collator ranks equal are ordered by their raw text.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
        })
        .then_with(|| a.cmp(b))
}
