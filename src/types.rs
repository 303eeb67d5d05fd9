use std::fmt;
use std::str::FromStr;

use crate::error::FiscusError;

/// The three downloadable account files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    /// File A: account balances
    AccountBalances,
    /// File B: breakdown by program activity and object class
    ObjectClassProgramActivity,
    /// File C: breakdown by award
    AwardFinancial,
}

impl AccountType {
    /// The underlying row table for this file.
    pub fn table(self) -> &'static str {
        match self {
            AccountType::AccountBalances => "account_balances",
            AccountType::ObjectClassProgramActivity => "object_class_program_activity",
            AccountType::AwardFinancial => "award_financial",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::AccountBalances => "account_balances",
            AccountType::ObjectClassProgramActivity => "object_class_program_activity",
            AccountType::AwardFinancial => "award_financial",
        }
    }
}

impl FromStr for AccountType {
    type Err = FiscusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account_balances" => Ok(AccountType::AccountBalances),
            "object_class_program_activity" => Ok(AccountType::ObjectClassProgramActivity),
            "award_financial" => Ok(AccountType::AwardFinancial),
            other => Err(FiscusError::InvalidParameter(format!(
                "account_type must be one of \"account_balances\", \
                 \"object_class_program_activity\", or \"award_financial\" (got {other:?})"
            ))),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row granularity of a download: per treasury account, or rolled up to the
/// federal account that groups them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountLevel {
    TreasuryAccount,
    FederalAccount,
}

impl AccountLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountLevel::TreasuryAccount => "treasury_account",
            AccountLevel::FederalAccount => "federal_account",
        }
    }
}

impl FromStr for AccountLevel {
    type Err = FiscusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "treasury_account" => Ok(AccountLevel::TreasuryAccount),
            "federal_account" => Ok(AccountLevel::FederalAccount),
            _ => Err(FiscusError::InvalidParameter(
                "account_level must be either \"federal_account\" or \"treasury_account\"".to_string(),
            )),
        }
    }
}

impl fmt::Display for AccountLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied filter set for an account download. `None` means no
/// restriction (the API's "all" sentinel maps to `None` at the parse
/// boundary); a concrete agency/federal-account id that does not exist is an
/// invalid parameter, not an empty result.
#[derive(Debug, Clone, Default)]
pub struct AccountDownloadFilters {
    pub fy: Option<i32>,
    pub quarter: Option<u8>,
    pub period: Option<u8>,
    pub agency: Option<i64>,
    pub federal_account: Option<i64>,
    pub budget_function: Option<String>,
    pub budget_subfunction: Option<String>,
    pub def_codes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_level_parse() {
        assert_eq!("treasury_account".parse::<AccountLevel>().unwrap(), AccountLevel::TreasuryAccount);
        assert_eq!("federal_account".parse::<AccountLevel>().unwrap(), AccountLevel::FederalAccount);
        let err = "tas".parse::<AccountLevel>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Parameter: account_level must be either \"federal_account\" or \"treasury_account\""
        );
    }

    #[test]
    fn test_account_type_parse() {
        assert_eq!(
            "award_financial".parse::<AccountType>().unwrap(),
            AccountType::AwardFinancial
        );
        assert!("file_d".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_tables() {
        assert_eq!(AccountType::AccountBalances.table(), "account_balances");
        assert_eq!(AccountType::AwardFinancial.table(), "award_financial");
    }
}
