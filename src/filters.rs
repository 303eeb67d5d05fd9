use rusqlite::Connection;

use crate::error::{FiscusError, Result};
use crate::periods::{effective_period, effective_quarter, submission_id_predicate, ClosedPeriod};
use crate::types::{AccountDownloadFilters, AccountType};

/// Limits the submissions in scope for Files A, B, and C.
///
/// Files A and B carry year-to-date cumulative balances, so only the most
/// recent submission matching the filter is included. File C additionally
/// carries the incremental transaction_obligated_amount from each period, so
/// the id match is widened with every earlier-or-equal period of the same
/// fiscal year.
pub fn submission_filter(
    account_type: AccountType,
    filters: &AccountDownloadFilters,
    resolved_ids: &[i64],
) -> String {
    let id_clause = submission_id_predicate("s", resolved_ids);

    if account_type != AccountType::AwardFinancial {
        return id_clause;
    }

    let Some(fy) = filters.fy else {
        return id_clause;
    };

    let mut branches = Vec::new();
    if let Some(p) = effective_period(filters.quarter, filters.period) {
        branches.push(format!("(s.quarter_format_flag = 0 AND s.reporting_fiscal_period <= {p})"));
    }
    if let Some(q) = effective_quarter(filters.quarter, filters.period) {
        branches.push(format!("(s.quarter_format_flag = 1 AND s.reporting_fiscal_quarter <= {q})"));
    }
    if branches.is_empty() {
        return id_clause;
    }

    format!(
        "({id_clause} OR (s.reporting_fiscal_year = {fy} AND ({})))",
        branches.join(" OR ")
    )
}

/// Equality filters over reference attributes. Agency and federal-account
/// ids are existence-checked so a bad concrete id fails loudly instead of
/// matching nothing.
pub fn account_filters(
    conn: &Connection,
    account_type: AccountType,
    filters: &AccountDownloadFilters,
) -> Result<(Vec<String>, Vec<String>)> {
    let mut clauses = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(agency) = filters.agency {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM toptier_agencies WHERE toptier_agency_id = ?1)",
            [agency],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(FiscusError::InvalidParameter(
                "Agency with that ID does not exist".to_string(),
            ));
        }
        clauses.push(format!("ta.funding_toptier_agency_id = {agency}"));
    }

    if let Some(federal_account) = filters.federal_account {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM federal_accounts WHERE id = ?1)",
            [federal_account],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(FiscusError::InvalidParameter(
                "Federal Account with that ID does not exist".to_string(),
            ));
        }
        clauses.push(format!("ta.federal_account_id = {federal_account}"));
    }

    if let Some(code) = &filters.budget_function {
        clauses.push(format!("ta.budget_function_code = ?{}", params.len() + 1));
        params.push(code.clone());
    }

    if let Some(code) = &filters.budget_subfunction {
        clauses.push(format!("ta.budget_subfunction_code = ?{}", params.len() + 1));
        params.push(code.clone());
    }

    // File A rows carry no DEF code column
    if account_type != AccountType::AccountBalances && !filters.def_codes.is_empty() {
        let placeholders: Vec<String> = filters
            .def_codes
            .iter()
            .enumerate()
            .map(|(i, _)| format!("?{}", params.len() + i + 1))
            .collect();
        clauses.push(format!(
            "r.disaster_emergency_fund_code IN ({})",
            placeholders.join(", ")
        ));
        params.extend(filters.def_codes.iter().cloned());
    }

    Ok((clauses, params))
}

/// Resolve the closed-period view of the filter set, when a fiscal year was
/// supplied at all.
pub fn resolve_closed_period(
    conn: &Connection,
    filters: &AccountDownloadFilters,
) -> Result<Option<(ClosedPeriod, crate::periods::ResolvedPeriod)>> {
    let Some(fy) = filters.fy else {
        return Ok(None);
    };
    let closed = ClosedPeriod::new(fy, filters.quarter, filters.period);
    let resolved = closed.resolve(conn)?;
    Ok(Some((closed, resolved)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(fy: Option<i32>, quarter: Option<u8>, period: Option<u8>) -> AccountDownloadFilters {
        AccountDownloadFilters {
            fy,
            quarter,
            period,
            ..Default::default()
        }
    }

    #[test]
    fn test_file_a_submission_filter_is_ids_only() {
        let sql = submission_filter(AccountType::AccountBalances, &filters(Some(2020), Some(2), None), &[5, 6]);
        assert_eq!(sql, "s.submission_id IN (5, 6)");
    }

    #[test]
    fn test_file_c_unions_id_and_date_branches() {
        let sql = submission_filter(AccountType::AwardFinancial, &filters(Some(2020), Some(2), None), &[5]);
        assert!(sql.contains("s.submission_id IN (5)"));
        assert!(sql.contains("s.reporting_fiscal_year = 2020"));
        assert!(sql.contains("s.reporting_fiscal_period <= 6"));
        assert!(sql.contains("s.reporting_fiscal_quarter <= 2"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn test_file_c_without_fy_stays_always_false() {
        let sql = submission_filter(AccountType::AwardFinancial, &filters(None, None, None), &[]);
        assert_eq!(sql, "1 = 0");
    }

    #[test]
    fn test_unmatched_period_yields_always_false_for_file_a() {
        let sql = submission_filter(AccountType::AccountBalances, &filters(Some(2077), Some(2), None), &[]);
        assert_eq!(sql, "1 = 0");
    }

    #[test]
    fn test_unknown_agency_is_invalid_parameter() {
        let (_dir, conn) = crate::db::fixtures::test_db();
        let f = AccountDownloadFilters {
            agency: Some(999),
            ..Default::default()
        };
        let err = account_filters(&conn, AccountType::AccountBalances, &f).unwrap_err();
        assert!(matches!(err, FiscusError::InvalidParameter(_)));
        assert!(err.to_string().contains("Agency with that ID does not exist"));
    }

    #[test]
    fn test_unknown_federal_account_is_invalid_parameter() {
        let (_dir, conn) = crate::db::fixtures::test_db();
        let f = AccountDownloadFilters {
            federal_account: Some(42),
            ..Default::default()
        };
        let err = account_filters(&conn, AccountType::AccountBalances, &f).unwrap_err();
        assert!(err.to_string().contains("Federal Account with that ID does not exist"));
    }

    #[test]
    fn test_def_codes_skipped_for_file_a() {
        let (_dir, conn) = crate::db::fixtures::test_db();
        let f = AccountDownloadFilters {
            def_codes: vec!["L".to_string(), "M".to_string()],
            ..Default::default()
        };
        let (clauses, params) = account_filters(&conn, AccountType::AccountBalances, &f).unwrap();
        assert!(clauses.is_empty());
        assert!(params.is_empty());

        let (clauses, params) = account_filters(&conn, AccountType::AwardFinancial, &f).unwrap();
        assert_eq!(clauses, vec!["r.disaster_emergency_fund_code IN (?1, ?2)".to_string()]);
        assert_eq!(params, vec!["L".to_string(), "M".to_string()]);
    }
}
