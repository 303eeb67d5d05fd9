//! Renders output column expressions to SQL.
//!
//! The closed-period rule: cumulative-to-date fields (gross outlay, the two
//! USSGL downward adjustments) are only comparable once the requested period
//! is the final one reported for its fiscal year. For a non-final period they
//! are limited to the exact resolved submissions; without a fiscal year
//! filter they are unconditionally NULL.

use crate::columns::{is_summable, Column, Expr};
use crate::periods::{submission_id_predicate, ClosedPeriod, ResolvedPeriod};
use crate::types::{AccountLevel, AccountType};

pub struct RenderCtx<'a> {
    pub account_type: AccountType,
    pub account_level: AccountLevel,
    pub closed_period: Option<&'a (ClosedPeriod, ResolvedPeriod)>,
    pub award_url: &'a str,
}

/// The physical gross-outlay column differs per file.
fn gross_outlay_source(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::AccountBalances => "r.gross_outlay_amount_by_tas_cpe",
        AccountType::ObjectClassProgramActivity => "r.gross_outlay_amount_by_program_object_class_cpe",
        AccountType::AwardFinancial => "r.gross_outlay_amount_by_award_cpe",
    }
}

const USSGL_487200: &str = "r.ussgl487200_down_adj_pri_ppaid_undel_orders_oblig_refund_cpe";
const USSGL_497200: &str = "r.ussgl497200_down_adj_pri_paid_deliv_orders_oblig_refund_cpe";

fn closed_period_value(ctx: &RenderCtx, column: &str) -> String {
    match ctx.closed_period {
        None => "NULL".to_string(),
        Some((closed, resolved)) => {
            let predicate = if resolved.is_final {
                closed.period_predicate("s")
            } else {
                submission_id_predicate("s", &resolved.submission_ids)
            };
            format!("CASE WHEN {predicate} THEN {column} ELSE NULL END")
        }
    }
}

fn submission_period_notation() -> String {
    "CASE WHEN s.quarter_format_flag = 1 \
     THEN 'FY' || s.reporting_fiscal_year || 'Q' || s.reporting_fiscal_quarter \
     ELSE 'FY' || s.reporting_fiscal_year || 'P' || printf('%02d', s.reporting_fiscal_period) END"
        .to_string()
}

fn fiscal_year_sql(date_col: &str) -> String {
    format!(
        "CASE WHEN {date_col} IS NULL THEN NULL \
         WHEN CAST(strftime('%m', {date_col}) AS INTEGER) > 9 \
         THEN CAST(strftime('%Y', {date_col}) AS INTEGER) + 1 \
         ELSE CAST(strftime('%Y', {date_col}) AS INTEGER) END"
    )
}

// group_concat rejects DISTINCT together with a custom separator, so
// embedded commas are shielded with a control character while the default
// separator is rewritten to '; '
fn distinct_label_agg(source: &str) -> String {
    format!(
        "REPLACE(REPLACE(GROUP_CONCAT(DISTINCT REPLACE({source}, ',', char(31))), ',', '; '), char(31), ',')"
    )
}

/// File C rows are only worth downloading when at least one monitored amount
/// is nonzero. The cumulative balances are compared through the same
/// closed-period expressions the output columns use, so a prior-period row
/// whose balances are nulled out cannot ride in on them; NULL fails every
/// sign comparison, which a plain `!= 0` would not guarantee.
pub fn nonzero_filter(ctx: &RenderCtx) -> String {
    let monitored = [
        closed_period_value(ctx, gross_outlay_source(ctx.account_type)),
        closed_period_value(ctx, USSGL_487200),
        closed_period_value(ctx, USSGL_497200),
        "r.transaction_obligated_amount".to_string(),
    ];
    let comparisons: Vec<String> = monitored
        .iter()
        .map(|expr| format!("({expr}) > 0 OR ({expr}) < 0"))
        .collect();
    format!("({})", comparisons.join(" OR "))
}

fn permalink_sql(award_url: &str) -> String {
    let url = award_url.replace('\'', "''");
    format!(
        "CASE WHEN awd.generated_unique_award_id IS NOT NULL \
         THEN '{url}' || awd.generated_unique_award_id || '/' ELSE '' END"
    )
}

/// Render one output column to its SQL expression (without alias).
pub fn render(ctx: &RenderCtx, column: &Column) -> String {
    let federal = ctx.account_level == AccountLevel::FederalAccount;
    match column.expr {
        Expr::Col(source) => {
            if federal && is_summable(column.name) {
                format!("SUM({source})")
            } else {
                source.to_string()
            }
        }
        Expr::Label(source) => {
            if federal {
                distinct_label_agg(source)
            } else {
                source.to_string()
            }
        }
        Expr::SubmissionPeriod => submission_period_notation(),
        Expr::GrossOutlay => {
            let value = closed_period_value(ctx, gross_outlay_source(ctx.account_type));
            if federal {
                format!("SUM({value})")
            } else {
                value
            }
        }
        Expr::DownwardAdj487200 => {
            let value = closed_period_value(ctx, USSGL_487200);
            if federal {
                format!("SUM({value})")
            } else {
                value
            }
        }
        Expr::DownwardAdj497200 => {
            let value = closed_period_value(ctx, USSGL_497200);
            if federal {
                format!("SUM({value})")
            } else {
                value
            }
        }
        Expr::LastModified => {
            // Treasury-level File C stays at the raw row grain, so there is
            // no group to take a MAX over
            if ctx.account_type == AccountType::AwardFinancial && !federal {
                "s.published_date".to_string()
            } else {
                "MAX(s.published_date)".to_string()
            }
        }
        Expr::Coalesce { contract, assistance } => format!("COALESCE({contract}, {assistance})"),
        Expr::ZipCoalesce => {
            // Either assistance part may be missing on its own; both absent
            // means no ZIP, not an empty string
            "COALESCE(cd.legal_entity_zip4, \
             NULLIF(COALESCE(ad.legal_entity_zip5, '') || COALESCE(ad.legal_entity_zip_last4, ''), ''))"
                .to_string()
        }
        Expr::FiscalYearOf(date_col) => fiscal_year_sql(date_col),
        Expr::Permalink => permalink_sql(ctx.award_url),
    }
}

/// Whether the rendered expression is an aggregate; everything that is not
/// becomes a GROUP BY column.
pub fn is_aggregate(ctx: &RenderCtx, column: &Column) -> bool {
    let federal = ctx.account_level == AccountLevel::FederalAccount;
    match column.expr {
        Expr::Col(_) => federal && is_summable(column.name),
        Expr::Label(_) => federal,
        Expr::GrossOutlay | Expr::DownwardAdj487200 | Expr::DownwardAdj497200 => federal,
        Expr::LastModified => !(ctx.account_type == AccountType::AwardFinancial && !federal),
        Expr::SubmissionPeriod
        | Expr::Coalesce { .. }
        | Expr::ZipCoalesce
        | Expr::FiscalYearOf(_)
        | Expr::Permalink => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::layout;

    fn ctx_without_fy(account_type: AccountType, account_level: AccountLevel) -> RenderCtx<'static> {
        RenderCtx {
            account_type,
            account_level,
            closed_period: None,
            award_url: "https://www.usaspending.gov/award/",
        }
    }

    fn find(account_type: AccountType, level: AccountLevel, name: &str) -> Column {
        layout(account_type, level).into_iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_no_fiscal_year_nulls_closed_period_fields() {
        let ctx = ctx_without_fy(AccountType::AccountBalances, AccountLevel::TreasuryAccount);
        let col = find(AccountType::AccountBalances, AccountLevel::TreasuryAccount, "gross_outlay_amount");
        assert_eq!(render(&ctx, &col), "NULL");
    }

    #[test]
    fn test_final_period_uses_period_predicate() {
        let closed = (
            ClosedPeriod::new(2020, Some(4), None),
            ResolvedPeriod { submission_ids: vec![9], is_final: true },
        );
        let ctx = RenderCtx {
            account_type: AccountType::ObjectClassProgramActivity,
            account_level: AccountLevel::TreasuryAccount,
            closed_period: Some(&closed),
            award_url: "",
        };
        let col = find(
            AccountType::ObjectClassProgramActivity,
            AccountLevel::TreasuryAccount,
            "downward_adj_prior_yr_ppaid_undeliv_orders_oblig_refunds_cpe",
        );
        let sql = render(&ctx, &col);
        assert!(sql.contains("s.reporting_fiscal_year = 2020"));
        assert!(sql.contains("ussgl487200"));
        assert!(!sql.contains("submission_id IN"));
    }

    #[test]
    fn test_open_period_pins_submission_ids() {
        let closed = (
            ClosedPeriod::new(2020, Some(2), None),
            ResolvedPeriod { submission_ids: vec![3, 4], is_final: false },
        );
        let ctx = RenderCtx {
            account_type: AccountType::AccountBalances,
            account_level: AccountLevel::TreasuryAccount,
            closed_period: Some(&closed),
            award_url: "",
        };
        let col = find(AccountType::AccountBalances, AccountLevel::TreasuryAccount, "gross_outlay_amount");
        let sql = render(&ctx, &col);
        assert!(sql.contains("s.submission_id IN (3, 4)"));
        assert!(sql.contains("gross_outlay_amount_by_tas_cpe"));
    }

    #[test]
    fn test_gross_outlay_source_dispatch() {
        for (ty, expected) in [
            (AccountType::AccountBalances, "by_tas_cpe"),
            (AccountType::ObjectClassProgramActivity, "by_program_object_class_cpe"),
            (AccountType::AwardFinancial, "by_award_cpe"),
        ] {
            assert!(gross_outlay_source(ty).contains(expected));
        }
    }

    #[test]
    fn test_federal_level_wraps_sums() {
        let ctx = ctx_without_fy(AccountType::AccountBalances, AccountLevel::FederalAccount);
        let col = find(
            AccountType::AccountBalances,
            AccountLevel::FederalAccount,
            "budget_authority_appropriated_amount",
        );
        assert_eq!(render(&ctx, &col), "SUM(r.budget_authority_appropriated_amount_cpe)");

        let label = find(AccountType::AccountBalances, AccountLevel::FederalAccount, "reporting_agency_name");
        let sql = render(&ctx, &label);
        assert!(sql.contains("GROUP_CONCAT(DISTINCT REPLACE(s.reporting_agency_name, ',', char(31)))"));
        assert!(sql.contains("'; '"));
    }

    #[test]
    fn test_nonzero_filter_compares_derived_expressions() {
        let closed = (
            ClosedPeriod::new(2020, Some(2), None),
            ResolvedPeriod { submission_ids: vec![33], is_final: false },
        );
        let ctx = RenderCtx {
            account_type: AccountType::AwardFinancial,
            account_level: AccountLevel::TreasuryAccount,
            closed_period: Some(&closed),
            award_url: "",
        };
        let sql = nonzero_filter(&ctx);
        // Cumulative balances go through the closed-period CASE, TOA stays raw
        assert!(sql.contains("CASE WHEN s.submission_id IN (33) THEN r.gross_outlay_amount_by_award_cpe"));
        assert!(sql.contains("ussgl487200"));
        assert!(sql.contains("ussgl497200"));
        assert!(sql.contains("(r.transaction_obligated_amount) > 0"));
        assert!(sql.contains("(r.transaction_obligated_amount) < 0"));
    }

    #[test]
    fn test_last_modified_grain() {
        let tas_c = ctx_without_fy(AccountType::AwardFinancial, AccountLevel::TreasuryAccount);
        let col = find(AccountType::AwardFinancial, AccountLevel::TreasuryAccount, "last_modified_date");
        assert_eq!(render(&tas_c, &col), "s.published_date");
        assert!(!is_aggregate(&tas_c, &col));

        let tas_a = ctx_without_fy(AccountType::AccountBalances, AccountLevel::TreasuryAccount);
        let col = find(AccountType::AccountBalances, AccountLevel::TreasuryAccount, "last_modified_date");
        assert_eq!(render(&tas_a, &col), "MAX(s.published_date)");
        assert!(is_aggregate(&tas_a, &col));
    }

    #[test]
    fn test_permalink_escapes_and_falls_back_to_empty() {
        let sql = permalink_sql("https://www.usaspending.gov/award/");
        assert!(sql.contains("'https://www.usaspending.gov/award/' || awd.generated_unique_award_id || '/'"));
        assert!(sql.contains("ELSE ''"));
        assert!(permalink_sql("it's").contains("it''s"));
    }

    #[test]
    fn test_fiscal_year_sql_shape() {
        let sql = fiscal_year_sql("awd.date_signed");
        assert!(sql.contains("strftime('%m', awd.date_signed)"));
        assert!(sql.contains("+ 1"));
    }
}
