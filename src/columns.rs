//! Output column layouts for the A/B/C download files.
//!
//! Each (account type, account level) pair maps to an ordered list of output
//! columns. Layouts are data, not code: the query builder renders the same
//! `Expr` variants everywhere, so adding a column to a file is a table edit.

use crate::types::{AccountLevel, AccountType};

/// A computable column expression. Physical columns are named through their
/// query alias (`r` row table, `s` submissions, `ta` treasury accounts,
/// `fa` federal accounts, `awd` awards, `cd`/`ad` contract/assistance
/// detail).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expr {
    /// A physical column passed through (summed at federal level when the
    /// output name is in [`SUMMABLE_COLUMNS`]).
    Col(&'static str),
    /// A descriptive text column that collapses to a semicolon-joined
    /// distinct aggregate at federal level, where one federal account can
    /// span several reporting agencies or treasury accounts.
    Label(&'static str),
    /// `FY{year}Q{quarter}` or `FY{year}P{period:02}` depending on the
    /// submission's reporting cadence.
    SubmissionPeriod,
    /// Gross outlay amount, nulled outside a closed period; the source
    /// column differs per account type.
    GrossOutlay,
    /// USSGL 487200 downward adjustment, nulled outside a closed period.
    DownwardAdj487200,
    /// USSGL 497200 downward adjustment, nulled outside a closed period.
    DownwardAdj497200,
    /// Latest publish date across the group.
    LastModified,
    /// First non-null of a contract-sourced and an assistance-sourced
    /// column (File C enrichment).
    Coalesce {
        contract: &'static str,
        assistance: &'static str,
    },
    /// Recipient ZIP: contracts carry one preformatted field, assistance
    /// splits it into a 5-digit base and 4-digit suffix.
    ZipCoalesce,
    /// Federal fiscal year of a raw award date.
    FiscalYearOf(&'static str),
    /// Public award page URL when a unique award id exists, else empty.
    Permalink,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub expr: Expr,
}

const fn col(name: &'static str, expr: Expr) -> Column {
    Column { name, expr }
}

/// Every column across the A, B, and C files whose values may be summed when
/// collapsing treasury accounts into a federal account. Consumed by both the
/// GROUP BY derivation and the SUM rendering so the two can never drift.
pub const SUMMABLE_COLUMNS: &[&str] = &[
    "budget_authority_unobligated_balance_brought_forward",
    "adjustments_to_unobligated_balance_brought_forward",
    "budget_authority_appropriated_amount",
    "borrowing_authority_amount",
    "contract_authority_amount",
    "spending_authority_from_offsetting_collections_amount",
    "total_other_budgetary_resources_amount",
    "total_budgetary_resources",
    "obligations_incurred",
    "deobligations_or_recoveries_or_refunds_from_prior_year",
    "unobligated_balance",
    "status_of_budgetary_resources_total",
    "transaction_obligated_amount",
];

pub fn is_summable(name: &str) -> bool {
    SUMMABLE_COLUMNS.contains(&name)
}

const ACCOUNT_IDENTITY: &[Column] = &[
    col("federal_account_symbol", Expr::Col("fa.federal_account_symbol")),
    col("federal_account_name", Expr::Col("fa.account_title")),
    col("treasury_account_symbol", Expr::Col("ta.tas_rendering_label")),
    col("treasury_account_name", Expr::Col("ta.account_title")),
    col("reporting_agency_name", Expr::Label("s.reporting_agency_name")),
    col("budget_function", Expr::Label("ta.budget_function_title")),
    col("budget_subfunction", Expr::Label("ta.budget_subfunction_title")),
    col("submission_period", Expr::SubmissionPeriod),
];

const FILE_A_AMOUNTS: &[Column] = &[
    col(
        "budget_authority_unobligated_balance_brought_forward",
        Expr::Col("r.budget_authority_unobligated_balance_brought_forward_fyb"),
    ),
    col(
        "adjustments_to_unobligated_balance_brought_forward",
        Expr::Col("r.adjustments_to_unobligated_balance_brought_forward_cpe"),
    ),
    col(
        "budget_authority_appropriated_amount",
        Expr::Col("r.budget_authority_appropriated_amount_cpe"),
    ),
    col("borrowing_authority_amount", Expr::Col("r.borrowing_authority_amount_total_cpe")),
    col("contract_authority_amount", Expr::Col("r.contract_authority_amount_total_cpe")),
    col(
        "spending_authority_from_offsetting_collections_amount",
        Expr::Col("r.spending_authority_from_offsetting_collections_amount_cpe"),
    ),
    col(
        "total_other_budgetary_resources_amount",
        Expr::Col("r.other_budgetary_resources_amount_cpe"),
    ),
    col("total_budgetary_resources", Expr::Col("r.total_budgetary_resources_amount_cpe")),
    col("obligations_incurred", Expr::Col("r.obligations_incurred_total_by_tas_cpe")),
    col(
        "deobligations_or_recoveries_or_refunds_from_prior_year",
        Expr::Col("r.deobligations_recoveries_refunds_by_tas_cpe"),
    ),
    col("unobligated_balance", Expr::Col("r.unobligated_balance_cpe")),
    col(
        "status_of_budgetary_resources_total",
        Expr::Col("r.status_of_budgetary_resources_total_cpe"),
    ),
    col("gross_outlay_amount", Expr::GrossOutlay),
];

const FILE_B_BREAKDOWN: &[Column] = &[
    col("program_activity_code", Expr::Col("r.program_activity_code")),
    col("program_activity_name", Expr::Col("r.program_activity_name")),
    col("object_class_code", Expr::Col("r.object_class_code")),
    col("object_class_name", Expr::Col("r.object_class_name")),
    col("direct_or_reimbursable_funding_source", Expr::Col("r.direct_reimbursable")),
    col("disaster_emergency_fund_code", Expr::Col("r.disaster_emergency_fund_code")),
];

const FILE_B_AMOUNTS: &[Column] = &[
    col(
        "obligations_incurred",
        Expr::Col("r.obligations_incurred_by_program_object_class_cpe"),
    ),
    col(
        "deobligations_or_recoveries_or_refunds_from_prior_year",
        Expr::Col("r.deobligations_recoveries_refund_pri_program_object_class_cpe"),
    ),
    col("gross_outlay_amount", Expr::GrossOutlay),
    col(
        "downward_adj_prior_yr_ppaid_undeliv_orders_oblig_refunds_cpe",
        Expr::DownwardAdj487200,
    ),
    col(
        "downward_adj_prior_yr_paid_delivered_orders_oblig_refunds_cpe",
        Expr::DownwardAdj497200,
    ),
];

const FILE_C_AWARD_IDENTITY: &[Column] = &[
    col("piid", Expr::Col("r.piid")),
    col("fain", Expr::Col("r.fain")),
    col("uri", Expr::Col("r.uri")),
    col("award_unique_key", Expr::Col("awd.generated_unique_award_id")),
    col("disaster_emergency_fund_code", Expr::Col("r.disaster_emergency_fund_code")),
];

const FILE_C_AMOUNTS: &[Column] = &[
    col("transaction_obligated_amount", Expr::Col("r.transaction_obligated_amount")),
    col("gross_outlay_amount", Expr::GrossOutlay),
    col(
        "downward_adj_prior_yr_ppaid_undeliv_orders_oblig_refunds_cpe",
        Expr::DownwardAdj487200,
    ),
    col(
        "downward_adj_prior_yr_paid_delivered_orders_oblig_refunds_cpe",
        Expr::DownwardAdj497200,
    ),
];

/// File C enrichment: output name -> (contract column, assistance column).
/// Each row of a File C download is sourced from exactly one of the two
/// detail tables, so the coalesce picks whichever side exists.
pub const AWARD_COALESCE_FIELDS: &[Column] = &[
    col("award_type_code", Expr::Coalesce { contract: "cd.contract_award_type", assistance: "ad.assistance_type" }),
    col("award_type", Expr::Coalesce { contract: "cd.contract_award_type_desc", assistance: "ad.assistance_type_desc" }),
    col("awarding_agency_code", Expr::Coalesce { contract: "cd.awarding_agency_code", assistance: "ad.awarding_agency_code" }),
    col("awarding_agency_name", Expr::Coalesce { contract: "cd.awarding_agency_name", assistance: "ad.awarding_agency_name" }),
    col("awarding_subagency_code", Expr::Coalesce { contract: "cd.awarding_sub_tier_agency_c", assistance: "ad.awarding_sub_tier_agency_c" }),
    col("awarding_subagency_name", Expr::Coalesce { contract: "cd.awarding_sub_tier_agency_n", assistance: "ad.awarding_sub_tier_agency_n" }),
    col("awarding_office_code", Expr::Coalesce { contract: "cd.awarding_office_code", assistance: "ad.awarding_office_code" }),
    col("awarding_office_name", Expr::Coalesce { contract: "cd.awarding_office_name", assistance: "ad.awarding_office_name" }),
    col("funding_agency_code", Expr::Coalesce { contract: "cd.funding_agency_code", assistance: "ad.funding_agency_code" }),
    col("funding_agency_name", Expr::Coalesce { contract: "cd.funding_agency_name", assistance: "ad.funding_agency_name" }),
    col("funding_sub_agency_code", Expr::Coalesce { contract: "cd.funding_sub_tier_agency_co", assistance: "ad.funding_sub_tier_agency_co" }),
    col("funding_sub_agency_name", Expr::Coalesce { contract: "cd.funding_sub_tier_agency_na", assistance: "ad.funding_sub_tier_agency_na" }),
    col("funding_office_code", Expr::Coalesce { contract: "cd.funding_office_code", assistance: "ad.funding_office_code" }),
    col("funding_office_name", Expr::Coalesce { contract: "cd.funding_office_name", assistance: "ad.funding_office_name" }),
    col("recipient_duns", Expr::Coalesce { contract: "cd.awardee_or_recipient_uniqu", assistance: "ad.awardee_or_recipient_uniqu" }),
    col("recipient_name", Expr::Coalesce { contract: "cd.awardee_or_recipient_legal", assistance: "ad.awardee_or_recipient_legal" }),
    col("recipient_parent_duns", Expr::Coalesce { contract: "cd.ultimate_parent_unique_ide", assistance: "ad.ultimate_parent_unique_ide" }),
    col("recipient_parent_name", Expr::Coalesce { contract: "cd.ultimate_parent_legal_enti", assistance: "ad.ultimate_parent_legal_enti" }),
    col("recipient_country", Expr::Coalesce { contract: "cd.legal_entity_country_code", assistance: "ad.legal_entity_country_code" }),
    col("recipient_state", Expr::Coalesce { contract: "cd.legal_entity_state_code", assistance: "ad.legal_entity_state_code" }),
    col("recipient_county", Expr::Coalesce { contract: "cd.legal_entity_county_name", assistance: "ad.legal_entity_county_name" }),
    col("recipient_city", Expr::Coalesce { contract: "cd.legal_entity_city_name", assistance: "ad.legal_entity_city_name" }),
    col("recipient_congressional_district", Expr::Coalesce { contract: "cd.legal_entity_congressional", assistance: "ad.legal_entity_congressional" }),
    col("recipient_zip_code", Expr::ZipCoalesce),
    col("primary_place_of_performance_country", Expr::Coalesce { contract: "cd.place_of_perf_country_desc", assistance: "ad.place_of_perform_country_n" }),
    col("primary_place_of_performance_state", Expr::Coalesce { contract: "cd.place_of_perfor_state_desc", assistance: "ad.place_of_perform_state_nam" }),
    col("primary_place_of_performance_county", Expr::Coalesce { contract: "cd.place_of_perform_county_na", assistance: "ad.place_of_perform_county_na" }),
    col("primary_place_of_performance_congressional_district", Expr::Coalesce { contract: "cd.place_of_performance_congr", assistance: "ad.place_of_performance_congr" }),
    col("primary_place_of_performance_zip_code", Expr::Coalesce { contract: "cd.place_of_performance_zip4a", assistance: "ad.place_of_performance_zip4a" }),
];

const FILE_C_TRAILER: &[Column] = &[
    col("award_base_action_date_fiscal_year", Expr::FiscalYearOf("awd.date_signed")),
    col("award_latest_action_date_fiscal_year", Expr::FiscalYearOf("awd.certified_date")),
    col("usaspending_permalink", Expr::Permalink),
];

const LAST_MODIFIED: Column = col("last_modified_date", Expr::LastModified);

/// The ordered output layout for one download file at one account level.
/// Federal-level layouts drop the treasury-account identity columns; every
/// other column survives and is aggregated as its expression dictates.
pub fn layout(account_type: AccountType, account_level: AccountLevel) -> Vec<Column> {
    let identity = ACCOUNT_IDENTITY
        .iter()
        .filter(|c| {
            account_level == AccountLevel::TreasuryAccount
                || !matches!(c.name, "treasury_account_symbol" | "treasury_account_name")
        })
        .copied();

    let mut cols: Vec<Column> = identity.collect();
    match account_type {
        AccountType::AccountBalances => {
            cols.extend_from_slice(FILE_A_AMOUNTS);
        }
        AccountType::ObjectClassProgramActivity => {
            // Breakdown dimensions sit between identity and amounts
            let period_pos = cols.len() - 1;
            let period = cols.remove(period_pos);
            cols.extend_from_slice(FILE_B_BREAKDOWN);
            cols.push(period);
            cols.extend_from_slice(FILE_B_AMOUNTS);
        }
        AccountType::AwardFinancial => {
            cols.extend_from_slice(FILE_C_AWARD_IDENTITY);
            cols.extend_from_slice(FILE_C_AMOUNTS);
            cols.extend_from_slice(AWARD_COALESCE_FIELDS);
            cols.extend_from_slice(FILE_C_TRAILER);
        }
    }
    cols.push(LAST_MODIFIED);
    cols
}
