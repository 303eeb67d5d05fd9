use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS toptier_agencies (
    toptier_agency_id INTEGER PRIMARY KEY,
    toptier_code TEXT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS federal_accounts (
    id INTEGER PRIMARY KEY,
    federal_account_symbol TEXT NOT NULL,
    account_title TEXT
);

CREATE TABLE IF NOT EXISTS treasury_accounts (
    treasury_account_id INTEGER PRIMARY KEY,
    tas_rendering_label TEXT NOT NULL,
    account_title TEXT,
    federal_account_id INTEGER NOT NULL,
    funding_toptier_agency_id INTEGER,
    budget_function_code TEXT,
    budget_function_title TEXT,
    budget_subfunction_code TEXT,
    budget_subfunction_title TEXT,
    FOREIGN KEY (federal_account_id) REFERENCES federal_accounts(id),
    FOREIGN KEY (funding_toptier_agency_id) REFERENCES toptier_agencies(toptier_agency_id)
);

CREATE TABLE IF NOT EXISTS submissions (
    submission_id INTEGER PRIMARY KEY,
    reporting_fiscal_year INTEGER NOT NULL,
    reporting_fiscal_quarter INTEGER NOT NULL,
    reporting_fiscal_period INTEGER NOT NULL,
    quarter_format_flag INTEGER NOT NULL DEFAULT 0,
    final_of_fy INTEGER NOT NULL DEFAULT 0,
    published_date TEXT,
    reporting_agency_name TEXT
);

CREATE TABLE IF NOT EXISTS awards (
    award_id INTEGER PRIMARY KEY,
    generated_unique_award_id TEXT,
    date_signed TEXT,
    certified_date TEXT
);

-- File A grain: one row per treasury account per submission
CREATE TABLE IF NOT EXISTS account_balances (
    id INTEGER PRIMARY KEY,
    submission_id INTEGER NOT NULL,
    treasury_account_id INTEGER NOT NULL,
    budget_authority_unobligated_balance_brought_forward_fyb REAL,
    adjustments_to_unobligated_balance_brought_forward_cpe REAL,
    budget_authority_appropriated_amount_cpe REAL,
    borrowing_authority_amount_total_cpe REAL,
    contract_authority_amount_total_cpe REAL,
    spending_authority_from_offsetting_collections_amount_cpe REAL,
    other_budgetary_resources_amount_cpe REAL,
    total_budgetary_resources_amount_cpe REAL,
    obligations_incurred_total_by_tas_cpe REAL,
    deobligations_recoveries_refunds_by_tas_cpe REAL,
    unobligated_balance_cpe REAL,
    status_of_budgetary_resources_total_cpe REAL,
    gross_outlay_amount_by_tas_cpe REAL,
    FOREIGN KEY (submission_id) REFERENCES submissions(submission_id),
    FOREIGN KEY (treasury_account_id) REFERENCES treasury_accounts(treasury_account_id)
);

-- File B grain: program activity x object class x direct/reimbursable x DEF code
CREATE TABLE IF NOT EXISTS object_class_program_activity (
    id INTEGER PRIMARY KEY,
    submission_id INTEGER NOT NULL,
    treasury_account_id INTEGER NOT NULL,
    program_activity_code TEXT,
    program_activity_name TEXT,
    object_class_code TEXT,
    object_class_name TEXT,
    direct_reimbursable TEXT,
    disaster_emergency_fund_code TEXT,
    obligations_incurred_by_program_object_class_cpe REAL,
    deobligations_recoveries_refund_pri_program_object_class_cpe REAL,
    gross_outlay_amount_by_program_object_class_cpe REAL,
    ussgl487200_down_adj_pri_ppaid_undel_orders_oblig_refund_cpe REAL,
    ussgl497200_down_adj_pri_paid_deliv_orders_oblig_refund_cpe REAL,
    FOREIGN KEY (submission_id) REFERENCES submissions(submission_id),
    FOREIGN KEY (treasury_account_id) REFERENCES treasury_accounts(treasury_account_id)
);

-- File C grain: one row per award financial record per submission
CREATE TABLE IF NOT EXISTS award_financial (
    id INTEGER PRIMARY KEY,
    submission_id INTEGER NOT NULL,
    treasury_account_id INTEGER NOT NULL,
    award_id INTEGER,
    piid TEXT,
    fain TEXT,
    uri TEXT,
    disaster_emergency_fund_code TEXT,
    transaction_obligated_amount REAL,
    gross_outlay_amount_by_award_cpe REAL,
    ussgl487200_down_adj_pri_ppaid_undel_orders_oblig_refund_cpe REAL,
    ussgl497200_down_adj_pri_paid_deliv_orders_oblig_refund_cpe REAL,
    FOREIGN KEY (submission_id) REFERENCES submissions(submission_id),
    FOREIGN KEY (treasury_account_id) REFERENCES treasury_accounts(treasury_account_id),
    FOREIGN KEY (award_id) REFERENCES awards(award_id)
);

-- Latest-transaction contract detail, at most one row per award.
-- An award is sourced from contract_data or assistance_data, never both.
CREATE TABLE IF NOT EXISTS contract_data (
    award_id INTEGER PRIMARY KEY,
    contract_award_type TEXT,
    contract_award_type_desc TEXT,
    awarding_agency_code TEXT,
    awarding_agency_name TEXT,
    awarding_sub_tier_agency_c TEXT,
    awarding_sub_tier_agency_n TEXT,
    awarding_office_code TEXT,
    awarding_office_name TEXT,
    funding_agency_code TEXT,
    funding_agency_name TEXT,
    funding_sub_tier_agency_co TEXT,
    funding_sub_tier_agency_na TEXT,
    funding_office_code TEXT,
    funding_office_name TEXT,
    awardee_or_recipient_uniqu TEXT,
    awardee_or_recipient_legal TEXT,
    ultimate_parent_unique_ide TEXT,
    ultimate_parent_legal_enti TEXT,
    legal_entity_country_code TEXT,
    legal_entity_state_code TEXT,
    legal_entity_county_name TEXT,
    legal_entity_city_name TEXT,
    legal_entity_congressional TEXT,
    legal_entity_zip4 TEXT,
    place_of_perf_country_desc TEXT,
    place_of_perfor_state_desc TEXT,
    place_of_perform_county_na TEXT,
    place_of_performance_congr TEXT,
    place_of_performance_zip4a TEXT,
    FOREIGN KEY (award_id) REFERENCES awards(award_id)
);

-- Latest-transaction assistance detail, at most one row per award
CREATE TABLE IF NOT EXISTS assistance_data (
    award_id INTEGER PRIMARY KEY,
    assistance_type TEXT,
    assistance_type_desc TEXT,
    awarding_agency_code TEXT,
    awarding_agency_name TEXT,
    awarding_sub_tier_agency_c TEXT,
    awarding_sub_tier_agency_n TEXT,
    awarding_office_code TEXT,
    awarding_office_name TEXT,
    funding_agency_code TEXT,
    funding_agency_name TEXT,
    funding_sub_tier_agency_co TEXT,
    funding_sub_tier_agency_na TEXT,
    funding_office_code TEXT,
    funding_office_name TEXT,
    awardee_or_recipient_uniqu TEXT,
    awardee_or_recipient_legal TEXT,
    ultimate_parent_unique_ide TEXT,
    ultimate_parent_legal_enti TEXT,
    legal_entity_country_code TEXT,
    legal_entity_state_code TEXT,
    legal_entity_county_name TEXT,
    legal_entity_city_name TEXT,
    legal_entity_congressional TEXT,
    legal_entity_zip5 TEXT,
    legal_entity_zip_last4 TEXT,
    place_of_perform_country_n TEXT,
    place_of_perform_state_nam TEXT,
    place_of_perform_county_na TEXT,
    place_of_performance_congr TEXT,
    place_of_performance_zip4a TEXT,
    FOREIGN KEY (award_id) REFERENCES awards(award_id)
);

CREATE INDEX IF NOT EXISTS idx_account_balances_submission ON account_balances(submission_id);
CREATE INDEX IF NOT EXISTS idx_ocpa_submission ON object_class_program_activity(submission_id);
CREATE INDEX IF NOT EXISTS idx_award_financial_submission ON award_financial(submission_id);
CREATE INDEX IF NOT EXISTS idx_treasury_accounts_federal ON treasury_accounts(federal_account_id);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
