use rusqlite::{params, Connection};

use fiscus::db;
use fiscus::error::Result;
use fiscus::settings;

/// Seed a small sample warehouse: two agencies, three treasury accounts
/// under two federal accounts, quarterly and monthly reporters across
/// FY2020, and a handful of awards.
pub fn run() -> Result<()> {
    let db_path = settings::database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::get_connection(&db_path)?;
    db::init_db(&conn)?;

    let existing: i64 = conn.query_row("SELECT count(*) FROM submissions", [], |row| row.get(0))?;
    if existing > 0 {
        println!("Warehouse already contains data; demo load skipped");
        return Ok(());
    }

    seed(&conn)?;
    println!("Loaded sample warehouse at {}", db_path.display());
    println!("Try: fiscus download --account-type account_balances --account-level federal_account --fy 2020 --quarter 2");
    Ok(())
}

fn seed(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "INSERT INTO toptier_agencies (toptier_agency_id, toptier_code, name) VALUES
            (97, '097', 'Department of Defense'),
            (75, '075', 'Department of Health and Human Services');
        INSERT INTO federal_accounts (id, federal_account_symbol, account_title) VALUES
            (1, '097-0100', 'Operation and Maintenance, Army'),
            (2, '075-0512', 'Health Resources and Services');
        INSERT INTO treasury_accounts (treasury_account_id, tas_rendering_label, account_title,
            federal_account_id, funding_toptier_agency_id, budget_function_code, budget_function_title,
            budget_subfunction_code, budget_subfunction_title) VALUES
            (11, '097-X-0100-001', 'O&M Army No-Year', 1, 97, '050', 'National Defense', '051', 'Department of Defense-Military'),
            (12, '097-2020/2021-0100-002', 'O&M Army Multi-Year', 1, 97, '050', 'National Defense', '051', 'Department of Defense-Military'),
            (21, '075-X-0512-001', 'HRSA No-Year', 2, 75, '550', 'Health', '551', 'Health Care Services');
        -- Quarterly reporter (DOD): Q2 and final Q4 of FY2020
        INSERT INTO submissions (submission_id, reporting_fiscal_year, reporting_fiscal_quarter,
            reporting_fiscal_period, quarter_format_flag, final_of_fy, published_date, reporting_agency_name) VALUES
            (101, 2020, 2, 6, 1, 0, '2020-05-15', 'Department of Defense'),
            (102, 2020, 4, 12, 1, 1, '2020-11-16', 'Department of Defense'),
            -- Monthly reporter (HHS): periods 4-6 and final period 12
            (201, 2020, 2, 4, 0, 0, '2020-03-30', 'Department of Health and Human Services'),
            (202, 2020, 2, 5, 0, 0, '2020-04-29', 'Department of Health and Human Services'),
            (203, 2020, 2, 6, 0, 0, '2020-05-29', 'Department of Health and Human Services'),
            (204, 2020, 4, 12, 0, 1, '2020-11-17', 'Department of Health and Human Services');
        INSERT INTO awards (award_id, generated_unique_award_id, date_signed, certified_date) VALUES
            (1, 'CONT_AWD_W9124P20C0001_9700', '2019-11-04', '2020-04-20'),
            (2, 'ASST_NON_H80CS00000_7505', '2020-02-10', '2020-05-01');
        INSERT INTO contract_data (award_id, contract_award_type, contract_award_type_desc,
            awarding_agency_code, awarding_agency_name, awarding_office_code, awarding_office_name,
            awardee_or_recipient_legal, legal_entity_country_code, legal_entity_state_code,
            legal_entity_zip4, place_of_perf_country_desc, place_of_perfor_state_desc) VALUES
            (1, 'C', 'DELIVERY ORDER', '097', 'Department of Defense', 'W9124P', 'MICC Fort Sam',
             'ACME LOGISTICS LLC', 'USA', 'TX', '782341234', 'UNITED STATES', 'TEXAS');
        INSERT INTO assistance_data (award_id, assistance_type, assistance_type_desc,
            awarding_agency_code, awarding_agency_name, awardee_or_recipient_legal,
            legal_entity_country_code, legal_entity_state_code, legal_entity_zip5, legal_entity_zip_last4,
            place_of_perform_country_n, place_of_perform_state_nam) VALUES
            (2, '02', 'BLOCK GRANT', '075', 'Department of Health and Human Services',
             'COMMUNITY HEALTH NETWORK', 'USA', 'GA', '30301', '2206', 'UNITED STATES', 'GEORGIA');",
    )?;

    // File A balances for each account and submission in scope
    let balances: &[(i64, i64, f64, f64)] = &[
        (101, 11, 1_500_000.0, 400_000.0),
        (101, 12, 750_000.0, 125_000.0),
        (102, 11, 1_500_000.0, 980_000.0),
        (102, 12, 750_000.0, 600_000.0),
        (203, 21, 2_250_000.0, 300_000.0),
        (204, 21, 2_250_000.0, 1_900_000.0),
    ];
    for (submission_id, tas_id, appropriated, outlay) in balances {
        conn.execute(
            "INSERT INTO account_balances (submission_id, treasury_account_id,
                budget_authority_unobligated_balance_brought_forward_fyb,
                adjustments_to_unobligated_balance_brought_forward_cpe,
                budget_authority_appropriated_amount_cpe, borrowing_authority_amount_total_cpe,
                contract_authority_amount_total_cpe, spending_authority_from_offsetting_collections_amount_cpe,
                other_budgetary_resources_amount_cpe, total_budgetary_resources_amount_cpe,
                obligations_incurred_total_by_tas_cpe, deobligations_recoveries_refunds_by_tas_cpe,
                unobligated_balance_cpe, status_of_budgetary_resources_total_cpe, gross_outlay_amount_by_tas_cpe)
             VALUES (?1, ?2, 0.0, 0.0, ?3, 0.0, 0.0, 0.0, 0.0, ?3, ?4, 0.0, 0.0, ?3, ?4)",
            params![submission_id, tas_id, appropriated, outlay],
        )?;
    }

    // File B rows with DEF codes on the COVID-tagged spending
    let program_rows: &[(i64, i64, &str, &str, Option<&str>, f64)] = &[
        (101, 11, "0101", "25.2", None, 350_000.0),
        (101, 11, "0102", "26.0", Some("L"), 90_000.0),
        (203, 21, "0805", "41.0", Some("M"), 240_000.0),
    ];
    for (submission_id, tas_id, activity, object_class, def_code, obligations) in program_rows {
        conn.execute(
            "INSERT INTO object_class_program_activity (submission_id, treasury_account_id,
                program_activity_code, program_activity_name, object_class_code, object_class_name,
                direct_reimbursable, disaster_emergency_fund_code,
                obligations_incurred_by_program_object_class_cpe,
                deobligations_recoveries_refund_pri_program_object_class_cpe,
                gross_outlay_amount_by_program_object_class_cpe,
                ussgl487200_down_adj_pri_ppaid_undel_orders_oblig_refund_cpe,
                ussgl497200_down_adj_pri_paid_deliv_orders_oblig_refund_cpe)
             VALUES (?1, ?2, ?3, 'Program activity', ?4, 'Object class', 'D', ?5, ?6, 0.0, ?6, 0.0, 0.0)",
            params![submission_id, tas_id, activity, object_class, def_code, obligations],
        )?;
    }

    // File C rows: incremental obligations across periods plus outlays
    let award_rows: &[(i64, i64, i64, &str, f64, f64)] = &[
        (101, 11, 1, "W9124P20C0001", 180_000.0, 90_000.0),
        (102, 11, 1, "W9124P20C0001", 60_000.0, 310_000.0),
        (201, 21, 2, "", 50_000.0, 0.0),
        (202, 21, 2, "", 75_000.0, 0.0),
        (203, 21, 2, "", 40_000.0, 120_000.0),
    ];
    for (submission_id, tas_id, award_id, piid, toa, outlay) in award_rows {
        conn.execute(
            "INSERT INTO award_financial (submission_id, treasury_account_id, award_id, piid, fain,
                disaster_emergency_fund_code, transaction_obligated_amount, gross_outlay_amount_by_award_cpe,
                ussgl487200_down_adj_pri_ppaid_undel_orders_oblig_refund_cpe,
                ussgl497200_down_adj_pri_paid_deliv_orders_oblig_refund_cpe)
             VALUES (?1, ?2, ?3, nullif(?4, ''), CASE WHEN ?4 = '' THEN 'H80CS00000' END, NULL, ?5, ?6, 0.0, 0.0)",
            params![submission_id, tas_id, award_id, piid, toa, outlay],
        )?;
    }

    Ok(())
}
