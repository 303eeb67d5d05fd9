use fiscus::db;
use fiscus::error::Result;
use fiscus::settings;

pub fn run(fy: i32) -> Result<()> {
    let conn = db::get_connection(&settings::database_path())?;
    let mut stmt = conn.prepare(
        "SELECT submission_id, reporting_fiscal_quarter, reporting_fiscal_period, \
         quarter_format_flag, final_of_fy, reporting_agency_name \
         FROM submissions WHERE reporting_fiscal_year = ?1 \
         ORDER BY reporting_fiscal_period, submission_id",
    )?;
    let rows = stmt.query_map([fy], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, bool>(3)?,
            row.get::<_, bool>(4)?,
            row.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut count = 0;
    for row in rows {
        let (id, quarter, period, quarterly, final_of_fy, agency) = row?;
        let notation = if quarterly {
            format!("FY{fy}Q{quarter}")
        } else {
            format!("FY{fy}P{period:02}")
        };
        let marker = if final_of_fy { " (final)" } else { "" };
        println!(
            "{id:>6}  {notation}{marker}  {}",
            agency.unwrap_or_default()
        );
        count += 1;
    }
    if count == 0 {
        println!("No submissions recorded for FY{fy}");
    }
    Ok(())
}
