use rusqlite::Connection;

use crate::error::Result;

/// Find the submission ids in scope for a fiscal-year/quarter/period filter.
///
/// Quarterly reporters match on fiscal quarter, monthly reporters on fiscal
/// period. When only one of quarter/period is supplied the counterpart is
/// derived (a quarter maps to its closing month, a period to the quarter it
/// falls in) so both reporter kinds resolve to their single most-recent
/// in-scope submission. No match resolves to an empty set; callers must turn
/// that into an always-false predicate, never an unconstrained one.
pub fn submission_ids_for_periods(
    conn: &Connection,
    fiscal_year: i32,
    quarter: Option<u8>,
    period: Option<u8>,
) -> Result<Vec<i64>> {
    let quarter = effective_quarter(quarter, period);
    let period = effective_period(quarter, period);

    let mut stmt = conn.prepare(
        "SELECT submission_id FROM submissions \
         WHERE reporting_fiscal_year = ?1 \
           AND ((quarter_format_flag = 1 AND reporting_fiscal_quarter = ?2) \
             OR (quarter_format_flag = 0 AND reporting_fiscal_period = ?3)) \
         ORDER BY submission_id",
    )?;
    let ids = stmt
        .query_map(
            rusqlite::params![fiscal_year, quarter.map(i64::from).unwrap_or(-1), period.map(i64::from).unwrap_or(-1)],
            |row| row.get(0),
        )?
        .collect::<std::result::Result<Vec<i64>, _>>()?;
    Ok(ids)
}

pub fn effective_quarter(quarter: Option<u8>, period: Option<u8>) -> Option<u8> {
    quarter.or(period.map(|p| p.div_ceil(3)))
}

pub fn effective_period(quarter: Option<u8>, period: Option<u8>) -> Option<u8> {
    period.or(quarter.map(|q| q * 3))
}

/// A requested reporting period and whether it is the closed (final) period
/// of its fiscal year. Decouples "what does closed mean" from the query
/// construction that consumes it.
#[derive(Debug, Clone)]
pub struct ClosedPeriod {
    pub fiscal_year: i32,
    pub quarter: Option<u8>,
    pub period: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct ResolvedPeriod {
    pub submission_ids: Vec<i64>,
    pub is_final: bool,
}

impl ClosedPeriod {
    pub fn new(fiscal_year: i32, quarter: Option<u8>, period: Option<u8>) -> Self {
        Self { fiscal_year, quarter, period }
    }

    /// Resolve the matching submission ids and whether every one of them is
    /// the final submission of its fiscal year.
    pub fn resolve(&self, conn: &Connection) -> Result<ResolvedPeriod> {
        let submission_ids = submission_ids_for_periods(conn, self.fiscal_year, self.quarter, self.period)?;
        let is_final = if submission_ids.is_empty() {
            false
        } else {
            let placeholders = vec!["?"; submission_ids.len()].join(", ");
            let sql = format!(
                "SELECT count(*) FROM submissions WHERE submission_id IN ({placeholders}) AND final_of_fy = 0"
            );
            let params: Vec<&dyn rusqlite::types::ToSql> =
                submission_ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();
            let non_final: i64 = conn.query_row(&sql, params.as_slice(), |row| row.get(0))?;
            non_final == 0
        };
        Ok(ResolvedPeriod { submission_ids, is_final })
    }

    /// Predicate matching the requested period across submissions, used when
    /// the period is final and values may be compared period-wide.
    pub fn period_predicate(&self, alias: &str) -> String {
        let mut branches = Vec::new();
        if let Some(q) = effective_quarter(self.quarter, self.period) {
            branches.push(format!(
                "({alias}.quarter_format_flag = 1 AND {alias}.reporting_fiscal_quarter = {q})"
            ));
        }
        if let Some(p) = effective_period(self.quarter, self.period) {
            branches.push(format!(
                "({alias}.quarter_format_flag = 0 AND {alias}.reporting_fiscal_period = {p})"
            ));
        }
        if branches.is_empty() {
            return "1 = 0".to_string();
        }
        format!(
            "({alias}.reporting_fiscal_year = {} AND ({}))",
            self.fiscal_year,
            branches.join(" OR ")
        )
    }
}

/// Render an id-membership predicate. An empty id set yields `1 = 0` so an
/// unresolvable period can never widen into an unfiltered query.
pub fn submission_id_predicate(alias: &str, ids: &[i64]) -> String {
    if ids.is_empty() {
        return "1 = 0".to_string();
    }
    let id_list = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ");
    format!("{alias}.submission_id IN ({id_list})")
}
