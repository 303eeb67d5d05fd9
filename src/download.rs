//! Account Download query construction.
//!
//! Account Balances (File A): rows matching the FYQ/FYP filters, grouped by
//! treasury or federal account. Breakdown by Program Activity & Object Class
//! (File B): same, grouped additionally by program activity, object class,
//! direct/reimbursable and DEF code. Breakdown by Award (File C): rows
//! matching the filter period and any prior period of the same fiscal year
//! with a nonzero monitored amount; treasury level keeps the raw row grain,
//! federal level groups by federal account.

use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value;

use crate::columns::layout;
use crate::derivations::{is_aggregate, nonzero_filter, render, RenderCtx};
use crate::error::Result;
use crate::filters::{account_filters, resolve_closed_period, submission_filter};
use crate::types::{AccountDownloadFilters, AccountLevel, AccountType};

pub const DEFAULT_AWARD_URL: &str = "https://www.usaspending.gov/award/";

/// One result row: output columns in layout order.
pub type Record = Vec<(String, Value)>;

/// Look up a column in a record.
pub fn record_get<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    record.iter().find(|(name, _)| name == key).map(|(_, value)| value)
}

/// Build and run an account download query.
///
/// Invalid agency or federal-account ids fail with an invalid-parameter
/// error; a fiscal period that matches no submissions deterministically
/// yields zero rows, never an unfiltered query.
pub fn account_download_filter(
    conn: &Connection,
    account_type: AccountType,
    account_level: AccountLevel,
    filters: &AccountDownloadFilters,
) -> Result<Vec<Record>> {
    account_download_filter_with_url(conn, account_type, account_level, filters, DEFAULT_AWARD_URL)
}

pub fn account_download_filter_with_url(
    conn: &Connection,
    account_type: AccountType,
    account_level: AccountLevel,
    filters: &AccountDownloadFilters,
    award_url: &str,
) -> Result<Vec<Record>> {
    let closed = resolve_closed_period(conn, filters)?;
    let resolved_ids: &[i64] = closed
        .as_ref()
        .map(|(_, resolved)| resolved.submission_ids.as_slice())
        .unwrap_or_default();

    let ctx = RenderCtx {
        account_type,
        account_level,
        closed_period: closed.as_ref(),
        award_url,
    };

    let (mut where_clauses, params) = account_filters(conn, account_type, filters)?;
    where_clauses.insert(0, submission_filter(account_type, filters, resolved_ids));
    if account_type == AccountType::AwardFinancial {
        where_clauses.insert(1, nonzero_filter(&ctx));
    }

    let cols = layout(account_type, account_level);
    let select_list: Vec<String> = cols
        .iter()
        .map(|c| format!("{} AS \"{}\"", render(&ctx, c), c.name))
        .collect();

    let mut sql = format!(
        "SELECT {} FROM {} r \
         JOIN submissions s ON s.submission_id = r.submission_id \
         JOIN treasury_accounts ta ON ta.treasury_account_id = r.treasury_account_id \
         JOIN federal_accounts fa ON fa.id = ta.federal_account_id",
        select_list.join(", "),
        account_type.table(),
    );
    if account_type == AccountType::AwardFinancial {
        sql.push_str(
            " LEFT JOIN awards awd ON awd.award_id = r.award_id \
             LEFT JOIN contract_data cd ON cd.award_id = r.award_id \
             LEFT JOIN assistance_data ad ON ad.award_id = r.award_id",
        );
    }

    sql.push_str(" WHERE ");
    sql.push_str(
        &where_clauses
            .iter()
            .map(|c| format!("({c})"))
            .collect::<Vec<_>>()
            .join(" AND "),
    );

    let has_aggregate = cols.iter().any(|c| is_aggregate(&ctx, c));
    if has_aggregate {
        let group_cols: Vec<String> = cols
            .iter()
            .filter(|c| !is_aggregate(&ctx, c))
            .map(|c| format!("\"{}\"", c.name))
            .collect();
        if !group_cols.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_cols.join(", "));
        }
    }

    debug!("account download SQL ({account_type}/{account_level}): {sql}");

    let mut stmt = conn.prepare(&sql)?;
    let param_values: Vec<&dyn rusqlite::types::ToSql> =
        params.iter().map(|p| p as &dyn rusqlite::types::ToSql).collect();
    let rows = stmt.query_map(param_values.as_slice(), |row| {
        let mut record: Record = Vec::with_capacity(cols.len());
        for (i, c) in cols.iter().enumerate() {
            record.push((c.name.to_string(), value_from_sql(row.get_ref(i)?)));
        }
        Ok(record)
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn value_from_sql(value: ValueRef) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}
