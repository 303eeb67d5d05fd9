use std::io::Write;

use fiscus::db;
use fiscus::download::{account_download_filter_with_url, Record};
use fiscus::error::Result;
use fiscus::pagination::{get_pagination, sort_with_null_last, SortOrder};
use fiscus::settings;
use fiscus::types::{AccountDownloadFilters, AccountLevel, AccountType};

pub struct DownloadArgs {
    pub account_type: String,
    pub account_level: String,
    pub fy: Option<i32>,
    pub quarter: Option<u8>,
    pub period: Option<u8>,
    pub agency: Option<i64>,
    pub federal_account: Option<i64>,
    pub budget_function: Option<String>,
    pub budget_subfunction: Option<String>,
    pub def_codes: Vec<String>,
    pub format: String,
    pub output: Option<String>,
    pub limit: Option<usize>,
    pub page: usize,
    pub sort: Option<String>,
    pub order: String,
}

pub fn run(args: DownloadArgs) -> Result<()> {
    let account_type: AccountType = args.account_type.parse()?;
    let account_level: AccountLevel = args.account_level.parse()?;
    let order: SortOrder = args.order.parse()?;

    let filters = AccountDownloadFilters {
        fy: args.fy,
        quarter: args.quarter,
        period: args.period,
        agency: args.agency,
        federal_account: args.federal_account,
        budget_function: args.budget_function,
        budget_subfunction: args.budget_subfunction,
        def_codes: args.def_codes,
    };

    let conn = db::get_connection(&settings::database_path())?;
    let award_url = settings::award_url(&settings::load_settings().host);
    let mut records =
        account_download_filter_with_url(&conn, account_type, account_level, &filters, &award_url)?;

    if let Some(sort_key) = &args.sort {
        records = sort_with_null_last(records, sort_key, order, None);
    }
    if let Some(limit) = args.limit {
        let (window, metadata) = get_pagination(&records, limit, args.page);
        eprintln!(
            "page {} of {} row(s){}",
            metadata.page,
            metadata.count.unwrap_or(0),
            if metadata.has_next { ", more available" } else { "" }
        );
        records = window;
    }

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    match args.format.as_str() {
        "json" => write_json(writer, &records)?,
        _ => write_csv(writer, &records)?,
    }

    if let Some(path) = &args.output {
        eprintln!("Wrote {} row(s) to {path}", records.len());
    }
    Ok(())
}

fn write_csv<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if let Some(first) = records.first() {
        csv_writer.write_record(first.iter().map(|(name, _)| name.as_str()))?;
    }
    for record in records {
        csv_writer.write_record(record.iter().map(|(_, value)| cell(value)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_json<W: Write>(mut writer: W, records: &[Record]) -> Result<()> {
    let objects: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            serde_json::Value::Object(
                record
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            )
        })
        .collect();
    serde_json::to_writer_pretty(&mut writer, &objects)
        .map_err(|e| fiscus::error::FiscusError::Other(e.to_string()))?;
    writeln!(writer)?;
    Ok(())
}
