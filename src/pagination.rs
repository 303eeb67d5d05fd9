//! Generic post-query windowing and null-aware sorting, shared by list
//! endpoints that materialize their results before paging.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::download::{record_get, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub next: Option<usize>,
    pub previous: Option<usize>,
    #[serde(rename = "hasNext")]
    pub has_next: bool,
    #[serde(rename = "hasPrevious")]
    pub has_previous: bool,
}

impl PageMetadata {
    fn empty(page: usize) -> Self {
        PageMetadata {
            page,
            count: None,
            total: None,
            limit: None,
            next: None,
            previous: None,
            has_next: false,
            has_previous: false,
        }
    }
}

/// Window an already-materialized result list. `limit < 1` or `page < 1`
/// yields an empty window with all-false metadata, not an error.
pub fn get_pagination<T: Clone>(results: &[T], limit: usize, page: usize) -> (Vec<T>, PageMetadata) {
    let mut metadata = PageMetadata {
        count: Some(results.len()),
        ..PageMetadata::empty(page)
    };
    if limit < 1 || page < 1 {
        return (Vec::new(), metadata);
    }

    metadata.has_next = limit * page < results.len();
    metadata.has_previous = page > 1 && limit * (page - 2) < results.len();
    metadata.next = metadata.has_next.then_some(page + 1);
    metadata.previous = metadata.has_previous.then_some(page - 1);

    let start = (limit * (page - 1)).min(results.len());
    let end = if metadata.has_next { limit * page } else { results.len() };
    (results[start..end].to_vec(), metadata)
}

/// Metadata-only variant for callers that window in the query itself.
pub fn get_pagination_metadata(total: usize, limit: usize, page: usize) -> PageMetadata {
    let mut metadata = PageMetadata {
        total: Some(total),
        limit: Some(limit),
        ..PageMetadata::empty(page)
    };
    if limit < 1 || page < 1 {
        return metadata;
    }
    metadata.has_next = limit * page < total;
    metadata.has_previous = page > 1 && limit * (page - 2) < total;
    metadata.next = metadata.has_next.then_some(page + 1);
    metadata.previous = metadata.has_previous.then_some(page - 1);
    metadata
}

/// Metadata from a limit-plus-one probe query.
pub fn get_simple_pagination_metadata(results_plus_one: usize, limit: usize, page: usize) -> PageMetadata {
    let has_next = results_plus_one > limit;
    let has_previous = page > 1;
    PageMetadata {
        next: has_next.then_some(page + 1),
        previous: has_previous.then_some(page - 1),
        has_next,
        has_previous,
        ..PageMetadata::empty(page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = crate::error::FiscusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(crate::error::FiscusError::InvalidParameter(
                "sort order must be either \"asc\" or \"desc\"".to_string(),
            )),
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or(f64::NAN)
            .total_cmp(&y.as_f64().unwrap_or(f64::NAN)),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // Mixed types only arise from heterogeneous columns; order by kind
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Sort records so NULL lands last ascending and first descending. The
/// composite key is (null flag oriented by sort order, value, tie breaker),
/// with the whole ordering reversed for descending.
pub fn sort_with_null_last(
    mut rows: Vec<Record>,
    sort_key: &str,
    sort_order: SortOrder,
    tie_breaker: Option<&str>,
) -> Vec<Record> {
    let tie_breaker = tie_breaker.unwrap_or(sort_key);
    rows.sort_by(|a, b| {
        let a_value = record_get(a, sort_key).cloned().unwrap_or(Value::Null);
        let b_value = record_get(b, sort_key).cloned().unwrap_or(Value::Null);
        let a_null = a_value.is_null() == (sort_order == SortOrder::Asc);
        let b_null = b_value.is_null() == (sort_order == SortOrder::Asc);

        let ordering = a_null
            .cmp(&b_null)
            .then_with(|| compare_values(&a_value, &b_value))
            .then_with(|| {
                let a_tie = record_get(a, tie_breaker).cloned().unwrap_or(Value::Null);
                let b_tie = record_get(b, tie_breaker).cloned().unwrap_or(Value::Null);
                compare_values(&a_tie, &b_tie)
            });
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        vec![("v".to_string(), v)]
    }

    fn values(rows: &[Record]) -> Vec<Value> {
        rows.iter().map(|r| record_get(r, "v").unwrap().clone()).collect()
    }

    #[test]
    fn test_pagination_metadata_example() {
        let meta = get_pagination_metadata(25, 10, 2);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.total, Some(25));
        assert_eq!(meta.limit, Some(10));
        assert!(meta.has_next);
        assert!(meta.has_previous);
        assert_eq!(meta.next, Some(3));
        assert_eq!(meta.previous, Some(1));
    }

    #[test]
    fn test_pagination_metadata_last_page() {
        let meta = get_pagination_metadata(25, 10, 3);
        assert!(!meta.has_next);
        assert!(meta.has_previous);
        assert_eq!(meta.next, None);
        assert_eq!(meta.previous, Some(2));
    }

    #[test]
    fn test_pagination_windows_results() {
        let results: Vec<i32> = (1..=25).collect();
        let (window, meta) = get_pagination(&results, 10, 2);
        assert_eq!(window, (11..=20).collect::<Vec<_>>());
        assert_eq!(meta.count, Some(25));
        assert!(meta.has_next && meta.has_previous);

        let (window, meta) = get_pagination(&results, 10, 3);
        assert_eq!(window, (21..=25).collect::<Vec<_>>());
        assert!(!meta.has_next);
    }

    #[test]
    fn test_zero_limit_or_page_is_empty_not_error() {
        let results = vec![1, 2, 3];
        let (window, meta) = get_pagination(&results, 0, 1);
        assert!(window.is_empty());
        assert!(!meta.has_next && !meta.has_previous);
        assert_eq!(meta.next, None);

        let (window, _) = get_pagination(&results, 10, 0);
        assert!(window.is_empty());

        let meta = get_pagination_metadata(3, 0, 1);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_simple_pagination_metadata() {
        let meta = get_simple_pagination_metadata(11, 10, 1);
        assert!(meta.has_next);
        assert!(!meta.has_previous);
        assert_eq!(meta.next, Some(2));

        let meta = get_simple_pagination_metadata(4, 10, 2);
        assert!(!meta.has_next);
        assert_eq!(meta.previous, Some(1));
    }

    #[test]
    fn test_sort_null_last_ascending() {
        let rows = vec![record(json!(5)), record(Value::Null), record(json!(1))];
        let sorted = sort_with_null_last(rows, "v", SortOrder::Asc, None);
        assert_eq!(values(&sorted), vec![json!(1), json!(5), Value::Null]);
    }

    #[test]
    fn test_sort_null_first_is_last_descending() {
        let rows = vec![record(json!(5)), record(Value::Null), record(json!(1))];
        let sorted = sort_with_null_last(rows, "v", SortOrder::Desc, None);
        assert_eq!(values(&sorted), vec![json!(5), json!(1), Value::Null]);
    }

    #[test]
    fn test_sort_tie_breaker() {
        let rows = vec![
            vec![("v".to_string(), json!(1)), ("id".to_string(), json!("b"))],
            vec![("v".to_string(), json!(1)), ("id".to_string(), json!("a"))],
            vec![("v".to_string(), json!(0)), ("id".to_string(), json!("z"))],
        ];
        let sorted = sort_with_null_last(rows, "v", SortOrder::Asc, Some("id"));
        let ids: Vec<&str> = sorted
            .iter()
            .map(|r| record_get(r, "id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["z", "a", "b"]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
