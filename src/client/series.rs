use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flattened view over one entry of the remote series list.
///
/// A series is a named invoice numbering sequence; the remote side scopes
/// its counters per year in a `Details` sub-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDetail {
    pub series_id: String,
    pub series_name: String,
    pub is_default: bool,
    pub is_active: bool,
    /// Last ordinal number issued for the selected year, 0 when the series
    /// has never been used.
    pub last_used_number: u64,
    pub year: i32,
}

/// Derive a [`SeriesDetail`] from a raw series-list payload.
///
/// Pure computation over an already-fetched list: the entry is matched by
/// `ID` with a loose string comparison, then the year sub-record is picked
/// by preference: exact `current_year` match, else the last-listed record,
/// else a zeroed default. Returns `None` when no series matches.
///
/// The payload may be a bare array or an object wrapping the list under
/// `Content` or `data`.
pub fn derive_series_detail(
    payload: &Value,
    series_id: &str,
    current_year: i32,
) -> Option<SeriesDetail> {
    let list = series_list(payload)?;

    let series = list
        .iter()
        .find(|entry| entry.get("ID").is_some_and(|id| loose_eq(id, series_id)))?;

    let details = series
        .get("Details")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let selected = details
        .iter()
        .find(|d| d.get("Year").is_some_and(|y| year_of(y) == Some(current_year)))
        .or_else(|| details.last());

    Some(SeriesDetail {
        series_id: series.get("ID").map(text_of).unwrap_or_default(),
        series_name: series
            .get("Name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        is_default: series
            .get("IsDefault")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        is_active: series
            .get("IsActive")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        last_used_number: selected
            .and_then(|d| d.get("OrdinalNumber"))
            .and_then(Value::as_u64)
            .unwrap_or(0),
        year: selected
            .and_then(|d| d.get("Year"))
            .and_then(year_of)
            .unwrap_or(current_year),
    })
}

fn series_list(payload: &Value) -> Option<&Vec<Value>> {
    match payload {
        Value::Array(list) => Some(list),
        Value::Object(map) => map
            .get("Content")
            .or_else(|| map.get("data"))
            .and_then(Value::as_array),
        _ => None,
    }
}

fn loose_eq(id: &Value, wanted: &str) -> bool {
    text_of(id) == wanted
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `Year` arrives sometimes as a number, sometimes as a string.
fn year_of(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().map(|y| y as i32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_list() -> Value {
        json!([
            {
                "ID": 7,
                "Name": "EFA",
                "IsDefault": true,
                "IsActive": true,
                "Details": [
                    {"Year": 2025, "OrdinalNumber": 118},
                    {"Year": 2026, "OrdinalNumber": 42}
                ]
            },
            {
                "ID": "9",
                "Name": "EXP",
                "IsDefault": false,
                "IsActive": false,
                "Details": []
            }
        ])
    }

    #[test]
    fn picks_current_year_record() {
        let detail = derive_series_detail(&sample_list(), "7", 2026).unwrap();
        assert_eq!(detail.series_name, "EFA");
        assert_eq!(detail.last_used_number, 42);
        assert_eq!(detail.year, 2026);
        assert!(detail.is_default);
    }

    #[test]
    fn falls_back_to_last_record_when_year_missing() {
        let detail = derive_series_detail(&sample_list(), "7", 2030).unwrap();
        assert_eq!(detail.last_used_number, 42);
        assert_eq!(detail.year, 2026);
    }

    #[test]
    fn zeroed_default_when_no_records() {
        let detail = derive_series_detail(&sample_list(), "9", 2026).unwrap();
        assert_eq!(detail.last_used_number, 0);
        assert_eq!(detail.year, 2026);
        assert!(!detail.is_active);
    }

    #[test]
    fn loose_id_match_number_vs_string() {
        // numeric ID in payload, string requested, and vice versa
        assert!(derive_series_detail(&sample_list(), "7", 2026).is_some());
        assert!(derive_series_detail(&sample_list(), "9", 2026).is_some());
    }

    #[test]
    fn unknown_series_is_none() {
        assert!(derive_series_detail(&sample_list(), "404", 2026).is_none());
    }

    #[test]
    fn content_wrapped_payload() {
        let wrapped = json!({"Content": sample_list()});
        assert!(derive_series_detail(&wrapped, "7", 2026).is_some());
        let wrapped = json!({"data": sample_list()});
        assert!(derive_series_detail(&wrapped, "7", 2026).is_some());
    }

    #[test]
    fn string_year_records() {
        let payload = json!([
            {"ID": 1, "Name": "S", "Details": [{"Year": "2026", "OrdinalNumber": 5}]}
        ]);
        let detail = derive_series_detail(&payload, "1", 2026).unwrap();
        assert_eq!(detail.last_used_number, 5);
    }
}
