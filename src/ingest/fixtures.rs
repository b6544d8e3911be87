//! Canned `getUltraSrtNcst` bodies for unit tests.
//!
//! Shapes are taken from real gateway responses; values are trimmed to what
//! the parsers look at.

/// A normal response with all eight categories for Seoul (60, 127).
pub const NORMAL_RESPONSE: &str = r#"{
  "response": {
    "header": {"resultCode": "00", "resultMsg": "NORMAL_SERVICE"},
    "body": {
      "dataType": "JSON",
      "items": {"item": [
        {"baseDate": "20240501", "baseTime": "1300", "category": "PTY", "nx": 60, "ny": 127, "obsrValue": "0"},
        {"baseDate": "20240501", "baseTime": "1300", "category": "REH", "nx": 60, "ny": 127, "obsrValue": "45"},
        {"baseDate": "20240501", "baseTime": "1300", "category": "RN1", "nx": 60, "ny": 127, "obsrValue": "0"},
        {"baseDate": "20240501", "baseTime": "1300", "category": "T1H", "nx": 60, "ny": 127, "obsrValue": "21.3"},
        {"baseDate": "20240501", "baseTime": "1300", "category": "UUU", "nx": 60, "ny": 127, "obsrValue": "-1.2"},
        {"baseDate": "20240501", "baseTime": "1300", "category": "VEC", "nx": 60, "ny": 127, "obsrValue": "297"},
        {"baseDate": "20240501", "baseTime": "1300", "category": "VVV", "nx": 60, "ny": 127, "obsrValue": "0.6"},
        {"baseDate": "20240501", "baseTime": "1300", "category": "WSD", "nx": 60, "ny": 127, "obsrValue": "1.4"}
      ]},
      "pageNo": 1,
      "numOfRows": 1000,
      "totalCount": 8
    }
  }
}"#;

/// `item` as a bare object instead of a list.
pub const SINGLE_ITEM_RESPONSE: &str = r#"{
  "response": {
    "header": {"resultCode": "00", "resultMsg": "NORMAL_SERVICE"},
    "body": {"items": {"item": {"category": "PTY", "obsrValue": "1"}}}
  }
}"#;

/// Before the hour is published: header only, no body.
pub const NO_DATA_RESPONSE: &str = r#"{
  "response": {
    "header": {"resultCode": "03", "resultMsg": "NO_DATA"}
  }
}"#;

/// Success code but `items` is an empty string.
pub const EMPTY_ITEMS_STRING_RESPONSE: &str = r#"{
  "response": {
    "header": {"resultCode": "00", "resultMsg": "NORMAL_SERVICE"},
    "body": {"items": "", "totalCount": 0}
  }
}"#;

/// Bare numeric and null values mixed with junk entries.
pub const NUMERIC_VALUES_RESPONSE: &str = r#"{
  "response": {
    "header": {"resultCode": "00", "resultMsg": "NORMAL_SERVICE"},
    "body": {"items": {"item": [
      {"category": "REH", "obsrValue": 55},
      "garbage",
      {"category": "T1H", "obsrValue": null},
      7
    ]}}
  }
}"#;
