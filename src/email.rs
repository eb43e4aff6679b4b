//! Records returned by the query endpoint.
//!
//! The browser does not own the record schema. An [`EmailRecord`] keeps the
//! raw JSON object and only offers read accessors for the handful of fields
//! the table and the detail pane show.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FetchError;

/// One delivery log record as sent by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct EmailRecord(Map<String, Value>);

impl EmailRecord {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Top-level field rendered as text. Strings are returned as-is, other
    /// scalars in their JSON form, missing or null fields as `None`.
    pub fn field(&self, key: &str) -> Option<String> {
        value_text(self.0.get(key)?)
    }

    /// Field one level down, e.g. `("status", "code")`.
    pub fn nested(&self, outer: &str, inner: &str) -> Option<String> {
        value_text(self.0.get(outer)?.as_object()?.get(inner)?)
    }

    pub fn id(&self) -> Option<String> {
        self.field("id").or_else(|| self.field("queue_id"))
    }

    pub fn timestamp(&self) -> Option<String> {
        self.field("timestamp")
    }

    pub fn mail_from(&self) -> Option<String> {
        self.field("mail_from")
    }

    pub fn mail_to(&self) -> Option<String> {
        self.field("mail_to")
    }

    pub fn message_id(&self) -> Option<String> {
        self.field("message_id")
    }

    /// Delivery status code (`sent`, `bounced`, ...).
    pub fn status_code(&self) -> Option<String> {
        self.nested("status", "code")
    }

    pub fn status_message(&self) -> Option<String> {
        self.nested("status", "message")
    }

    pub fn first_attempt(&self) -> Option<String> {
        self.field("first_attempt")
    }

    pub fn last_attempt(&self) -> Option<String> {
        self.field("last_attempt")
    }

    /// All top-level fields in key order, for the detail pane.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Decoded result of one page of one filter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub records: Vec<EmailRecord>,
    pub page_count: u32,
}

/// Page envelope as serialized by the endpoint. Fields other than `result`
/// and `total_pages` are only used to describe server-side errors.
#[derive(Debug, Deserialize)]
pub(crate) struct PageResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    result: Option<Vec<EmailRecord>>,
    #[serde(default)]
    total_pages: Option<i64>,
}

impl PageResponse {
    /// Parses a 2xx body into a [`FetchResult`].
    pub(crate) fn decode(body: &[u8]) -> Result<FetchResult, FetchError> {
        let page: PageResponse = serde_json::from_slice(body).map_err(FetchError::Decode)?;
        page.into_result()
    }

    /// Best effort description of an error body, if it is one.
    pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
        let page: PageResponse = serde_json::from_slice(body).ok()?;
        page.describe()
    }

    fn describe(&self) -> Option<String> {
        match (&self.message, &self.error_code) {
            (Some(Value::String(m)), _) if !m.is_empty() => Some(m.clone()),
            (Some(Value::Array(items)), _) if !items.is_empty() => Some(
                items
                    .iter()
                    .filter_map(value_text)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            (_, Some(code)) => Some(code.clone()),
            _ => None,
        }
    }

    fn into_result(self) -> Result<FetchResult, FetchError> {
        if self.error {
            return Err(FetchError::Server {
                code: self
                    .error_code
                    .clone()
                    .unwrap_or_else(|| "UNKNOWN_ERROR".to_string()),
                message: self.describe().unwrap_or_default(),
            });
        }
        let records = self.result.ok_or_else(|| {
            FetchError::Decode(<serde_json::Error as serde::de::Error>::missing_field("result"))
        })?;
        let total_pages = self.total_pages.ok_or_else(|| {
            FetchError::Decode(<serde_json::Error as serde::de::Error>::missing_field(
                "total_pages",
            ))
        })?;
        Ok(FetchResult {
            records,
            page_count: total_pages.clamp(1, i64::from(u32::MAX)) as u32,
        })
    }
}
