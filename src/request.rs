//! Inbound request schema and parsing

use crate::Result;
use crate::style::FlowOptions;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Full POST body. Every field is optional; a field that is `null` or of
/// the wrong shape falls back to its own default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequest {
    #[serde(deserialize_with = "lenient")]
    pub branding: Option<Branding>,
    #[serde(deserialize_with = "lenient")]
    pub report: Option<ReportPayload>,
    #[serde(deserialize_with = "lenient_text")]
    pub period: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub options: ReportOptions,
}

impl ReportRequest {
    /// Parse a body, rejecting malformed JSON
    pub fn parse_strict(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Parse a body, treating anything malformed as an empty object
    pub fn parse_lenient(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        serde_json::from_slice(body).unwrap_or_else(|err| {
            warn!("Malformed report request, using defaults: {}", err);
            Self::default()
        })
    }

    /// Branding, or an empty one when absent
    pub fn branding(&self) -> Branding {
        self.branding.clone().unwrap_or_default()
    }
}

/// Company branding. Also the query string of the GET variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    #[serde(deserialize_with = "lenient_text")]
    pub company_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub logo_url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub contact_email: Option<String>,
}

impl Branding {
    /// Create branding for a company
    pub fn company<S: Into<String>>(name: S) -> Self {
        Self {
            company_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Company name when present and not blank
    pub fn company_name(&self) -> Option<&str> {
        non_blank(self.company_name.as_deref())
    }

    /// Logo URL when present and not blank
    pub fn logo_url(&self) -> Option<&str> {
        non_blank(self.logo_url.as_deref())
    }

    /// Contact email when present and not blank
    pub fn contact_email(&self) -> Option<&str> {
        non_blank(self.contact_email.as_deref())
    }
}

/// Report content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportPayload {
    #[serde(deserialize_with = "lenient_text")]
    pub executive_summary: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub reports: Vec<ClientReport>,
}

/// One client's line in the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientReport {
    #[serde(deserialize_with = "lenient_text")]
    pub client: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub totals: Option<Totals>,
    #[serde(deserialize_with = "lenient_list")]
    pub highlights: Vec<String>,
}

/// Hours and amount (minor units) for a client.
///
/// Kept as raw JSON values so non-numeric input can be echoed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Totals {
    pub hours: Option<Value>,
    pub amount: Option<Value>,
}

/// Formatting switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    #[serde(deserialize_with = "switch_or_on")]
    pub include_cover: bool,
    #[serde(deserialize_with = "switch_or_on")]
    pub repeat_header: bool,
    #[serde(deserialize_with = "switch_or_on")]
    pub row_striping: bool,
    #[serde(deserialize_with = "lenient_text")]
    pub locale: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub currency: Option<String>,
}

impl ReportOptions {
    /// Table switches for the page flow engine
    pub fn flow_options(&self) -> FlowOptions {
        FlowOptions::new()
            .with_repeat_header(self.repeat_header)
            .with_row_striping(self.row_striping)
    }

    /// Locale when present and not blank
    pub fn locale(&self) -> Option<&str> {
        non_blank(self.locale.as_deref())
    }

    /// Currency code when present and not blank
    pub fn currency(&self) -> Option<&str> {
        non_blank(self.currency.as_deref())
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_cover: true,
            repeat_header: true,
            row_striping: true,
            locale: None,
            currency: None,
        }
    }
}

/// Field of any type: `null` or a value of the wrong shape becomes the default
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        warn!("Ignoring malformed request field: {}", err);
        T::default()
    }))
}

/// List field: entries of the wrong shape are dropped, a non-list is empty
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("Expected a list, ignoring {}", other);
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!("Dropping malformed list entry: {}", err);
                None
            }
        })
        .collect())
}

/// Free-text field: numbers and booleans keep their JSON spelling
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => None,
        other => {
            warn!("Expected text, ignoring {}", other);
            None
        }
    })
}

/// Switch that is on unless explicitly `false`
fn switch_or_on<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Null => true,
        other => {
            warn!("Expected true or false, ignoring {}", other);
            true
        }
    })
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
