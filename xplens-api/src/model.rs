use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Profile snapshot returned by the query service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub audit_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64_or_zero")]
    pub total_up: i64,
    #[serde(default, deserialize_with = "lenient_i64_or_zero")]
    pub total_down: i64,
}

/// One XP transaction. Order is meaningful and preserved.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(deserialize_with = "lenient_i64")]
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Category tag of a result record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ResultKind {
    Tester,
    UserAudit,
    Quest,
    Other(String),
}

impl From<String> for ResultKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "tester" => Self::Tester,
            "user_audit" => Self::UserAudit,
            "quest" => Self::Quest,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ResultKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<ResultKind> for String {
    fn from(value: ResultKind) -> Self {
        match value {
            ResultKind::Tester => "tester".to_owned(),
            ResultKind::UserAudit => "user_audit".to_owned(),
            ResultKind::Quest => "quest".to_owned(),
            ResultKind::Other(tag) => tag,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub grade: f64,
    pub object_id: i64,
    #[serde(rename = "type")]
    pub kind: ResultKind,
}

impl ResultRecord {
    pub fn new(grade: f64, object_id: i64, kind: impl Into<ResultKind>) -> Self {
        Self {
            grade,
            object_id,
            kind: kind.into(),
        }
    }
}

/// Fetched alongside results but not aggregated anywhere yet.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub grade: Option<f64>,
    pub object_id: i64,
}

/// Decoded `data` object of the user query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawQueryResult {
    pub user: Option<UserProfile>,
    pub transactions: Vec<TransactionRecord>,
    pub results: Vec<ResultRecord>,
    pub progress: Vec<ProgressRecord>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// The service encodes numeric aggregates either as integers or as floats
// with a zero fraction.
fn number_to_i64<E: serde::de::Error>(number: &serde_json::Number) -> Result<i64, E> {
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }

    match number.as_f64() {
        Some(value) if value.is_finite() => Ok(value.round() as i64),
        _ => Err(E::custom(format!("number `{number}` is out of range"))),
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number_to_i64(&number)
}

fn lenient_i64_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Number>::deserialize(deserializer)? {
        Some(number) => number_to_i64(&number),
        None => Ok(0),
    }
}
