use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Caller-asserted identity carried in every request body.
///
/// The mother app authenticates the user and the frontend forwards the
/// resulting identity verbatim in the `auth` object. Nothing here is
/// verified against a session or token: `is_admin` is taken at face value
/// from the request body. That trust boundary is part of the API contract,
/// not an omission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl CallerIdentity {
    /// Extract the identity from a request payload's `auth` object.
    ///
    /// `user_id` must be present and coercible to a non-zero integer
    /// (numbers and numeric strings both accepted); everything else in the
    /// payload is optional. Pure validation, no I/O.
    pub fn from_payload(payload: &Value) -> Result<Self, ApiError> {
        let auth = payload.get("auth").unwrap_or(&Value::Null);

        let user_id = auth
            .get("user_id")
            .and_then(coerce_int)
            .filter(|id| *id != 0)
            .ok_or_else(|| ApiError::unauthorized("Missing auth.user_id"))?;

        Ok(Self {
            user_id,
            first_name: coerce_name(auth.get("first_name")),
            last_name: coerce_name(auth.get("last_name")),
            is_admin: auth.get("is_admin").map(truthy).unwrap_or(false),
        })
    }
}

/// Accept JSON integers and strings holding integers.
pub fn coerce_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

fn coerce_name(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Truthiness in the upstream sense: false for null/false/0/""/[]/{},
/// true for everything else. Note that the string "false" is truthy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
