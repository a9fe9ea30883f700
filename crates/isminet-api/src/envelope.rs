// The `{meta, data}` wrapper around every controller payload.
//
// `data` arrives either as an array of records or as a single object;
// both shapes collapse into `Envelope<T>::data`. Callers pick the record
// type, so no reflection on the envelope itself is needed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::validation::{FieldViolation, ResponseModel, build};

/// Response metadata. `rc` is `"ok"` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            rc: "ok".into(),
            msg: None,
            extra: Map::new(),
        }
    }
}

impl Meta {
    pub fn is_ok(&self) -> bool {
        self.rc == "ok"
    }
}

/// A parsed, validated envelope of `T` records.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    /// The first record, if any.
    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<M: ResponseModel> Envelope<M> {
    /// Parse and validate a full response body.
    ///
    /// A non-`ok` `rc` becomes [`Error::Controller`]. A missing `data` key,
    /// or one that is neither object nor array, fails validation. Every
    /// record is validated and all violations are reported together.
    pub fn parse(body: Value) -> Result<Self, Error> {
        let Value::Object(mut map) = body else {
            return Err(invalid::<M>(
                "$",
                "envelope",
                format!("response body must be a JSON object, got {}", kind(&body)),
            ));
        };
        let meta = take_meta(&mut map)?;

        let (items, single) = match map.remove("data") {
            Some(Value::Array(items)) => (items, false),
            Some(obj @ Value::Object(_)) => (vec![obj], true),
            Some(other) => {
                return Err(invalid::<M>(
                    "data",
                    "type",
                    format!("`data` must be an object or array, got {}", kind(&other)),
                ));
            }
            None => {
                return Err(invalid::<M>(
                    "data",
                    "required",
                    "envelope has no `data` field",
                ));
            }
        };

        let mut data = Vec::with_capacity(items.len());
        let mut violations = Vec::new();
        for (idx, item) in items.into_iter().enumerate() {
            let prefix = if single {
                "data".to_owned()
            } else {
                format!("data[{idx}]")
            };
            match build::<M>(item, &prefix) {
                Ok(record) => data.push(record),
                Err(found) => violations.extend(found),
            }
        }
        if !violations.is_empty() {
            return Err(Error::ResponseValidation {
                model: M::NAME,
                violations,
            });
        }

        Ok(Self { meta, data })
    }

    /// Exactly one record is expected; an empty `data` array is a
    /// validation failure.
    pub fn into_single(self) -> Result<M, Error> {
        self.data.into_iter().next().ok_or_else(|| {
            invalid::<M>("data", "length", "expected one record, got an empty array")
        })
    }
}

/// Check `meta.rc` on any body, typed or raw.
///
/// A body without `meta` is accepted; some endpoints omit it.
pub(crate) fn check_meta(body: &Value) -> Result<Meta, Error> {
    match body.get("meta") {
        Some(meta) => meta_from(meta.clone()),
        None => Ok(Meta::default()),
    }
}

fn take_meta(map: &mut Map<String, Value>) -> Result<Meta, Error> {
    match map.remove("meta") {
        Some(meta) => meta_from(meta),
        None => Ok(Meta::default()),
    }
}

fn meta_from(value: Value) -> Result<Meta, Error> {
    let meta: Meta = serde_json::from_value(value).map_err(|e| Error::ResponseValidation {
        model: "Meta",
        violations: vec![FieldViolation::new("meta", "type", e.to_string())],
    })?;
    if meta.is_ok() {
        Ok(meta)
    } else {
        Err(Error::Controller {
            message: meta.msg.clone().unwrap_or_else(|| "request failed".into()),
            rc: meta.rc,
        })
    }
}

fn invalid<M: ResponseModel>(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::ResponseValidation {
        model: M::NAME,
        violations: vec![FieldViolation::new(field, code, message)],
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
