// Schema validation plumbing shared by every response model.
//
// Models declare field rules with `validator` attributes and cross-field
// rules as `schema` functions. This module turns the resulting
// `ValidationErrors` tree into a flat, path-addressed violation list and
// hosts the reusable field checks (MAC, version, IP, subnet).

use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_path_to_error::Segment;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::Error;

// ── Violations ──────────────────────────────────────────────────────

/// One failed rule on one field.
///
/// `field` is a dotted path into the record (`port_table[0].port_idx`);
/// record-level rules report the path of the record itself, or `$` at the
/// top level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// ── Model contract ──────────────────────────────────────────────────

/// A record that can be built from a controller response.
///
/// Construction runs in a fixed order: deserialize, field rules, then
/// record-level rules, then [`normalize`](ResponseModel::normalize).
pub trait ResponseModel: DeserializeOwned + Validate + Sized {
    /// Human-readable model name used in error messages.
    const NAME: &'static str;

    /// Canonicalize values after validation (lower-case MACs, etc.)
    ///
    /// Must be idempotent.
    fn normalize(&mut self) {}

    /// Deserialize and validate one JSON value.
    fn from_value(value: Value) -> Result<Self, Error> {
        build::<Self>(value, "").map_err(|violations| Error::ResponseValidation {
            model: Self::NAME,
            violations,
        })
    }
}

/// Type errors pruned from one record before giving up on it.
const MAX_PRUNED: usize = 32;

/// Component fields that serde flattens into their parent. They have no
/// key of their own on the wire, so violation paths skip them.
const FLATTENED: [&str; 10] = [
    "network",
    "wireless",
    "security",
    "system",
    "usage",
    "stats",
    "membership",
    "tracking",
    "guest",
    "dns",
];

/// One segment of a violation path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(usize),
}

/// A violation whose path is not rendered yet.
#[derive(Debug)]
struct Pending {
    steps: Vec<Step>,
    code: String,
    message: String,
}

/// Build a model, prefixing every violation path with `prefix`.
///
/// A field that fails to deserialize is reported and pruned from the
/// input, then deserialization is retried so the remaining fields still
/// go through their rules. An array element that cannot be repaired by
/// pruning one field is dropped as a whole.
pub(crate) fn build<M: ResponseModel>(
    mut value: Value,
    prefix: &str,
) -> Result<M, Vec<FieldViolation>> {
    let mut pending: Vec<Pending> = Vec::new();
    let mut dropped: Vec<(Vec<Step>, usize)> = Vec::new();
    let mut parsed = None;

    for _ in 0..=MAX_PRUNED {
        let err = match serde_path_to_error::deserialize::<_, M>(&value) {
            Ok(model) => {
                parsed = Some(model);
                break;
            }
            Err(err) => err,
        };
        let (violation, target) = serde_violation(&err);
        let violation = Pending {
            steps: restore(violation.steps, &dropped),
            ..violation
        };
        // Pruning a required field surfaces again as `required`.
        if !pending.iter().any(|p| p.steps == violation.steps) {
            pending.push(violation);
        }
        if !prune(&mut value, &target, &mut dropped) {
            break;
        }
    }

    let Some(mut model) = parsed else {
        return Err(finish(pending, prefix));
    };
    if let Err(errors) = model.validate() {
        let mut found = Vec::new();
        collect(&errors, &[], &mut found);
        pending.extend(found.into_iter().map(|p| Pending {
            steps: restore(p.steps, &dropped),
            ..p
        }));
    }
    if !pending.is_empty() {
        return Err(finish(pending, prefix));
    }
    model.normalize();
    Ok(model)
}

/// Flatten a `validator` error tree into sorted, path-addressed violations.
pub fn flatten(errors: &ValidationErrors, prefix: &str) -> Vec<FieldViolation> {
    let mut pending = Vec::new();
    collect(errors, &[], &mut pending);
    finish(pending, prefix)
}

fn finish(pending: Vec<Pending>, prefix: &str) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = pending
        .into_iter()
        .map(|p| FieldViolation::new(render(prefix, &p.steps), p.code, p.message))
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    out.dedup();
    out
}

fn collect(errors: &ValidationErrors, path: &[Step], out: &mut Vec<Pending>) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        let mut here = path.to_vec();
        let flattened = matches!(kind, ValidationErrorsKind::Struct(_))
            && FLATTENED.contains(&field.as_str());
        if field != "__all__" && !flattened {
            here.push(Step::Key(field));
        }
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| Pending {
                    steps: here.clone(),
                    code: e.code.to_string(),
                    message: describe(e),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &here, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    let mut at = here.clone();
                    at.push(Step::Index(*idx));
                    collect(inner, &at, out);
                }
            }
        }
    }
}

/// Dotted path under `prefix`, or `$` for the top-level record.
fn render(prefix: &str, steps: &[Step]) -> String {
    let mut out = prefix.to_owned();
    for step in steps {
        match step {
            Step::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Step::Index(idx) => {
                let _ = write!(out, "[{idx}]");
            }
        }
    }
    if out.is_empty() { "$".to_owned() } else { out }
}

/// Map a path in the pruned input back to the input as received.
fn restore(mut steps: Vec<Step>, dropped: &[(Vec<Step>, usize)]) -> Vec<Step> {
    for (array, removed) in dropped.iter().rev() {
        if !steps.starts_with(array) {
            continue;
        }
        if let Some(Step::Index(idx)) = steps.get_mut(array.len()) {
            if *idx >= *removed {
                *idx += 1;
            }
        }
    }
    steps
}

/// Remove the node at `target`. Returns false when nothing could be
/// removed, which ends the retry loop.
fn prune(value: &mut Value, target: &[Step], dropped: &mut Vec<(Vec<Step>, usize)>) -> bool {
    let Some((last, parent)) = target.split_last() else {
        return false;
    };
    let container = parent.iter().try_fold(value, |node, step| match step {
        Step::Key(key) => node.get_mut(key.as_str()),
        Step::Index(idx) => node.get_mut(*idx),
    });
    match (container, last) {
        (Some(Value::Object(map)), Step::Key(key)) => map.remove(key).is_some(),
        (Some(Value::Array(items)), Step::Index(idx)) if *idx < items.len() => {
            items.remove(*idx);
            dropped.push((parent.to_vec(), *idx));
            true
        }
        _ => false,
    }
}

/// Render a message for errors raised by built-in rules, which carry
/// only a code and parameters.
fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    let param = |name: &str| err.params.get(name).map(ToString::to_string);
    let value = param("value").unwrap_or_else(|| "?".into());
    match &*err.code {
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}, got {value}"),
            (Some(min), None) => format!("must be at least {min}, got {value}"),
            (None, Some(max)) => format!("must be at most {max}, got {value}"),
            (None, None) => match (param("exclusive_min"), param("exclusive_max")) {
                (_, Some(max)) => format!("must be below {max}, got {value}"),
                (Some(min), None) => format!("must be above {min}, got {value}"),
                (None, None) => format!("out of range: {value}"),
            },
        },
        "length" => match (param("min"), param("max"), param("equal")) {
            (_, _, Some(equal)) => format!("length must be exactly {equal}"),
            (Some(min), Some(max), None) => format!("length must be between {min} and {max}"),
            (Some(min), None, None) => format!("length must be at least {min}"),
            (None, Some(max), None) => format!("length must be at most {max}"),
            (None, None, None) => "invalid length".into(),
        },
        code => format!("failed `{code}` check"),
    }
}

/// A deserialization failure as a violation, plus the node to prune
/// before retrying.
fn serde_violation(err: &serde_path_to_error::Error<serde_json::Error>) -> (Pending, Vec<Step>) {
    let path: Vec<Step> = err
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(Step::Index(*index)),
            Segment::Map { key } => Some(Step::Key(key.clone())),
            _ => None,
        })
        .collect();
    let message = err.inner().to_string();
    if let Some(field) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        let mut steps = path.clone();
        steps.push(Step::Key(field.to_owned()));
        let violation = Pending {
            steps,
            code: "required".into(),
            message: "field is required".into(),
        };
        return (violation, path);
    }
    let violation = Pending {
        steps: path.clone(),
        code: "type".into(),
        message,
    };
    (violation, path)
}

// ── Field rules ─────────────────────────────────────────────────────

static MAC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").expect("MAC pattern compiles")
});

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("version pattern compiles"));

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Six colon- or hyphen-separated hex octets.
pub fn validate_mac(value: &str) -> Result<(), ValidationError> {
    if MAC_RE.is_match(value) {
        Ok(())
    } else {
        Err(error("mac", format!("invalid MAC address: {value}")))
    }
}

pub fn validate_mac_list(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|v| validate_mac(v))
}

/// Normalized MAC form: lower-case, separators untouched.
pub fn normalize_mac(value: &str) -> String {
    value.to_ascii_lowercase()
}

pub(crate) fn normalize_mac_opt(value: &mut Option<String>) {
    if let Some(mac) = value {
        *mac = normalize_mac(mac);
    }
}

/// `major.minor.patch`, digits only.
pub fn validate_version(value: &str) -> Result<(), ValidationError> {
    if VERSION_RE.is_match(value) {
        Ok(())
    } else {
        Err(error(
            "version",
            format!("expected major.minor.patch, got {value}"),
        ))
    }
}

pub fn validate_ip(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| error("ip", format!("invalid IP address: {value}")))
}

pub fn validate_ip_list(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|v| validate_ip(v))
}

/// An IP literal with an optional `/prefix` sized for its family.
pub fn validate_subnet(value: &str) -> Result<(), ValidationError> {
    let invalid = || error("subnet", format!("invalid subnet: {value}"));
    let (addr, prefix) = match value.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (value, None),
    };
    let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
    if let Some(prefix) = prefix {
        let bits: u8 = prefix.parse().map_err(|_| invalid())?;
        let max = if addr.is_ipv4() { 32 } else { 128 };
        if bits > max {
            return Err(invalid());
        }
    }
    Ok(())
}

pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(error(
            "url",
            format!("must start with http:// or https://, got {value}"),
        ))
    }
}

/// Build a record-level violation for `schema` functions.
pub(crate) fn rule(code: &'static str, message: impl Into<String>) -> ValidationError {
    let message: String = message.into();
    error(code, message)
}
