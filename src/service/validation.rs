//! Request body validation against the static table model.

use crate::error::AppError;
use crate::model::Table;
use regex::Regex;
use serde_json::{Map, Value};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

pub struct RequestValidator;

impl RequestValidator {
    /// Reject bodies carrying fields outside the table's writable set
    /// (pk and timestamps included: those are never client-settable).
    pub fn only_valid_fields(body: &Map<String, Value>, table: &Table) -> Result<(), AppError> {
        let invalid: Vec<&str> = body
            .keys()
            .map(|k| k.as_str())
            .filter(|k| !table.is_writable(k))
            .collect();
        if !invalid.is_empty() {
            return Err(AppError::Validation(format!(
                "Invalid field(s): {}",
                invalid.join(", ")
            )));
        }
        Ok(())
    }

    /// Every required column must be present and non-null.
    pub fn required_fields(body: &Map<String, Value>, table: &Table) -> Result<(), AppError> {
        for req in table.required {
            match body.get(*req) {
                None | Some(Value::Null) => {
                    return Err(AppError::Validation(format!(
                        "A '{}' property is required.",
                        req
                    )));
                }
                Some(Value::String(s)) if s.is_empty() => {
                    return Err(AppError::Validation(format!(
                        "A '{}' property is required.",
                        req
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// If the body carries a supplier_email, it must look like an email.
    pub fn email_format(body: &Map<String, Value>) -> Result<(), AppError> {
        let Some(v) = body.get("supplier_email") else {
            return Ok(());
        };
        if v.is_null() {
            return Ok(());
        }
        let re = Regex::new(EMAIL_PATTERN)
            .map_err(|_| AppError::Validation("invalid email pattern".into()))?;
        match v.as_str() {
            Some(s) if re.is_match(s) => Ok(()),
            _ => Err(AppError::Validation(
                "supplier_email must be a valid email".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SUPPLIERS;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn unknown_fields_are_listed_in_the_error() {
        let b = body(json!({ "supplier_name": "Acme", "bogus": 1, "supplier_id": 2 }));
        let err = RequestValidator::only_valid_fields(&b, &SUPPLIERS).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid field(s):"));
        assert!(msg.contains("bogus"));
        assert!(msg.contains("supplier_id"));
        assert!(!msg.contains("supplier_name,"));
    }

    #[test]
    fn writable_fields_pass() {
        let b = body(json!({ "supplier_name": "Acme", "supplier_email": "a@b.co" }));
        assert!(RequestValidator::only_valid_fields(&b, &SUPPLIERS).is_ok());
    }

    #[test]
    fn missing_required_field_names_the_column() {
        let b = body(json!({ "supplier_name": "Acme" }));
        let err = RequestValidator::required_fields(&b, &SUPPLIERS).unwrap_err();
        assert!(err.to_string().contains("A 'supplier_email' property is required."));
    }

    #[test]
    fn null_and_empty_required_values_are_rejected() {
        let b = body(json!({ "supplier_name": null, "supplier_email": "a@b.co" }));
        assert!(RequestValidator::required_fields(&b, &SUPPLIERS).is_err());
        let b = body(json!({ "supplier_name": "", "supplier_email": "a@b.co" }));
        assert!(RequestValidator::required_fields(&b, &SUPPLIERS).is_err());
    }

    #[test]
    fn email_format_accepts_plain_addresses() {
        let b = body(json!({ "supplier_email": "orders@acme.test" }));
        assert!(RequestValidator::email_format(&b).is_ok());
    }

    #[test]
    fn email_format_rejects_garbage() {
        let b = body(json!({ "supplier_email": "not-an-email" }));
        assert!(RequestValidator::email_format(&b).is_err());
        let b = body(json!({ "supplier_email": 42 }));
        assert!(RequestValidator::email_format(&b).is_err());
    }

    #[test]
    fn email_format_skips_absent_field() {
        let b = body(json!({}));
        assert!(RequestValidator::email_format(&b).is_ok());
    }
}
