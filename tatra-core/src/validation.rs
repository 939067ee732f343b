use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::booking::BookingPatch;
use crate::ValidationError;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

fn phone_re() -> &'static Regex {
    PHONE_RE.get_or_init(|| Regex::new(r"^[+]?[\d\s\-()]{10,}$").expect("phone regex"))
}

const MIN_AGE: u64 = 18;
const MAX_AGE: u64 = 100;

/// Server-side checks on booking payloads.
///
/// Only fields that are present are checked, so free-form payloads without
/// e.g. an email still go through.
#[derive(Debug, Clone)]
pub struct PayloadValidator {
    /// Earliest bookable tour date, in days after today
    pub min_lead_days: i64,
    pub max_participants: u32,
}

impl Default for PayloadValidator {
    fn default() -> Self {
        Self {
            min_lead_days: 7,
            max_participants: 12,
        }
    }
}

impl PayloadValidator {
    pub fn new(min_lead_days: i64, max_participants: u32) -> Self {
        Self {
            min_lead_days,
            max_participants,
        }
    }

    /// Validate a create payload and hand back its fields.
    pub fn validate_new(&self, payload: Value, today: NaiveDate) -> Result<Map<String, Value>, ValidationError> {
        let Value::Object(fields) = payload else {
            return Err(ValidationError::NotAnObject);
        };

        self.check_fields(&fields)?;

        if let Some(value) = filled(&fields, "tourDate") {
            let date = parse_date(value)?;
            let earliest = today + Duration::days(self.min_lead_days);
            if date < earliest {
                return Err(ValidationError::invalid(
                    "tourDate",
                    format!("must be at least {} days from today", self.min_lead_days),
                ));
            }
        }

        Ok(fields)
    }

    /// Validate an update body and turn it into a patch.
    ///
    /// `tourDate` is checked for format only; admins may move a tour closer.
    pub fn validate_patch(&self, payload: Value) -> Result<BookingPatch, ValidationError> {
        let Value::Object(fields) = payload else {
            return Err(ValidationError::NotAnObject);
        };

        self.check_fields(&fields)?;
        if let Some(value) = filled(&fields, "tourDate") {
            parse_date(value)?;
        }

        BookingPatch::try_from(fields)
    }

    pub fn check_participants(&self, participants: u64) -> Result<u32, ValidationError> {
        match u32::try_from(participants) {
            Ok(n) if (1..=self.max_participants).contains(&n) => Ok(n),
            _ => Err(ValidationError::invalid(
                "participants",
                format!("must be between 1 and {}", self.max_participants),
            )),
        }
    }

    fn check_fields(&self, fields: &Map<String, Value>) -> Result<(), ValidationError> {
        if let Some(value) = filled(fields, "email") {
            let email = value
                .as_str()
                .ok_or_else(|| ValidationError::invalid("email", "expected a string"))?;
            if !email_re().is_match(email.trim()) {
                return Err(ValidationError::invalid("email", "not a valid email address"));
            }
        }

        for field in ["phone", "emergencyPhone"] {
            if let Some(value) = filled(fields, field) {
                let phone = value
                    .as_str()
                    .ok_or_else(|| ValidationError::invalid(field, "expected a string"))?;
                if !phone_re().is_match(phone.trim()) {
                    return Err(ValidationError::invalid(field, "not a valid phone number"));
                }
            }
        }

        if let Some(value) = filled(fields, "age") {
            let age = parse_count("age", value)?;
            if !(MIN_AGE..=MAX_AGE).contains(&age) {
                return Err(ValidationError::invalid(
                    "age",
                    format!("must be between {MIN_AGE} and {MAX_AGE}"),
                ));
            }
        }

        if let Some(value) = filled(fields, "participants") {
            self.check_participants(parse_count("participants", value)?)?;
        }

        if let Some(value) = filled(fields, "tour") {
            let slug = value
                .as_str()
                .ok_or_else(|| ValidationError::invalid("tour", "expected a string"))?;
            if !tatra_catalog::is_known_tour(slug) {
                return Err(ValidationError::invalid("tour", format!("unknown tour {slug:?}")));
            }
        }

        Ok(())
    }
}

/// A field counts as present only when it carries a value. The booking form
/// posts blank optional inputs as `""` and unset ones as `null`.
fn filled<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        value => Some(value),
    }
}

/// Form fields arrive either as JSON numbers or as the raw select/input string.
fn parse_count(field: &str, value: &Value) -> Result<u64, ValidationError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ValidationError::invalid(field, "expected a whole number")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| ValidationError::invalid(field, "expected a whole number")),
        _ => Err(ValidationError::invalid(field, "expected a whole number")),
    }
}

fn parse_date(value: &Value) -> Result<NaiveDate, ValidationError> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .ok_or_else(|| ValidationError::invalid("tourDate", "expected a YYYY-MM-DD date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingStatus;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn form_payload() -> Value {
        json!({
            "tour": "winter-walking",
            "tourDate": "2026-11-02",
            "participants": "2",
            "firstName": "Ann",
            "lastName": "Novak",
            "email": "ann@example.com",
            "phone": "+421 900 123 456",
            "age": "34",
            "emergencyPhone": "(02) 555-01234",
            "newsletter": true
        })
    }

    #[test]
    fn accepts_a_complete_form_submission() {
        let fields = PayloadValidator::default()
            .validate_new(form_payload(), today())
            .unwrap();
        assert_eq!(fields["firstName"], "Ann");
    }

    #[test]
    fn accepts_sparse_payloads() {
        let v = PayloadValidator::default();
        assert!(v
            .validate_new(json!({"tour": "winter-walking", "participants": 2, "firstName": "Ann"}), today())
            .is_ok());
        assert!(v.validate_new(json!({}), today()).is_ok());
    }

    #[test]
    fn rejects_non_objects() {
        let v = PayloadValidator::default();
        assert_eq!(v.validate_new(json!([1, 2]), today()), Err(ValidationError::NotAnObject));
        assert_eq!(v.validate_patch(json!("confirmed")), Err(ValidationError::NotAnObject));
    }

    #[test]
    fn rejects_malformed_contact_fields() {
        let v = PayloadValidator::default();
        for (field, bad) in [
            ("email", json!("ann.example.com")),
            ("email", json!(42)),
            ("phone", json!("12345")),
            ("emergencyPhone", json!("call me maybe")),
        ] {
            let mut payload = form_payload();
            payload[field] = bad;
            let err = v.validate_new(payload, today()).unwrap_err();
            assert!(
                matches!(&err, ValidationError::InvalidField { field: f, .. } if f == field),
                "{field}: {err}"
            );
        }
    }

    #[test]
    fn enforces_age_and_party_size() {
        let v = PayloadValidator::new(7, 12);
        assert!(v.validate_new(json!({"age": 17}), today()).is_err());
        assert!(v.validate_new(json!({"age": "101"}), today()).is_err());
        assert!(v.validate_new(json!({"age": 18}), today()).is_ok());
        assert!(v.validate_new(json!({"participants": 0}), today()).is_err());
        assert!(v.validate_new(json!({"participants": "13"}), today()).is_err());
        assert!(v.validate_new(json!({"participants": 2.5}), today()).is_err());
        assert!(v.validate_new(json!({"participants": 12}), today()).is_ok());
    }

    #[test]
    fn rejects_unknown_tour() {
        let err = PayloadValidator::default()
            .validate_new(json!({"tour": "moon-walk"}), today())
            .unwrap_err();
        assert!(err.to_string().contains("moon-walk"));
    }

    #[test]
    fn tour_date_needs_lead_time_on_create_only() {
        let v = PayloadValidator::new(7, 12);
        assert!(v.validate_new(json!({"tourDate": "2026-10-21"}), today()).is_err());
        assert!(v.validate_new(json!({"tourDate": "2026-10-22"}), today()).is_ok());
        assert!(v.validate_new(json!({"tourDate": "22/10/2026"}), today()).is_err());

        assert!(v.validate_patch(json!({"tourDate": "2026-10-16"})).is_ok());
        assert!(v.validate_patch(json!({"tourDate": "soon"})).is_err());
    }

    #[test]
    fn blank_and_null_fields_are_skipped() {
        let v = PayloadValidator::default();
        for field in [
            "email",
            "phone",
            "emergencyPhone",
            "age",
            "participants",
            "tour",
            "tourDate",
        ] {
            for blank in [json!(""), json!("   "), Value::Null] {
                let mut payload = form_payload();
                payload[field] = blank.clone();

                let fields = v
                    .validate_new(payload, today())
                    .unwrap_or_else(|e| panic!("{field}={blank}: {e}"));
                assert_eq!(fields[field], blank);

                let patch = v
                    .validate_patch(Value::Object(Map::from_iter([(field.to_string(), blank.clone())])))
                    .unwrap_or_else(|e| panic!("patch {field}={blank}: {e}"));
                assert_eq!(patch.fields[field], blank);
            }
        }
    }

    #[test]
    fn patch_carries_status_and_fields() {
        let patch = PayloadValidator::default()
            .validate_patch(json!({"status": "cancelled", "medical": "none"}))
            .unwrap();
        assert_eq!(patch.status, Some(BookingStatus::Cancelled));
        assert_eq!(patch.fields["medical"], "none");
    }
}
