//! Author form: field rules and conversion to a storable author

use serde::Serialize;
use validator::{Validate, ValidationError};

use super::{
    field_errors, parse_date, rule_error, validate_alphanumeric, validate_iso_date, FieldError,
    FormPayload,
};
use crate::models::NewAuthor;

const FIELD_ORDER: &[&str] = &["first_name", "family_name", "date_of_birth", "date_of_death"];

/// Author form as submitted; also the candidate re-rendered on failure.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[validate(schema(function = "validate_lifespan", skip_on_field_errors = false))]
pub struct AuthorForm {
    #[validate(
        length(min = 1, max = 100, message = "First name must be specified."),
        custom(
            function = "validate_alphanumeric",
            message = "First name has non-alphanumeric characters."
        )
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 100, message = "Family name must be specified."),
        custom(
            function = "validate_alphanumeric",
            message = "Family name has non-alphanumeric characters."
        )
    )]
    pub family_name: String,
    #[validate(custom(function = "validate_iso_date", message = "Invalid date of birth"))]
    pub date_of_birth: Option<String>,
    #[validate(custom(function = "validate_iso_date", message = "Invalid date of death"))]
    pub date_of_death: Option<String>,
}

fn validate_lifespan(form: &AuthorForm) -> Result<(), ValidationError> {
    let born = form.date_of_birth.as_deref().and_then(parse_date);
    let died = form.date_of_death.as_deref().and_then(parse_date);
    match (born, died) {
        (Some(born), Some(died)) if died <= born => {
            let mut error = rule_error("after", "Date of death must be after date of birth.");
            error.add_param("field".into(), &"date_of_death");
            Err(error)
        }
        _ => Ok(()),
    }
}

impl AuthorForm {
    pub fn from_payload(payload: &FormPayload) -> Self {
        Self {
            first_name: payload.text("first_name"),
            family_name: payload.text("family_name"),
            date_of_birth: payload.optional("date_of_birth"),
            date_of_death: payload.optional("date_of_death"),
        }
    }

    /// Run the field rules; on success hand back the storable author.
    pub fn validated(&self) -> Result<NewAuthor, Vec<FieldError>> {
        self.validate()
            .map_err(|errors| field_errors(&errors, FIELD_ORDER))?;

        Ok(NewAuthor {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: self.date_of_birth.as_deref().and_then(parse_date),
            date_of_death: self.date_of_death.as_deref().and_then(parse_date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form(first: &str, family: &str, born: Option<&str>, died: Option<&str>) -> AuthorForm {
        AuthorForm {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: born.map(str::to_string),
            date_of_death: died.map(str::to_string),
        }
    }

    fn messages(errors: Vec<FieldError>) -> Vec<(String, String)> {
        errors.into_iter().map(|e| (e.field, e.message)).collect()
    }

    #[test]
    fn test_valid_author() {
        let author = form("Isaac", "Asimov", Some("1920-01-02"), Some("1992-04-06"))
            .validated()
            .unwrap();
        assert_eq!(author.first_name, "Isaac");
        assert_eq!(author.date_of_birth, NaiveDate::from_ymd_opt(1920, 1, 2));
        assert_eq!(author.date_of_death, NaiveDate::from_ymd_opt(1992, 4, 6));
    }

    #[test]
    fn test_empty_first_name() {
        let errors = form("", "Asimov", None, None).validated().unwrap_err();
        assert_eq!(
            messages(errors),
            vec![("first_name".to_string(), "First name must be specified.".to_string())]
        );
    }

    #[test]
    fn test_non_alphanumeric_names() {
        let errors = form("J.R.R.", "Tolkien", None, None).validated().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "First name has non-alphanumeric characters.");
    }

    #[test]
    fn test_names_limited_to_ascii() {
        let errors = form("José", "²³", None, None).validated().unwrap_err();
        assert_eq!(
            messages(errors),
            vec![
                (
                    "first_name".to_string(),
                    "First name has non-alphanumeric characters.".to_string()
                ),
                (
                    "family_name".to_string(),
                    "Family name has non-alphanumeric characters.".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_name_too_long() {
        let long = "a".repeat(101);
        let errors = form("Ann", &long, None, None).validated().unwrap_err();
        assert_eq!(errors[0].field, "family_name");
    }

    #[test]
    fn test_death_before_birth() {
        let errors = form("Ann", "Leckie", Some("1966-03-02"), Some("1950-01-01"))
            .validated()
            .unwrap_err();
        assert_eq!(
            messages(errors),
            vec![(
                "date_of_death".to_string(),
                "Date of death must be after date of birth.".to_string()
            )]
        );
    }

    #[test]
    fn test_invalid_dates_and_names_reported_together() {
        let errors = form("", "", Some("yesterday"), None).validated().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "family_name", "date_of_birth"]);
    }

    #[test]
    fn test_from_payload_treats_empty_dates_as_absent() {
        let payload = FormPayload::new(vec![
            ("first_name".to_string(), " Ann ".to_string()),
            ("family_name".to_string(), "Leckie".to_string()),
            ("date_of_birth".to_string(), "".to_string()),
        ]);
        let form = AuthorForm::from_payload(&payload);
        assert_eq!(form.first_name, "Ann");
        assert_eq!(form.date_of_birth, None);
        assert!(form.validated().is_ok());
    }
}
