use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{macros::format_description, Date, OffsetDateTime};

use crate::{auth::repo_types::NewUser, error::ApiError};

/// Request body for signup. Every field is optional at the serde level so that
/// a missing field yields a field-specific message instead of a generic rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub last_name: Option<String>,
    /// Keys we do not store; kept so an object with only unknown keys is not mistaken for `{}`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signup input that passed validation; the password is still plaintext.
#[derive(Debug)]
pub struct ValidSignup {
    pub username: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: Date,
    pub gender: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub last_name: Option<String>,
}

impl SignupRequest {
    fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.dob.is_none()
            && self.gender.is_none()
            && self.first_name.is_none()
            && self.second_name.is_none()
            && self.last_name.is_none()
            && self.extra.is_empty()
    }

    pub fn validate(self) -> Result<ValidSignup, ApiError> {
        if self.is_empty() {
            return Err(ApiError::Validation("No data received".into()));
        }

        let username = required("username", self.username)?;
        let email = required("email", self.email)?;
        let password = required("password", self.password)?;
        let dob = required("dob", self.dob)?;
        let gender = required("gender", self.gender)?;

        let date_of_birth = Date::parse(dob.trim(), format_description!("[year]-[month]-[day]"))
            .map_err(|_| ApiError::Validation("Invalid date of birth".into()))?;

        Ok(ValidSignup {
            username,
            email,
            password,
            date_of_birth,
            gender,
            first_name: self.first_name,
            second_name: self.second_name,
            last_name: self.last_name,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("Missing required field: {field}")))
}

impl ValidSignup {
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username,
            first_name: self.first_name,
            second_name: self.second_name,
            last_name: self.last_name,
            email: self.email,
            password_hash,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
        }
    }
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(username, password)`; empty strings count as missing.
    pub fn validate(self) -> Result<(String, String), ApiError> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
            _ => Err(ApiError::Validation(
                "Username and password required".into(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> SignupRequest {
        SignupRequest {
            username: Some("alice".into()),
            email: Some("a@x.com".into()),
            password: Some("p@ss1".into()),
            dob: Some("1990-01-01".into()),
            gender: Some("F".into()),
            ..Default::default()
        }
    }

    fn message(err: ApiError) -> String {
        err.to_string()
    }

    #[test]
    fn signup_validates_complete_payload() {
        let valid = full().validate().expect("valid");
        assert_eq!(valid.username, "alice");
        assert_eq!(valid.date_of_birth.to_string(), "1990-01-01");
        assert!(valid.first_name.is_none());
    }

    #[test]
    fn signup_empty_object_is_no_data() {
        let err = SignupRequest::default().validate().unwrap_err();
        assert_eq!(message(err), "No data received");
    }

    #[test]
    fn signup_unknown_keys_only_is_missing_username() {
        let req: SignupRequest = serde_json::from_str(r#"{"foo":"bar"}"#).unwrap();
        assert_eq!(
            message(req.validate().unwrap_err()),
            "Missing required field: username"
        );

        let req: SignupRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(message(req.validate().unwrap_err()), "No data received");
    }

    #[test]
    fn signup_reports_each_missing_field() {
        let cases: [(&str, fn(&mut SignupRequest)); 5] = [
            ("username", |r: &mut SignupRequest| r.username = None),
            ("email", |r: &mut SignupRequest| r.email = None),
            ("password", |r: &mut SignupRequest| r.password = None),
            ("dob", |r: &mut SignupRequest| r.dob = None),
            ("gender", |r: &mut SignupRequest| r.gender = None),
        ];
        for (field, strip) in cases {
            let mut req = full();
            strip(&mut req);
            let err = req.validate().unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
            assert_eq!(message(err), format!("Missing required field: {field}"));
        }
    }

    #[test]
    fn signup_rejects_bad_date() {
        let mut req = full();
        req.dob = Some("01/01/1990".into());
        assert_eq!(message(req.validate().unwrap_err()), "Invalid date of birth");
    }

    #[test]
    fn login_requires_both_fields() {
        let ok = LoginRequest {
            username: Some("alice".into()),
            password: Some("p@ss1".into()),
        };
        assert_eq!(ok.validate().unwrap().0, "alice");

        let empty = LoginRequest {
            username: Some("alice".into()),
            password: Some(String::new()),
        };
        assert_eq!(
            message(empty.validate().unwrap_err()),
            "Username and password required"
        );
        assert!(LoginRequest::default().validate().is_err());
    }

    #[test]
    fn login_response_never_has_password() {
        let response = LoginResponse {
            success: true,
            message: "Login successful".into(),
            user: PublicUser {
                username: "alice".into(),
                email: "a@x.com".into(),
            },
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("a@x.com"));
        assert!(!json.contains("password"));
    }
}
