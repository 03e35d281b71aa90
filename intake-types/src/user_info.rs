use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum age (in whole years) to take part.
pub const MINIMUM_AGE: u32 = 18;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("valid name pattern"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$")
        .expect("valid phone pattern")
});

/// Gender as offered on the personal-details step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    /// Every choice, in display order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::PreferNotToSay];

    /// The display (and wire) string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }
}

/// Marital status as offered on the personal-details step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    /// Every choice, in display order.
    pub const ALL: [MaritalStatus; 4] = [
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::Divorced,
        MaritalStatus::Widowed,
    ];

    /// The display (and wire) string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
            Self::Divorced => "Divorced",
            Self::Widowed => "Widowed",
        }
    }
}

/// A display string that matches no variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Gender {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChoice {
                kind: "gender",
                value: s.to_string(),
            })
    }
}

impl FromStr for MaritalStatus {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChoice {
                kind: "marital status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Personal details collected before the questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub occupation: String,
    pub nationality: String,
    pub state_of_residence: String,
    pub marital_status: MaritalStatus,
}

/// A field of [`UserInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserField {
    FullName,
    Email,
    Phone,
    DateOfBirth,
    Gender,
    Occupation,
    Nationality,
    StateOfResidence,
    MaritalStatus,
}

impl UserField {
    /// Human-readable field name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullName => "full name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::DateOfBirth => "date of birth",
            Self::Gender => "gender",
            Self::Occupation => "occupation",
            Self::Nationality => "nationality",
            Self::StateOfResidence => "state of residence",
            Self::MaritalStatus => "marital status",
        }
    }
}

/// One failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: UserField,
    pub message: String,
}

/// All field checks that failed for a [`UserInfo`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid personal details ({} field errors)", .errors.len())]
pub struct UserInfoErrors {
    pub errors: Vec<FieldError>,
}

impl UserInfo {
    /// Validate every field against today's date.
    pub fn validate(&self) -> Result<(), UserInfoErrors> {
        self.validate_on(chrono::Local::now().date_naive())
    }

    /// Validate every field, using `today` for the age check.
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), UserInfoErrors> {
        let mut errors = Vec::new();
        let mut fail = |field, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            })
        };

        let name = self.full_name.trim();
        if name.is_empty() {
            fail(UserField::FullName, "Please enter your full name");
        } else if name.chars().count() < 2 {
            fail(UserField::FullName, "Name must be at least 2 characters");
        } else if !NAME_PATTERN.is_match(name) {
            fail(
                UserField::FullName,
                "Name can only contain letters, spaces, hyphens, and apostrophes",
            );
        }

        let email = self.email.trim();
        if email.is_empty() {
            fail(UserField::Email, "Please enter your email address");
        } else if !EMAIL_PATTERN.is_match(email) {
            fail(
                UserField::Email,
                "Please enter a valid email address (e.g., john@example.com)",
            );
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            fail(UserField::Phone, "Please enter your phone number");
        } else if !PHONE_PATTERN.is_match(phone) {
            fail(
                UserField::Phone,
                "Please enter a valid phone number (e.g., +234 800 000 0000)",
            );
        }

        match today.years_since(self.date_of_birth) {
            Some(age) if age >= MINIMUM_AGE => {}
            _ => fail(
                UserField::DateOfBirth,
                "You must be at least 18 years old to participate in this survey",
            ),
        }

        for (field, value, message) in [
            (
                UserField::Occupation,
                &self.occupation,
                "Occupation must be at least 2 characters",
            ),
            (
                UserField::Nationality,
                &self.nationality,
                "Nationality must be at least 2 characters",
            ),
            (
                UserField::StateOfResidence,
                &self.state_of_residence,
                "State must be at least 2 characters",
            ),
        ] {
            if value.trim().chars().count() < 2 {
                fail(field, message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(UserInfoErrors { errors })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn has(errors: &UserInfoErrors, field: UserField) -> bool {
        errors.errors.iter().any(|e| e.field == field)
    }

    fn valid() -> UserInfo {
        UserInfo {
            full_name: "Ada O'Neil-Okafor".into(),
            email: "ada@example.com".into(),
            phone: "+234 800 000 0000".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
            gender: Gender::Female,
            occupation: "Engineer".into(),
            nationality: "Nigerian".into(),
            state_of_residence: "Lagos".into(),
            marital_status: MaritalStatus::Married,
        }
    }

    #[test]
    fn valid_info_passes() {
        assert!(valid().validate_on(today()).is_ok());
    }

    #[test]
    fn collects_every_failed_field() {
        let info = UserInfo {
            full_name: "A1".into(),
            email: "not-an-email".into(),
            phone: "call me".into(),
            occupation: "x".into(),
            ..valid()
        };
        let errors = info.validate_on(today()).unwrap_err();
        assert!(has(&errors, UserField::FullName));
        assert!(has(&errors, UserField::Email));
        assert!(has(&errors, UserField::Phone));
        assert!(has(&errors, UserField::Occupation));
        assert!(!has(&errors, UserField::Nationality));
        assert_eq!(errors.errors.len(), 4);
    }

    #[test]
    fn must_be_eighteen() {
        let info = UserInfo {
            date_of_birth: NaiveDate::from_ymd_opt(2008, 6, 2).unwrap(),
            ..valid()
        };
        assert!(has(&info.validate_on(today()).unwrap_err(), UserField::DateOfBirth));

        let info = UserInfo {
            date_of_birth: NaiveDate::from_ymd_opt(2008, 6, 1).unwrap(),
            ..valid()
        };
        assert!(info.validate_on(today()).is_ok());
    }

    #[test]
    fn choices_parse_from_display_strings() {
        assert_eq!(
            "prefer not to say".parse::<Gender>().unwrap(),
            Gender::PreferNotToSay
        );
        assert_eq!(
            "Widowed".parse::<MaritalStatus>().unwrap(),
            MaritalStatus::Widowed
        );
        assert!("Engaged".parse::<MaritalStatus>().is_err());
    }

    #[test]
    fn serializes_camel_case_with_display_strings() {
        let info = UserInfo {
            gender: Gender::PreferNotToSay,
            ..valid()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["fullName"], "Ada O'Neil-Okafor");
        assert_eq!(json["dateOfBirth"], "1985-03-14");
        assert_eq!(json["gender"], "Prefer not to say");
        assert_eq!(json["stateOfResidence"], "Lagos");
    }
}
