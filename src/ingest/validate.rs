use std::fmt;
use std::str::FromStr;
use crate::core::error::{Error, ErrorKind, Result};

/// Course code conventions accepted at data entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStyle {
    /// Letters only, e.g. `OOPD`.
    Alphabetic,
    /// Digits only, e.g. `12345`.
    Numeric,
}

impl CourseStyle {
    pub fn detect(code: &str) -> Option<CourseStyle> {
        if is_alphabetic(code) {
            Some(CourseStyle::Alphabetic)
        } else if is_numeric(code) {
            Some(CourseStyle::Numeric)
        } else {
            None
        }
    }
}

impl fmt::Display for CourseStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CourseStyle::Alphabetic => write!(f, "alphabetic"),
            CourseStyle::Numeric => write!(f, "numeric"),
        }
    }
}

impl FromStr for CourseStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "alphabetic" | "alpha" | "iiitd" => Ok(CourseStyle::Alphabetic),
            "numeric" | "num" | "iitd" => Ok(CourseStyle::Numeric),
            other => Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("unknown course style '{}'", other),
            )),
        }
    }
}

pub fn is_alphabetic(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Names are non-empty and made of letters and spaces.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input("Name cannot be empty."));
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        return Err(Error::invalid_input("Name must contain only alphabets and spaces."));
    }
    Ok(())
}

pub fn validate_course(code: &str, style: CourseStyle) -> Result<()> {
    let ok = match style {
        CourseStyle::Alphabetic => is_alphabetic(code),
        CourseStyle::Numeric => is_numeric(code),
    };
    if ok {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "course '{}' must be {}",
            code,
            match style {
                CourseStyle::Alphabetic => "alphabets only",
                CourseStyle::Numeric => "integers only",
            }
        )))
    }
}

/// Free-text fields such as the branch or a text roll must be non-empty and
/// free of the CSV field and list separators.
pub fn validate_plain_field(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_input(format!("{} cannot be empty.", what)));
    }
    if let Some(bad) = value.chars().find(|c| matches!(c, ',' | ';')) {
        return Err(Error::invalid_input(format!(
            "{} '{}' must not contain '{}'",
            what, value, bad
        )));
    }
    Ok(())
}

/// Scores are finite grades on the 0 to 10 scale.
pub fn validate_score(score: f64) -> Result<()> {
    if score.is_finite() && (0.0..=10.0).contains(&score) {
        Ok(())
    } else {
        Err(Error::invalid_input(format!("score {} is outside 0..=10", score)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(validate_name("Asha Verma").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("R2D2").is_err());
    }

    #[test]
    fn course_styles() {
        assert!(validate_course("OOPD", CourseStyle::Alphabetic).is_ok());
        assert!(validate_course("12345", CourseStyle::Alphabetic).is_err());
        assert!(validate_course("12345", CourseStyle::Numeric).is_ok());
        assert!(validate_course("CS101", CourseStyle::Numeric).is_err());

        assert_eq!(CourseStyle::detect("ml"), Some(CourseStyle::Alphabetic));
        assert_eq!(CourseStyle::detect("56789"), Some(CourseStyle::Numeric));
        assert_eq!(CourseStyle::detect("cs101"), None);
        assert_eq!("IITD".parse::<CourseStyle>().unwrap(), CourseStyle::Numeric);
    }

    #[test]
    fn plain_fields_reject_separators() {
        assert!(validate_plain_field("csai", "branch").is_ok());
        assert!(validate_plain_field("MT23001", "roll").is_ok());
        assert!(validate_plain_field("cse,ece", "branch").is_err());
        assert!(validate_plain_field("MT;1", "roll").is_err());
        assert!(validate_plain_field(" ", "branch").is_err());
    }

    #[test]
    fn scores() {
        assert!(validate_score(9.5).is_ok());
        assert!(validate_score(10.0).is_ok());
        assert!(validate_score(-0.5).is_err());
        assert!(validate_score(f64::INFINITY).is_err());
    }
}
