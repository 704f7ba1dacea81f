use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{normalize_email, squish, squish_opt};
use crate::utils::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InternshipStatus {
    Applied,
    Confirmed,
    Completed,
    Cancelled,
}

impl std::fmt::Display for InternshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternshipStatus::Applied => write!(f, "Applied"),
            InternshipStatus::Confirmed => write!(f, "Confirmed"),
            InternshipStatus::Completed => write!(f, "Completed"),
            InternshipStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for InternshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Applied" => Ok(InternshipStatus::Applied),
            "Confirmed" => Ok(InternshipStatus::Confirmed),
            "Completed" => Ok(InternshipStatus::Completed),
            "Cancelled" => Ok(InternshipStatus::Cancelled),
            _ => Err("must be one of: Applied, Confirmed, Completed, Cancelled".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "App Development")]
    AppDevelopment,
    #[serde(rename = "UI/UX Design")]
    UiUxDesign,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    #[serde(rename = "Digital Marketing")]
    DigitalMarketing,
    #[serde(rename = "Cloud Computing")]
    CloudComputing,
    #[serde(rename = "Cyber Security")]
    CyberSecurity,
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Domain::WebDevelopment => "Web Development",
            Domain::AppDevelopment => "App Development",
            Domain::UiUxDesign => "UI/UX Design",
            Domain::DataScience => "Data Science",
            Domain::MachineLearning => "Machine Learning",
            Domain::DigitalMarketing => "Digital Marketing",
            Domain::CloudComputing => "Cloud Computing",
            Domain::CyberSecurity => "Cyber Security",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Web Development" => Ok(Domain::WebDevelopment),
            "App Development" => Ok(Domain::AppDevelopment),
            "UI/UX Design" => Ok(Domain::UiUxDesign),
            "Data Science" => Ok(Domain::DataScience),
            "Machine Learning" => Ok(Domain::MachineLearning),
            "Digital Marketing" => Ok(Domain::DigitalMarketing),
            "Cloud Computing" => Ok(Domain::CloudComputing),
            "Cyber Security" => Ok(Domain::CyberSecurity),
            _ => Err("must be one of: Web Development, App Development, UI/UX Design, \
                      Data Science, Machine Learning, Digital Marketing, Cloud Computing, \
                      Cyber Security"
                .to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Online,
    Offline,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Online" => Ok(Mode::Online),
            "Offline" => Ok(Mode::Offline),
            _ => Err("must be one of: Online, Offline".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    #[serde(rename = "1 Month")]
    OneMonth,
    #[serde(rename = "2 Months")]
    TwoMonths,
    #[serde(rename = "3 Months")]
    ThreeMonths,
    #[serde(rename = "6 Months")]
    SixMonths,
}

impl std::str::FromStr for Duration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1 Month" => Ok(Duration::OneMonth),
            "2 Months" => Ok(Duration::TwoMonths),
            "3 Months" => Ok(Duration::ThreeMonths),
            "6 Months" => Ok(Duration::SixMonths),
            _ => Err("must be one of: 1 Month, 2 Months, 3 Months, 6 Months".to_string()),
        }
    }
}

/// One candidate per domain; enforced by the `(email, domain)` unique index.
#[derive(Debug, Serialize, Deserialize)]
pub struct InternshipApplication {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    pub domain: Domain,
    pub mode: Mode,
    pub duration: Duration,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    pub status: InternshipStatus,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInternshipPayload {
    #[validate(length(min = 2, max = 100, message = "must be 2-100 characters"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom = "super::validate_phone")]
    pub phone: String,
    #[validate(length(max = 150, message = "must be at most 150 characters"))]
    pub college: Option<String>,
    pub domain: String,
    pub mode: String,
    pub duration: String,
    #[validate(range(min = 0.0, max = 1_000_000.0, message = "must be between 0 and 1,000,000"))]
    pub price: f64,
    pub start_date: Option<DateTime<Utc>>,
}

impl CreateInternshipPayload {
    pub fn normalize(&mut self) {
        self.full_name = squish(&self.full_name);
        self.email = normalize_email(&self.email);
        self.phone = squish(&self.phone);
        squish_opt(&mut self.college);
        self.domain = squish(&self.domain);
        self.mode = squish(&self.mode);
        self.duration = squish(&self.duration);
    }

    pub fn into_record(self) -> Result<InternshipApplication, ApiError> {
        let domain = self
            .domain
            .parse()
            .map_err(|e| ApiError::Validation(format!("domain: {e}")))?;
        let mode = self
            .mode
            .parse()
            .map_err(|e| ApiError::Validation(format!("mode: {e}")))?;
        let duration = self
            .duration
            .parse()
            .map_err(|e| ApiError::Validation(format!("duration: {e}")))?;
        if let Some(start_date) = self.start_date {
            if start_date.date_naive() < Utc::now().date_naive() {
                return Err(ApiError::Validation(
                    "start_date: must not be in the past".to_string(),
                ));
            }
        }
        Ok(InternshipApplication {
            id: None,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            college: self.college,
            domain,
            mode,
            duration,
            price: self.price,
            start_date: self.start_date,
            status: InternshipStatus::Applied,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn payload() -> CreateInternshipPayload {
        CreateInternshipPayload {
            full_name: "Priya Sharma".to_string(),
            email: "priya@example.com".to_string(),
            phone: "+91 91234 56789".to_string(),
            college: Some("Pune University".to_string()),
            domain: "Data Science".to_string(),
            mode: "Online".to_string(),
            duration: "3 Months".to_string(),
            price: 4999.0,
            start_date: Some(Utc::now() + ChronoDuration::days(14)),
        }
    }

    #[test]
    fn valid_application_defaults_to_applied() {
        let mut p = payload();
        p.normalize();
        p.validate().unwrap();
        let record = p.into_record().unwrap();
        assert_eq!(record.status, InternshipStatus::Applied);
        assert_eq!(record.domain, Domain::DataScience);
        assert_eq!(record.duration, Duration::ThreeMonths);
    }

    #[test]
    fn past_start_date_is_rejected() {
        let mut p = payload();
        p.start_date = Some(Utc::now() - ChronoDuration::days(2));
        p.normalize();
        let err = p.into_record().unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn today_is_not_in_the_past() {
        let mut p = payload();
        p.start_date = Some(Utc::now());
        p.normalize();
        assert!(p.into_record().is_ok());
    }

    #[test]
    fn unknown_domain_is_rejected() {
        let mut p = payload();
        p.domain = "Astrology".to_string();
        p.normalize();
        assert!(p.into_record().is_err());
    }

    #[test]
    fn price_outside_bounds_fails_validation() {
        let mut p = payload();
        p.price = 2_000_000.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn domain_labels_round_trip() {
        for label in [
            "Web Development",
            "App Development",
            "UI/UX Design",
            "Data Science",
            "Machine Learning",
            "Digital Marketing",
            "Cloud Computing",
            "Cyber Security",
        ] {
            let domain: Domain = label.parse().unwrap();
            assert_eq!(domain.to_string(), label);
            assert_eq!(serde_json::to_value(domain).unwrap(), label);
        }
    }
}
