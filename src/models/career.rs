use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{normalize_email, squish, squish_opt};
use crate::utils::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CareerStatus {
    Applied,
    Reviewed,
    Shortlisted,
    Rejected,
}

impl std::fmt::Display for CareerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CareerStatus::Applied => write!(f, "Applied"),
            CareerStatus::Reviewed => write!(f, "Reviewed"),
            CareerStatus::Shortlisted => write!(f, "Shortlisted"),
            CareerStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl std::str::FromStr for CareerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Applied" => Ok(CareerStatus::Applied),
            "Reviewed" => Ok(CareerStatus::Reviewed),
            "Shortlisted" => Ok(CareerStatus::Shortlisted),
            "Rejected" => Ok(CareerStatus::Rejected),
            _ => Err("must be one of: Applied, Reviewed, Shortlisted, Rejected".to_string()),
        }
    }
}

/// One candidate may apply to a role once; the compound unique index on
/// `(email, role_applied)` enforces this at the store level.
#[derive(Debug, Serialize, Deserialize)]
pub struct CareerApplication {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role_applied: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    pub status: CareerStatus,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCareerPayload {
    #[validate(length(min = 2, max = 100, message = "must be 2-100 characters"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom = "super::validate_phone")]
    pub phone: String,
    #[validate(length(min = 2, max = 100, message = "must be 2-100 characters"))]
    pub role_applied: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub qualification: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub experience_level: Option<String>,
    #[validate(length(max = 20, message = "at most 20 skills"))]
    pub skills: Option<Vec<String>>,
    #[validate(url(message = "must be a valid URL"))]
    pub resume_url: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub portfolio_url: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub availability: Option<String>,
}

impl CreateCareerPayload {
    pub fn normalize(&mut self) {
        self.full_name = squish(&self.full_name);
        self.email = normalize_email(&self.email);
        self.phone = squish(&self.phone);
        self.role_applied = squish(&self.role_applied);
        squish_opt(&mut self.location);
        squish_opt(&mut self.qualification);
        squish_opt(&mut self.experience_level);
        if let Some(skills) = &mut self.skills {
            skills.retain(|s| !s.trim().is_empty());
            for skill in skills.iter_mut() {
                *skill = squish(skill);
            }
        }
        squish_opt(&mut self.resume_url);
        squish_opt(&mut self.portfolio_url);
        squish_opt(&mut self.availability);
    }

    pub fn into_record(self) -> Result<CareerApplication, ApiError> {
        Ok(CareerApplication {
            id: None,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            role_applied: self.role_applied,
            location: self.location,
            qualification: self.qualification,
            experience_level: self.experience_level,
            skills: self.skills.unwrap_or_default(),
            resume_url: self.resume_url,
            portfolio_url: self.portfolio_url,
            availability: self.availability,
            status: CareerStatus::Applied,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateCareerPayload {
        CreateCareerPayload {
            full_name: "Arjun Mehta".to_string(),
            email: "arjun@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            role_applied: "Backend Engineer".to_string(),
            location: None,
            qualification: None,
            experience_level: Some("Mid".to_string()),
            skills: Some(vec!["Rust".to_string(), "MongoDB".to_string()]),
            resume_url: Some("https://example.com/resume.pdf".to_string()),
            portfolio_url: None,
            availability: None,
        }
    }

    #[test]
    fn valid_application_passes_and_defaults_to_applied() {
        let mut p = payload();
        p.normalize();
        p.validate().unwrap();
        let record = p.into_record().unwrap();
        assert_eq!(record.status, CareerStatus::Applied);
        assert_eq!(record.skills.len(), 2);
    }

    #[test]
    fn more_than_twenty_skills_is_rejected() {
        let mut p = payload();
        p.skills = Some((0..21).map(|i| format!("skill-{i}")).collect());
        p.normalize();
        assert!(p.validate().is_err());
    }

    #[test]
    fn malformed_resume_url_is_rejected() {
        let mut p = payload();
        p.resume_url = Some("not-a-url".to_string());
        p.normalize();
        assert!(p.validate().is_err());
    }

    #[test]
    fn blank_skills_are_dropped_during_normalization() {
        let mut p = payload();
        p.skills = Some(vec![" Rust ".to_string(), "   ".to_string()]);
        p.normalize();
        assert_eq!(p.skills, Some(vec!["Rust".to_string()]));
    }

    #[test]
    fn status_parses_only_the_closed_set() {
        assert_eq!("Shortlisted".parse::<CareerStatus>().unwrap(), CareerStatus::Shortlisted);
        assert!("Hired".parse::<CareerStatus>().is_err());
    }
}
