use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{normalize_email, squish, squish_opt};
use crate::utils::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Archived,
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactStatus::New => write!(f, "New"),
            ContactStatus::InProgress => write!(f, "In Progress"),
            ContactStatus::Resolved => write!(f, "Resolved"),
            ContactStatus::Archived => write!(f, "Archived"),
        }
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(ContactStatus::New),
            "In Progress" => Ok(ContactStatus::InProgress),
            "Resolved" => Ok(ContactStatus::Resolved),
            "Archived" => Ok(ContactStatus::Archived),
            _ => Err("must be one of: New, In Progress, Resolved, Archived".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactSource {
    #[serde(rename = "Contact Page")]
    ContactPage,
    Footer,
    #[serde(rename = "CTA")]
    Cta,
}

impl std::str::FromStr for ContactSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Contact Page" => Ok(ContactSource::ContactPage),
            "Footer" => Ok(ContactSource::Footer),
            "CTA" => Ok(ContactSource::Cta),
            _ => Err("must be one of: Contact Page, Footer, CTA".to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    pub source: ContactSource,
    pub status: ContactStatus,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactPayload {
    #[validate(length(min = 2, max = 100, message = "must be 2-100 characters"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom = "super::validate_phone")]
    pub phone: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub subject: Option<String>,
    #[validate(length(min = 10, max = 2000, message = "must be 10-2000 characters"))]
    pub message: String,
    pub source: Option<String>,
}

impl CreateContactPayload {
    pub fn normalize(&mut self) {
        self.full_name = squish(&self.full_name);
        self.email = normalize_email(&self.email);
        squish_opt(&mut self.phone);
        squish_opt(&mut self.subject);
        self.message = self.message.trim().to_string();
        squish_opt(&mut self.source);
    }

    pub fn into_record(self) -> Result<Contact, ApiError> {
        let source = match self.source.as_deref() {
            Some(raw) => raw
                .parse()
                .map_err(|e| ApiError::Validation(format!("source: {e}")))?,
            None => ContactSource::ContactPage,
        };
        Ok(Contact {
            id: None,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            message: self.message,
            source,
            status: ContactStatus::New,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateContactPayload {
        CreateContactPayload {
            full_name: "  Jane   Doe ".to_string(),
            email: " Jane@X.com ".to_string(),
            phone: None,
            subject: Some("  ".to_string()),
            message: " Hello there, need help ".to_string(),
            source: None,
        }
    }

    #[test]
    fn normalize_then_validate_accepts_a_clean_submission() {
        let mut p = payload();
        p.normalize();
        assert_eq!(p.full_name, "Jane Doe");
        assert_eq!(p.email, "jane@x.com");
        assert_eq!(p.subject, None);
        p.validate().unwrap();
    }

    #[test]
    fn short_message_fails_validation() {
        let mut p = payload();
        p.message = "hi".to_string();
        p.normalize();
        assert!(p.validate().is_err());
    }

    #[test]
    fn record_defaults_to_new_status_and_contact_page() {
        let mut p = payload();
        p.normalize();
        let contact = p.into_record().unwrap();
        assert_eq!(contact.status, ContactStatus::New);
        assert_eq!(contact.source, ContactSource::ContactPage);
        assert!(contact.id.is_none());
    }

    #[test]
    fn unknown_source_is_rejected() {
        let mut p = payload();
        p.source = Some("Billboard".to_string());
        p.normalize();
        let err = p.into_record().unwrap_err();
        assert!(err.to_string().contains("source"));
    }

    #[test]
    fn status_parses_only_the_closed_set() {
        assert_eq!("In Progress".parse::<ContactStatus>().unwrap(), ContactStatus::InProgress);
        assert!("Deleted".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn status_display_matches_wire_labels() {
        let json = serde_json::to_value(ContactStatus::InProgress).unwrap();
        assert_eq!(json, ContactStatus::InProgress.to_string());
    }
}
