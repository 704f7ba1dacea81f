use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super_admin")]
    SuperAdmin,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminRole::Admin => write!(f, "admin"),
            AdminRole::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

/// Stored admin account. Accounts are created by the seed binary only;
/// there is no registration endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// Hash-free projection returned by every admin-facing response.
#[derive(Debug, Serialize)]
pub struct AdminPublic {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&Admin> for AdminPublic {
    fn from(admin: &Admin) -> Self {
        AdminPublic {
            id: admin.id.map(|id| id.to_hex()),
            name: admin.name.clone(),
            email: admin.email.clone(),
            role: admin.role,
            created_at: admin.created_at,
            last_login: admin.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_projection_drops_the_hash() {
        let admin = Admin {
            id: None,
            name: "Root".to_string(),
            email: "root@agency.dev".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            role: AdminRole::SuperAdmin,
            created_at: Utc::now(),
            last_login: None,
        };
        let json = serde_json::to_value(AdminPublic::from(&admin)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "super_admin");
    }
}
