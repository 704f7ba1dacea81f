use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use rocket::serde::json::Json;
use rocket::{delete, get, patch, post, routes, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::models::admin::{Admin, AdminPublic};
use crate::models::career::CareerStatus;
use crate::models::contact::ContactStatus;
use crate::models::internship::InternshipStatus;
use crate::repo::{self, parse_object_id, ListParams};
use crate::utils::auth::{create_jwt, verify_password, AdminAuth, SuperAdminAuth};
use crate::utils::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
}

#[post("/login", data = "<payload>")]
pub async fn login(
    db: &State<Database>,
    config: &State<Config>,
    payload: Json<LoginPayload>,
) -> Result<Json<Value>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("email and password are required".to_string()));
    }

    // Unknown email and wrong password must be indistinguishable.
    let collection: Collection<Admin> = db.collection("admins");
    let mut admin = collection
        .find_one(doc! { "email": &email }, None)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    if !verify_password(&payload.password, &admin.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let now = Utc::now();
    let last_login = bson::to_bson(&now).map_err(|_| ApiError::Internal)?;
    collection
        .update_one(
            doc! { "_id": admin.id },
            doc! { "$set": { "last_login": last_login } },
            None,
        )
        .await?;
    admin.last_login = Some(now);

    let id = admin.id.map(|id| id.to_hex()).unwrap_or_default();
    let token =
        create_jwt(&id, &admin.email, admin.role, &config.jwt_secret).map_err(|_| ApiError::Internal)?;

    Ok(Json(json!({
        "success": true,
        "data": { "token": token, "admin": AdminPublic::from(&admin) }
    })))
}

#[get("/me")]
pub fn me(admin: AdminAuth) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": { "id": admin.id, "email": admin.email, "role": admin.role }
    }))
}

/// Admin accounts are seed-managed; this listing is the only in-band view
/// of them and is restricted to super admins.
#[get("/admins")]
pub async fn list_admins(
    db: &State<Database>,
    _admin: SuperAdminAuth,
) -> Result<Json<Value>, ApiError> {
    let collection: Collection<Admin> = db.collection("admins");
    let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
    let mut cursor = collection.find(None, options).await?;
    let mut admins = Vec::new();
    while let Some(admin) = cursor.try_next().await? {
        admins.push(AdminPublic::from(&admin));
    }
    Ok(Json(json!({ "success": true, "data": admins })))
}

// --- Contacts ---

#[get("/contacts?<status>&<source>&<page>&<limit>")]
pub async fn list_contacts(
    db: &State<Database>,
    _admin: AdminAuth,
    status: Option<String>,
    source: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
) -> Result<Json<Value>, ApiError> {
    let status = status
        .map(|s| s.parse::<ContactStatus>())
        .transpose()
        .map_err(|e| ApiError::Validation(format!("status: {e}")))?;
    let filter = repo::contacts::ContactFilter { status, source };
    let result = repo::contacts::list(db, filter, ListParams::new(page, limit)).await?;
    Ok(Json(json!({ "success": true, "data": result })))
}

#[patch("/contacts/<id>/status", data = "<payload>")]
pub async fn update_contact_status(
    db: &State<Database>,
    _admin: AdminAuth,
    id: &str,
    payload: Json<UpdateStatusPayload>,
) -> Result<Json<Value>, ApiError> {
    let status: ContactStatus = payload
        .status
        .parse()
        .map_err(|e| ApiError::Validation(format!("status: {e}")))?;
    let updated = repo::contacts::update_status(db, parse_object_id(id)?, status)
        .await?
        .ok_or(ApiError::NotFound("Contact"))?;
    Ok(Json(json!({ "success": true, "data": updated })))
}

#[delete("/contacts/<id>")]
pub async fn delete_contact(
    db: &State<Database>,
    _admin: AdminAuth,
    id: &str,
) -> Result<Json<Value>, ApiError> {
    let deleted = repo::contacts::delete(db, parse_object_id(id)?).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": deleted } })))
}

// --- Career applications ---

#[get("/careers?<status>&<role>&<page>&<limit>")]
pub async fn list_careers(
    db: &State<Database>,
    _admin: AdminAuth,
    status: Option<String>,
    role: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
) -> Result<Json<Value>, ApiError> {
    let status = status
        .map(|s| s.parse::<CareerStatus>())
        .transpose()
        .map_err(|e| ApiError::Validation(format!("status: {e}")))?;
    let filter = repo::careers::CareerFilter {
        status,
        role_applied: role,
    };
    let result = repo::careers::list(db, filter, ListParams::new(page, limit)).await?;
    Ok(Json(json!({ "success": true, "data": result })))
}

#[patch("/careers/<id>/status", data = "<payload>")]
pub async fn update_career_status(
    db: &State<Database>,
    _admin: AdminAuth,
    id: &str,
    payload: Json<UpdateStatusPayload>,
) -> Result<Json<Value>, ApiError> {
    let status: CareerStatus = payload
        .status
        .parse()
        .map_err(|e| ApiError::Validation(format!("status: {e}")))?;
    let updated = repo::careers::update_status(db, parse_object_id(id)?, status)
        .await?
        .ok_or(ApiError::NotFound("Application"))?;
    Ok(Json(json!({ "success": true, "data": updated })))
}

#[delete("/careers/<id>")]
pub async fn delete_career(
    db: &State<Database>,
    _admin: AdminAuth,
    id: &str,
) -> Result<Json<Value>, ApiError> {
    let deleted = repo::careers::delete(db, parse_object_id(id)?).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": deleted } })))
}

// --- Internship applications ---

#[get("/internships?<status>&<domain>&<page>&<limit>")]
pub async fn list_internships(
    db: &State<Database>,
    _admin: AdminAuth,
    status: Option<String>,
    domain: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
) -> Result<Json<Value>, ApiError> {
    let status = status
        .map(|s| s.parse::<InternshipStatus>())
        .transpose()
        .map_err(|e| ApiError::Validation(format!("status: {e}")))?;
    let filter = repo::internships::InternshipFilter {
        status,
        domain,
        upcoming: false,
    };
    let result = repo::internships::list(db, filter, ListParams::new(page, limit)).await?;
    Ok(Json(json!({ "success": true, "data": result })))
}

#[patch("/internships/<id>/status", data = "<payload>")]
pub async fn update_internship_status(
    db: &State<Database>,
    _admin: AdminAuth,
    id: &str,
    payload: Json<UpdateStatusPayload>,
) -> Result<Json<Value>, ApiError> {
    let status: InternshipStatus = payload
        .status
        .parse()
        .map_err(|e| ApiError::Validation(format!("status: {e}")))?;
    let updated = repo::internships::update_status(db, parse_object_id(id)?, status)
        .await?
        .ok_or(ApiError::NotFound("Application"))?;
    Ok(Json(json!({ "success": true, "data": updated })))
}

#[delete("/internships/<id>")]
pub async fn delete_internship(
    db: &State<Database>,
    _admin: AdminAuth,
    id: &str,
) -> Result<Json<Value>, ApiError> {
    let deleted = repo::internships::delete(db, parse_object_id(id)?).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": deleted } })))
}

// --- Dashboard ---

#[get("/stats")]
pub async fn dashboard_stats(
    db: &State<Database>,
    _admin: AdminAuth,
) -> Result<Json<Value>, ApiError> {
    let contacts = repo::contacts::stats(db).await?;
    let careers = repo::careers::stats(db).await?;
    let internships = repo::internships::stats(db).await?;
    Ok(Json(json!({
        "success": true,
        "data": {
            "contacts": contacts,
            "careers": careers,
            "internships": internships,
        }
    })))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        login,
        me,
        list_admins,
        list_contacts,
        update_contact_status,
        delete_contact,
        list_careers,
        update_career_status,
        delete_career,
        list_internships,
        update_internship_status,
        delete_internship,
        dashboard_stats,
    ]
}
