use mongodb::Database;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, options, post, routes, State};
use serde_json::{json, Value};
use validator::Validate;

use crate::models::career::{CareerStatus, CreateCareerPayload};
use crate::models::contact::CreateContactPayload;
use crate::models::internship::{CreateInternshipPayload, InternshipStatus};
use crate::repo::{self, ListParams};
use crate::utils::error::ApiError;

/// Answers CORS preflight for every path, before any auth. The response
/// headers come from the CORS fairing.
#[options("/<_..>")]
pub fn preflight() {}

#[post("/contact", data = "<payload>")]
pub async fn submit_contact(
    db: &State<Database>,
    payload: Json<CreateContactPayload>,
) -> Result<Custom<Json<Value>>, ApiError> {
    let mut payload = payload.into_inner();
    payload.normalize();
    payload.validate().map_err(ApiError::from)?;
    let contact = payload.into_record()?;
    let saved = repo::contacts::insert(db, contact).await?;

    Ok(Custom(
        Status::Created,
        Json(json!({
            "success": true,
            "data": {
                "id": saved.id.map(|id| id.to_hex()),
                "full_name": saved.full_name,
                "email": saved.email,
                "created_at": saved.created_at,
            }
        })),
    ))
}

#[post("/applications", data = "<payload>")]
pub async fn submit_application(
    db: &State<Database>,
    payload: Json<CreateCareerPayload>,
) -> Result<Custom<Json<Value>>, ApiError> {
    let mut payload = payload.into_inner();
    payload.normalize();
    payload.validate().map_err(ApiError::from)?;
    let application = payload.into_record()?;
    let saved = repo::careers::insert(db, application).await?;

    Ok(Custom(
        Status::Created,
        Json(json!({
            "success": true,
            "data": {
                "id": saved.id.map(|id| id.to_hex()),
                "full_name": saved.full_name,
                "email": saved.email,
                "role_applied": saved.role_applied,
                "status": saved.status,
                "created_at": saved.created_at,
            }
        })),
    ))
}

#[get("/applications?<status>&<role>&<limit>")]
pub async fn list_applications(
    db: &State<Database>,
    status: Option<String>,
    role: Option<String>,
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
    let page = repo::careers::list(db, filter, ListParams::new(None, limit)).await?;
    Ok(Json(json!({
        "success": true,
        "data": page.items,
        "count": page.total,
    })))
}

#[post("/internships", data = "<payload>")]
pub async fn submit_internship(
    db: &State<Database>,
    payload: Json<CreateInternshipPayload>,
) -> Result<Custom<Json<Value>>, ApiError> {
    let mut payload = payload.into_inner();
    payload.normalize();
    payload.validate().map_err(ApiError::from)?;
    let application = payload.into_record()?;
    let saved = repo::internships::insert(db, application).await?;

    Ok(Custom(
        Status::Created,
        Json(json!({
            "success": true,
            "data": {
                "id": saved.id.map(|id| id.to_hex()),
                "full_name": saved.full_name,
                "email": saved.email,
                "domain": saved.domain,
                "status": saved.status,
                "created_at": saved.created_at,
            }
        })),
    ))
}

#[get("/internships?<domain>&<upcoming>&<stats>&<limit>")]
pub async fn list_internships(
    db: &State<Database>,
    domain: Option<String>,
    upcoming: Option<bool>,
    stats: Option<bool>,
    limit: Option<u64>,
) -> Result<Json<Value>, ApiError> {
    if stats.unwrap_or(false) {
        let summary = repo::internships::stats(db).await?;
        return Ok(Json(json!({ "success": true, "data": summary })));
    }

    let filter = repo::internships::InternshipFilter {
        status: None::<InternshipStatus>,
        domain,
        upcoming: upcoming.unwrap_or(false),
    };
    let page = repo::internships::list(db, filter, ListParams::new(None, limit)).await?;
    Ok(Json(json!({
        "success": true,
        "data": page.items,
        "count": page.total,
    })))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        preflight,
        submit_contact,
        submit_application,
        list_applications,
        submit_internship,
        list_internships,
    ]
}
