#[macro_use]
extern crate rocket;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{Request, Response};
use serde_json::{json, Value};

use dotenvy::dotenv;

mod config;
mod db;
mod models;
mod repo;
mod routes;
mod utils;

use config::Config;
use db::{ensure_indexes, init_db};
use routes::{admin, public};
use utils::auth::AuthFailure;

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PATCH, OPTIONS, PUT, DELETE",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

fn failure(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "error": message }))
}

#[catch(400)]
fn bad_request() -> Json<Value> {
    failure("Malformed request body")
}

#[catch(401)]
fn unauthorized(request: &Request<'_>) -> Json<Value> {
    let AuthFailure(reason) = request.local_cache(|| AuthFailure(None));
    failure(reason.map_or("Authentication required", |r| r.message()))
}

#[catch(403)]
fn forbidden() -> Json<Value> {
    failure("Super admin access required")
}

#[catch(404)]
fn not_found() -> Json<Value> {
    failure("Resource not found")
}

#[catch(405)]
fn method_not_allowed() -> Json<Value> {
    failure("Method not allowed")
}

#[catch(422)]
fn unprocessable() -> Json<Value> {
    failure("Malformed request body")
}

#[catch(500)]
fn internal_error() -> Json<Value> {
    failure("Internal server error")
}

#[launch]
async fn rocket() -> _ {
    dotenv().ok();
    let config = Config::from_env();
    let db = init_db(&config).await;
    ensure_indexes(&db).await.expect("failed to create indexes");

    rocket::build()
        .manage(config)
        .manage(db)
        .attach(Cors)
        .mount("/api", public::routes())
        .mount("/api/admin", admin::routes())
        .register(
            "/",
            catchers![
                bad_request,
                unauthorized,
                forbidden,
                not_found,
                method_not_allowed,
                unprocessable,
                internal_error
            ],
        )
}
