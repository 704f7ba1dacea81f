use anyhow::Context;
use chrono::Utc;
use dotenvy::dotenv;
use mongodb::bson::doc;
use mongodb::Collection;

use agency_api::config::Config;
use agency_api::db::{ensure_indexes, init_db};
use agency_api::models::admin::{Admin, AdminRole};
use agency_api::models::normalize_email;
use agency_api::utils::auth::hash_password;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::from_env();
    let db = init_db(&config).await;

    ensure_indexes(&db).await.context("failed to create indexes")?;
    println!("Indexes created");

    let admins: Collection<Admin> = db.collection("admins");
    if admins.count_documents(None, None).await? == 0 {
        let password_hash =
            hash_password(&config.admin_password).context("failed to hash password")?;
        let admin = Admin {
            id: None,
            name: config.admin_name.clone(),
            email: normalize_email(&config.admin_email),
            password_hash,
            role: AdminRole::SuperAdmin,
            created_at: Utc::now(),
            last_login: None,
        };
        admins.insert_one(admin, None).await?;
        println!("Super admin created: {}", config.admin_email);
    } else {
        println!("Admin account already exists, skipping creation");
    }

    println!("Seeding complete");
    Ok(())
}
