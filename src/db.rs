use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::Config;
use crate::models::admin::Admin;
use crate::models::career::CareerApplication;
use crate::models::contact::Contact;
use crate::models::internship::InternshipApplication;

pub async fn init_db(config: &Config) -> Database {
    let mut client_options = ClientOptions::parse(&config.mongodb_uri)
        .await
        .expect("invalid MONGODB_URI");
    client_options.app_name = Some("agency_api".to_string());
    client_options.server_selection_timeout = Some(Duration::from_secs(5));

    let client = Client::with_options(client_options).expect("failed to build MongoDB client");
    let db_name = config
        .mongodb_uri
        .split('/')
        .last()
        .and_then(|s| s.split('?').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("agency_db");
    client.database(db_name)
}

/// Creates the unique and sort indexes the repositories rely on. Duplicate
/// submissions are rejected by these indexes, not by application-level locks.
pub async fn ensure_indexes(db: &Database) -> mongodb::error::Result<()> {
    let unique = |keys| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };

    let admins: Collection<Admin> = db.collection("admins");
    admins.create_index(unique(doc! { "email": 1 }), None).await?;

    let contacts: Collection<Contact> = db.collection("contacts");
    contacts
        .create_index(IndexModel::builder().keys(doc! { "created_at": -1 }).build(), None)
        .await?;
    contacts
        .create_index(IndexModel::builder().keys(doc! { "status": 1 }).build(), None)
        .await?;

    let careers: Collection<CareerApplication> = db.collection("career_applications");
    careers
        .create_index(unique(doc! { "email": 1, "role_applied": 1 }), None)
        .await?;
    careers
        .create_index(IndexModel::builder().keys(doc! { "created_at": -1 }).build(), None)
        .await?;

    let internships: Collection<InternshipApplication> = db.collection("internship_applications");
    internships
        .create_index(unique(doc! { "email": 1, "domain": 1 }), None)
        .await?;
    internships
        .create_index(IndexModel::builder().keys(doc! { "created_at": -1 }).build(), None)
        .await?;

    Ok(())
}
