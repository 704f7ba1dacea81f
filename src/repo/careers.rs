use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use serde::Serialize;

use crate::models::career::{CareerApplication, CareerStatus};
use crate::repo::{find_page, group_counts, is_duplicate_key, GroupCount, ListParams, Page};
use crate::utils::error::ApiError;

fn collection(db: &Database) -> Collection<CareerApplication> {
    db.collection("career_applications")
}

#[derive(Debug, Default)]
pub struct CareerFilter {
    pub status: Option<CareerStatus>,
    pub role_applied: Option<String>,
}

impl CareerFilter {
    fn into_document(self) -> Document {
        let mut filter = Document::new();
        if let Some(status) = self.status {
            filter.insert("status", status.to_string());
        }
        if let Some(role) = self.role_applied {
            filter.insert("role_applied", role);
        }
        filter
    }
}

pub async fn insert(
    db: &Database,
    mut application: CareerApplication,
) -> Result<CareerApplication, ApiError> {
    let result = collection(db)
        .insert_one(&application, None)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                ApiError::Conflict("An application for this role already exists for this email")
            } else {
                ApiError::from(e)
            }
        })?;
    application.id = result.inserted_id.as_object_id();
    Ok(application)
}

pub async fn list(
    db: &Database,
    filter: CareerFilter,
    params: ListParams,
) -> Result<Page<CareerApplication>, ApiError> {
    find_page(&collection(db), filter.into_document(), params).await
}

pub async fn update_status(
    db: &Database,
    id: ObjectId,
    status: CareerStatus,
) -> Result<Option<CareerApplication>, ApiError> {
    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let updated = collection(db)
        .find_one_and_update(
            doc! { "_id": id },
            doc! { "$set": { "status": status.to_string() } },
            options,
        )
        .await?;
    Ok(updated)
}

pub async fn delete(db: &Database, id: ObjectId) -> Result<bool, ApiError> {
    let result = collection(db).delete_one(doc! { "_id": id }, None).await?;
    Ok(result.deleted_count > 0)
}

#[derive(Debug, Serialize)]
pub struct CareerStats {
    pub total: u64,
    pub by_status: Vec<GroupCount>,
}

pub async fn stats(db: &Database) -> Result<CareerStats, ApiError> {
    let collection = collection(db);
    Ok(CareerStats {
        total: collection.count_documents(None, None).await?,
        by_status: group_counts(&collection, "status").await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_document_only_carries_set_fields() {
        let filter = CareerFilter {
            status: Some(CareerStatus::Shortlisted),
            role_applied: None,
        }
        .into_document();
        assert_eq!(filter.get_str("status").unwrap(), "Shortlisted");
        assert!(filter.get("role_applied").is_none());
    }
}
