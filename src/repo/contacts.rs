use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use serde::Serialize;

use crate::models::contact::{Contact, ContactStatus};
use crate::repo::{find_page, group_counts, GroupCount, ListParams, Page};
use crate::utils::error::ApiError;

fn collection(db: &Database) -> Collection<Contact> {
    db.collection("contacts")
}

#[derive(Debug, Default)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub source: Option<String>,
}

impl ContactFilter {
    fn into_document(self) -> Document {
        let mut filter = Document::new();
        if let Some(status) = self.status {
            filter.insert("status", status.to_string());
        }
        if let Some(source) = self.source {
            filter.insert("source", source);
        }
        filter
    }
}

pub async fn insert(db: &Database, mut contact: Contact) -> Result<Contact, ApiError> {
    let result = collection(db).insert_one(&contact, None).await?;
    contact.id = result.inserted_id.as_object_id();
    Ok(contact)
}

pub async fn list(
    db: &Database,
    filter: ContactFilter,
    params: ListParams,
) -> Result<Page<Contact>, ApiError> {
    find_page(&collection(db), filter.into_document(), params).await
}

pub async fn update_status(
    db: &Database,
    id: ObjectId,
    status: ContactStatus,
) -> Result<Option<Contact>, ApiError> {
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

/// Idempotent: deleting an id that no longer exists reports `false`
/// rather than an error.
pub async fn delete(db: &Database, id: ObjectId) -> Result<bool, ApiError> {
    let result = collection(db).delete_one(doc! { "_id": id }, None).await?;
    Ok(result.deleted_count > 0)
}

#[derive(Debug, Serialize)]
pub struct ContactStats {
    pub total: u64,
    pub by_status: Vec<GroupCount>,
    pub by_source: Vec<GroupCount>,
}

pub async fn stats(db: &Database) -> Result<ContactStats, ApiError> {
    let collection = collection(db);
    Ok(ContactStats {
        total: collection.count_documents(None, None).await?,
        by_status: group_counts(&collection, "status").await?,
        by_source: group_counts(&collection, "source").await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_document_only_carries_set_fields() {
        let filter = ContactFilter::default().into_document();
        assert!(filter.is_empty());

        let filter = ContactFilter {
            status: Some(ContactStatus::InProgress),
            source: Some("Footer".to_string()),
        }
        .into_document();
        assert_eq!(filter.get_str("status").unwrap(), "In Progress");
        assert_eq!(filter.get_str("source").unwrap(), "Footer");
    }
}
