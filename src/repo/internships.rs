use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::models::internship::{InternshipApplication, InternshipStatus};
use crate::repo::{find_page, group_counts, is_duplicate_key, GroupCount, ListParams, Page};
use crate::utils::error::ApiError;

fn collection(db: &Database) -> Collection<InternshipApplication> {
    db.collection("internship_applications")
}

#[derive(Debug, Default)]
pub struct InternshipFilter {
    pub status: Option<InternshipStatus>,
    pub domain: Option<String>,
    pub upcoming: bool,
}

impl InternshipFilter {
    fn into_document(self) -> Result<Document, ApiError> {
        let mut filter = Document::new();
        if let Some(status) = self.status {
            filter.insert("status", status.to_string());
        }
        if let Some(domain) = self.domain {
            filter.insert("domain", domain);
        }
        if self.upcoming {
            let now = bson::to_bson(&Utc::now()).map_err(|_| ApiError::Internal)?;
            filter.insert("start_date", doc! { "$gte": now });
        }
        Ok(filter)
    }
}

pub async fn insert(
    db: &Database,
    mut application: InternshipApplication,
) -> Result<InternshipApplication, ApiError> {
    let result = collection(db)
        .insert_one(&application, None)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                ApiError::Conflict("An application for this domain already exists for this email")
            } else {
                ApiError::from(e)
            }
        })?;
    application.id = result.inserted_id.as_object_id();
    Ok(application)
}

pub async fn list(
    db: &Database,
    filter: InternshipFilter,
    params: ListParams,
) -> Result<Page<InternshipApplication>, ApiError> {
    find_page(&collection(db), filter.into_document()?, params).await
}

pub async fn update_status(
    db: &Database,
    id: ObjectId,
    status: InternshipStatus,
) -> Result<Option<InternshipApplication>, ApiError> {
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

/// Per-domain rollup used by the dashboard: headcount plus revenue.
#[derive(Debug, Serialize, Deserialize)]
pub struct DomainStats {
    #[serde(rename = "_id")]
    pub domain: String,
    pub count: i64,
    pub total_price: f64,
    pub avg_price: f64,
}

#[derive(Debug, Serialize)]
pub struct InternshipStats {
    pub total: u64,
    pub by_status: Vec<GroupCount>,
    pub by_domain: Vec<DomainStats>,
}

pub async fn stats(db: &Database) -> Result<InternshipStats, ApiError> {
    let collection = collection(db);
    let pipeline = vec![
        doc! { "$group": {
            "_id": "$domain",
            "count": { "$sum": 1 },
            "total_price": { "$sum": "$price" },
            "avg_price": { "$avg": "$price" },
        } },
        doc! { "$sort": { "count": -1, "_id": 1 } },
    ];
    let mut cursor = collection.aggregate(pipeline, None).await?;
    let mut by_domain = Vec::new();
    while let Some(document) = cursor.try_next().await? {
        by_domain.push(bson::from_document(document).map_err(|_| ApiError::Internal)?);
    }
    Ok(InternshipStats {
        total: collection.count_documents(None, None).await?,
        by_status: group_counts(&collection, "status").await?,
        by_domain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_document_only_carries_set_fields() {
        let filter = InternshipFilter {
            status: Some(InternshipStatus::Confirmed),
            domain: Some("Data Science".to_string()),
            upcoming: false,
        }
        .into_document()
        .unwrap();
        assert_eq!(filter.get_str("status").unwrap(), "Confirmed");
        assert_eq!(filter.get_str("domain").unwrap(), "Data Science");
        assert!(filter.get("start_date").is_none());
    }

    #[test]
    fn upcoming_adds_a_start_date_bound() {
        let filter = InternshipFilter {
            upcoming: true,
            ..Default::default()
        }
        .into_document()
        .unwrap();
        assert!(filter.get_document("start_date").unwrap().get("$gte").is_some());
    }
}
