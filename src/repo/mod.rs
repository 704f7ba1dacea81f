pub mod careers;
pub mod contacts;
pub mod internships;

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc, Document};
use mongodb::error::{Error as DbError, ErrorKind, WriteFailure};
use mongodb::options::FindOptions;
use mongodb::Collection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::utils::error::ApiError;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// Offset pagination inputs, clamped to sane bounds. Page numbering is
/// 1-based; a concurrent insert between page fetches may shift results,
/// which is acceptable for a triage view.
#[derive(Debug, Clone, Copy)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
}

impl ListParams {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        ListParams {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

pub fn parse_object_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::Validation(format!("invalid id: {id}")))
}

/// Duplicate-insert races are resolved by the unique indexes; the driver
/// reports them as write error 11000.
pub fn is_duplicate_key(err: &DbError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}

/// Shared list shape: filtered, newest first, offset-paginated with a
/// total count alongside the items.
pub async fn find_page<T>(
    collection: &Collection<T>,
    filter: Document,
    params: ListParams,
) -> Result<Page<T>, ApiError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let total = collection.count_documents(filter.clone(), None).await?;
    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .skip((params.page - 1) * params.limit)
        .limit(params.limit as i64)
        .build();
    let mut cursor = collection.find(filter, options).await?;
    let mut items = Vec::new();
    while let Some(item) = cursor.try_next().await? {
        items.push(item);
    }
    Ok(Page {
        items,
        total,
        page: params.page,
        limit: params.limit,
        total_pages: total_pages(total, params.limit),
    })
}

#[derive(Debug, Serialize, serde::Deserialize)]
pub struct GroupCount {
    #[serde(rename = "_id")]
    pub key: String,
    pub count: i64,
}

/// Counts records grouped by one field, largest group first.
pub async fn group_counts<T>(
    collection: &Collection<T>,
    field: &str,
) -> Result<Vec<GroupCount>, ApiError> {
    let pipeline = vec![
        doc! { "$group": { "_id": format!("${field}"), "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1, "_id": 1 } },
    ];
    let mut cursor = collection.aggregate(pipeline, None).await?;
    let mut groups = Vec::new();
    while let Some(document) = cursor.try_next().await? {
        groups.push(bson::from_document(document).map_err(|_| ApiError::Internal)?);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn list_params_are_clamped() {
        let params = ListParams::new(None, None);
        assert_eq!((params.page, params.limit), (1, DEFAULT_LIMIT));

        let params = ListParams::new(Some(0), Some(0));
        assert_eq!((params.page, params.limit), (1, 1));

        let params = ListParams::new(Some(2), Some(1000));
        assert_eq!((params.page, params.limit), (2, MAX_LIMIT));
    }

    #[test]
    fn bad_object_ids_are_a_validation_error() {
        assert!(parse_object_id("not-an-oid").is_err());
        assert!(parse_object_id("507f1f77bcf86cd799439011").is_ok());
    }
}
