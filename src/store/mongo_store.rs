use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::models::{Issue, IssueFilter, IssueUpdate, NewIssue};
use crate::store::IssueStore;

/// Issue as stored in MongoDB
#[derive(Debug, Serialize, Deserialize)]
struct IssueDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    issue_title: String,
    issue_text: String,
    created_by: String,
    created_on: bson::DateTime,
    updated_on: bson::DateTime,
    #[serde(default)]
    assigned_to: String,
    #[serde(default)]
    status_text: String,
    #[serde(default = "default_open")]
    open: bool,
    project: String,
}

fn default_open() -> bool {
    true
}

impl From<IssueDocument> for Issue {
    fn from(d: IssueDocument) -> Self {
        Self {
            assigned_to: d.assigned_to,
            status_text: d.status_text,
            open: d.open,
            id: d.id.to_hex(),
            issue_title: d.issue_title,
            issue_text: d.issue_text,
            created_by: d.created_by,
            created_on: d.created_on.to_time_0_3(),
            updated_on: d.updated_on.to_time_0_3(),
            project: d.project,
        }
    }
}

/// MongoDB-backed issue store
#[derive(Clone)]
pub struct MongoIssueStore {
    collection: Collection<IssueDocument>,
}

impl MongoIssueStore {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<IssueDocument>(collection_name),
        }
    }

    fn object_id(id: &str) -> AppResult<ObjectId> {
        ObjectId::parse_str(id).map_err(|_| AppError::Validation(format!("Invalid _id: {}", id)))
    }

    fn filter_document(filter: &IssueFilter) -> AppResult<Document> {
        let mut query = doc! { "project": filter.project.as_str() };

        if let Some(id) = &filter.id {
            query.insert("_id", Self::object_id(id)?);
        }
        let text_terms = [
            ("issue_title", &filter.issue_title),
            ("issue_text", &filter.issue_text),
            ("created_by", &filter.created_by),
            ("assigned_to", &filter.assigned_to),
            ("status_text", &filter.status_text),
        ];
        for (key, value) in text_terms {
            if let Some(value) = value {
                query.insert(key, value.as_str());
            }
        }
        if let Some(open) = filter.open {
            query.insert("open", open);
        }
        if let Some(created_on) = filter.created_on {
            query.insert("created_on", bson::DateTime::from_time_0_3(created_on));
        }
        if let Some(updated_on) = filter.updated_on {
            query.insert("updated_on", bson::DateTime::from_time_0_3(updated_on));
        }

        Ok(query)
    }

    fn set_document(update: &IssueUpdate, updated_on: OffsetDateTime) -> Document {
        let mut set = doc! { "updated_on": bson::DateTime::from_time_0_3(updated_on) };

        let text_fields = [
            ("issue_title", &update.issue_title),
            ("issue_text", &update.issue_text),
            ("created_by", &update.created_by),
            ("assigned_to", &update.assigned_to),
            ("status_text", &update.status_text),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                set.insert(key, value.as_str());
            }
        }
        if let Some(open) = update.open {
            set.insert("open", open);
        }

        set
    }
}

#[async_trait]
impl IssueStore for MongoIssueStore {
    async fn insert(&self, issue: NewIssue) -> AppResult<Issue> {
        let created_on = bson::DateTime::from_time_0_3(issue.created_on);
        let doc = IssueDocument {
            id: ObjectId::new(),
            issue_title: issue.issue_title,
            issue_text: issue.issue_text,
            created_by: issue.created_by,
            created_on,
            updated_on: created_on,
            assigned_to: issue.assigned_to,
            status_text: issue.status_text,
            open: issue.open,
            project: issue.project,
        };

        self.collection
            .insert_one(&doc)
            .await
            .map_err(|e| AppError::Database(format!("MongoDB insert error: {}", e)))?;

        tracing::debug!(issue_id = %doc.id, "Issue document inserted");

        Ok(doc.into())
    }

    async fn find_many(&self, filter: &IssueFilter) -> AppResult<Vec<Issue>> {
        let query = Self::filter_document(filter)?;

        let docs: Vec<IssueDocument> = self
            .collection
            .find(query)
            .await?
            .try_collect()
            .await?;

        Ok(docs.into_iter().map(|d| d.into()).collect())
    }

    async fn find_one(&self, id: &str) -> AppResult<Option<Issue>> {
        let oid = Self::object_id(id)?;

        let doc = self.collection.find_one(doc! { "_id": oid }).await?;

        Ok(doc.map(|d| d.into()))
    }

    async fn update_fields(
        &self,
        id: &str,
        update: &IssueUpdate,
        updated_on: OffsetDateTime,
    ) -> AppResult<bool> {
        let oid = Self::object_id(id)?;
        let set = Self::set_document(update, updated_on);

        let result = self
            .collection
            .update_one(doc! { "_id": oid }, doc! { "$set": set })
            .await?;

        Ok(result.matched_count == 1)
    }

    async fn delete_one(&self, id: &str) -> AppResult<u64> {
        let oid = Self::object_id(id)?;

        let result = self.collection.delete_one(doc! { "_id": oid }).await?;

        Ok(result.deleted_count)
    }
}
