use bson::oid::ObjectId;
use mongodb::Client;

use issue_tracker::models::{timestamp_now, IssueFilter, IssueUpdate, NewIssue};
use issue_tracker::store::{IssueStore, MongoIssueStore};

/// Store over a fresh collection; needs a reachable MongoDB
async fn test_store() -> MongoIssueStore {
    dotenvy::dotenv().ok();

    let url = std::env::var("MONGODB_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let client = Client::with_uri_str(&url).await.unwrap();
    let db = client.database("issue_tracker_test");

    MongoIssueStore::new(&db, &format!("issues_{}", ObjectId::new().to_hex()))
}

fn new_issue(project: &str) -> NewIssue {
    NewIssue::new(
        project.to_string(),
        "Title".to_string(),
        "Text".to_string(),
        "Me".to_string(),
        Some("Bob".to_string()),
        None,
        timestamp_now(),
    )
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_mongo_issue_lifecycle() {
    let store = test_store().await;

    let issue = store.insert(new_issue("apitest")).await.unwrap();
    store.insert(new_issue("other")).await.unwrap();
    assert_eq!(issue.created_on, issue.updated_on);

    let found = store.find_one(&issue.id).await.unwrap().unwrap();
    assert_eq!(found, issue);

    let listed = store
        .find_many(&IssueFilter::for_project("apitest"))
        .await
        .unwrap();
    assert_eq!(listed, vec![issue.clone()]);

    let update = IssueUpdate {
        status_text: Some("Pending".to_string()),
        open: Some(false),
        ..Default::default()
    };
    let stamp = issue.updated_on + time::Duration::milliseconds(5);
    assert!(store.update_fields(&issue.id, &update, stamp).await.unwrap());

    let closed = store
        .find_many(&IssueFilter {
            open: Some(false),
            ..IssueFilter::for_project("apitest")
        })
        .await
        .unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].status_text, "Pending");
    assert_eq!(closed[0].updated_on, stamp);

    assert_eq!(store.delete_one(&issue.id).await.unwrap(), 1);
    assert_eq!(store.delete_one(&issue.id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_mongo_rejects_malformed_id() {
    let store = test_store().await;

    assert!(store.find_one("not-an-id").await.is_err());
    assert!(store.delete_one("not-an-id").await.is_err());
}
