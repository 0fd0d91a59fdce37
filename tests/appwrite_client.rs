// Appwrite client tests against a mock HTTP server

use beneficiary_dedup::services::{
    AppwriteClient, AppwriteCollections, AppwriteError, RecordRepository, RepositoryError,
};
use mockito::Matcher;
use serde_json::json;

const PARTICIPANTS_PATH: &str = "/databases/livelihood/collections/participants/documents";
const HOUSEHOLDS_PATH: &str = "/databases/livelihood/collections/households/documents";

fn client(base_url: String, page_size: usize) -> AppwriteClient {
    AppwriteClient::new(
        base_url,
        "test_key".to_string(),
        "test_project".to_string(),
        "livelihood".to_string(),
        AppwriteCollections {
            participants: "participants".to_string(),
            households: "households".to_string(),
        },
        page_size,
    )
    .unwrap()
}

fn offset_query(offset: usize) -> Matcher {
    Matcher::UrlEncoded(
        "queries[]".to_string(),
        json!({ "method": "offset", "values": [offset] }).to_string(),
    )
}

#[tokio::test]
async fn test_lists_participants_with_auth_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(Matcher::Any)
        .match_header("x-appwrite-key", "test_key")
        .match_header("x-appwrite-project", "test_project")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total": 2,
                "documents": [
                    {
                        "$id": "p1",
                        "name": "Maria Santos",
                        "address": "123 Main St",
                        "birthday": "1981-05-03"
                    },
                    { "$id": "p2", "name": "Juan Cruz", "address": null, "birthday": "1979-02-11" }
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let participants = client(server.url(), 100).list_participants().await.unwrap();

    mock.assert_async().await;
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0].record_id, "p1");
    assert_eq!(participants[1].address, "");
}

#[tokio::test]
async fn test_pages_until_total_reached() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(offset_query(0))
        .with_status(200)
        .with_body(
            json!({
                "total": 3,
                "documents": [
                    { "$id": "p1", "name": "Maria Santos" },
                    { "$id": "p2", "name": "Juan Cruz" }
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(offset_query(2))
        .with_status(200)
        .with_body(
            json!({
                "total": 3,
                "documents": [{ "$id": "p3", "name": "Rosa Cruz" }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let participants = client(server.url(), 2).list_participants().await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let ids: Vec<_> = participants.iter().map(|p| p.record_id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn test_server_page_cap_below_page_size_keeps_paging() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(offset_query(0))
        .with_status(200)
        .with_body(
            json!({
                "total": 4,
                "documents": [{ "$id": "p1" }, { "$id": "p2" }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(offset_query(2))
        .with_status(200)
        .with_body(
            json!({
                "total": 4,
                "documents": [{ "$id": "p3" }, { "$id": "p4" }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    // asks for 3 per page, server hands out 2
    let participants = client(server.url(), 3).list_participants().await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(participants.len(), 4);
}

#[tokio::test]
async fn test_empty_page_ends_listing_before_total() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(offset_query(0))
        .with_status(200)
        .with_body(
            json!({
                "total": 5,
                "documents": [{ "$id": "p1" }, { "$id": "p2" }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(offset_query(2))
        .with_status(200)
        .with_body(json!({ "total": 5, "documents": [] }).to_string())
        .expect(1)
        .create_async()
        .await;

    let participants = client(server.url(), 2).list_participants().await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(participants.len(), 2);
}

#[tokio::test]
async fn test_short_page_without_total_stops() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(offset_query(0))
        .with_status(200)
        .with_body(json!({ "documents": [{ "$id": "p1" }] }).to_string())
        .expect(1)
        .create_async()
        .await;

    let participants = client(server.url(), 2).list_participants().await.unwrap();

    mock.assert_async().await;
    assert_eq!(participants.len(), 1);
}

#[tokio::test]
async fn test_full_page_matching_total_stops() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "total": 2,
                "documents": [{ "$id": "p1" }, { "$id": "p2" }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let participants = client(server.url(), 2).list_participants().await.unwrap();

    mock.assert_async().await;
    assert_eq!(participants.len(), 2);
}

#[tokio::test]
async fn test_households_with_encoded_members() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", HOUSEHOLDS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "total": 2,
                "documents": [
                    {
                        "$id": "h1",
                        "householdName": "Cruz Family",
                        "householdAddress": "123 Main St",
                        "members": "[{\"name\":\"Juan Cruz\",\"birthday\":\"1979-02-11\"}]"
                    },
                    {
                        "$id": "h2",
                        "householdName": "Reyes Family",
                        "householdAddress": "1 Other Rd",
                        "members": [{ "name": "Pedro Reyes", "birthday": "1950-12-31" }]
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let households = client(server.url(), 100).list_households().await.unwrap();

    assert_eq!(households.len(), 2);
    assert_eq!(households[0].household_id, "h1");
    assert_eq!(households[0].members[0].name, "Juan Cruz");
    assert_eq!(households[1].members[0].name, "Pedro Reyes");
}

#[tokio::test]
async fn test_unauthorized_maps_to_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"Invalid API key"}"#)
        .create_async()
        .await;

    let result = client(server.url(), 100).list_participants().await;

    assert!(matches!(result, Err(AppwriteError::Unauthorized)));
}

#[tokio::test]
async fn test_server_error_propagates_through_repository() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", HOUSEHOLDS_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let repository = client(server.url(), 100);
    let result = RecordRepository::list_households(&repository).await;

    match result {
        Err(RepositoryError::Store(source)) => assert!(matches!(
            source.downcast_ref::<AppwriteError>(),
            Some(AppwriteError::ApiError(_))
        )),
        other => panic!("expected a store error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_documents_array_is_invalid() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", PARTICIPANTS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"total": 0}"#)
        .create_async()
        .await;

    let result = client(server.url(), 100).list_participants().await;

    assert!(matches!(result, Err(AppwriteError::InvalidResponse(_))));
}
