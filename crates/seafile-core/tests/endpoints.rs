use seafile_core::{ApiError, OrphanedLink, SeafileClient};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "24fd3c026886e3121b2ca630805ed425c272cb96";
const AUTH: &str = "Token 24fd3c026886e3121b2ca630805ed425c272cb96";

async fn client_for(server: &MockServer) -> SeafileClient {
    SeafileClient::with_token(&server.uri(), TOKEN).unwrap()
}

fn share_links_fixture() -> serde_json::Value {
    json!([
        {
            "token": "aaa111", "link": "https://cloud.example.org/d/aaa111/",
            "repo_id": "r1", "repo_name": "Team", "path": "/reports/",
            "expire_date": "2023-06-01T00:00:00+00:00", "is_expired": true,
            "username": "alice@example.org", "view_cnt": 4
        },
        {
            "token": "bbb222", "link": "https://cloud.example.org/d/bbb222/",
            "repo_id": "r1", "repo_name": "Team", "path": "/current/",
            "expire_date": "", "is_expired": false
        },
        {
            "token": "ccc333", "link": "https://cloud.example.org/d/ccc333/",
            "repo_id": "r2", "repo_name": "Photos", "path": "/2019/trip.jpg",
            "expire_date": "2020-01-01T00:00:00+00:00", "is_expired": true
        }
    ])
}

#[tokio::test]
async fn test_list_share_links_sends_token_and_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2.1/share-links/"))
        .and(header("Authorization", AUTH))
        .and(header("Accept", "application/json; charset=utf-8; indent=4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(share_links_fixture()))
        .expect(1)
        .mount(&server)
        .await;

    let links = client_for(&server).await.list_share_links().await.unwrap();
    assert_eq!(links.len(), 3);
    assert_eq!(links[0].token, "aaa111");
    assert_eq!(links[0].view_cnt, Some(4));
}

#[tokio::test]
async fn test_orphaned_links_are_the_expired_subset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2.1/share-links/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(share_links_fixture()))
        .mount(&server)
        .await;

    let orphaned = client_for(&server).await.list_orphaned_links().await.unwrap();
    assert_eq!(
        orphaned,
        vec![
            OrphanedLink {
                token: "aaa111".into(),
                location: "Team/reports/".into(),
                expire_date: Some("2023-06-01T00:00:00+00:00".into()),
            },
            OrphanedLink {
                token: "ccc333".into(),
                location: "Photos/2019/trip.jpg".into(),
                expire_date: Some("2020-01-01T00:00:00+00:00".into()),
            },
        ]
    );
}

#[tokio::test]
async fn test_create_share_link_resolves_repo_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api2/repos/"))
        .and(query_param("nameContains", "Team Docs"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "7d42522b-1f6f-465d-b9c9-879f8eed7c6c", "name": "Team Docs"},
            {"id": "00000000-0000-0000-0000-000000000000", "name": "Team Docs Archive"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2.1/share-links/"))
        .and(body_string_contains("repo_id=7d42522b-1f6f-465d-b9c9-879f8eed7c6c"))
        .and(body_string_contains("path=%2Fdocs%2Fplan.pdf"))
        .and(body_string_contains("password=s3cret"))
        .and(body_string_contains("expire_days=7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "ddd444",
            "link": "https://cloud.example.org/d/ddd444/",
            "repo_name": "Team Docs",
            "path": "/docs/plan.pdf",
            "is_expired": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client_for(&server)
        .await
        .create_share_link("Team Docs", "/docs/plan.pdf", Some("s3cret"), Some(7))
        .await
        .unwrap();
    assert_eq!(link, "https://cloud.example.org/d/ddd444/");
}

#[tokio::test]
async fn test_create_share_link_fails_when_repo_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api2/repos/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2.1/share-links/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .create_share_link("Nope", "/", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::RepoNotFound(ref name) if name == "Nope"));
}

#[tokio::test]
async fn test_create_upload_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api2/repos/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "r9"}])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2.1/upload-links/"))
        .and(body_string_contains("repo_id=r9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "up1", "link": "https://cloud.example.org/u/d/up1/",
            "repo_id": "r9", "path": "/inbox/", "expire_date": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload = client_for(&server)
        .await
        .create_upload_link("Inbox", "/inbox/", None, None)
        .await
        .unwrap();
    assert_eq!(upload.token, "up1");
    assert_eq!(upload.path.as_deref(), Some("/inbox/"));
}

#[tokio::test]
async fn test_delete_share_link_issues_one_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2.1/share-links/aaa111"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server)
        .await
        .delete_share_link("aaa111")
        .await
        .unwrap();
    assert_eq!(body, r#"{"success":true}"#);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_list_repos_projects_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2.1/admin/libraries/"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "repos": [{
                "id": "r1", "name": "Team", "owner": "alice@example.org",
                "owner_name": "Alice", "encrypted": true, "file_count": 3,
                "size": 1024, "last_modify": "2024-01-01T00:00:00+00:00"
            }],
            "page_info": {"has_next_page": false, "current_page": 1}
        })))
        .mount(&server)
        .await;

    let repos = client_for(&server).await.admin_list_repos().await.unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].owner_name, "Alice");
    assert!(repos[0].encrypted);
    assert_eq!(repos[0].file_count, 3);
}

#[tokio::test]
async fn test_admin_list_accounts_merges_ldap_and_db() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api2/accounts/"))
        .and(query_param("scope", "DB"))
        .and(query_param("limit", "-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "admin@example.org", "source": "DB"},
            {"email": "shared@example.org", "source": "DB"}
        ])))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api2/accounts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"email": "ldap1@example.org", "source": "LDAP"},
            {"email": "shared@example.org", "source": "LDAP"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let emails = client_for(&server).await.admin_list_accounts().await.unwrap();
    assert_eq!(
        emails,
        vec!["ldap1@example.org", "shared@example.org", "admin@example.org"]
    );
}

#[tokio::test]
async fn test_admin_account_info_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api2/accounts/alice@example.org/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "alice@example.org", "is_staff": false, "usage": 42, "total": -2
        })))
        .mount(&server)
        .await;

    let info = client_for(&server)
        .await
        .admin_account_info("alice@example.org")
        .await
        .unwrap();
    assert_eq!(info["usage"], 42);
    assert_eq!(info["total"], -2);
}

#[tokio::test]
async fn test_admin_repo_share_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2.1/admin/share-links/aaa111/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "aaa111", "repo_name": "Team", "path": "/reports/"
        })))
        .mount(&server)
        .await;

    let value = client_for(&server)
        .await
        .admin_repo_share_links("aaa111")
        .await
        .unwrap();
    assert_eq!(value["repo_name"], "Team");
}

#[tokio::test]
async fn test_search_returns_raw_body() {
    let server = MockServer::start().await;
    let body = r#"{"total":1,"results":[{"name":"plan.pdf"}],"has_more":false}"#;
    Mock::given(method("GET"))
        .and(path("/api2/search/"))
        .and(query_param("q", "plan & budget"))
        .and(query_param("search_repo", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = client_for(&server).await.search("plan & budget").await.unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2.1/share-links/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).await.list_share_links().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_privileged_calls_require_token() {
    let server = MockServer::start().await;
    let client = SeafileClient::new(&server.uri()).unwrap();

    let err = client.list_share_links().await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated("list_share_links")));
    let err = client.delete_share_link("aaa111").await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated(_)));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2.1/admin/libraries/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.admin_list_repos().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}
