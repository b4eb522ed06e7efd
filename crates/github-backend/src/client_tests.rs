//! Unit tests for GitHubClient using wiremock

#[cfg(test)]
mod tests {
    use crate::client::GitHubClient;
    use crate::error::GitHubError;
    use comment_core::{
        CommentError, CommentReconciler, CommentStore, Credential, DEFAULT_IDENTITY,
        DiscussionRef, Reconciled, Step,
    };
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credential(token: &str) -> Credential {
        Credential::new("github-token", Some(token)).unwrap()
    }

    fn client(server: &MockServer) -> GitHubClient {
        GitHubClient::with_base_url(&server.uri(), &credential("test-token"))
    }

    fn discussion() -> DiscussionRef {
        DiscussionRef::new("owner", "repo", 42)
    }

    /// Helper to create a mock GitHub comment response
    fn mock_github_comment(id: u64, user_id: u64, login: &str, body: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "body": body,
            "user": {"login": login, "id": user_id},
            "html_url": format!("https://github.com/owner/repo/pull/42#issuecomment-{}", id),
            "created_at": "2024-01-15T10:00:00Z",
            "updated_at": "2024-01-15T10:00:00Z"
        })
    }

    #[test]
    fn test_base_url() {
        assert_eq!(
            GitHubClient::new(&credential("t")).base_url(),
            crate::DEFAULT_API_URL
        );
        assert_eq!(
            GitHubClient::with_base_url("https://ghe.example.com/api/v3/", &credential("t"))
                .base_url(),
            "https://ghe.example.com/api/v3"
        );
    }

    #[tokio::test]
    async fn test_list_issue_comments() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Accept", "application/vnd.github+json"))
            .and(header("X-GitHub-Api-Version", "2022-11-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                mock_github_comment(100, 1, "user1", "First comment"),
                mock_github_comment(101, 41898282, "github-actions[bot]", "Second comment")
            ])))
            .mount(&mock_server)
            .await;

        let comments = client(&mock_server)
            .list_issue_comments("owner", "repo", 42)
            .unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, 100);
        assert_eq!(comments[0].body.as_deref(), Some("First comment"));
        assert_eq!(comments[1].id, 101);
        assert_eq!(comments[1].user.as_ref().unwrap().id, 41898282);
    }

    #[tokio::test]
    async fn test_list_comments_through_trait_keeps_order_and_ghosts() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 7,
                    "body": "left by a deleted account",
                    "user": null,
                    "created_at": "2024-01-15T09:00:00Z",
                    "updated_at": "2024-01-15T09:00:00Z"
                },
                mock_github_comment(8, 41898282, "github-actions[bot]", "status")
            ])))
            .mount(&mock_server)
            .await;

        let comments = client(&mock_server).list_comments(&discussion()).unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, 7);
        assert_eq!(comments[0].author_id, None);
        assert_eq!(comments[1].author_id, Some(41898282));
        assert_eq!(comments[1].author_login.as_deref(), Some("github-actions[bot]"));
    }

    #[tokio::test]
    async fn test_create_issue_comment() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({"body": "This is my comment"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(mock_github_comment(
                100,
                41898282,
                "github-actions[bot]",
                "This is my comment",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let comment = client(&mock_server)
            .create_issue_comment("owner", "repo", 42, "This is my comment")
            .unwrap();

        assert_eq!(comment.id, 100);
        assert_eq!(comment.body.as_deref(), Some("This is my comment"));
        assert_eq!(comment.user.unwrap().login, "github-actions[bot]");
    }

    #[tokio::test]
    async fn test_update_issue_comment() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/repos/owner/repo/issues/comments/100"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({"body": "Edited"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_github_comment(
                100,
                41898282,
                "github-actions[bot]",
                "Edited",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let comment = client(&mock_server)
            .update_issue_comment("owner", "repo", 100, "Edited")
            .unwrap();

        assert_eq!(comment.id, 100);
        assert_eq!(comment.body.as_deref(), Some("Edited"));
    }

    #[tokio::test]
    async fn test_owner_and_repo_are_percent_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/my%20org/repo/issues/1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let comments = client(&mock_server)
            .list_issue_comments("my org", "repo", 1)
            .unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_creates_when_bot_has_not_commented() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                mock_github_comment(1, 999, "someone", "x")
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .and(body_json(serde_json::json!({"body": "Hello (sha123)"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(mock_github_comment(
                2,
                41898282,
                "github-actions[bot]",
                "Hello (sha123)",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let result = CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "Hello (sha123)")
            .unwrap();

        assert!(matches!(result, Reconciled::Created(ref c) if c.id == 2));
    }

    #[tokio::test]
    async fn test_reconcile_updates_first_bot_comment() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                mock_github_comment(1, 41898282, "github-actions[bot]", "a"),
                mock_github_comment(2, 41898282, "github-actions[bot]", "b")
            ])))
            .mount(&mock_server)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/repos/owner/repo/issues/comments/1"))
            .and(body_json(serde_json::json!({"body": "Hello (sha456)"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_github_comment(
                1,
                41898282,
                "github-actions[bot]",
                "Hello (sha456)",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/repos/owner/repo/issues/comments/2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let result = CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "Hello (sha456)")
            .unwrap();

        assert_eq!(result.action(), "updated");
        assert_eq!(result.comment().body, "Hello (sha456)");
    }

    #[tokio::test]
    async fn test_reconcile_reports_create_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "message": "Resource not accessible by integration"
            })))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let err = CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "body")
            .unwrap_err();

        assert_eq!(err.step, Step::Create);
        assert!(matches!(err.cause, CommentError::Api { status: 403, .. }));
        assert!(err.to_string().contains("Resource not accessible by integration"));
    }

    #[test]
    fn test_connection_failure_is_http_error() {
        // Nothing listens on the discard port
        let client = GitHubClient::with_base_url("http://127.0.0.1:9", &credential("test-token"));
        let result = client.list_issue_comments("owner", "repo", 1);

        assert!(matches!(result.unwrap_err(), GitHubError::Http(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_detection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/1/comments"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-limit", "60")
                    .set_body_json(serde_json::json!({
                        "message": "API rate limit exceeded",
                        "documentation_url": "https://docs.github.com/rest"
                    })),
            )
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).list_issue_comments("owner", "repo", 1);

        assert!(matches!(result.unwrap_err(), GitHubError::RateLimited));
    }

    #[tokio::test]
    async fn test_unauthorized_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/1/comments"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&mock_server)
            .await;

        let client = GitHubClient::with_base_url(&mock_server.uri(), &credential("bad-token"));
        let result = client.list_issue_comments("owner", "repo", 1);

        assert!(matches!(result.unwrap_err(), GitHubError::Unauthorized));
    }

    #[tokio::test]
    async fn test_forbidden_without_rate_limit_is_api_error() {
        let mock_server = MockServer::start().await;

        // 403 without x-ratelimit-remaining: 0 should be a regular API error, not RateLimited
        Mock::given(method("PATCH"))
            .and(path("/repos/owner/repo/issues/comments/5"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "59")
                    .set_body_json(serde_json::json!({
                        "message": "Resource not accessible by integration"
                    })),
            )
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).update_issue_comment("owner", "repo", 5, "x");

        match result.unwrap_err() {
            GitHubError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("Resource not accessible"));
            }
            other => panic!("Expected Api error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/99999/comments"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).list_issue_comments("owner", "repo", 99999);

        match result.unwrap_err() {
            GitHubError::NotFound(message) => assert_eq!(message, "Not Found"),
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plain_text_error_body_is_kept() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/3/comments"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let err: CommentError = client(&mock_server)
            .list_issue_comments("owner", "repo", 3)
            .unwrap_err()
            .into();

        assert_eq!(err.to_string(), "API error (502): Bad Gateway");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/42/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let err = client
            .list_issue_comments("owner", "repo", 42)
            .unwrap_err();
        assert!(matches!(err, GitHubError::Parse(_)));

        let err = client.list_comments(&discussion()).unwrap_err();
        assert!(matches!(err, CommentError::Parse(_)));
    }
}
