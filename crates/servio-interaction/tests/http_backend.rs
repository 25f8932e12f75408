//! HttpBackend tests against a local canned-response server.

use servio_core::account::{AccountBackend, ClientRegistrationForm, LoginForm};
use servio_core::error::ServioError;
use servio_core::field_errors::NON_FIELD_ERRORS;
use servio_core::serviceman::{ServicemanBackend, ServicemanFilters, SortKey};
use servio_interaction::HttpBackend;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as seen by the canned server.
#[derive(Debug)]
struct Captured {
    request_line: String,
    headers: Vec<String>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers
            .iter()
            .find(|h| h.to_ascii_lowercase().starts_with(&prefix))
            .map(|h| h[prefix.len()..].trim())
    }
}

/// Serves one canned `(status, body)` JSON response per connection, in order.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Captured>>) {
    let typed = responses
        .into_iter()
        .map(|(status, body)| (status, "application/json", body))
        .collect();
    serve_typed(typed).await
}

/// Like [`serve`] with an explicit content type per response.
async fn serve_typed(
    responses: Vec<(u16, &'static str, &'static str)>,
) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for (status, content_type, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            captured.push(read_request(&mut socket).await);

            let response = format!(
                concat!(
                    "HTTP/1.1 {} Canned\r\n",
                    "Content-Type: {}\r\n",
                    "Content-Length: {}\r\n",
                    "Connection: close\r\n\r\n{}"
                ),
                status,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        captured
    });

    (format!("http://{addr}/api/"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<String> = lines.map(str::to_string).collect();

    let content_length = headers
        .iter()
        .find_map(|h| {
            let lower = h.to_ascii_lowercase();
            lower
                .strip_prefix("content-length:")
                .map(|v| v.trim().parse::<usize>().unwrap())
        })
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Captured {
        request_line,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_category_servicemen_wrapped_shape() {
    let (url, server) = serve(vec![(
        200,
        r#"{"category": {"id": 3, "name": "Plumbing"}, "servicemen": [
            {"id": 1, "full_name": "Ada Obi", "rating": "4.5", "total_jobs_completed": 12},
            {"id": 2, "rating": null}
        ]}"#,
    )])
    .await;

    let pool = backend(&url).servicemen_by_category(3).await.unwrap();
    let requests = server.await.unwrap();

    assert_eq!(requests[0].request_line, "GET /api/categories/3/servicemen/ HTTP/1.1");
    assert_eq!(pool.candidates.len(), 2);
    assert_eq!(pool.candidates[0].display_name, "Ada Obi");
    assert_eq!(pool.candidates[0].rating, 4.5);
    assert_eq!(pool.candidates[1].rating, 0.0);
    assert_eq!(pool.candidates[1].total_jobs_completed, 0);
}

#[tokio::test]
async fn test_listing_sends_filters_and_reads_statistics() {
    let (url, server) = serve(vec![(
        200,
        r#"{"results": [{"id": 9, "full_name": "Kemi", "rating": 5}],
            "statistics": {"total": 4, "available": 1, "busy": 3}}"#,
    )])
    .await;

    let filters = ServicemanFilters {
        category: Some(2),
        is_available: Some(true),
        min_rating: Some(4.0),
        ordering: Some(SortKey::Jobs),
    };
    let pool = backend(&url).list_servicemen(&filters).await.unwrap();
    let requests = server.await.unwrap();

    let line = &requests[0].request_line;
    assert!(line.starts_with("GET /api/servicemen/?"), "{line}");
    assert!(line.contains("category=2"));
    assert!(line.contains("is_available=true"));
    assert!(line.contains("min_rating=4"));
    assert!(line.contains("ordering=-total_jobs_completed"));

    assert_eq!(pool.candidates.len(), 1);
    let stats = pool.availability.unwrap();
    assert_eq!((stats.total, stats.available, stats.busy), (4, 1, 3));
}

#[tokio::test]
async fn test_bare_array_and_unexpected_shape() {
    let (url, server) = serve(vec![
        (200, r#"[{"id": 1, "full_name": "Bare"}]"#),
        (200, r#"{"detail": "maintenance"}"#),
    ])
    .await;

    let backend = backend(&url);
    let bare = backend.servicemen_by_category(1).await.unwrap();
    let unexpected = backend.servicemen_by_category(1).await.unwrap();
    server.await.unwrap();

    assert_eq!(bare.candidates.len(), 1);
    assert!(unexpected.is_empty());
}

#[tokio::test]
async fn test_html_success_body_becomes_empty_pool() {
    let (url, server) = serve_typed(vec![
        (200, "text/html", "<html><body>502 Bad Gateway</body></html>"),
        (200, "text/html", "<html><body>Maintenance</body></html>"),
    ])
    .await;

    let backend = backend(&url);
    let by_category = backend.servicemen_by_category(4).await.unwrap();
    let listing = backend
        .list_servicemen(&ServicemanFilters::default())
        .await
        .unwrap();
    server.await.unwrap();

    assert!(by_category.is_empty());
    assert!(listing.is_empty());
    assert!(listing.availability.is_none());
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let (url, server) = serve(vec![(500, "oops")]).await;

    let err = backend(&url).servicemen_by_category(1).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, ServioError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_missing_category_is_not_found() {
    let (url, server) = serve(vec![(404, r#"{"detail": "Not found."}"#)]).await;

    let err = backend(&url).category(77).await.unwrap_err();
    server.await.unwrap();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_login_stores_token_for_later_requests() {
    let (url, server) = serve(vec![
        (200, r#"{"token": "tok-123", "user": {"id": 5, "username": "ada"}}"#),
        (200, "[]"),
    ])
    .await;

    let backend = backend(&url);
    let session = backend
        .login(&LoginForm {
            email: " ada@example.com ".to_string(),
            password: "secret-pass".to_string(),
        })
        .await
        .unwrap();
    backend.list_categories().await.unwrap();
    let requests = server.await.unwrap();

    assert_eq!(session.token, "tok-123");
    assert_eq!(session.username.as_deref(), Some("ada"));

    assert_eq!(requests[0].request_line, "POST /api/auth/login/ HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["password"], "secret-pass");
    assert!(requests[0].header("authorization").is_none());

    assert_eq!(requests[1].header("authorization"), Some("Token tok-123"));
}

#[tokio::test]
async fn test_registration_field_errors_are_mapped() {
    let (url, server) = serve(vec![(
        400,
        r#"{"email": ["A user with that email already exists."],
            "password2": ["Passwords do not match."],
            "detail": "Registration failed."}"#,
    )])
    .await;

    let form = ClientRegistrationForm {
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Obi".to_string(),
        phone_number: String::new(),
        password: "longenough".to_string(),
        confirm_password: "longenough".to_string(),
        accept_terms: true,
    };
    let err = backend(&url).register_client(&form).await.unwrap_err();
    let requests = server.await.unwrap();

    assert_eq!(
        requests[0].request_line,
        "POST /api/auth/register/client/ HTTP/1.1"
    );
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["password2"], "longenough");
    assert!(body.get("phone_number").is_none());

    let errors = err.field_errors().expect("validation error");
    assert_eq!(errors.get("email"), ["A user with that email already exists."]);
    assert_eq!(errors.get("confirm_password"), ["Passwords do not match."]);
    assert_eq!(errors.get(NON_FIELD_ERRORS), ["Registration failed."]);
}

#[tokio::test]
async fn test_password_reset_accepts_empty_body() {
    let (url, server) = serve(vec![(200, "")]).await;

    backend(&url)
        .request_password_reset("ada@example.com")
        .await
        .unwrap();
    let requests = server.await.unwrap();

    assert_eq!(
        requests[0].request_line,
        "POST /api/auth/password-reset/ HTTP/1.1"
    );
    assert!(requests[0].body.contains("ada@example.com"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(&format!("http://{addr}/api/"))
        .list_categories()
        .await
        .unwrap_err();

    assert!(err.is_network());
}
