//! Integration tests against a mock dashboard backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::cache::{QueryKey, Resource};
use crate::config::Config;
use crate::errors::{codes, PortalError};
use crate::export::{ExportDataType, ExportFormat};
use crate::filters::{ComplaintFilters, EmployeeFilters, StatisticsFilters};
use crate::guard::{GuardDecision, DASHBOARD_ROUTE, LOGIN_ROUTE, SUPERADMIN_ROUTE};
use crate::models::{
    Complaint, ComplaintStatus, Language, NewComplaint, OrgUnitInput, OrgUnitKind, Sector,
};
use crate::storage::{KeyValueStore, MemoryStore, ADMIN_KEY, SESSION_KEY, TOKEN_KEY};
use crate::toast::ToastLevel;
use crate::Portal;

/// One request the mock backend received.
#[derive(Debug, Clone)]
struct Hit {
    method: Method,
    path: String,
    query: String,
    bearer: Option<String>,
}

/// Canned backend that records every request.
#[derive(Default)]
struct MockBackend {
    hits: Mutex<Vec<Hit>>,
    /// Remaining 500 answers for the public employee list
    employee_failures: AtomicUsize,
}

impl MockBackend {
    fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    fn paths(&self) -> Vec<String> {
        self.hits()
            .into_iter()
            .map(|hit| format!("{} {}", hit.method, hit.path))
            .collect()
    }

    fn reset(&self) {
        self.hits.lock().unwrap().clear();
    }
}

fn ok(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({"success": true, "data": data})))
}

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"success": false, "message": message})))
}

fn complaint_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "trackingNumber": format!("CMP-{}", id),
        "title": "Broken streetlight",
        "description": "The light on the main road is out",
        "status": status,
        "priority": "normal",
        "complainantName": "Abebe Kebede",
        "createdAt": "2026-03-01T09:00:00Z"
    })
}

fn statistics_json() -> Value {
    json!({
        "complaints": {"total": 4, "submitted": 1, "resolved": 3},
        "totalEmployees": 12,
        "averageRating": 4.2
    })
}

async fn handle(
    State(mock): State<Arc<MockBackend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    mock.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().unwrap_or_default().to_string(),
        bearer,
    });

    match (method, path.as_str()) {
        (Method::POST, "/api/auth/login") => {
            let body: Value = serde_json::from_str(&body).unwrap_or_default();
            let email = body["email"].as_str().unwrap_or_default().to_string();
            let role = match email.split('@').next().unwrap_or_default() {
                "wrong" => return fail(StatusCode::UNAUTHORIZED, "Invalid credentials"),
                "super" => "SuperAdmin",
                "viewer" => "Viewer",
                _ => "Admin",
            };
            ok(json!({
                "token": format!("token-{}", role),
                "admin": {"id": "u1", "name": "Test User", "email": email, "role": role}
            }))
        }
        (Method::GET, "/api/statistics/public") | (Method::GET, "/api/admin/statistics") => {
            ok(statistics_json())
        }
        (Method::GET, "/api/complaints/public") | (Method::GET, "/api/admin/complaints") => ok(
            json!([complaint_json("c1", "submitted"), complaint_json("c2", "resolved")]),
        ),
        (Method::PUT, "/api/admin/complaints/c1/resolve") => {
            ok(complaint_json("c1", "resolved"))
        }
        (Method::POST, "/api/complaints") => {
            let body: Value = serde_json::from_str(&body).unwrap_or_default();
            if body["title"] == "Slow" {
                tokio::time::sleep(Duration::from_millis(400)).await;
            }
            ok(complaint_json("c9", "submitted"))
        }
        (Method::DELETE, "/api/admin/complaints/c1") => ok(json!({"id": "c1"})),
        (Method::GET, "/api/employees") => {
            let remaining = mock.employee_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                mock.employee_failures.store(remaining - 1, Ordering::SeqCst);
                return fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
            }
            ok(json!([{
                "id": "e1",
                "employeeId": "EMP-001",
                "firstName": "Sara",
                "lastName": "Tesfaye",
                "position": "Clerk"
            }]))
        }
        (Method::GET, "/api/ratings/employee/e1") => ok(json!([
            {"id": "r1", "employeeId": "e1", "courtesy": 4, "punctuality": 5, "knowledge": 3,
             "createdAt": "2026-03-02T10:00:00Z"},
            {"id": "r2", "employeeId": "e1", "courtesy": 2, "punctuality": 3, "knowledge": 5,
             "createdAt": "2026-03-04"}
        ])),
        (Method::GET, "/api/sectors") | (Method::GET, "/api/admin/sectors") => ok(json!([
            {"id": "s1", "name": "Health", "subcityId": "7"}
        ])),
        (Method::POST, "/api/admin/sectors") => {
            ok(json!({"id": "s2", "name": "Education", "subcityId": "7"}))
        }
        (Method::GET, "/api/admin/notifications/unread-count") => {
            (StatusCode::OK, Json(json!({"count": 3})))
        }
        (Method::PUT, "/api/admin/notifications/read-all") => {
            (StatusCode::OK, Json(json!({"success": true, "message": "Done"})))
        }
        (Method::POST, "/api/admin/export-report") => ok(json!({
            "fileName": "complaints-report.csv",
            "downloadUrl": "/downloads/complaints-report.csv"
        })),
        _ => fail(StatusCode::NOT_FOUND, "Not found"),
    }
}

/// Test fixture for integration tests.
struct TestFixture {
    portal: Portal,
    mock: Arc<MockBackend>,
    storage: Arc<MemoryStore>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mock = Arc::new(MockBackend::default());
        let base_url = spawn_backend(mock.clone()).await;

        let config = test_config(base_url, &temp_dir);
        let storage = Arc::new(MemoryStore::new());
        let portal = Portal::new(config, storage.clone()).expect("Failed to build portal");

        TestFixture {
            portal,
            mock,
            storage,
            _temp_dir: temp_dir,
        }
    }

    async fn signed_in(email: &str) -> Self {
        let fixture = Self::new().await;
        fixture
            .portal
            .login(email, "secret")
            .await
            .expect("Login failed");
        fixture.mock.reset();
        fixture
    }
}

async fn spawn_backend(mock: Arc<MockBackend>) -> String {
    let app = Router::new().fallback(handle).with_state(mock);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn test_config(api_base_url: String, temp_dir: &TempDir) -> Config {
    Config {
        api_base_url,
        storage_path: temp_dir.path().join("session.sqlite"),
        request_timeout: Duration::from_secs(5),
        backoff_cap: Duration::from_millis(10),
        log_level: "warn".to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_anonymous_statistics_use_public_endpoint() {
    let fixture = TestFixture::new().await;

    let stats = fixture
        .portal
        .statistics()
        .dashboard(&StatisticsFilters::default())
        .await
        .unwrap();
    assert_eq!(stats.complaints.total, 4);
    assert_eq!(stats.total_employees, 12);

    let hits = fixture.mock.hits();
    assert_eq!(fixture.mock.paths(), vec!["GET /api/statistics/public"]);
    assert!(hits[0].bearer.is_none());
    assert_eq!(hits[0].query, "lang=en");
}

#[tokio::test]
async fn test_login_redirects_by_role() {
    let fixture = TestFixture::new().await;
    let target = fixture.portal.login("super@civic.gov", "secret").await.unwrap();
    assert_eq!(target, SUPERADMIN_ROUTE);
    assert!(fixture.portal.session().is_authenticated());

    let fixture = TestFixture::new().await;
    let target = fixture.portal.login("clerk@civic.gov", "secret").await.unwrap();
    assert_eq!(target, DASHBOARD_ROUTE);
    assert_eq!(
        fixture.portal.authorize(SUPERADMIN_ROUTE),
        GuardDecision::Redirect(DASHBOARD_ROUTE.to_string())
    );
    assert_eq!(
        fixture.portal.authorize(LOGIN_ROUTE),
        GuardDecision::Redirect(DASHBOARD_ROUTE.to_string())
    );
}

#[tokio::test]
async fn test_login_persists_session_keys() {
    let fixture = TestFixture::new().await;
    fixture.portal.login("clerk@civic.gov", "secret").await.unwrap();

    let token = fixture.storage.get(TOKEN_KEY).await.unwrap();
    assert_eq!(token.as_deref(), Some("token-Admin"));
    assert!(fixture.storage.get(ADMIN_KEY).await.unwrap().is_some());

    let blob: Value =
        serde_json::from_str(&fixture.storage.get(SESSION_KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(blob["state"]["isAuthenticated"], true);
    assert_eq!(blob["state"]["token"], "token-Admin");
}

#[tokio::test]
async fn test_failed_login_sets_session_error() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .portal
        .login("wrong@civic.gov", "secret")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), codes::UNAUTHORIZED);

    let state = fixture.portal.session().snapshot();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_authenticated_reads_use_admin_endpoint() {
    let fixture = TestFixture::signed_in("clerk@civic.gov").await;

    fixture
        .portal
        .statistics()
        .dashboard(&StatisticsFilters::default())
        .await
        .unwrap();

    let hits = fixture.mock.hits();
    assert_eq!(fixture.mock.paths(), vec!["GET /api/admin/statistics"]);
    assert_eq!(hits[0].bearer.as_deref(), Some("token-Admin"));
}

#[tokio::test]
async fn test_cached_read_skips_network() {
    let fixture = TestFixture::new().await;
    let filters = ComplaintFilters::default();

    let first = fixture.portal.complaints().list(&filters).await.unwrap();
    let second = fixture.portal.complaints().list(&filters).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.mock.paths(), vec!["GET /api/complaints/public"]);
}

#[tokio::test]
async fn test_language_switch_refetches() {
    let fixture = TestFixture::new().await;
    let filters = StatisticsFilters::default();

    fixture.portal.statistics().dashboard(&filters).await.unwrap();
    fixture.portal.set_language(Language::Am);
    fixture.portal.statistics().dashboard(&filters).await.unwrap();

    let queries: Vec<String> = fixture.mock.hits().into_iter().map(|h| h.query).collect();
    assert_eq!(queries, vec!["lang=en", "lang=am"]);
}

#[tokio::test]
async fn test_resolve_marks_complaint_views_stale() {
    let fixture = TestFixture::signed_in("clerk@civic.gov").await;
    let portal = &fixture.portal;

    portal.complaints().list(&ComplaintFilters::default()).await.unwrap();
    portal
        .statistics()
        .dashboard(&StatisticsFilters::default())
        .await
        .unwrap();

    // The public list is only readable anonymously; seed its cache entry directly.
    let public_key = QueryKey::new(
        Resource::PublicComplaints,
        &ComplaintFilters::default(),
        Language::En,
        false,
    )
    .unwrap();
    portal
        .cache()
        .fetch(public_key.clone(), || async {
            Ok::<Vec<Complaint>, PortalError>(Vec::new())
        })
        .await
        .unwrap();

    let complaints_key =
        QueryKey::new(Resource::Complaints, &ComplaintFilters::default(), Language::En, true)
            .unwrap();
    let statistics_key =
        QueryKey::new(Resource::Statistics, &StatisticsFilters::default(), Language::En, true)
            .unwrap();

    for key in [&complaints_key, &statistics_key, &public_key] {
        assert!(!portal.cache().is_stale(key));
    }

    let resolved = portal
        .complaints()
        .resolve("c1", "Replaced the bulb")
        .await
        .unwrap();
    assert_eq!(resolved.status, ComplaintStatus::Resolved);

    for key in [&complaints_key, &statistics_key, &public_key] {
        assert!(portal.cache().is_stale(key), "{:?}", key.resource);
    }

    portal.complaints().list(&ComplaintFilters::default()).await.unwrap();
    assert_eq!(
        fixture.mock.paths(),
        vec![
            "GET /api/admin/complaints",
            "GET /api/admin/statistics",
            "PUT /api/admin/complaints/c1/resolve",
            "GET /api/admin/complaints",
        ]
    );
}

#[tokio::test]
async fn test_write_without_session_never_hits_network() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .portal
        .complaints()
        .resolve("c1", "Done")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), codes::AUTHENTICATION_REQUIRED);

    let err = fixture.portal.notifications().unread_count().await.unwrap_err();
    assert_eq!(err.error_code(), codes::AUTHENTICATION_REQUIRED);

    assert!(fixture.mock.hits().is_empty());
}

#[tokio::test]
async fn test_viewer_cannot_mutate() {
    let fixture = TestFixture::signed_in("viewer@civic.gov").await;

    let err = fixture.portal.complaints().delete("c1").await.unwrap_err();
    assert_eq!(err.error_code(), codes::UNAUTHORIZED);
    assert!(fixture.mock.hits().is_empty());
}

#[tokio::test]
async fn test_public_complaint_submission() {
    let fixture = TestFixture::new().await;

    let invalid = NewComplaint::default();
    let err = fixture.portal.complaints().submit(&invalid).await.unwrap_err();
    assert_eq!(err.error_code(), codes::VALIDATION_ERROR);
    assert!(fixture.mock.hits().is_empty());

    let complaint = NewComplaint {
        title: "Broken streetlight".into(),
        description: "The light on the main road is out".into(),
        complainant_name: "Abebe Kebede".into(),
        ..Default::default()
    };
    let created = fixture.portal.complaints().submit(&complaint).await.unwrap();
    assert_eq!(created.tracking_number, "CMP-c9");
    assert_eq!(fixture.mock.paths(), vec!["POST /api/complaints"]);
}

#[tokio::test]
async fn test_delete_and_notification_writes_ignore_response_body() {
    let fixture = TestFixture::signed_in("clerk@civic.gov").await;

    fixture.portal.complaints().delete("c1").await.unwrap();
    fixture.portal.notifications().mark_all_read().await.unwrap();
    assert_eq!(fixture.portal.notifications().unread_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_logout_clears_session_keys() {
    let fixture = TestFixture::signed_in("clerk@civic.gov").await;

    fixture.portal.logout().await.unwrap();

    assert!(!fixture.portal.session().is_authenticated());
    for key in [TOKEN_KEY, ADMIN_KEY, SESSION_KEY] {
        assert!(fixture.storage.get(key).await.unwrap().is_none(), "{}", key);
    }
}

#[tokio::test]
async fn test_session_survives_restart_with_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let mock = Arc::new(MockBackend::default());
    let base_url = spawn_backend(mock.clone()).await;

    {
        let portal = Portal::open(test_config(base_url.clone(), &temp_dir))
            .await
            .unwrap();
        portal.login("super@civic.gov", "secret").await.unwrap();
    }

    let portal = Portal::open(test_config(base_url.clone(), &temp_dir))
        .await
        .unwrap();
    assert!(portal.initialize().await);
    assert!(portal.session().current_user().unwrap().is_super_admin());
    assert_eq!(portal.authorize(SUPERADMIN_ROUTE), GuardDecision::Allow);

    portal.logout().await.unwrap();

    let portal = Portal::open(test_config(base_url, &temp_dir)).await.unwrap();
    assert!(!portal.initialize().await);
}

#[tokio::test]
async fn test_server_error_is_retried_once() {
    let fixture = TestFixture::new().await;
    fixture.mock.employee_failures.store(1, Ordering::SeqCst);

    let employees = fixture
        .portal
        .employees()
        .list(&EmployeeFilters::default())
        .await
        .unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(fixture.mock.hits().len(), 2);
}

#[tokio::test]
async fn test_persistent_server_error_is_not_cached() {
    let fixture = TestFixture::new().await;
    fixture.mock.employee_failures.store(2, Ordering::SeqCst);

    let err = fixture
        .portal
        .employees()
        .list(&EmployeeFilters::default())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), codes::SERVER_ERROR);
    assert_eq!(err.message(), "Database unavailable");
    assert_eq!(fixture.mock.hits().len(), 2);

    // The failure was not cached, so the next read goes back to the backend.
    fixture
        .portal
        .employees()
        .list(&EmployeeFilters::default())
        .await
        .unwrap();
    assert_eq!(fixture.mock.hits().len(), 3);
}

#[tokio::test]
async fn test_export_pushes_toasts() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .portal
        .exporter()
        .export(ExportDataType::Complaints, &ComplaintFilters::default(), ExportFormat::Csv)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), codes::AUTHENTICATION_REQUIRED);
    let toasts = fixture.portal.toasts().drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Error);

    fixture.portal.login("clerk@civic.gov", "secret").await.unwrap();
    fixture.mock.reset();

    let filters = ComplaintFilters {
        status: Some(ComplaintStatus::Resolved),
        ..Default::default()
    };
    let receipt = fixture
        .portal
        .exporter()
        .export(ExportDataType::Complaints, &filters, ExportFormat::Csv)
        .await
        .unwrap();
    assert_eq!(receipt.file_name, "complaints-report.csv");
    assert_eq!(
        receipt.download_url.as_deref(),
        Some("/downloads/complaints-report.csv")
    );

    let toasts = fixture.portal.toasts().drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Success);
    assert_eq!(fixture.mock.paths(), vec!["POST /api/admin/export-report"]);
}

#[tokio::test]
async fn test_sector_save_refreshes_scoped_list() {
    let fixture = TestFixture::signed_in("clerk@civic.gov").await;
    let organization = fixture.portal.organization();

    let sectors = organization.sectors(Some("7")).await.unwrap();
    assert_eq!(sectors.len(), 1);
    organization.sectors(Some("7")).await.unwrap();

    let input = OrgUnitInput {
        name: "Education".into(),
        subcity_id: Some("7".into()),
        ..Default::default()
    };
    let saved: Sector = organization
        .save(OrgUnitKind::Sector, None, &input)
        .await
        .unwrap();
    assert_eq!(saved.id, "s2");

    organization.sectors(Some("7")).await.unwrap();

    let hits = fixture.mock.hits();
    assert_eq!(
        fixture.mock.paths(),
        vec![
            "GET /api/admin/sectors",
            "POST /api/admin/sectors",
            "GET /api/admin/sectors",
        ]
    );
    assert_eq!(hits[0].query, "lang=en&subcityId=7");
}

#[tokio::test]
async fn test_timed_out_submission_is_sent_once() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mock = Arc::new(MockBackend::default());
    let base_url = spawn_backend(mock.clone()).await;
    let config = Config {
        request_timeout: Duration::from_millis(150),
        max_retries: 1,
        ..test_config(base_url, &temp_dir)
    };
    let portal = Portal::new(config, Arc::new(MemoryStore::new())).unwrap();

    let complaint = NewComplaint {
        title: "Slow".into(),
        description: "Queue at the kebele office".into(),
        complainant_name: "Abebe".into(),
        ..Default::default()
    };
    let err = portal.complaints().submit(&complaint).await.unwrap_err();
    assert_eq!(err.error_code(), codes::NETWORK_ERROR);

    // Give a duplicate, if one were sent, time to land.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(mock.paths(), vec!["POST /api/complaints"]);
}

#[tokio::test]
async fn test_ids_are_encoded_into_one_path_segment() {
    let fixture = TestFixture::signed_in("clerk@civic.gov").await;
    let complaints = fixture.portal.complaints();

    complaints.track("CMP-1/../../admin/complaints").await.unwrap_err();
    complaints.track("CMP-2?x=1#frag").await.unwrap_err();

    let hits = fixture.mock.hits();
    assert_eq!(
        fixture.mock.paths(),
        vec![
            "GET /api/complaints/track/CMP-1%2F..%2F..%2Fadmin%2Fcomplaints",
            "GET /api/complaints/track/CMP-2%3Fx%3D1%23frag",
        ]
    );
    assert_eq!(hits[1].query, "lang=en");

    let err = complaints.get("..").await.unwrap_err();
    assert_eq!(err.error_code(), codes::VALIDATION_ERROR);
    assert_eq!(fixture.mock.hits().len(), 2);
}

#[tokio::test]
async fn test_employee_rating_summary() {
    let fixture = TestFixture::new().await;

    let summary = fixture
        .portal
        .ratings()
        .summary_for_employee("e1")
        .await
        .unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.courtesy, 3.0);
    assert_eq!(summary.punctuality, 4.0);
    assert_eq!(summary.knowledge, 4.0);
    assert!((summary.overall - 11.0 / 3.0).abs() < 1e-9);
    assert_eq!(fixture.mock.paths(), vec!["GET /api/ratings/employee/e1"]);

    // The list read behind the summary is cached.
    fixture.portal.ratings().for_employee("e1").await.unwrap();
    assert_eq!(fixture.mock.hits().len(), 1);
}

/// Storage that reads fine but refuses every write.
struct ReadOnlyStore;

#[async_trait::async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, PortalError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), PortalError> {
        Err(PortalError::Storage("read-only filesystem".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), PortalError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_login_on_read_only_storage_stays_signed_out() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mock = Arc::new(MockBackend::default());
    let base_url = spawn_backend(mock.clone()).await;
    let portal = Portal::new(test_config(base_url, &temp_dir), Arc::new(ReadOnlyStore)).unwrap();

    let err = portal.login("clerk@civic.gov", "secret").await.unwrap_err();
    assert_eq!(err.error_code(), codes::STORAGE_ERROR);

    let state = portal.session().snapshot();
    assert!(!state.is_authenticated);
    assert!(state.token.is_none());
    assert!(state.error.is_some());
    assert_eq!(portal.authorize(LOGIN_ROUTE), GuardDecision::Allow);
}
