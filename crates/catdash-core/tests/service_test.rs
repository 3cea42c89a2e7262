use catdash_core::{
    api::{category::CategoryId, Api},
    error::ServiceError,
    forms::{CategoryForm, LoginForm, RegisterForm},
    service::{AuthService, CategoryService},
    session::{Session, SharedSession},
    store::{FileStore, KeyValueStore, MemoryStore},
    TOKEN_KEY,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn setup(session: Session) -> (MockServer, AuthService, CategoryService) {
    let server = MockServer::start().await;
    let api = Api::new(server.uri()).unwrap();
    let session: SharedSession = session.into_shared();

    let auth = AuthService::new(api.clone(), session.clone());
    let categories = CategoryService::new(api, session);

    (server, auth, categories)
}

fn logged_in() -> Session {
    let mut store = MemoryStore::new();
    store.set(TOKEN_KEY, "t0k3n").unwrap();
    Session::restored(store)
}

#[tokio::test]
async fn login_persists_token_test() {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.toml");

    let (server, auth, _) = setup(Session::restored(FileStore::open(&storage).unwrap())).await;

    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    auth.login(&LoginForm::new("me@example.com", "secret")).await.unwrap();

    assert!(auth.is_authenticated());
    assert_eq!(Some("fresh"), auth.session().read().token());

    // A new process sees the same token.
    let restored = Session::restored(FileStore::open(&storage).unwrap());
    assert_eq!(Some("fresh"), restored.token());

    auth.logout().unwrap();
    let restored = Session::restored(FileStore::open(&storage).unwrap());
    assert_eq!(None, restored.token());
}

#[tokio::test]
async fn login_rejected_test() {
    let (server, auth, _) = setup(Session::default()).await;

    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&server)
        .await;

    let error = auth
        .login(&LoginForm::new("me@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(error, ServiceError::LoginFailed(ref m) if m == "Invalid credentials"));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn invalid_form_sends_nothing_test() {
    let (server, auth, _) = setup(Session::default()).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = auth.login(&LoginForm::new("nope", "pw")).await.unwrap_err();
    assert!(matches!(error, ServiceError::Validation(_)));

    let error = auth
        .register(&RegisterForm::new("", "me@example.com", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(error, ServiceError::Validation(_)));
}

#[tokio::test]
async fn register_test() {
    let (server, auth, _) = setup(Session::default()).await;

    Mock::given(method("POST"))
        .and(path("/api/user/register"))
        .and(body_json(json!({"name": "Me", "email": "me@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let registered = auth
        .register(&RegisterForm::new(" Me ", "me@example.com", "pw"))
        .await
        .unwrap();

    assert_eq!(Some("ok".to_owned()), registered.message);
    // Registration does not log in.
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn categories_require_token_test() {
    let (server, _, categories) = setup(Session::default()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(matches!(categories.list().await, Err(ServiceError::NotAuthenticated)));
    assert!(matches!(
        categories.delete(&CategoryId::new("1")).await,
        Err(ServiceError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn category_lifecycle_test() {
    let (server, _, categories) = setup(logged_in()).await;

    Mock::given(method("GET"))
        .and(path("/api/category/"))
        .and(header("Authorization", "Bearer t0k3n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1", "name": "Food", "is_active": true}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/category/create/"))
        .and(body_json(json!({"name": "Games"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "2", "name": "Games"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/category/update"))
        .and(body_json(json!({"id": "2", "name": "Video games", "is_active": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/category/2/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let listed = categories.list().await.unwrap();
    assert_eq!(1, listed.len());

    let created = categories.create(&CategoryForm::new("  Games ")).await.unwrap();
    assert!(!created.is_active);

    categories
        .update(&created.id, &CategoryForm::new("Video games"), true)
        .await
        .unwrap();

    categories.delete(&created.id).await.unwrap();
}

#[tokio::test]
async fn expired_token_test() {
    let (server, _, categories) = setup(logged_in()).await;

    Mock::given(method("GET"))
        .and(path("/api/category/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&server)
        .await;

    let error = categories.list().await.unwrap_err();
    assert!(error.is_unauthorized());
}
