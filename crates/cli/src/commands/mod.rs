use std::io::Write;

use catdash_core::{
    api::category::{Category, CategoryId},
    config::Settings,
    dashboard::Filter,
    error::ServiceError,
    forms::{CategoryForm, LoginForm, RegisterForm},
    paths::DataPaths,
    service::{AuthService, CategoryService},
    session::Session,
    store::FileStore,
};
use tracing::debug;

use crate::{
    args::{Cli, Command},
    error::Error,
};

struct Services {
    auth: AuthService,
    categories: CategoryService,
}

impl Services {
    async fn open(args: &Cli) -> anyhow::Result<Self> {
        let paths = DataPaths::new(&args.data_dir);
        let settings = Settings::load_async(paths.settings())
            .await
            .with_api_url_override(args.api_url.clone());

        debug!(api_url = %settings.api_url, storage = %paths.storage().display(), "Opening session");

        let session = Session::restored(FileStore::open(paths.storage())?).into_shared();
        let api = settings.api()?;

        Ok(Self {
            auth: AuthService::new(api.clone(), session.clone()),
            categories: CategoryService::new(api, session),
        })
    }
}

fn friendly(error: ServiceError) -> anyhow::Error {
    match error {
        ServiceError::NotAuthenticated => Error::NotLoggedIn.into(),
        ServiceError::Validation(report) => Error::Invalid(report.to_string()).into(),
        error => error.into(),
    }
}

pub async fn process_args(args: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let services = Services::open(args).await?;

    match &args.command {
        Command::Login { email, password } => login(&services.auth, email, password, out).await,
        Command::Register { name, email, password } => register(&services.auth, name, email, password, out).await,
        Command::Logout => {
            services.auth.logout()?;
            writeln!(out, "Logged out")?;
            Ok(())
        }
        Command::Status => {
            if services.auth.is_authenticated() {
                writeln!(out, "Logged in")?;
            } else {
                writeln!(out, "Not logged in")?;
            }
            Ok(())
        }
        Command::List { filter } => list(&services.categories, filter.parse().unwrap_or_default(), out).await,
        Command::Create { name, description } => {
            let form = CategoryForm::new(name.as_str()).with_description(description.clone());
            let category = services.categories.create(&form).await.map_err(friendly)?;
            writeln!(out, "Created {} ({})", category.name, category.id)?;
            Ok(())
        }
        Command::Update { id, name, active } => {
            let id = CategoryId::new(id.as_str());
            services
                .categories
                .update(&id, &CategoryForm::new(name.as_str()), *active)
                .await
                .map_err(friendly)?;
            writeln!(out, "Updated {id}")?;
            Ok(())
        }
        Command::Delete { id } => {
            let id = CategoryId::new(id.as_str());
            services.categories.delete(&id).await.map_err(friendly)?;
            writeln!(out, "{id} has been deleted.")?;
            Ok(())
        }
    }
}

pub async fn login(auth: &AuthService, email: &str, password: &str, out: &mut impl Write) -> anyhow::Result<()> {
    auth.login(&LoginForm::new(email, password)).await.map_err(friendly)?;
    writeln!(out, "Login successful!")?;
    Ok(())
}

pub async fn register(
    auth: &AuthService,
    name: &str,
    email: &str,
    password: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let registered = auth
        .register(&RegisterForm::new(name, email, password))
        .await
        .map_err(friendly)?;

    writeln!(out, "Your account has been created!")?;
    if let Some(message) = registered.message {
        writeln!(out, "{message}")?;
    }
    Ok(())
}

pub async fn list(categories: &CategoryService, filter: Filter, out: &mut impl Write) -> anyhow::Result<()> {
    let listed = categories.list().await.map_err(friendly)?;
    let shown = listed.iter().filter(|c| filter.matches(c)).collect::<Vec<_>>();

    if shown.is_empty() {
        writeln!(out, "No categories")?;
        return Ok(());
    }

    write_table(&shown, out)
}

fn write_table(categories: &[&Category], out: &mut impl Write) -> anyhow::Result<()> {
    // Padding counts chars, so widths must too.
    let width = |s: &str| s.chars().count();
    let id_width = categories.iter().map(|c| width(c.id.as_str())).max().unwrap_or(0).max(width("ID"));
    let name_width = categories.iter().map(|c| width(&c.name)).max().unwrap_or(0).max(width("NAME"));

    writeln!(out, "{:id_width$}  {:name_width$}  ACTIVE", "ID", "NAME")?;
    for category in categories {
        let active = if category.is_active { "Yes" } else { "No" };
        writeln!(out, "{:id_width$}  {:name_width$}  {active}", category.id.as_str(), category.name)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    async fn run(server: &MockServer, dir: &tempfile::TempDir, command: &[&str]) -> anyhow::Result<String> {
        let data_dir = dir.path().to_string_lossy().into_owned();
        let uri = server.uri();
        let mut argv = vec!["catdash", "--api-url", uri.as_str(), "--data-dir", data_dir.as_str()];
        argv.extend_from_slice(command);

        let args = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        process_args(&args, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn login_then_list_test() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "cli-token"}})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/category/"))
            .and(header("Authorization", "Bearer cli-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                {"id": 1, "name": "Food", "is_active": true},
                {"id": 2, "name": "Games", "is_active": false}
            ]})))
            .mount(&server)
            .await;

        assert_eq!("Not logged in\n", run(&server, &dir, &["status"]).await.unwrap());

        let out = run(&server, &dir, &["login", "me@example.com", "secret"]).await.unwrap();
        assert_eq!("Login successful!\n", out);

        // The token survives between invocations.
        assert_eq!("Logged in\n", run(&server, &dir, &["status"]).await.unwrap());

        let out = run(&server, &dir, &["list", "--filter", "inactive"]).await.unwrap();
        assert!(out.contains("Games"));
        assert!(!out.contains("Food"));

        run(&server, &dir, &["logout"]).await.unwrap();
        assert_eq!("Not logged in\n", run(&server, &dir, &["status"]).await.unwrap());
    }

    #[tokio::test]
    async fn requires_login_test() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let error = run(&server, &dir, &["delete", "3"]).await.unwrap_err();
        assert!(matches!(error.downcast_ref::<Error>(), Some(Error::NotLoggedIn)));
    }

    #[tokio::test]
    async fn invalid_input_test() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let error = run(&server, &dir, &["login", "not-an-email", "pw"]).await.unwrap_err();
        assert!(matches!(error.downcast_ref::<Error>(), Some(Error::Invalid(_))));
    }

    #[test]
    fn table_test() {
        let food = Category {
            id: CategoryId::new("1"),
            name: "Food".into(),
            description: None,
            is_active: true,
        };
        let games = Category {
            id: CategoryId::new("12"),
            name: "Video games".into(),
            description: None,
            is_active: false,
        };

        let mut out = Vec::new();
        write_table(&[&food, &games], &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!("ID  NAME         ACTIVE", lines[0]);
        assert_eq!("1   Food         Yes", lines[1]);
        assert_eq!("12  Video games  No", lines[2]);
    }

    #[test]
    fn table_non_ascii_test() {
        let cafe = Category {
            id: CategoryId::new("1"),
            name: "Café".into(),
            description: None,
            is_active: true,
        };
        let food = Category {
            id: CategoryId::new("2"),
            name: "Food".into(),
            description: None,
            is_active: false,
        };

        let mut out = Vec::new();
        write_table(&[&cafe, &food], &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!("ID  NAME  ACTIVE", lines[0]);
        assert_eq!("1   Café  Yes", lines[1]);
        assert_eq!("2   Food  No", lines[2]);
    }
}
