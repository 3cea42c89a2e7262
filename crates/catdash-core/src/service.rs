//! Operations exposed to the front-ends.
//!
//! Each service pairs the [`Api`] with the [`SharedSession`] so the token is
//! attached to requests and updated on login/logout in one place.

use catdash_api::{
    category::{CategoriesData, Category, CategoryId, CreateCategoryData, DeleteCategoryData, UpdateCategoryData},
    user::{LoginData, RegisterData, Registered},
    Api, ApiError, Query,
};
use garde::Validate;
use tracing::{error, info, instrument, warn};

use crate::{
    error::ServiceError,
    forms::{CategoryForm, LoginForm, RegisterForm},
    session::SharedSession,
};

#[derive(Debug, Clone)]
pub struct AuthService {
    api: Api,
    session: SharedSession,
}

impl AuthService {
    pub fn new(api: Api, session: SharedSession) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn login(&self, form: &LoginForm) -> Result<(), ServiceError> {
        form.validate(&())?;

        let data = LoginData::builder()
            .email(form.email.trim())
            .password(form.password.as_str())
            .build();

        let login = match Query::new(data).query(&self.api, None).await {
            Ok(login) => login,
            Err(ApiError::Status { status, message }) => {
                warn!(%status, %message, "Login failed");
                return Err(ServiceError::LoginFailed(message));
            }
            Err(e) => {
                error!(error = %e, "Error while logging in");
                return Err(e.into());
            }
        };

        self.session.write().login(login.token)?;
        Ok(())
    }

    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn register(&self, form: &RegisterForm) -> Result<Registered, ServiceError> {
        form.validate(&())?;

        let data = RegisterData::builder()
            .name(form.name.trim())
            .email(form.email.trim())
            .password(form.password.as_str())
            .build();

        match Query::new(data).query(&self.api, None).await {
            Ok(registered) => {
                info!("Account has been created");
                Ok(registered)
            }
            Err(ApiError::Status { status, message }) => {
                warn!(%status, %message, "Registration failed");
                Err(ServiceError::RegistrationFailed(message))
            }
            Err(e) => {
                error!(error = %e, "Error while registering");
                Err(e.into())
            }
        }
    }

    pub fn logout(&self) -> Result<(), ServiceError> {
        self.session.write().logout().map_err(Into::into)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }
}

#[derive(Debug, Clone)]
pub struct CategoryService {
    api: Api,
    session: SharedSession,
}

impl CategoryService {
    pub fn new(api: Api, session: SharedSession) -> Self {
        Self { api, session }
    }

    /// The lock is never held across an await point.
    fn token(&self) -> Result<String, ServiceError> {
        self.session
            .read()
            .token()
            .map(ToOwned::to_owned)
            .ok_or(ServiceError::NotAuthenticated)
    }

    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<Category>, ServiceError> {
        let token = self.token()?;
        let categories = Query::new(CategoriesData)
            .query(&self.api, Some(&token))
            .await
            .inspect_err(|e| error!(error = %e, "Cannot fetch categories"))?
            .into_inner();

        info!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }

    #[instrument(skip_all, fields(name = %form.name))]
    pub async fn create(&self, form: &CategoryForm) -> Result<Category, ServiceError> {
        form.validate(&())?;
        let token = self.token()?;

        let data = CreateCategoryData {
            name: form.trimmed_name().to_owned(),
            description: form.description.clone(),
        };

        let category = Query::new(data)
            .query(&self.api, Some(&token))
            .await
            .inspect_err(|e| error!(error = %e, "Cannot create the category"))?
            .into_inner();

        info!(id = %category.id, "Category has been created");
        Ok(category)
    }

    #[instrument(skip_all, fields(%id))]
    pub async fn update(&self, id: &CategoryId, form: &CategoryForm, is_active: bool) -> Result<(), ServiceError> {
        form.validate(&())?;
        let token = self.token()?;

        let data = UpdateCategoryData::builder()
            .id(id.clone())
            .name(form.trimmed_name())
            .is_active(is_active)
            .build();

        Query::new(data)
            .query(&self.api, Some(&token))
            .await
            .inspect_err(|e| error!(error = %e, "Cannot update the category"))?;

        info!("Category has been updated");
        Ok(())
    }

    #[instrument(skip_all, fields(%id))]
    pub async fn delete(&self, id: &CategoryId) -> Result<(), ServiceError> {
        let token = self.token()?;

        Query::new(DeleteCategoryData::new(id.clone()))
            .query(&self.api, Some(&token))
            .await
            .inspect_err(|e| error!(error = %e, "Cannot delete the category"))?;

        info!("Category has been deleted");
        Ok(())
    }
}
