use crate::application_port::ApiError;
use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AdminError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AdminError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Admin screens: validated CRUD over the storefront backend.
#[async_trait::async_trait]
pub trait AdminService: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, AdminError>;
    async fn get_category(&self, id: CategoryId) -> Result<Category, AdminError>;
    async fn create_category(&self, name: &str) -> Result<Category, AdminError>;
    async fn rename_category(&self, id: CategoryId, name: &str) -> Result<Category, AdminError>;
    async fn delete_category(&self, id: CategoryId) -> Result<(), AdminError>;

    async fn list_products(&self) -> Result<Vec<Product>, AdminError>;
    async fn get_product(&self, id: ProductId) -> Result<Product, AdminError>;
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, AdminError>;
    async fn create_product(&self, form: ProductForm) -> Result<Product, AdminError>;
    async fn update_product(&self, id: ProductId, form: ProductForm)
    -> Result<Product, AdminError>;
    async fn delete_product(&self, id: ProductId) -> Result<(), AdminError>;

    async fn list_users(&self) -> Result<Vec<User>, AdminError>;
    async fn create_user(&self, form: UserForm) -> Result<User, AdminError>;
    async fn update_user(&self, id: UserId, form: UserForm) -> Result<User, AdminError>;
    async fn delete_user(&self, id: UserId) -> Result<(), AdminError>;
}
