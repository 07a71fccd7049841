use crate::application_port::ApiError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait CategoryApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, ApiError>;
    async fn get(&self, id: CategoryId) -> Result<Category, ApiError>;
    async fn create(&self, name: &str) -> Result<Category, ApiError>;
    async fn update(&self, id: CategoryId, name: &str) -> Result<Category, ApiError>;
    async fn delete(&self, id: CategoryId) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
pub trait ProductApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ApiError>;
    async fn get(&self, id: ProductId) -> Result<Product, ApiError>;
    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError>;
    async fn create(&self, form: &ValidProduct) -> Result<Product, ApiError>;
    async fn update(&self, id: ProductId, form: &ValidProduct) -> Result<Product, ApiError>;
    async fn delete(&self, id: ProductId) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
pub trait UserApi: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, ApiError>;
    async fn register(&self, form: &UserForm) -> Result<User, ApiError>;
    async fn update(&self, id: UserId, form: &UserForm) -> Result<User, ApiError>;
    async fn delete(&self, id: UserId) -> Result<(), ApiError>;
}

/// A product form that passed validation; price is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category_id: CategoryId,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub images: Vec<Upload>,
}
