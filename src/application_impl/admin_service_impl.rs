use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use std::sync::Arc;

const MIN_PRODUCT_NAME_LEN: usize = 2;
const MIN_DESCRIPTION_LEN: usize = 10;

pub struct RealAdminService {
    category_api: Arc<dyn CategoryApi>,
    product_api: Arc<dyn ProductApi>,
    user_api: Arc<dyn UserApi>,
}

impl RealAdminService {
    pub fn new(
        category_api: Arc<dyn CategoryApi>,
        product_api: Arc<dyn ProductApi>,
        user_api: Arc<dyn UserApi>,
    ) -> Self {
        Self {
            category_api,
            product_api,
            user_api,
        }
    }
}

fn validate_category_name(name: &str) -> Result<&str, AdminError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AdminError::invalid("name", "must not be empty"));
    }
    Ok(name)
}

pub fn validate_product(form: ProductForm) -> Result<ValidProduct, AdminError> {
    let name = form.name.trim().to_string();
    if name.chars().count() < MIN_PRODUCT_NAME_LEN {
        return Err(AdminError::invalid(
            "name",
            format!("must be at least {} characters", MIN_PRODUCT_NAME_LEN),
        ));
    }

    let price = form.price.trim();
    if price.is_empty() {
        return Err(AdminError::invalid("price", "is required"));
    }
    let price: f64 = price
        .parse()
        .map_err(|_| AdminError::invalid("price", format!("{:?} is not a number", price)))?;
    if !price.is_finite() || price < 0.0 {
        return Err(AdminError::invalid("price", "must be a non-negative amount"));
    }

    let description = form.description.trim().to_string();
    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(AdminError::invalid(
            "description",
            format!("must be at least {} characters", MIN_DESCRIPTION_LEN),
        ));
    }

    let category_id = form
        .category_id
        .ok_or_else(|| AdminError::invalid("category_id", "a category must be selected"))?;

    Ok(ValidProduct {
        name,
        price,
        description,
        category_id,
        colors: clean_list(form.colors),
        sizes: clean_list(form.sizes),
        images: form.images,
    })
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub fn validate_user(mut form: UserForm) -> Result<UserForm, AdminError> {
    form.first_name = form.first_name.trim().to_string();
    form.second_name = form.second_name.trim().to_string();
    form.email = form.email.trim().to_string();

    if form.first_name.is_empty() {
        return Err(AdminError::invalid("first_name", "must not be empty"));
    }
    if form.second_name.is_empty() {
        return Err(AdminError::invalid("second_name", "must not be empty"));
    }
    match form.email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => return Err(AdminError::invalid("email", "is not an email address")),
    }
    if form.password.as_deref().is_some_and(str::is_empty) {
        form.password = None;
    }
    Ok(form)
}

#[async_trait::async_trait]
impl AdminService for RealAdminService {
    async fn list_categories(&self) -> Result<Vec<Category>, AdminError> {
        Ok(self.category_api.list().await?)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, AdminError> {
        Ok(self.category_api.get(id).await?)
    }

    async fn create_category(&self, name: &str) -> Result<Category, AdminError> {
        let name = validate_category_name(name)?;
        let category = self.category_api.create(name).await?;
        info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn rename_category(&self, id: CategoryId, name: &str) -> Result<Category, AdminError> {
        let name = validate_category_name(name)?;
        let category = self.category_api.update(id, name).await?;
        info!(%id, name = %category.name, "category renamed");
        Ok(category)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), AdminError> {
        self.category_api.delete(id).await?;
        info!(%id, "category deleted");
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, AdminError> {
        Ok(self.product_api.list().await?)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, AdminError> {
        Ok(self.product_api.get(id).await?)
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, AdminError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AdminError::invalid("query", "must not be empty"));
        }
        Ok(self.product_api.search(query).await?)
    }

    async fn create_product(&self, form: ProductForm) -> Result<Product, AdminError> {
        let product = validate_product(form)?;
        let created = self.product_api.create(&product).await?;
        info!(id = %created.id, name = %created.name, "product created");
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        form: ProductForm,
    ) -> Result<Product, AdminError> {
        let product = validate_product(form)?;
        let updated = self.product_api.update(id, &product).await?;
        info!(%id, "product updated");
        Ok(updated)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), AdminError> {
        self.product_api.delete(id).await?;
        info!(%id, "product deleted");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, AdminError> {
        Ok(self.user_api.list().await?)
    }

    async fn create_user(&self, form: UserForm) -> Result<User, AdminError> {
        let form = validate_user(form)?;
        if form.password.is_none() {
            return Err(AdminError::invalid("password", "is required for new users"));
        }
        let user = self.user_api.register(&form).await?;
        info!(id = %user.id, "user created");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, form: UserForm) -> Result<User, AdminError> {
        let form = validate_user(form)?;
        let user = self.user_api.update(id, &form).await?;
        info!(%id, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), AdminError> {
        self.user_api.delete(id).await?;
        info!(%id, "user deleted");
        Ok(())
    }
}
