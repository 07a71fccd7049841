use crate::application_port::*;
use crate::domain_model::*;
use crate::infra_http::ApiClient;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::sync::Arc;

pub struct HttpCategoryApi {
    client: Arc<ApiClient>,
}

impl HttpCategoryApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        HttpCategoryApi { client }
    }
}

#[derive(Serialize)]
struct CategoryBody<'a> {
    name: &'a str,
}

#[async_trait::async_trait]
impl CategoryApi for HttpCategoryApi {
    async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let request = self.client.authorized(self.client.get("categories/")).await?;
        ApiClient::send_json(request).await
    }

    async fn get(&self, id: CategoryId) -> Result<Category, ApiError> {
        let request = self
            .client
            .authorized(self.client.get(&format!("categories/{}/", id)))
            .await?;
        ApiClient::send_json(request).await
    }

    async fn create(&self, name: &str) -> Result<Category, ApiError> {
        let request = self
            .client
            .authorized(self.client.post("categories").json(&CategoryBody { name }))
            .await?;
        ApiClient::send_json(request).await
    }

    async fn update(&self, id: CategoryId, name: &str) -> Result<Category, ApiError> {
        let request = self
            .client
            .authorized(
                self.client
                    .patch(&format!("categories/{}", id))
                    .json(&CategoryBody { name }),
            )
            .await?;
        ApiClient::send_json(request).await
    }

    async fn delete(&self, id: CategoryId) -> Result<(), ApiError> {
        let request = self
            .client
            .authorized(self.client.delete(&format!("categories/{}", id)))
            .await?;
        ApiClient::send_empty(request).await
    }
}

pub struct HttpProductApi {
    client: Arc<ApiClient>,
}

impl HttpProductApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        HttpProductApi { client }
    }
}

fn file_part(upload: &Upload) -> Part {
    Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone())
}

// Products are submitted as multipart forms; list fields travel as JSON
// strings and are omitted when empty. Each image is its own `images` part.
fn product_form(product: &ValidProduct) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("name", product.name.clone())
        .text("price", product.price.to_string())
        .text("description", product.description.clone())
        .text("category_id", product.category_id.to_string());
    if !product.colors.is_empty() {
        let colors =
            serde_json::to_string(&product.colors).map_err(|e| ApiError::Decode(e.to_string()))?;
        form = form.text("colors", colors);
    }
    if !product.sizes.is_empty() {
        let sizes =
            serde_json::to_string(&product.sizes).map_err(|e| ApiError::Decode(e.to_string()))?;
        form = form.text("sizes", sizes);
    }
    for image in &product.images {
        form = form.part("images", file_part(image));
    }
    Ok(form)
}

#[async_trait::async_trait]
impl ProductApi for HttpProductApi {
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.client.authorized(self.client.get("products")).await?;
        ApiClient::send_json(request).await
    }

    async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        let request = self
            .client
            .authorized(self.client.get(&format!("products/{}/", id)))
            .await?;
        ApiClient::send_json(request).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let request = self
            .client
            .authorized(self.client.get("products/search").query(&[("query", query)]))
            .await?;
        ApiClient::send_json(request).await
    }

    async fn create(&self, form: &ValidProduct) -> Result<Product, ApiError> {
        let request = self
            .client
            .authorized(self.client.post("products").multipart(product_form(form)?))
            .await?;
        ApiClient::send_json(request).await
    }

    async fn update(&self, id: ProductId, form: &ValidProduct) -> Result<Product, ApiError> {
        let request = self
            .client
            .authorized(
                self.client
                    .patch(&format!("products/{}", id))
                    .multipart(product_form(form)?),
            )
            .await?;
        ApiClient::send_json(request).await
    }

    async fn delete(&self, id: ProductId) -> Result<(), ApiError> {
        let request = self
            .client
            .authorized(self.client.delete(&format!("products/{}", id)))
            .await?;
        ApiClient::send_empty(request).await
    }
}

pub struct HttpUserApi {
    client: Arc<ApiClient>,
}

impl HttpUserApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        HttpUserApi { client }
    }
}

fn user_form(form: &UserForm) -> Form {
    let mut multipart = Form::new()
        .text("first_name", form.first_name.clone())
        .text("second_name", form.second_name.clone())
        .text("email", form.email.clone())
        .text("role", form.role.to_string());
    if let Some(password) = &form.password {
        multipart = multipart.text("password", password.clone());
    }
    if let Some(photo) = &form.photo {
        multipart = multipart.part("photo", file_part(photo));
    }
    multipart
}

#[async_trait::async_trait]
impl UserApi for HttpUserApi {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let request = self.client.authorized(self.client.get("users")).await?;
        ApiClient::send_json(request).await
    }

    async fn register(&self, form: &UserForm) -> Result<User, ApiError> {
        let request = self
            .client
            .authorized(self.client.post("users/register/").multipart(user_form(form)))
            .await?;
        ApiClient::send_json(request).await
    }

    async fn update(&self, id: UserId, form: &UserForm) -> Result<User, ApiError> {
        let put = self.client.put(&format!("users/{}", id));
        let put = match form.photo {
            Some(_) => put.multipart(user_form(form)),
            None => put.json(form),
        };
        let request = self.client.authorized(put).await?;
        ApiClient::send_json(request).await
    }

    async fn delete(&self, id: UserId) -> Result<(), ApiError> {
        let request = self
            .client
            .authorized(self.client.delete(&format!("users/{}", id)))
            .await?;
        ApiClient::send_empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_store::MemorySessionRepo;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client(server: &MockServer, access_token: Option<&str>) -> Arc<ApiClient> {
        let repo = match access_token {
            Some(token) => MemorySessionRepo::with_tokens(token, "r1"),
            None => MemorySessionRepo::new(),
        };
        Arc::new(ApiClient::new(&server.uri(), Duration::from_secs(2), Arc::new(repo)).unwrap())
    }

    fn valid_product() -> ValidProduct {
        ValidProduct {
            name: "Wool scarf".to_string(),
            price: 120000.0,
            description: "Warm merino wool scarf".to_string(),
            category_id: CategoryId(4),
            colors: vec!["red".to_string()],
            sizes: vec![],
            images: vec![],
        }
    }

    fn photo() -> Upload {
        Upload {
            file_name: "ali.png".to_string(),
            bytes: b"PNG-BYTES-ALI".to_vec(),
        }
    }

    #[tokio::test]
    async fn categories_list_uses_stored_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories/"))
            .and(header("authorization", "Bearer a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Shoes"},
                {"id": 2, "name": "Hats"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let categories = HttpCategoryApi::new(client(&server, Some("a1")))
            .list()
            .await
            .unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].name, "Hats");
    }

    #[tokio::test]
    async fn category_update_patches_name() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/categories/7"))
            .and(body_json(json!({"name": "Boots"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": 7, "name": "Boots"}
            })))
            .mount(&server)
            .await;

        let category = HttpCategoryApi::new(client(&server, Some("a1")))
            .update(CategoryId(7), "Boots")
            .await
            .unwrap();
        assert_eq!(category, Category { id: CategoryId(7), name: "Boots".to_string() });
    }

    #[tokio::test]
    async fn category_delete_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/categories/7"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "category has products"})),
            )
            .mount(&server)
            .await;

        let err = HttpCategoryApi::new(client(&server, Some("a1")))
            .delete(CategoryId(7))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 409,
                message: "category has products".to_string()
            }
        );
    }

    #[tokio::test]
    async fn product_search_encodes_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/search"))
            .and(query_param("query", "wool scarf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 3, "name": "Wool scarf", "price": "120000", "category_id": 4}
            ])))
            .mount(&server)
            .await;

        let products = HttpProductApi::new(client(&server, None))
            .search("wool scarf")
            .await
            .unwrap();
        assert_eq!(products[0].id, ProductId(3));
        assert_eq!(products[0].price, 120000.0);
    }

    #[tokio::test]
    async fn product_create_sends_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/products"))
            .and(|request: &Request| {
                let body = String::from_utf8_lossy(&request.body);
                body.contains("name=\"name\"")
                    && body.contains("Wool scarf")
                    && body.contains("name=\"colors\"")
                    && body.contains(r#"["red"]"#)
                    && !body.contains("name=\"sizes\"")
            })
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 9, "name": "Wool scarf", "price": 120000, "description": "Warm merino wool scarf",
                "category_id": 4, "colors": ["red"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let product = HttpProductApi::new(client(&server, Some("a1")))
            .create(&valid_product())
            .await
            .unwrap();
        assert_eq!(product.id, ProductId(9));
        assert_eq!(product.colors, vec!["red".to_string()]);
    }

    #[tokio::test]
    async fn expired_session_surfaces_as_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = HttpUserApi::new(client(&server, Some("stale")))
            .list()
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn user_update_puts_json() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/users/5"))
            .and(body_json(json!({
                "first_name": "Ali",
                "second_name": "Valiyev",
                "email": "ali@example.com",
                "role": "admin"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "first_name": "Ali", "second_name": "Valiyev",
                "email": "ali@example.com", "role": "admin"
            })))
            .mount(&server)
            .await;

        let form = UserForm {
            first_name: "Ali".to_string(),
            second_name: "Valiyev".to_string(),
            email: "ali@example.com".to_string(),
            role: Role::Admin,
            password: None,
            photo: None,
        };
        let user = HttpUserApi::new(client(&server, Some("a1")))
            .update(UserId(5), &form)
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn product_images_are_sent_as_file_parts() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/products/9"))
            .and(|request: &Request| {
                let body = String::from_utf8_lossy(&request.body);
                body.matches("name=\"images\"").count() == 2
                    && body.contains("filename=\"front.jpg\"")
                    && body.contains("filename=\"back.jpg\"")
                    && body.contains("JPEG-FRONT")
                    && body.contains("JPEG-BACK")
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 9, "name": "Wool scarf", "price": 120000, "category_id": 4,
                "images": ["/uploads/front.jpg", "/uploads/back.jpg"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut product = valid_product();
        product.images = vec![
            Upload {
                file_name: "front.jpg".to_string(),
                bytes: b"JPEG-FRONT".to_vec(),
            },
            Upload {
                file_name: "back.jpg".to_string(),
                bytes: b"JPEG-BACK".to_vec(),
            },
        ];
        let updated = HttpProductApi::new(client(&server, Some("a1")))
            .update(ProductId(9), &product)
            .await
            .unwrap();
        assert_eq!(updated.images.len(), 2);
    }

    #[tokio::test]
    async fn user_register_attaches_photo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/register/"))
            .and(|request: &Request| {
                let body = String::from_utf8_lossy(&request.body);
                body.contains("name=\"photo\"; filename=\"ali.png\"")
                    && body.contains("PNG-BYTES-ALI")
                    && body.contains("name=\"password\"")
            })
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 6, "first_name": "Ali", "second_name": "Valiyev",
                "email": "ali@example.com", "role": "customer", "photo": "/uploads/ali.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let form = UserForm {
            first_name: "Ali".to_string(),
            second_name: "Valiyev".to_string(),
            email: "ali@example.com".to_string(),
            role: Role::Customer,
            password: Some("secret".to_string()),
            photo: Some(photo()),
        };
        let user = HttpUserApi::new(client(&server, Some("a1")))
            .register(&form)
            .await
            .unwrap();
        assert_eq!(user.photo.as_deref(), Some("/uploads/ali.png"));
    }

    #[tokio::test]
    async fn user_update_with_photo_switches_to_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/users/5"))
            .and(|request: &Request| {
                let body = String::from_utf8_lossy(&request.body);
                body.contains("filename=\"ali.png\"") && body.contains("name=\"email\"")
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "first_name": "Ali", "second_name": "Valiyev",
                "email": "ali@example.com", "role": "admin", "photo": "/uploads/ali.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let form = UserForm {
            first_name: "Ali".to_string(),
            second_name: "Valiyev".to_string(),
            email: "ali@example.com".to_string(),
            role: Role::Admin,
            password: None,
            photo: Some(photo()),
        };
        HttpUserApi::new(client(&server, Some("a1")))
            .update(UserId(5), &form)
            .await
            .unwrap();
    }
}
