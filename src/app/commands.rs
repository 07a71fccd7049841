use crate::app::App;
use crate::application_port::*;
use crate::domain_model::*;
use crate::infra_console::*;
use crate::settings::*;
use anyhow::{Context, anyhow};
use std::path::Path;

/// Executes one console command and returns what should be printed.
/// Everything except `login`/`logout` is a protected view and passes the
/// session guard first.
pub async fn run(app: &App, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Login { email, password } => {
            let user = app.login(Credentials { email, password }).await?;
            Ok(format!("logged in as {} <{}>", user.display_name(), user.email))
        }
        Command::Logout => {
            let previous = app.stored_user().await.ok().flatten();
            app.logout().await?;
            Ok(match previous {
                Some(user) => format!("logged out {}", user.email),
                None => "logged out".to_string(),
            })
        }
        command => {
            let user = app.mount().await?;
            run_protected(app, &user, command).await
        }
    }
}

async fn run_protected(app: &App, user: &User, command: Command) -> anyhow::Result<String> {
    let admin = &app.admin_service;
    match command {
        Command::Whoami => Ok(format!(
            "{} <{}> ({}, id {})",
            user.display_name(),
            user.email,
            user.role,
            user.id
        )),
        Command::Category(cmd) => match cmd {
            CategoryCommand::List => Ok(render_categories(&admin.list_categories().await?)),
            CategoryCommand::Get { id } => {
                Ok(render_categories(&[admin.get_category(CategoryId(id)).await?]))
            }
            CategoryCommand::Create { name } => {
                let category = admin.create_category(&name).await?;
                Ok(format!("created category {} ({})", category.name, category.id))
            }
            CategoryCommand::Update { id, name } => {
                let category = admin.rename_category(CategoryId(id), &name).await?;
                Ok(format!("category {} is now {}", category.id, category.name))
            }
            CategoryCommand::Delete { id } => {
                admin.delete_category(CategoryId(id)).await?;
                Ok(format!("deleted category {}", id))
            }
        },
        Command::Product(cmd) => match cmd {
            ProductCommand::List => Ok(render_products(&admin.list_products().await?)),
            ProductCommand::Get { id } => {
                Ok(render_products(&[admin.get_product(ProductId(id)).await?]))
            }
            ProductCommand::Search { query } => {
                Ok(render_products(&admin.search_products(&query).await?))
            }
            ProductCommand::Create(args) => {
                let product = admin.create_product(product_form(args).await?).await?;
                Ok(format!("created product {} ({})", product.name, product.id))
            }
            ProductCommand::Update { id, product } => {
                let product = admin
                    .update_product(ProductId(id), product_form(product).await?)
                    .await?;
                Ok(format!("updated product {} ({})", product.name, product.id))
            }
            ProductCommand::Delete { id } => {
                admin.delete_product(ProductId(id)).await?;
                Ok(format!("deleted product {}", id))
            }
        },
        Command::User(cmd) => match cmd {
            UserCommand::List => Ok(render_users(&admin.list_users().await?)),
            UserCommand::Create(args) => {
                let created = admin.create_user(user_form(args).await?).await?;
                Ok(format!("created user {} ({})", created.email, created.id))
            }
            UserCommand::Update { id, user: args } => {
                let updated = admin.update_user(UserId(id), user_form(args).await?).await?;
                Ok(format!("updated user {} ({})", updated.email, updated.id))
            }
            UserCommand::Delete { id } => {
                admin.delete_user(UserId(id)).await?;
                Ok(format!("deleted user {}", id))
            }
        },
        Command::Sales(args) => {
            let query = SalesQuery::new(
                args.range.parse().map_err(|e: String| anyhow!(e))?,
                args.metric.parse().map_err(|e: String| anyhow!(e))?,
            )
            .with_hours(args.from, args.to);
            Ok(render_sales(&app.sales_panel.report(query)?))
        }
        Command::Login { .. } | Command::Logout => Err(anyhow!("not a protected command")),
    }
}

async fn read_upload(path: &Path) -> anyhow::Result<Upload> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("{} is not a file path", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(Upload { file_name, bytes })
}

async fn product_form(args: ProductArgs) -> anyhow::Result<ProductForm> {
    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        images.push(read_upload(path).await?);
    }
    Ok(ProductForm {
        name: args.name,
        price: args.price,
        description: args.description,
        category_id: Some(CategoryId(args.category_id)),
        colors: args.colors,
        sizes: args.sizes,
        images,
    })
}

async fn user_form(args: UserArgs) -> anyhow::Result<UserForm> {
    let photo = match &args.photo {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };
    Ok(UserForm {
        first_name: args.first_name,
        second_name: args.second_name,
        email: args.email,
        role: args.role.parse().map_err(|e: String| anyhow!(e))?,
        password: args.password,
        photo,
    })
}
