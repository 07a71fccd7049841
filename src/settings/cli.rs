use super::Parser;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "admin-console", about = "Storefront administration console")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the issued tokens.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Run the session guard and print the current user.
    Whoami,
    #[command(subcommand)]
    Category(CategoryCommand),
    #[command(subcommand)]
    Product(ProductCommand),
    #[command(subcommand)]
    User(UserCommand),
    /// Print the static sales panel.
    Sales(SalesArgs),
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    List,
    Get { id: u64 },
    Create { name: String },
    Update { id: u64, name: String },
    Delete { id: u64 },
}

#[derive(Args, Debug)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub category_id: u64,
    #[arg(long, value_delimiter = ',')]
    pub colors: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub sizes: Vec<String>,
    /// Image file to upload; repeat for several.
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    List,
    Get { id: u64 },
    Search { query: String },
    Create(ProductArgs),
    Update {
        id: u64,
        #[command(flatten)]
        product: ProductArgs,
    },
    Delete { id: u64 },
}

#[derive(Args, Debug)]
pub struct UserArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub second_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "customer")]
    pub role: String,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    List,
    Create(UserArgs),
    Update {
        id: u64,
        #[command(flatten)]
        user: UserArgs,
    },
    Delete { id: u64 },
}

#[derive(Args, Debug)]
pub struct SalesArgs {
    #[arg(long, default_value = "today")]
    pub range: String,
    #[arg(long, default_value = "sales")]
    pub metric: String,
    #[arg(long, default_value_t = 0)]
    pub from: u8,
    #[arg(long, default_value_t = 23)]
    pub to: u8,
}
