//! E-Store CLI - drive the storefront stores from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! estore products list
//! estore products show 65f1c0ffee
//!
//! # Sign in (the session lives in $ESTORE_DATA_DIR)
//! estore auth login -e asha@example.com -p secret
//!
//! # Fill the cart and look at the totals
//! estore cart add 65f1c0ffee
//! estore cart update 65f1c0ffee 3
//! estore cart show
//!
//! # Order history
//! estore orders list
//! ```
//!
//! # Commands
//!
//! - `products` - Browse the catalog; admins can create, update and delete
//! - `auth` - Login, register, logout, whoami
//! - `cart` - Show and edit the persisted cart
//! - `orders` - List and show your orders
//! - `addresses` - Manage the device-local address book
//!
//! Checkout needs the hosted payment widget and is only available in the
//! browser storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use estore_storefront::api::ApiClient;
use estore_storefront::config::ClientConfig;
use estore_storefront::storage::FileStorage;
use estore_storefront::stores::AppStore;
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "estore")]
#[command(author, version, about = "E-Store command-line storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Sign in and out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// View your orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage saved shipping addresses
    Addresses {
        #[command(subcommand)]
        action: AddressesAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List,
    /// Show one product
    Show { id: String },
    /// Create a product (admin)
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        price: Decimal,
        #[arg(short, long)]
        category: String,
        #[arg(short, long, default_value_t = 0)]
        stock: u32,
        /// Image URL (repeatable)
        #[arg(short, long = "image")]
        images: Vec<String>,
    },
    /// Update fields of a product (admin)
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        stock: Option<u32>,
    },
    /// Delete a product (admin)
    Delete { id: String },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    /// Set a line's quantity (0 or less removes it)
    Update {
        product_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: String },
}

#[derive(Subcommand)]
enum AddressesAction {
    /// List saved addresses
    List,
    /// Save an address
    Add {
        /// Label such as Home or Work
        #[arg(short = 't', long = "type", default_value = "Home")]
        kind: String,
        #[arg(short, long)]
        address: String,
        #[arg(short, long)]
        city: String,
        #[arg(short = 'z', long)]
        postal_code: String,
        #[arg(long)]
        default: bool,
    },
    /// Delete an address
    Delete { id: i64 },
    /// Make an address the default
    Default { id: i64 },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "estore_storefront=warn,estore=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let storage = Arc::new(FileStorage::open(&config.data_dir)?);
    let api = ApiClient::new(&config, storage.clone())?;
    let mut store = AppStore::new(api, storage);
    store.initialize_auth();

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&mut store).await?,
            ProductsAction::Show { id } => commands::products::show(&mut store, &id).await?,
            ProductsAction::Create {
                name,
                description,
                price,
                category,
                stock,
                images,
            } => {
                let draft = estore_core::ProductDraft {
                    name,
                    description,
                    price,
                    category,
                    stock,
                    images,
                };
                commands::products::create(&mut store, &draft).await?;
            }
            ProductsAction::Update {
                id,
                name,
                description,
                price,
                category,
                stock,
            } => {
                let patch = estore_core::ProductPatch {
                    name,
                    description,
                    price,
                    category,
                    stock,
                    images: None,
                };
                commands::products::update(&mut store, &id, &patch).await?;
            }
            ProductsAction::Delete { id } => commands::products::delete(&mut store, &id).await?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&mut store, &email, &password).await?;
            }
            AuthAction::Register {
                name,
                email,
                password,
            } => commands::auth::register(&mut store, &name, &email, &password).await?,
            AuthAction::Logout => commands::auth::logout(&mut store),
            AuthAction::Whoami => commands::auth::whoami(&store),
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&store),
            CartAction::Add { product_id } => commands::cart::add(&mut store, &product_id).await?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&mut store, &product_id, quantity),
            CartAction::Remove { product_id } => commands::cart::remove(&mut store, &product_id),
            CartAction::Clear => commands::cart::clear(&mut store),
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&mut store).await?,
            OrdersAction::Show { id } => commands::orders::show(&mut store, &id).await?,
        },
        Commands::Addresses { action } => match action {
            AddressesAction::List => commands::addresses::list(&store),
            AddressesAction::Add {
                kind,
                address,
                city,
                postal_code,
                default,
            } => commands::addresses::add(
                &mut store,
                estore_core::NewAddress {
                    kind,
                    address,
                    city,
                    postal_code,
                    is_default: default,
                },
            ),
            AddressesAction::Delete { id } => commands::addresses::delete(&mut store, id)?,
            AddressesAction::Default { id } => commands::addresses::set_default(&mut store, id)?,
        },
    }
    Ok(())
}
