//! Catalog commands.

use estore_core::{PriceBreakdown, Product, ProductDraft, ProductId, ProductPatch};

use super::{CommandError, Store, failed};

fn print_row(product: &Product) {
    println!(
        "{:<26} {:<32} {:>12} {:>6}",
        product.id,
        product.name,
        PriceBreakdown::display(product.price),
        product.stock
    );
}

/// List all products.
pub async fn list(store: &mut Store) -> Result<(), CommandError> {
    store.fetch_products().await;
    if let Some(error) = store.catalog().error() {
        return Err(CommandError::Failed(error.to_string()));
    }

    println!("{:<26} {:<32} {:>12} {:>6}", "ID", "NAME", "PRICE", "STOCK");
    for product in store.catalog().products() {
        print_row(product);
    }
    Ok(())
}

/// Show one product in detail.
pub async fn show(store: &mut Store, id: &str) -> Result<(), CommandError> {
    store.fetch_product_by_id(&ProductId::new(id)).await;
    let Some(product) = store.catalog().selected_product() else {
        return Err(failed(store.catalog().error(), "Failed to fetch product"));
    };

    println!("{} ({})", product.name, product.id);
    println!("  Category: {}", product.category);
    println!("  Price:    {}", PriceBreakdown::display(product.price));
    if product.in_stock() {
        println!("  Stock:    {}", product.stock);
    } else {
        println!("  Stock:    out of stock");
    }
    println!("  Image:    {}", product.primary_image());
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    Ok(())
}

fn require_admin(store: &Store) -> Result<(), CommandError> {
    if store.auth().is_admin() {
        Ok(())
    } else {
        Err(CommandError::Failed(
            "Admin access required for catalog changes".to_string(),
        ))
    }
}

pub async fn create(store: &mut Store, draft: &ProductDraft) -> Result<(), CommandError> {
    require_admin(store)?;
    if !store.create_product(draft).await {
        return Err(failed(store.catalog().error(), "Failed to create product"));
    }
    tracing::info!("Created product {}", draft.name);
    Ok(())
}

pub async fn update(store: &mut Store, id: &str, patch: &ProductPatch) -> Result<(), CommandError> {
    require_admin(store)?;
    if patch.is_empty() {
        return Err(CommandError::Failed("Nothing to update".to_string()));
    }
    if !store.update_product(&ProductId::new(id), patch).await {
        return Err(failed(store.catalog().error(), "Failed to update product"));
    }
    tracing::info!("Updated product {id}");
    Ok(())
}

pub async fn delete(store: &mut Store, id: &str) -> Result<(), CommandError> {
    require_admin(store)?;
    if !store.delete_product(&ProductId::new(id)).await {
        return Err(failed(store.catalog().error(), "Failed to delete product"));
    }
    tracing::info!("Deleted product {id}");
    Ok(())
}
