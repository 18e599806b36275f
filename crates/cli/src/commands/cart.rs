//! Cart commands.

use estore_core::{PriceBreakdown, ProductId};

use super::{CommandError, Store, failed};

pub fn show(store: &Store) {
    let cart = store.cart();
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in cart.items() {
        println!(
            "{:<26} {:<32} {:>4} x {:>12} = {:>12}",
            item.product_id(),
            item.product.name,
            item.quantity,
            PriceBreakdown::display(item.product.price),
            PriceBreakdown::display(item.line_total())
        );
    }

    let pricing = cart.price_breakdown();
    println!();
    println!("Items ({}):  {}", cart.item_count(), PriceBreakdown::display(pricing.items_price));
    println!("Tax:        {}", PriceBreakdown::display(pricing.tax_price));
    println!("Shipping:   {}", PriceBreakdown::display(pricing.shipping_price));
    println!("Total:      {}", PriceBreakdown::display(pricing.total_price));
}

/// Fetch the product so the cart line holds a current snapshot, then add it.
pub async fn add(store: &mut Store, product_id: &str) -> Result<(), CommandError> {
    store.fetch_product_by_id(&ProductId::new(product_id)).await;
    let Some(product) = store.catalog().selected_product().cloned() else {
        return Err(failed(store.catalog().error(), "Failed to fetch product"));
    };
    if !product.in_stock() {
        return Err(CommandError::Failed(format!("{} is out of stock", product.name)));
    }

    store.add_to_cart(product);
    show(store);
    Ok(())
}

pub fn update(store: &mut Store, product_id: &str, quantity: i64) {
    store.update_quantity(&ProductId::new(product_id), quantity);
    show(store);
}

pub fn remove(store: &mut Store, product_id: &str) {
    store.remove_from_cart(&ProductId::new(product_id));
    show(store);
}

pub fn clear(store: &mut Store) {
    store.clear_cart();
    println!("Cart cleared");
}
