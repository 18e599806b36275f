//! Order history commands.

use estore_core::{OrderId, PriceBreakdown};

use super::{CommandError, Store, failed};

fn require_user(store: &Store) -> Result<(), CommandError> {
    if store.auth().is_authenticated() {
        Ok(())
    } else {
        Err(CommandError::NotSignedIn)
    }
}

pub async fn list(store: &mut Store) -> Result<(), CommandError> {
    require_user(store)?;
    store.fetch_my_orders().await;
    if let Some(error) = store.orders().order_error() {
        return Err(CommandError::Failed(error.to_string()));
    }

    if store.orders().my_orders().is_empty() {
        println!("No orders yet");
        return Ok(());
    }
    println!("{:<26} {:<12} {:>12} {:<6} {:<9}", "ID", "DATE", "TOTAL", "PAID", "DELIVERED");
    for order in store.orders().my_orders() {
        println!(
            "{:<26} {:<12} {:>12} {:<6} {:<9}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            PriceBreakdown::display(order.pricing.total_price),
            if order.is_paid { "yes" } else { "no" },
            if order.is_delivered { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub async fn show(store: &mut Store, id: &str) -> Result<(), CommandError> {
    require_user(store)?;
    store.fetch_order_by_id(&OrderId::new(id)).await;
    if let Some(error) = store.orders().order_error() {
        return Err(CommandError::Failed(error.to_string()));
    }
    let Some(order) = store.orders().selected_order() else {
        return Err(failed(None, "Failed to fetch order"));
    };

    println!("Order {}", order.id);
    println!(
        "  Ship to:  {}, {} {}",
        order.shipping_address.address, order.shipping_address.city, order.shipping_address.postal_code
    );
    println!("  Payment:  {}", order.payment_method);
    match order.paid_at {
        Some(at) if order.is_paid => println!("  Paid:     {}", at.format("%Y-%m-%d %H:%M")),
        _ => println!("  Paid:     no"),
    }
    match order.delivered_at {
        Some(at) if order.is_delivered => {
            println!("  Delivered: {}", at.format("%Y-%m-%d %H:%M"));
        }
        _ => println!("  Delivered: no"),
    }
    println!();
    for item in &order.order_items {
        println!(
            "  {:<32} {:>4} x {:>12}",
            item.name,
            item.quantity,
            PriceBreakdown::display(item.price)
        );
    }
    println!();
    println!("  Items:    {}", PriceBreakdown::display(order.pricing.items_price));
    println!("  Tax:      {}", PriceBreakdown::display(order.pricing.tax_price));
    println!("  Shipping: {}", PriceBreakdown::display(order.pricing.shipping_price));
    println!("  Total:    {}", PriceBreakdown::display(order.pricing.total_price));
    Ok(())
}
