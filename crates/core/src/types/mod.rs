//! Core types for E-Store.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod address;
pub mod cart;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod user;

pub use address::{Address, AddressBook, NewAddress};
pub use cart::{Cart, CartItem};
pub use id::*;
pub use order::{
    NewOrder, Order, OrderItem, OrderUser, PaymentResult, ShippingAddress, ShippingAddressError,
};
pub use price::{CURRENCY_CODE, PriceBreakdown, TAX_RATE_PERCENT};
pub use product::{Product, ProductDraft, ProductPatch};
pub use user::{AuthenticatedUser, Role, RoleError, User};
