//! Device-local address book.
//!
//! Saved shipping addresses live only in the persisted client snapshot; they
//! are never synced to the backend.

use serde::{Deserialize, Serialize};

use super::id::AddressId;
use super::order::ShippingAddress;

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    /// Label such as "Home" or "Work".
    #[serde(rename = "type")]
    pub kind: String,
    /// Street line.
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub is_default: bool,
}

impl Address {
    /// The shipping fields of this address, as attached to an order.
    #[must_use]
    pub fn to_shipping(&self) -> ShippingAddress {
        ShippingAddress {
            address: self.address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

/// An address before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub is_default: bool,
}

/// Ordered list of saved addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            addresses: Vec::new(),
        }
    }

    /// Append an address with an id derived from `now_millis`.
    ///
    /// If the clock has not advanced past the last issued id the new id is
    /// bumped, so rapid adds still get distinct ids. Adding a default address
    /// does not clear the flag on others; use [`Self::set_default`] for that.
    pub fn add(&mut self, address: NewAddress, now_millis: i64) -> AddressId {
        let last = self.addresses.iter().map(|a| a.id.as_i64()).max();
        let id = match last {
            Some(last) if now_millis <= last => AddressId::new(last.saturating_add(1)),
            _ => AddressId::new(now_millis),
        };

        self.addresses.push(Address {
            id,
            kind: address.kind,
            address: address.address,
            city: address.city,
            postal_code: address.postal_code,
            is_default: address.is_default,
        });
        id
    }

    /// Delete an address. Unknown ids are ignored.
    pub fn delete(&mut self, id: AddressId) {
        self.addresses.retain(|a| a.id != id);
    }

    /// Mark `id` as the only default address.
    pub fn set_default(&mut self, id: AddressId) {
        for address in &mut self.addresses {
            address.is_default = address.id == id;
        }
    }

    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The first address flagged as default, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    #[must_use]
    pub fn get(&self, id: AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn home(is_default: bool) -> NewAddress {
        NewAddress {
            kind: "Home".to_string(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            postal_code: "411001".to_string(),
            is_default,
        }
    }

    #[test]
    fn test_add_uses_clock_for_id() {
        let mut book = AddressBook::new();
        let id = book.add(home(false), 1_700_000_000_000);
        assert_eq!(id.as_i64(), 1_700_000_000_000);
        assert_eq!(book.get(id).unwrap().city, "Pune");
    }

    #[test]
    fn test_same_millisecond_adds_get_distinct_ids() {
        let mut book = AddressBook::new();
        let a = book.add(home(false), 5);
        let b = book.add(home(false), 5);
        let c = book.add(home(false), 3);

        assert_ne!(a, b);
        assert_eq!(b.as_i64(), 6);
        assert_eq!(c.as_i64(), 7);
    }

    #[test]
    fn test_add_does_not_enforce_single_default() {
        let mut book = AddressBook::new();
        book.add(home(true), 1);
        book.add(home(true), 2);
        assert_eq!(book.addresses().iter().filter(|a| a.is_default).count(), 2);
    }

    #[test]
    fn test_set_default_is_exclusive() {
        let mut book = AddressBook::new();
        let a = book.add(home(true), 1);
        let b = book.add(home(false), 2);

        book.set_default(b);

        assert!(!book.get(a).unwrap().is_default);
        assert_eq!(book.default_address().unwrap().id, b);
    }

    #[test]
    fn test_delete() {
        let mut book = AddressBook::new();
        let a = book.add(home(false), 1);
        book.delete(AddressId::new(99));
        assert_eq!(book.addresses().len(), 1);
        book.delete(a);
        assert!(book.is_empty());
    }

    #[test]
    fn test_wire_shape_uses_type_key() {
        let mut book = AddressBook::new();
        book.add(home(false), 1);
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value[0]["type"], "Home");
        assert_eq!(value[0]["postalCode"], "411001");
        assert_eq!(value[0]["isDefault"], false);
    }
}
