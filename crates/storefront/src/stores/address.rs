//! Address book slice. Device-local; nothing here reaches the backend.

use chrono::Utc;
use tracing::debug;

use estore_core::{Address, AddressBook, AddressId, NewAddress};

#[derive(Debug, Clone, Default)]
pub struct AddressStore {
    book: AddressBook,
}

impl AddressStore {
    #[must_use]
    pub const fn new(book: AddressBook) -> Self {
        Self { book }
    }

    #[must_use]
    pub const fn book(&self) -> &AddressBook {
        &self.book
    }

    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        self.book.addresses()
    }

    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.book.default_address()
    }

    /// Save an address, keyed by the current time in milliseconds.
    pub fn add_address(&mut self, address: NewAddress) -> AddressId {
        let id = self.book.add(address, Utc::now().timestamp_millis());
        debug!(address_id = %id, "Address added");
        id
    }

    pub fn delete_address(&mut self, id: AddressId) {
        self.book.delete(id);
    }

    /// Make `id` the only default address.
    pub fn set_default_address(&mut self, id: AddressId) {
        self.book.set_default(id);
    }
}
