//! Address book commands. Addresses stay on this machine.

use estore_core::{AddressId, NewAddress};

use super::{CommandError, Store};

pub fn list(store: &Store) {
    let addresses = store.addresses().addresses();
    if addresses.is_empty() {
        println!("No saved addresses");
        return;
    }
    for address in addresses {
        println!(
            "{:<14} {:<8} {}, {} {}{}",
            address.id,
            address.kind,
            address.address,
            address.city,
            address.postal_code,
            if address.is_default { "  (default)" } else { "" }
        );
    }
}

pub fn add(store: &mut Store, address: NewAddress) {
    let make_default = address.is_default;
    let id = store.add_address(address);
    if make_default {
        store.set_default_address(id);
    }
    println!("Saved address {id}");
}

fn existing(store: &Store, id: i64) -> Result<AddressId, CommandError> {
    let id = AddressId::new(id);
    store
        .addresses()
        .book()
        .get(id)
        .map(|a| a.id)
        .ok_or(CommandError::UnknownAddress(id.as_i64()))
}

pub fn delete(store: &mut Store, id: i64) -> Result<(), CommandError> {
    let id = existing(store, id)?;
    store.delete_address(id);
    println!("Deleted address {id}");
    Ok(())
}

pub fn set_default(store: &mut Store, id: i64) -> Result<(), CommandError> {
    let id = existing(store, id)?;
    store.set_default_address(id);
    println!("Address {id} is now the default");
    Ok(())
}
