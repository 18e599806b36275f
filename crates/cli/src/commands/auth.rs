//! Session commands.

use super::{CommandError, Store, failed};

pub async fn login(store: &mut Store, email: &str, password: &str) -> Result<(), CommandError> {
    if !store.login_user(email, password).await {
        return Err(failed(store.auth().auth_error(), "Login failed"));
    }
    whoami(store);
    Ok(())
}

pub async fn register(
    store: &mut Store,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), CommandError> {
    if !store.register_user(name, email, password).await {
        return Err(failed(store.auth().auth_error(), "Registration failed"));
    }
    whoami(store);
    Ok(())
}

pub fn logout(store: &mut Store) {
    store.logout_user();
    println!("Signed out");
}

pub fn whoami(store: &Store) {
    match store.auth().user() {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
        None => println!("Not signed in"),
    }
}
