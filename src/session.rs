use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use yew::prelude::*;

use crate::error::ApiError;

/// Local storage key holding the signed-in user id.
pub const SESSION_KEY: &str = "user_id";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Durable string storage for the session.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Write(format!("{:?}", err)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StorageError::Write(format!("{:?}", err)))
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// The signed-in user, mirrored into durable storage. The in-memory value is
/// authoritative; a failing storage only costs persistence across reloads.
pub struct SessionStore<S: KeyValueStore> {
    storage: S,
    current: Option<String>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn open(storage: S) -> Self {
        let current = storage.get(SESSION_KEY).filter(|id| !id.is_empty());
        Self { storage, current }
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn sign_in(&mut self, user_id: &str) {
        self.current = Some(user_id.to_string());
        if let Err(err) = self.storage.set(SESSION_KEY, user_id) {
            log::warn!("could not persist session: {}", err);
        }
    }

    pub fn sign_out(&mut self) {
        self.current = None;
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            log::warn!("could not clear persisted session: {}", err);
        }
    }
}

/// Text shown under the login form when signing in fails.
pub fn login_failure_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::Status(_) => "Invalid credentials",
        _ => "Server error",
    }
}

/// Session access handed down the component tree.
#[derive(Clone, PartialEq)]
pub struct SessionHandle {
    user: Option<AttrValue>,
    on_sign_in: Callback<String>,
    on_sign_out: Callback<()>,
}

impl SessionHandle {
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn sign_in(&self, user_id: String) {
        self.on_sign_in.emit(user_id);
    }

    pub fn sign_out(&self) {
        self.on_sign_out.emit(());
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let store = use_mut_ref(|| SessionStore::open(BrowserStorage));
    let user = {
        let store = store.clone();
        use_state(move || {
            store
                .borrow()
                .current_user()
                .map(|id| AttrValue::from(id.to_string()))
        })
    };

    let on_sign_in = {
        let store = store.clone();
        let user = user.clone();
        Callback::from(move |user_id: String| {
            store.borrow_mut().sign_in(&user_id);
            log::info!("signed in as {}", user_id);
            user.set(Some(AttrValue::from(user_id)));
        })
    };

    let on_sign_out = {
        let store = store.clone();
        let user = user.clone();
        Callback::from(move |_: ()| {
            store.borrow_mut().sign_out();
            log::info!("signed out");
            user.set(None);
        })
    };

    let handle = SessionHandle {
        user: (*user).clone(),
        on_sign_in,
        on_sign_out,
    };

    html! {
        <ContextProvider<SessionHandle> context={handle}>
            { props.children.clone() }
        </ContextProvider<SessionHandle>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_is_restored_from_storage() {
        let storage = MemoryStorage::default();
        storage.set(SESSION_KEY, "operator").unwrap();
        let store = SessionStore::open(storage);
        assert_eq!(store.current_user(), Some("operator"));
    }

    #[test]
    fn sign_in_replaces_and_persists() {
        let storage = MemoryStorage::default();
        let mut store = SessionStore::open(storage.clone());
        assert_eq!(store.current_user(), None);

        store.sign_in("alice");
        store.sign_in("bob");
        assert_eq!(store.current_user(), Some("bob"));
        assert_eq!(storage.get(SESSION_KEY).as_deref(), Some("bob"));
        assert_eq!(SessionStore::open(storage).current_user(), Some("bob"));
    }

    #[test]
    fn sign_out_forgets_everywhere() {
        let storage = MemoryStorage::default();
        let mut store = SessionStore::open(storage.clone());
        store.sign_in("alice");
        store.sign_out();
        assert_eq!(store.current_user(), None);
        assert_eq!(storage.get(SESSION_KEY), None);
    }

    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn storage_failures_do_not_block_the_session() {
        let mut store = SessionStore::open(BrokenStorage);
        store.sign_in("alice");
        assert_eq!(store.current_user(), Some("alice"));
        store.sign_out();
        assert_eq!(store.current_user(), None);
    }

    #[test]
    fn login_failures_are_described_generically() {
        assert_eq!(login_failure_message(&ApiError::Status(401)), "Invalid credentials");
        assert_eq!(
            login_failure_message(&ApiError::Transport("refused".to_string())),
            "Server error"
        );
    }
}
