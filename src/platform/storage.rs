//! Key/value storage
//!
//! Rankings and settings are JSON blobs under fixed keys. In the browser
//! that's LocalStorage; natively and in tests it's a map in memory.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Error;

pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error>;
    fn remove_item(&mut self, key: &str) -> Result<(), Error>;
}

/// Read and parse a JSON value; `Ok(None)` if the key is absent
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>, Error> {
    match storage.get_item(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), Error> {
    let json = serde_json::to_string(value)?;
    storage.set_item(key, &json)
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Error> {
        self.items.remove(key);
        Ok(())
    }
}

/// `window.localStorage`
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// `None` when storage is unavailable (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        self.inner
            .get_item(key)
            .map_err(|e| Error::Storage(format!("get {key}: {e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.inner
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("set {key}: {e:?}")))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Error> {
        self.inner
            .remove_item(key)
            .map_err(|e| Error::Storage(format!("remove {key}: {e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_helpers() {
        let mut storage = MemoryStorage::new();
        assert_eq!(load_json::<Vec<u32>>(&storage, "k").unwrap(), None);

        save_json(&mut storage, "k", &vec![1u32, 2, 3]).unwrap();
        assert_eq!(load_json::<Vec<u32>>(&storage, "k").unwrap(), Some(vec![1, 2, 3]));

        storage.set_item("k", "not json").unwrap();
        assert!(matches!(load_json::<Vec<u32>>(&storage, "k"), Err(Error::Json(_))));

        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }
}
