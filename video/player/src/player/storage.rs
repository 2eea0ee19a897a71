use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Client side key/value persistence.
///
/// Writes are best effort, a store that cannot persist a value drops it.
pub trait SettingsStore {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&self, key: &str, value: &str);
}

impl<T: SettingsStore + ?Sized> SettingsStore for Rc<T> {
	fn get(&self, key: &str) -> Option<String> {
		(**self).get(key)
	}

	fn set(&self, key: &str, value: &str) {
		(**self).set(key, value)
	}
}

/// `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorage(web_sys::Storage);

impl LocalStorage {
	/// `None` when storage is disabled, which browsers do in some privacy modes.
	pub fn open() -> Option<Self> {
		let storage = web_sys::window()?.local_storage().ok()??;
		Some(Self(storage))
	}
}

impl SettingsStore for LocalStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.0.get_item(key).ok().flatten()
	}

	fn set(&self, key: &str, value: &str) {
		if let Err(err) = self.0.set_item(key, value) {
			tracing::warn!("failed to persist {}: {:?}", key, err);
		}
	}
}

#[derive(Debug, Default)]
pub struct MemoryStore(RefCell<HashMap<String, String>>);

impl SettingsStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.0.borrow().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) {
		self.0.borrow_mut().insert(key.to_string(), value.to_string());
	}
}

/// The store used by a mounted player: local storage when the browser allows
/// it, otherwise an in-memory map that lives as long as the player.
#[derive(Debug)]
pub enum BrowserStore {
	Local(LocalStorage),
	Memory(MemoryStore),
}

impl BrowserStore {
	pub fn open() -> Self {
		match LocalStorage::open() {
			Some(storage) => Self::Local(storage),
			None => {
				tracing::warn!("local storage is unavailable, volume will not persist across reloads");
				Self::Memory(MemoryStore::default())
			}
		}
	}
}

impl SettingsStore for BrowserStore {
	fn get(&self, key: &str) -> Option<String> {
		match self {
			Self::Local(store) => store.get(key),
			Self::Memory(store) => store.get(key),
		}
	}

	fn set(&self, key: &str, value: &str) {
		match self {
			Self::Local(store) => store.set(key, value),
			Self::Memory(store) => store.set(key, value),
		}
	}
}
