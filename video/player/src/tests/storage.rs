use std::rc::Rc;

use crate::player::storage::{BrowserStore, MemoryStore, SettingsStore};

#[test]
fn test_memory_store() {
	let store = MemoryStore::default();

	assert_eq!(store.get("video-player-volume"), None);
	store.set("video-player-volume", "0.3");
	assert_eq!(store.get("video-player-volume").as_deref(), Some("0.3"));
	store.set("video-player-volume", "1");
	assert_eq!(store.get("video-player-volume").as_deref(), Some("1"));
}

#[test]
fn test_shared_store() {
	let store = Rc::new(MemoryStore::default());
	let other = store.clone();

	store.set("key", "value");
	assert_eq!(other.get("key").as_deref(), Some("value"));
}

#[test]
fn test_browser_store_memory_fallback() {
	let store = BrowserStore::Memory(MemoryStore::default());

	store.set("key", "value");
	assert_eq!(store.get("key").as_deref(), Some("value"));
	assert_eq!(store.get("other"), None);
}
