mod settings;
mod storage;
mod support;

#[cfg(target_arch = "wasm32")]
mod browser;
