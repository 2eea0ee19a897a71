use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, HtmlVideoElement};

use super::support::{config, timestamp};
use crate::player::VideoPlayer;

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> HtmlElement {
	let document = web_sys::window().unwrap().document().unwrap();
	let container: HtmlElement = document.create_element("div").unwrap().unchecked_into();
	document.body().unwrap().append_child(&container).unwrap();
	container
}

fn player() -> VideoPlayer {
	let config = config(vec![
		timestamp(30.0, "First Timestamp", Some(3800)),
		timestamp(65.5, "Second Timestamp", None),
	]);

	VideoPlayer::new(serde_wasm_bindgen::to_value(&config).unwrap(), JsValue::UNDEFINED).unwrap()
}

/// Lets the spawned runner process its queue.
async fn settle() {
	for _ in 0..10 {
		JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL)).await.unwrap();
	}
}

#[wasm_bindgen_test]
fn test_rejects_invalid_config() {
	let mut config = config(vec![]);
	config.sources.clear();

	assert!(VideoPlayer::new(serde_wasm_bindgen::to_value(&config).unwrap(), JsValue::UNDEFINED).is_err());
	assert!(VideoPlayer::new(JsValue::from_str("not a config"), JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn test_rejects_unknown_names() {
	let mut player = player();
	let f = js_sys::Function::new_no_args("");

	assert!(player.on("load", f.clone()).is_err());
	assert!(player.on("timestamp", f).is_ok());
	assert!(player.popup_action("pause").is_err());
}

#[wasm_bindgen_test]
async fn test_attach_renders_widget() {
	let container = container();
	let mut player = player();
	player.attach(container.clone()).unwrap();

	let video = container.query_selector(".vp-video").unwrap().unwrap();
	let video: web_sys::HtmlVideoElement = video.unchecked_into();
	assert!(video.src().ends_with("/videos/Video.mp4"));

	assert_eq!(container.query_selector_all(".vp-marker").unwrap().length(), 2);

	let popup: HtmlElement = container.query_selector(".vp-popup").unwrap().unwrap().unchecked_into();
	assert!(popup.hidden());

	let quality_options = container.query_selector_all(".vp-quality option").unwrap();
	assert_eq!(quality_options.length(), 2);

	settle().await;

	assert!(!player.state().unwrap().is_null());
	let popup_state = player.popup().unwrap();
	let label = js_sys::Reflect::get(&popup_state, &"active_label".into()).unwrap();
	assert!(label.is_null() || label.is_undefined());

	player.detach();
}

#[wasm_bindgen_test]
async fn test_detach_removes_widget() {
	let container = container();
	let mut player = player();

	let destroyed = Rc::new(Cell::new(false));
	let callback = Closure::<dyn FnMut()>::new({
		let destroyed = destroyed.clone();
		move || destroyed.set(true)
	});
	player
		.once("destroyed", callback.as_ref().unchecked_ref::<js_sys::Function>().clone())
		.unwrap();

	player.attach(container.clone()).unwrap();
	assert_eq!(container.child_element_count(), 1);

	player.detach();
	settle().await;

	assert_eq!(container.child_element_count(), 0);
	assert!(destroyed.get());
}

#[wasm_bindgen_test]
async fn test_reattach_replaces_widget() {
	let container = container();
	let mut player = player();

	player.attach(container.clone()).unwrap();
	player.attach(container.clone()).unwrap();
	settle().await;

	assert_eq!(container.query_selector_all(".vp-root").unwrap().length(), 1);

	player.detach();
}

#[wasm_bindgen_test]
async fn test_commands_update_state() {
	let container = container();
	let mut player = player();
	player.attach(container.clone()).unwrap();
	settle().await;

	player.set_playback_rate(2.0);
	player.toggle_mute();
	settle().await;

	let state = player.state().unwrap();
	let rate = js_sys::Reflect::get(&state, &"playback_rate".into()).unwrap();
	let sound = js_sys::Reflect::get(&state, &"sound".into()).unwrap();
	assert_eq!(rate.as_f64(), Some(2.0));
	assert_eq!(sound.as_bool(), Some(false));

	let select: web_sys::HtmlSelectElement = container.query_selector(".vp-rate").unwrap().unwrap().unchecked_into();
	assert_eq!(select.value(), "2");

	player.detach();
}

/// An intro popup at the very start, so a single `timeupdate` at 0 shows it.
fn countdown_player(countdown: u32) -> VideoPlayer {
	let config = config(vec![
		timestamp(0.5, "Intro", Some(countdown)),
		timestamp(5.0, "Chapter", None),
	]);

	VideoPlayer::new(serde_wasm_bindgen::to_value(&config).unwrap(), JsValue::UNDEFINED).unwrap()
}

fn video(container: &HtmlElement) -> HtmlVideoElement {
	container.query_selector(".vp-video").unwrap().unwrap().unchecked_into()
}

async fn time_update(container: &HtmlElement) {
	let event = web_sys::Event::new("timeupdate").unwrap();
	video(container).dispatch_event(&event).unwrap();
	settle().await;
}

/// Collects the payloads of every `event` the player emits.
fn record(player: &mut VideoPlayer, event: &str) -> Rc<RefCell<Vec<JsValue>>> {
	let events = Rc::new(RefCell::new(Vec::new()));
	let callback = Closure::<dyn FnMut(JsValue)>::new({
		let events = events.clone();
		move |evt| events.borrow_mut().push(evt)
	});
	player
		.on(event, callback.as_ref().unchecked_ref::<js_sys::Function>().clone())
		.unwrap();
	callback.forget();
	events
}

fn field(value: &JsValue, name: &str) -> JsValue {
	js_sys::Reflect::get(value, &name.into()).unwrap()
}

fn remaining(events: &RefCell<Vec<JsValue>>) -> Vec<f64> {
	events
		.borrow()
		.iter()
		.map(|evt| field(evt, "remaining").as_f64().unwrap())
		.collect()
}

#[wasm_bindgen_test]
async fn test_stop_ends_countdown_events() {
	let container = container();
	let mut player = countdown_player(10);
	let countdowns = record(&mut player, "countdown");
	player.attach(container.clone()).unwrap();
	settle().await;

	time_update(&container).await;
	assert_eq!(field(&player.popup().unwrap(), "active_label").as_string().as_deref(), Some("Intro"));

	player.popup_action("start").unwrap();
	settle().await;
	TimeoutFuture::new(1_300).await;
	assert_eq!(remaining(&countdowns), [9.0]);

	player.popup_action("stop").unwrap();
	settle().await;
	TimeoutFuture::new(2_500).await;

	assert_eq!(remaining(&countdowns), [9.0]);
	let popup = player.popup().unwrap();
	assert_eq!(field(&popup, "active_label").as_string().as_deref(), Some("Intro"));
	assert_eq!(field(&popup, "is_counting_down").as_bool(), Some(false));

	player.detach();
}

#[wasm_bindgen_test]
async fn test_close_ends_countdown_events() {
	let container = container();
	let mut player = countdown_player(10);
	let countdowns = record(&mut player, "countdown");
	let closes = record(&mut player, "popupclose");
	player.attach(container.clone()).unwrap();
	settle().await;

	time_update(&container).await;
	player.popup_action("start").unwrap();
	settle().await;
	TimeoutFuture::new(1_300).await;

	player.popup_action("close").unwrap();
	settle().await;
	TimeoutFuture::new(2_500).await;

	assert_eq!(remaining(&countdowns), [9.0]);
	assert_eq!(closes.borrow().len(), 1);
	assert_eq!(field(&closes.borrow()[0], "reason").as_string().as_deref(), Some("closed"));
	assert!(field(&player.popup().unwrap(), "active_label").is_falsy());

	player.detach();
}

#[wasm_bindgen_test]
async fn test_countdown_finishes_once() {
	let container = container();
	let mut player = countdown_player(2);
	let countdowns = record(&mut player, "countdown");
	let closes = record(&mut player, "popupclose");
	player.attach(container.clone()).unwrap();
	settle().await;

	time_update(&container).await;
	player.popup_action("start").unwrap();
	settle().await;
	TimeoutFuture::new(4_500).await;

	assert_eq!(remaining(&countdowns), [1.0]);
	assert_eq!(closes.borrow().len(), 1);
	assert_eq!(field(&closes.borrow()[0], "reason").as_string().as_deref(), Some("finished"));
	assert!(field(&player.popup().unwrap(), "active_label").is_falsy());

	player.detach();
}

#[wasm_bindgen_test]
async fn test_restart_keeps_a_single_countdown() {
	let container = container();
	let mut player = countdown_player(10);
	let countdowns = record(&mut player, "countdown");
	player.attach(container.clone()).unwrap();
	settle().await;

	time_update(&container).await;
	player.popup_action("start").unwrap();
	settle().await;
	TimeoutFuture::new(1_300).await;

	player.popup_action("start").unwrap();
	settle().await;
	TimeoutFuture::new(1_300).await;

	assert_eq!(remaining(&countdowns), [9.0, 8.0]);

	player.detach();
}

#[wasm_bindgen_test]
async fn test_new_timestamp_ends_countdown_events() {
	let container = container();
	let mut player = countdown_player(10);
	let countdowns = record(&mut player, "countdown");
	let timestamps = record(&mut player, "timestamp");
	player.attach(container.clone()).unwrap();
	settle().await;

	time_update(&container).await;
	player.popup_action("start").unwrap();
	settle().await;
	TimeoutFuture::new(1_300).await;

	// Nothing is loaded, so the position is kept as the start position.
	video(&container).set_current_time(5.2);
	time_update(&container).await;
	TimeoutFuture::new(2_500).await;

	assert_eq!(remaining(&countdowns), [9.0]);
	assert_eq!(timestamps.borrow().len(), 2);
	let popup = player.popup().unwrap();
	assert_eq!(field(&popup, "active_label").as_string().as_deref(), Some("Chapter"));
	assert_eq!(field(&popup, "is_counting_down").as_bool(), Some(false));

	player.detach();
}
