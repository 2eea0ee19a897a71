// Console layer adapted from https://github.com/old-storyai/tracing-wasm, limited to what the player logs
// and with a configurable maximum level per player.

use core::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::*;
use tracing_subscriber::registry::*;
use web_sys::console;

/// Writes events to the browser console, colored by level.
#[derive(Debug, Clone)]
pub struct ConsoleLayer {
	max_level: tracing::Level,
}

impl ConsoleLayer {
	pub fn new(max_level: tracing::Level) -> Self {
		Self { max_level }
	}
}

impl Default for ConsoleLayer {
	fn default() -> Self {
		Self::new(tracing::Level::INFO)
	}
}

const fn level_style(level: &tracing::Level) -> &'static str {
	match *level {
		tracing::Level::TRACE => "color: dodgerblue; background: #444",
		tracing::Level::DEBUG => "color: lawngreen; background: #444",
		tracing::Level::INFO => "color: whitesmoke; background: #444",
		tracing::Level::WARN => "color: orange; background: #444",
		tracing::Level::ERROR => "color: red; background: #444",
	}
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for ConsoleLayer {
	fn enabled(&self, metadata: &tracing::Metadata<'_>, _: Context<'_, S>) -> bool {
		metadata.level() <= &self.max_level
	}

	fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
		let mut recorder = StringRecorder::default();
		event.record(&mut recorder);

		let meta = event.metadata();
		let level = meta.level();
		let origin = meta
			.file()
			.and_then(|file| meta.line().map(|ln| format!("{}:{}", file, ln)))
			.unwrap_or_default();

		let console_fn = match *level {
			tracing::Level::TRACE | tracing::Level::DEBUG => console::debug_4,
			tracing::Level::INFO => console::info_4,
			tracing::Level::WARN => console::warn_4,
			tracing::Level::ERROR => console::error_4,
		};

		console_fn(
			&format!("%c{}%c {}%c{}", level, origin, recorder).into(),
			&level_style(level).into(),
			&"color: gray; font-style: italic".into(),
			&"color: inherit".into(),
		);
	}
}

pub type LoggingInstance = Layered<ConsoleLayer, Registry>;

pub fn registry(max_level: tracing::Level) -> LoggingInstance {
	Registry::default().with(ConsoleLayer::new(max_level))
}

/// Installs the console layer for events logged outside of any player.
pub fn set_as_global_default() {
	if tracing::subscriber::set_global_default(registry(tracing::Level::INFO)).is_err() {
		console::warn_1(&"a global tracing subscriber is already set".into());
	}
}

/// Logs at `max_level` until the guard is dropped.
#[must_use = "the level only applies while the guard is alive"]
pub fn scope(max_level: tracing::Level) -> tracing_core::dispatcher::DefaultGuard {
	tracing::subscriber::set_default(registry(max_level))
}

#[derive(Default)]
struct StringRecorder {
	display: String,
	is_following_args: bool,
}

impl Visit for StringRecorder {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			if !self.display.is_empty() {
				self.display = format!("{:?}\n{}", value, self.display)
			} else {
				self.display = format!("{:?}", value)
			}
		} else {
			// Writing into a String cannot fail.
			if self.is_following_args {
				let _ = writeln!(self.display);
			} else {
				self.display.push(' ');
				self.is_following_args = true;
			}
			let _ = write!(self.display, "{} = {:?};", field.name(), value);
		}
	}
}

impl fmt::Display for StringRecorder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if !self.display.is_empty() {
			write!(f, " {}", self.display)
		} else {
			Ok(())
		}
	}
}
