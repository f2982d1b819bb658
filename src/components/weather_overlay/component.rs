//! Leptos component mounting the overlay canvas.
//!
//! The component renders one fixed, pointer-transparent canvas above the
//! page. Once it is mounted it waits for the Home Assistant frontend, then
//! runs three host timers (weather poll, navigation check, resize listener)
//! next to a `requestAnimationFrame` loop that ticks the scene while it runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use super::canvas::CanvasSurface;
use super::config::OverlayConfig;
use super::effects::EffectTable;
use super::hass;
use super::host::SnapshotHost;
use super::particles::Bounds;
use super::poll::{HostWait, Poller, WaitStatus};
use super::state::{SceneController, TickOutcome};

const CANVAS_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100vw; height: 100vh; \
	pointer-events: none; z-index: 9999; display: block;";

type Callback = Closure<dyn FnMut()>;

/// Everything the timers and the frame loop mutate.
struct OverlayRuntime {
	scene: SceneController<CanvasSurface>,
	poller: Poller,
	config: OverlayConfig,
}

/// Handles shared between the frame loop and the host timers.
#[derive(Clone)]
struct Shared {
	runtime: Rc<RefCell<Option<OverlayRuntime>>>,
	frame: Rc<RefCell<Option<Callback>>>,
	/// A frame callback is scheduled and has not run yet.
	frame_pending: Rc<Cell<bool>>,
	/// Timer and listener callbacks, kept alive for the page lifetime.
	callbacks: Rc<RefCell<Vec<Callback>>>,
}

impl Shared {
	fn new() -> Self {
		Self {
			runtime: Rc::new(RefCell::new(None)),
			frame: Rc::new(RefCell::new(None)),
			frame_pending: Rc::new(Cell::new(false)),
			callbacks: Rc::new(RefCell::new(Vec::new())),
		}
	}

	fn request_frame(&self) {
		if let (Some(window), Some(cb)) = (web_sys::window(), self.frame.borrow().as_ref()) {
			if window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.is_ok()
			{
				self.frame_pending.set(true);
				return;
			}
		}
		self.frame_pending.set(false);
	}

	/// Schedule a frame if the scene runs and no frame is already pending.
	fn ensure_frame_loop(&self) {
		let running = self
			.runtime
			.borrow()
			.as_ref()
			.is_some_and(|r| r.scene.is_running());
		if running && !self.frame_pending.get() {
			self.request_frame();
		}
	}

	fn evaluate(&self) {
		let now = js_sys::Date::now();
		if let Some(rt) = self.runtime.borrow_mut().as_mut() {
			if rt.poller.is_due(now) {
				let snapshot = hass::snapshot(&rt.config);
				let path = hass::current_path();
				let host = SnapshotHost::new(snapshot.as_ref(), &rt.config, &path);
				rt.poller.evaluate(now, &host, &mut rt.scene);
			}
		}
		self.ensure_frame_loop();
	}

	fn keep(&self, callback: Callback) -> js_sys::Function {
		let function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();
		self.callbacks.borrow_mut().push(callback);
		function
	}

	fn every(&self, window: &Window, interval_ms: i32, callback: Callback) -> Option<i32> {
		let function = self.keep(callback);
		window
			.set_interval_with_callback_and_timeout_and_arguments_0(&function, interval_ms)
			.ok()
	}
}

fn viewport(window: &Window) -> (f64, f64, f64) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	let ratio = window.device_pixel_ratio();
	(
		dim(window.inner_width()),
		dim(window.inner_height()),
		if ratio > 0.0 { ratio } else { 1.0 },
	)
}

/// Install the weather poll, navigation check and resize listener, then run
/// the first evaluation.
fn start_watching(shared: &Shared, window: &Window) {
	let Some((poll_ms, nav_ms)) = shared
		.runtime
		.borrow()
		.as_ref()
		.map(|r| (r.config.poll_interval_ms, r.config.navigation_check_ms))
	else {
		return;
	};

	if let Some(rt) = shared.runtime.borrow_mut().as_mut() {
		rt.poller.observe_path(&hass::current_path());
	}
	shared.evaluate();

	let poll = shared.clone();
	shared.every(window, poll_ms, Closure::new(move || poll.evaluate()));

	let nav = shared.clone();
	shared.every(
		window,
		nav_ms,
		Closure::new(move || {
			let changed = nav
				.runtime
				.borrow_mut()
				.as_mut()
				.is_some_and(|r| r.poller.observe_path(&hass::current_path()));
			if changed {
				nav.evaluate();
			}
		}),
	);

	let resize = shared.clone();
	let on_resize = shared.keep(Closure::new(move || {
		let Some(win) = web_sys::window() else {
			return;
		};
		let (w, h, ratio) = viewport(&win);
		if let Some(rt) = resize.runtime.borrow_mut().as_mut() {
			rt.scene.on_resize(w, h, ratio);
		}
	}));
	let _ = window.add_event_listener_with_callback("resize", &on_resize);

	info!("weather-overlay: initialization complete");
}

/// Full-screen weather overlay.
///
/// Mount once per page. The canvas never intercepts input.
#[component]
pub fn WeatherOverlay(config: OverlayConfig) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let shared = Shared::new();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if shared.runtime.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let surface = match CanvasSurface::new(canvas) {
			Ok(surface) => surface,
			Err(e) => {
				error!("weather-overlay: {e}");
				return;
			}
		};
		let (w, h, ratio) = viewport(&window);
		let mut scene = SceneController::new(
			surface,
			EffectTable::default(),
			Bounds::new(w, h),
			ChaCha8Rng::from_entropy(),
		);
		scene.on_resize(w, h, ratio);

		*shared.runtime.borrow_mut() = Some(OverlayRuntime {
			scene,
			poller: Poller::new(config.update_interval_ms),
			config: config.clone(),
		});

		let frame = shared.clone();
		*shared.frame.borrow_mut() = Some(Closure::new(move || {
			let outcome = frame
				.runtime
				.borrow_mut()
				.as_mut()
				.map(|r| r.scene.tick());
			if outcome == Some(TickOutcome::Continue) {
				frame.request_frame();
			} else {
				frame.frame_pending.set(false);
			}
		}));

		info!("weather-overlay: waiting for Home Assistant");
		let mut wait = HostWait::new(config.host_wait_attempts);
		let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let (waiter, waiter_handle) = (shared.clone(), handle.clone());
		let id = shared.every(
			&window,
			config.host_wait_interval_ms,
			Closure::new(move || {
				let status = wait.check(hass::is_ready());
				if status == WaitStatus::Waiting {
					return;
				}
				let Some(win) = web_sys::window() else {
					return;
				};
				if let Some(id) = waiter_handle.take() {
					win.clear_interval_with_handle(id);
				}
				if status == WaitStatus::Ready {
					start_watching(&waiter, &win);
				}
			}),
		);
		handle.set(id);
	});

	view! {
		<canvas
			node_ref=canvas_ref
			id="weather-overlay-canvas"
			class="weather-overlay-canvas"
			style=CANVAS_STYLE
		/>
	}
}
