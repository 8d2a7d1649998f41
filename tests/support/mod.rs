/*!
Test supports module.

*/

#![allow(dead_code)]

use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use megraphics::{Context, WindowBuilder};
use winit::event_loop::{EventLoop, EventLoopBuilder};
use winit::window::Window;

/// A current context, either offscreen or on a hidden window.
///
/// Fields drop in declaration order, the context goes before its window.
pub struct TestDisplay {
    pub context: Rc<Context>,
    _window: Option<Window>,
}

/// Returns true if we are executing headless tests.
pub fn is_headless() -> bool {
    env::var("HEADLESS_TESTS").is_ok()
}

/// Builds a context for tests, or returns `None` when this machine can't create one.
///
/// With `HEADLESS_TESTS` set the offscreen context is mandatory.
pub fn build_display() -> Option<TestDisplay> {
    match build_headless() {
        Some(context) => return Some(TestDisplay { context, _window: None }),
        None if is_headless() => panic!("HEADLESS_TESTS is set but no headless context could be created"),
        None => (),
    }

    if !has_display_server() {
        eprintln!("no display server and no EGL device, skipping");
        return None;
    }

    build_window_display()
}

/// Returns the path of a file under `res/`.
pub fn resource(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("res").join(path)
}

#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
fn build_headless() -> Option<Rc<Context>> {
    match megraphics::backend::build_headless(1024, 768) {
        Ok(context) => Some(context),
        Err(err) => {
            eprintln!("headless context unavailable: {}", err);
            None
        },
    }
}

#[cfg(not(all(unix, not(any(target_os = "macos", target_os = "ios")))))]
fn build_headless() -> Option<Rc<Context>> {
    None
}

#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
fn has_display_server() -> bool {
    env::var_os("DISPLAY").is_some() || env::var_os("WAYLAND_DISPLAY").is_some()
}

#[cfg(not(all(unix, not(any(target_os = "macos", target_os = "ios")))))]
fn has_display_server() -> bool {
    true
}

// winit allows a single event loop per process, it stays on the thread that built it
static EVENT_LOOP_CREATED: AtomicBool = AtomicBool::new(false);

thread_local! {
    static EVENT_LOOP: RefCell<Option<EventLoop<()>>> = RefCell::new(None);
}

fn build_window_display() -> Option<TestDisplay> {
    EVENT_LOOP.with(|event_loop| {
        let mut event_loop = event_loop.borrow_mut();
        if event_loop.is_none() {
            if EVENT_LOOP_CREATED.swap(true, Ordering::SeqCst) {
                eprintln!("the event loop lives on another test thread, skipping; \
                           run with --test-threads=1");
                return None;
            }
            *event_loop = Some(build_event_loop());
        }

        let result = WindowBuilder::new()
            .with_visible(false)
            .build(event_loop.as_ref()?);
        match result {
            Ok((window, context)) => Some(TestDisplay { context, _window: Some(window) }),
            Err(err) => {
                eprintln!("couldn't create a window context, skipping: {}", err);
                None
            },
        }
    })
}

// the test harness runs tests outside of the main thread
#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
fn build_event_loop() -> EventLoop<()> {
    use winit::platform::x11::EventLoopBuilderExtX11;
    EventLoopBuilder::new().with_any_thread(true).build()
}

#[cfg(windows)]
fn build_event_loop() -> EventLoop<()> {
    use winit::platform::windows::EventLoopBuilderExtWindows;
    EventLoopBuilder::new().with_any_thread(true).build()
}

#[cfg(not(any(windows, all(unix, not(any(target_os = "macos", target_os = "ios"))))))]
fn build_event_loop() -> EventLoop<()> {
    EventLoopBuilder::new().build()
}
