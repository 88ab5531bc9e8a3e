//! Cancelable browser timers
//!
//! Each handle cancels its callback on `cancel()` or drop, and cancelling
//! twice is harmless. A callback that was already queued can still run after
//! cancellation, so callers must re-check their own state when it fires.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A pending `requestAnimationFrame` callback
pub struct AnimationFrame {
    id: Option<i32>,
}

impl AnimationFrame {
    pub fn request(callback: impl FnOnce(f64) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::once_into_js(callback);
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => Some(Self { id: Some(id) }),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A one-shot `setTimeout` callback
pub struct Timeout {
    id: Option<i32>,
}

impl Timeout {
    pub fn start(delay_ms: i32, callback: impl FnOnce() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::once_into_js(callback);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms,
        ) {
            Ok(id) => Some(Self { id: Some(id) }),
            Err(e) => {
                log::warn!("setTimeout failed: {:?}", e);
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(id);
            }
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A repeating `setInterval` callback
pub struct Interval {
    id: Option<i32>,
    callback: Option<Closure<dyn FnMut()>>,
}

impl Interval {
    pub fn start(period_ms: i32, callback: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::<dyn FnMut()>::new(callback);
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        ) {
            Ok(id) => Some(Self {
                id: Some(id),
                callback: Some(callback),
            }),
            Err(e) => {
                log::warn!("setInterval failed: {:?}", e);
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
        }
        // The interval's own callback may be the one cancelling it, so the
        // closure must outlive this call
        if let Some(callback) = self.callback.take() {
            callback.forget();
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}
