use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break,
}

struct LoopInner {
    label: &'static str,
    handle: Cell<Option<i32>>,
    stopped: Cell<bool>,
    tick: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl LoopInner {
    fn request(&self) {
        let Some(w) = web::window() else {
            return;
        };
        let tick = self.tick.borrow();
        if let Some(cb) = tick.as_ref() {
            match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.handle.set(Some(id)),
                Err(e) => log::warn!("[frame:{}] requestAnimationFrame failed: {:?}", self.label, e),
            }
        }
    }
}

/// A requestAnimationFrame loop that can be cancelled.
///
/// The callback receives the frame timestamp in milliseconds. Dropping the
/// handle stops the loop; no callback runs after `stop` returns.
pub struct FrameLoop {
    inner: Rc<LoopInner>,
}

impl FrameLoop {
    pub fn start(label: &'static str, mut on_frame: impl FnMut(f64) -> LoopControl + 'static) -> Self {
        let inner = Rc::new(LoopInner {
            label,
            handle: Cell::new(None),
            stopped: Cell::new(false),
            tick: RefCell::new(None),
        });
        let weak: Weak<LoopInner> = Rc::downgrade(&inner);
        *inner.tick.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.handle.set(None);
            if inner.stopped.get() {
                return;
            }
            if on_frame(ts) == LoopControl::Break {
                inner.stopped.set(true);
                log::debug!("[frame:{}] finished", inner.label);
                return;
            }
            if !inner.stopped.get() {
                inner.request();
            }
        }) as Box<dyn FnMut(f64)>));
        inner.request();
        log::debug!("[frame:{}] started", label);
        Self { inner }
    }

    pub fn is_running(&self) -> bool {
        !self.inner.stopped.get()
    }

    /// Idempotent. Safe to call from inside the loop's own callback.
    pub fn stop(&self) {
        let was_running = !self.inner.stopped.replace(true);
        if let Some(id) = self.inner.handle.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        // The closure may be on the stack right now; release it after this task.
        if let Ok(mut slot) = self.inner.tick.try_borrow_mut() {
            if let Some(cb) = slot.take() {
                spawn_local(async move { drop(cb) });
            }
        }
        if was_running {
            log::debug!("[frame:{}] stopped", self.inner.label);
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
