#![cfg(target_arch = "wasm32")]
use intro_core::{EyeTuning, ScrollTuning, SignalBus};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod constellation;
mod dom;
mod eye;
mod frame;
mod input;
mod intro;
mod morph;
mod scene;

use constants::*;
use dom::Listener;
use frame::FrameLoop;
use scene::SceneController;

/// Everything that keeps the page animated. Dropping it stops every loop and
/// detaches every listener.
struct App {
    _intro: Option<FrameLoop>,
    _eye: Option<FrameLoop>,
    _scene: Option<Rc<RefCell<SceneController>>>,
    constellation: Option<Rc<RefCell<constellation::ConstellationView>>>,
    _listeners: Vec<Listener>,
    _anchor_scroll: Rc<RefCell<Option<FrameLoop>>>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

static STARTED: AtomicBool = AtomicBool::new(false);

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("intro-web starting");

    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stops all animation and removes listeners. Safe to call more than once.
#[wasm_bindgen]
pub fn shutdown() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if app.is_some() {
        drop(app);
        STARTED.store(false, Ordering::SeqCst);
        log::info!("intro-web stopped");
    }
}

/// Designates the constellation's focus node from the page; `None` leaves focus mode.
#[wasm_bindgen(js_name = setConstellationFocus)]
pub fn set_constellation_focus(id: Option<String>) {
    APP.with(|slot| {
        let app = slot.borrow();
        let Some(view) = app.as_ref().and_then(|a| a.constellation.as_ref()) else {
            log::warn!("[constellation] focus ignored, not mounted");
            return;
        };
        if let Ok(mut v) = view.try_borrow_mut() {
            v.set_focus(id.filter(|s| !s.is_empty()));
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let (bus, writers) = SignalBus::new();

    let intro_loop = match intro::IntroView::new(
        window.clone(),
        &document,
        bus.clone(),
        writers.progress,
        ScrollTuning::default(),
    ) {
        Ok(view) => Some(intro::start_loop(view)),
        Err(e) => {
            log::warn!("[intro] disabled: {:?}", e);
            None
        }
    };

    let eye_loop = match eye::EyeView::new(
        window.clone(),
        &document,
        bus.clone(),
        writers.pupil,
        EyeTuning::default(),
    ) {
        Ok(view) => Some(eye::start_loop(view)),
        Err(e) => {
            log::warn!("[eye] disabled: {:?}", e);
            None
        }
    };

    let mut listeners = Vec::new();
    let constellation_view = match constellation::ConstellationView::mount(&document) {
        Ok(view) => Some(Rc::new(RefCell::new(view))),
        Err(e) => {
            log::warn!("[constellation] disabled: {:?}", e);
            None
        }
    };
    let scene = SceneController::new(
        window.clone(),
        document.clone(),
        writers.scene,
        constellation_view.clone(),
    );
    if let Some(view) = &constellation_view {
        let weak = Rc::downgrade(&scene);
        let on_select: constellation::SelectHandler = Rc::new(move |selection| {
            if let Some(scene) = weak.upgrade() {
                scene.borrow_mut().select(selection);
            }
        });
        listeners.extend(constellation::wire(view, on_select)?);
    }
    listeners.extend(wire_close(&window, &document, &scene)?);

    let anchor_scroll = Rc::new(RefCell::new(None));
    listeners.extend(wire_about_link(&window, &document, &anchor_scroll)?);

    APP.with(|slot| {
        *slot.borrow_mut() = Some(App {
            _intro: intro_loop,
            _eye: eye_loop,
            _scene: Some(scene),
            constellation: constellation_view,
            _listeners: listeners,
            _anchor_scroll: anchor_scroll,
        });
    });
    log::info!("intro-web ready");
    Ok(())
}

fn wire_close(
    window: &web::Window,
    document: &web::Document,
    scene: &Rc<RefCell<SceneController>>,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::new();

    let weak = Rc::downgrade(scene);
    if let Some(l) = dom::add_click_listener(document, PROJECT_CLOSE_ID, move |ev| {
        ev.prevent_default();
        if let Some(scene) = weak.upgrade() {
            scene.borrow_mut().close();
        }
    }) {
        listeners.push(l);
    }

    let weak = Rc::downgrade(scene);
    listeners.push(Listener::new(window.as_ref(), "keydown", move |ev| {
        let is_escape = ev
            .dyn_ref::<web::KeyboardEvent>()
            .map(|k| k.key() == "Escape")
            .unwrap_or(false);
        if !is_escape {
            return;
        }
        if let Some(scene) = weak.upgrade() {
            if let Ok(mut s) = scene.try_borrow_mut() {
                s.close();
            }
        }
    })?);
    Ok(listeners)
}

fn wire_about_link(
    window: &web::Window,
    document: &web::Document,
    slot: &Rc<RefCell<Option<FrameLoop>>>,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::new();
    let Some(root) = document.document_element() else {
        return Ok(listeners);
    };
    for link in dom::query_all(&root, ABOUT_LINK_SELECTOR) {
        let window = window.clone();
        let slot = slot.clone();
        listeners.push(Listener::new(link.as_ref(), "click", move |ev| {
            let Some(target) = window
                .document()
                .and_then(|d| d.get_element_by_id(ABOUT_TARGET_ID))
            else {
                return;
            };
            ev.prevent_default();
            // Replacing the handle cancels any scroll still running.
            *slot.borrow_mut() = Some(intro::scroll_to(&window, &target));
        })?);
    }
    Ok(listeners)
}
