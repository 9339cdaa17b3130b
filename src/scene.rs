use crate::constants::*;
use crate::constellation::ConstellationView;
use crate::dom;
use crate::morph::MorphOverlay;
use intro_core::{
    MorphCallbacks, MorphConfig, MorphKind, Rect, SceneCommand, ScenePublisher, SceneState, Selection,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Switches between the constellation and an open project, with the morph in between.
pub struct SceneController {
    window: web::Window,
    document: web::Document,
    state: SceneState,
    publisher: ScenePublisher,
    constellation: Option<Rc<RefCell<ConstellationView>>>,
    overlay: Option<(MorphKind, MorphOverlay)>,
    this: Weak<RefCell<SceneController>>,
}

impl SceneController {
    pub fn new(
        window: web::Window,
        document: web::Document,
        publisher: ScenePublisher,
        constellation: Option<Rc<RefCell<ConstellationView>>>,
    ) -> Rc<RefCell<Self>> {
        let initial = constellation
            .as_ref()
            .and_then(|c| c.borrow().selected().map(str::to_string));
        let scene = Rc::new_cyclic(|this| {
            RefCell::new(Self {
                window,
                document,
                state: SceneState::new(initial),
                publisher,
                constellation,
                overlay: None,
                this: this.clone(),
            })
        });
        scene.borrow().sync();
        scene
    }

    pub fn select(&mut self, selection: Selection) {
        if let Some(c) = &self.constellation {
            c.borrow_mut().set_selected(Some(selection.id.clone()));
        }
        let command = self.state.select(&selection);
        self.apply(command);
    }

    pub fn close(&mut self) {
        if !self.state.in_project_mode() {
            return;
        }
        let command = self.state.close();
        self.apply(command);
    }

    fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::None => {}
            SceneCommand::OpenProject(id) => self.show_project(Some(&id)),
            SceneCommand::CloseProject => self.show_project(None),
            SceneCommand::StartMorph { kind, rect } => self.start_morph(kind, rect),
        }
        self.sync();
    }

    fn start_morph(&mut self, kind: MorphKind, rect: Rect) {
        if let Some((previous, overlay)) = self.overlay.take() {
            // A cancelled morph never reports back, so retire it here.
            drop(overlay);
            self.state.fade_done(previous);
        }
        let config = MorphConfig {
            reduced_motion: dom::prefers_reduced_motion(&self.window),
            reverse: kind == MorphKind::Close,
            ..MorphConfig::default()
        };
        let on_morph = self.this.clone();
        let on_fade = self.this.clone();
        let callbacks = MorphCallbacks::new(
            move || defer(on_morph, move |s| s.morph_done(kind)),
            move || defer(on_fade, move |s| s.fade_done(kind)),
        );
        match MorphOverlay::spawn(
            &self.document,
            dom::now_ms(&self.window),
            rect,
            dom::viewport(&self.window),
            config,
            callbacks,
        ) {
            Ok(overlay) => self.overlay = Some((kind, overlay)),
            Err(e) => {
                log::error!("[scene] morph overlay failed: {:?}", e);
                let command = self.state.morph_done(kind);
                self.apply(command);
                self.state.fade_done(kind);
            }
        }
    }

    fn morph_done(&mut self, kind: MorphKind) {
        let command = self.state.morph_done(kind);
        self.apply(command);
    }

    fn fade_done(&mut self, kind: MorphKind) {
        self.state.fade_done(kind);
        if matches!(&self.overlay, Some((k, o)) if *k == kind && o.is_finished()) {
            self.overlay = None;
        }
        self.sync();
    }

    fn show_project(&self, id: Option<&str>) {
        let Some(panel) = dom::html_by_id(&self.document, PROJECT_PANEL_ID) else {
            log::warn!("[scene] missing #{}", PROJECT_PANEL_ID);
            return;
        };
        match id {
            Some(id) => {
                _ = panel.set_attribute("data-open", id);
            }
            None => {
                _ = panel.remove_attribute("data-open");
            }
        }
        panel.set_hidden(id.is_none());
        for item in dom::query_all(&panel, PROJECT_ITEM_SELECTOR) {
            let matches = id.is_some() && item.get_attribute("data-project-id").as_deref() == id;
            if matches {
                _ = item.remove_attribute("hidden");
            } else {
                _ = item.set_attribute("hidden", "");
            }
        }
        log::info!("[scene] project {}", id.unwrap_or("closed"));
    }

    /// Pushes derived visibility to the bus; the intro loop renders it.
    fn sync(&self) {
        self.state.publish(&self.publisher);
        if let Some(c) = &self.constellation {
            if let Ok(mut c) = c.try_borrow_mut() {
                c.set_interactive(self.state.constellation_interactive());
            }
        }
    }
}

impl Drop for SceneController {
    fn drop(&mut self) {
        self.overlay = None;
        self.publisher.clear();
    }
}

/// Runs `f` on the scene after the current frame, outside any morph borrow.
fn defer(scene: Weak<RefCell<SceneController>>, f: impl FnOnce(&mut SceneController) + 'static) {
    spawn_local(async move {
        if let Some(scene) = scene.upgrade() {
            f(&mut scene.borrow_mut());
        }
    });
}
