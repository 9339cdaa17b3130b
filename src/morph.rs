use crate::constants::STAR_FILL;
use crate::dom;
use crate::frame::{FrameLoop, LoopControl};
use intro_core::{MorphCallbacks, MorphConfig, MorphTransition, Rect, Viewport};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Full-viewport overlay drawing one star/rectangle morph.
///
/// Removed from the document when dropped; dropping mid-flight cancels the
/// transition without firing its callbacks.
pub struct MorphOverlay {
    root: web::HtmlElement,
    transition: Rc<RefCell<MorphTransition>>,
    frame_loop: FrameLoop,
}

impl MorphOverlay {
    pub fn spawn(
        document: &web::Document,
        now_ms: f64,
        from_rect: Rect,
        viewport: Viewport,
        config: MorphConfig,
        callbacks: MorphCallbacks,
    ) -> anyhow::Result<Self> {
        let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
        let root: web::HtmlElement = document
            .create_element("div")
            .map_err(dom::js_err)?
            .dyn_into()
            .map_err(dom::js_err)?;
        _ = root.set_attribute("class", "morph-overlay");
        _ = root.set_attribute("aria-hidden", "true");
        for (name, value) in [
            ("position", "fixed"),
            ("inset", "0"),
            ("z-index", "80"),
            ("pointer-events", "none"),
        ] {
            dom::set_style(&root, name, value);
        }

        let svg = dom::svg_element(document, "svg")?;
        let view_box = format!("0 0 {} {}", viewport.width, viewport.height);
        dom::set_attrs(
            &svg,
            &[("width", "100%"), ("height", "100%"), ("viewBox", &view_box)],
        );
        let path = dom::svg_element(document, "path")?;
        _ = path.set_attribute("fill", STAR_FILL);
        svg.append_child(&path).map_err(dom::js_err)?;
        root.append_child(&svg).map_err(dom::js_err)?;
        body.append_child(&root).map_err(dom::js_err)?;

        let mut transition = MorphTransition::new(from_rect, viewport, config, callbacks);
        transition.start(now_ms);
        let transition = Rc::new(RefCell::new(transition));

        let tick_transition = transition.clone();
        let tick_root = root.clone();
        let frame_loop = FrameLoop::start("morph", move |ts| {
            let Ok(mut t) = tick_transition.try_borrow_mut() else {
                return LoopControl::Continue;
            };
            let Some(frame) = t.frame(ts) else {
                return LoopControl::Break;
            };
            _ = path.set_attribute("d", &frame.path_d());
            dom::set_style(&tick_root, "opacity", &format!("{:.3}", frame.overlay_opacity));
            if t.is_finished() {
                LoopControl::Break
            } else {
                LoopControl::Continue
            }
        });

        Ok(Self {
            root,
            transition,
            frame_loop,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.transition.borrow().is_finished()
    }
}

impl Drop for MorphOverlay {
    fn drop(&mut self) {
        self.frame_loop.stop();
        if let Ok(mut t) = self.transition.try_borrow_mut() {
            t.stop();
        }
        self.root.remove();
    }
}
