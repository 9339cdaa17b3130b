use crate::constants::*;
use crate::dom::{self, Listener};
use crate::frame::{FrameLoop, LoopControl};
use crate::input::PointerState;
use intro_core::{
    EyeFrame, EyeInput, EyeSimulator, EyeTuning, PupilPublisher, SeededRandom, SignalBus,
    ViewBoxTransform,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

struct EyeParts {
    svg: web::Element,
    pupil: web::Element,
    top_lid: web::Element,
    bottom_lid: web::Element,
}

pub struct EyeView {
    window: web::Window,
    parts: EyeParts,
    sim: EyeSimulator<SeededRandom>,
    pointer: Rc<RefCell<PointerState>>,
    bus: SignalBus,
    publisher: PupilPublisher,
    _pointer_listener: Listener,
}

impl EyeView {
    pub fn new(
        window: web::Window,
        document: &web::Document,
        bus: SignalBus,
        publisher: PupilPublisher,
        tuning: EyeTuning,
    ) -> anyhow::Result<Self> {
        tuning.validate()?;
        let by_id = |id: &str| {
            document
                .get_element_by_id(id)
                .ok_or_else(|| anyhow::anyhow!("missing #{}", id))
        };
        let parts = EyeParts {
            svg: by_id(EYE_SVG_ID)?,
            pupil: by_id(EYE_PUPIL_ID)?,
            top_lid: by_id(EYE_TOP_LID_ID)?,
            bottom_lid: by_id(EYE_BOTTOM_LID_ID)?,
        };

        let pointer = Rc::new(RefCell::new(PointerState::default()));
        let pointer_move = pointer.clone();
        let listener = Listener::new(window.as_ref(), "pointermove", move |ev| {
            if let Some(ev) = ev.dyn_ref::<web::PointerEvent>() {
                pointer_move
                    .borrow_mut()
                    .record(f64::from(ev.client_x()), f64::from(ev.client_y()));
            }
        })?;

        Ok(Self {
            window,
            parts,
            sim: EyeSimulator::new(tuning, SeededRandom::from_entropy()),
            pointer,
            bus,
            publisher,
            _pointer_listener: listener,
        })
    }

    fn frame(&mut self, now_ms: f64) {
        let viewbox = self.sim.tuning().viewbox;
        let transform = ViewBoxTransform::meet(dom::element_rect(&self.parts.svg), viewbox.x, viewbox.y);
        let input = EyeInput {
            now_ms,
            pointer: self.pointer.borrow().local(transform.as_ref()),
            iris: self.bus.iris(),
            reduced_motion: dom::prefers_reduced_motion(&self.window),
        };
        let Some(frame) = self.sim.frame(&input) else {
            return;
        };
        self.draw(&frame);

        match transform {
            Some(t) if !frame.at_rest => self.publisher.publish(frame.pupil_signals(&t)),
            // Nothing to publish this frame; the burst falls back to the anchor rect.
            _ => self.publisher.clear(),
        }
    }

    fn draw(&self, frame: &EyeFrame) {
        let viewbox = self.sim.tuning().viewbox;
        let fmt = |v: f64| format!("{v:.2}");
        dom::set_attrs(
            &self.parts.pupil,
            &[
                ("cx", &fmt(frame.pupil_center.x)),
                ("cy", &fmt(frame.pupil_center.y)),
                ("rx", &fmt(frame.pupil_rx)),
                ("ry", &fmt(frame.pupil_ry)),
            ],
        );
        _ = self.parts.top_lid.set_attribute("d", &frame.lids.top_path_d(viewbox));
        _ = self.parts.bottom_lid.set_attribute("d", &frame.lids.bottom_path_d(viewbox));
    }
}

pub fn start_loop(view: EyeView) -> FrameLoop {
    let view = Rc::new(RefCell::new(view));
    {
        let mut v = view.borrow_mut();
        let now = dom::now_ms(&v.window);
        v.sim.start(now);
    }
    FrameLoop::start("eye", move |ts| {
        let mut v = view.borrow_mut();
        if !v.sim.is_running() {
            return LoopControl::Break;
        }
        v.frame(ts);
        LoopControl::Continue
    })
}
