use crate::constants::*;
use crate::dom;
use crate::frame::{FrameLoop, LoopControl};
use intro_core::{AnchorScroll, LineSplit, ProgressPublisher, ScrollDriver, ScrollInput, ScrollTuning, SignalBus};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Scroll-driven reveal of the intro section.
///
/// Publishes progress into the bus and renders every bus value onto the
/// document root as style variables, once per frame.
pub struct IntroView {
    window: web::Window,
    intro: web::HtmlElement,
    root: web::HtmlElement,
    driver: ScrollDriver,
    bus: SignalBus,
    publisher: ProgressPublisher,
    content_visible: Option<bool>,
}

impl IntroView {
    pub fn new(
        window: web::Window,
        document: &web::Document,
        bus: SignalBus,
        publisher: ProgressPublisher,
        tuning: ScrollTuning,
    ) -> anyhow::Result<Self> {
        tuning.validate()?;
        let intro = document
            .query_selector(INTRO_SELECTOR)
            .map_err(dom::js_err)?
            .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
            .ok_or_else(|| anyhow::anyhow!("missing {}", INTRO_SELECTOR))?;
        let root = dom::root_element(document).ok_or_else(|| anyhow::anyhow!("no document element"))?;
        Ok(Self {
            window,
            intro,
            root,
            driver: ScrollDriver::new(tuning),
            bus,
            publisher,
            content_visible: None,
        })
    }

    fn frame(&mut self, now_ms: f64) {
        let container = dom::element_rect(&self.intro);
        let line_split = match (
            dom::query(&self.intro, STAGE_SELECTOR),
            dom::query(&self.intro, LINE_SPLIT_SELECTOR),
        ) {
            (Some(stage), Some(line)) => Some(LineSplit {
                stage: dom::element_rect(&stage),
                line: dom::element_rect(&line),
            }),
            _ => None,
        };
        let input = ScrollInput {
            now_ms,
            container_top: container.top,
            viewport: dom::viewport(&self.window),
            eye_anchor: dom::query(&self.intro, EYE_ANCHOR_SELECTOR).map(|el| dom::element_rect(&el)),
            pupil: self.bus.pupil(),
            line_split,
        };
        let Some(signals) = self.driver.frame(&input) else {
            return;
        };
        let visible = signals.content_visible();
        self.publisher.publish(signals);
        dom::set_vars(&self.root, &self.bus.style_vars());

        if self.content_visible != Some(visible) {
            self.content_visible = Some(visible);
            _ = self
                .intro
                .set_attribute(ABOUT_VISIBLE_ATTR, if visible { "true" } else { "false" });
            log::debug!("[intro] content visible={}", visible);
        }
    }
}

pub fn start_loop(view: IntroView) -> FrameLoop {
    let view = Rc::new(RefCell::new(view));
    view.borrow_mut().driver.start();
    FrameLoop::start("intro", move |ts| {
        let mut v = view.borrow_mut();
        if !v.driver.is_running() {
            return LoopControl::Break;
        }
        v.frame(ts);
        LoopControl::Continue
    })
}

/// Smooth-scrolls the window so `target` lands at the top of the viewport.
pub fn scroll_to(window: &web::Window, target: &web::Element) -> FrameLoop {
    let from_y = window.scroll_y().unwrap_or(0.0);
    let to_y = from_y + dom::element_rect(target).top;
    let anim = AnchorScroll::new(dom::now_ms(window), from_y, to_y);
    log::debug!("[intro] anchor scroll {:.0} -> {:.0}", from_y, to_y);
    let window = window.clone();
    FrameLoop::start("anchor-scroll", move |ts| {
        let (y, done) = anim.sample(ts);
        window.scroll_to_with_x_and_y(0.0, y);
        if done {
            LoopControl::Break
        } else {
            LoopControl::Continue
        }
    })
}
