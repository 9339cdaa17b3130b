use crate::constants::*;
use crate::dom::{self, Listener};
use crate::input::{NodeAttrs, NodeEvent};
use glam::DVec2;
use intro_core::{dust_field, Constellation, Interaction, Rect, Selection, CANVAS_UNITS, DUST_COUNT};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SelectHandler = Rc<dyn Fn(Selection)>;

/// DOM rendering of the constellation plus its pointer and focus wiring.
pub struct ConstellationView {
    container: web::HtmlElement,
    edge_layer: web::Element,
    focus_overlay: web::HtmlElement,
    node_els: Vec<(String, web::HtmlElement)>,
    layout: Constellation,
    interaction: Interaction,
    interactive: bool,
}

impl ConstellationView {
    pub fn mount(document: &web::Document) -> anyhow::Result<Self> {
        let container = dom::html_by_id(document, CONSTELLATION_ID)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", CONSTELLATION_ID))?;

        let mut node_els = Vec::new();
        let mut nodes = Vec::new();
        for el in dom::query_all(&container, NODE_SELECTOR) {
            let Some(id) = el.get_attribute("data-node-id").filter(|s| !s.is_empty()) else {
                continue;
            };
            let attrs = NodeAttrs {
                id: id.clone(),
                title: el.get_attribute("data-title"),
                x: el.get_attribute("data-x"),
                y: el.get_attribute("data-y"),
                size: el.get_attribute("data-size"),
                links: el.get_attribute("data-links"),
            };
            nodes.push(attrs.into_node_lenient());
            if let Ok(html) = el.dyn_into::<web::HtmlElement>() {
                node_els.push((id, html));
            }
        }
        let layout = Constellation::new(&nodes);

        let svg = dom::svg_element(document, "svg")?;
        let units = format!("0 0 {CANVAS_UNITS} {CANVAS_UNITS}");
        dom::set_attrs(
            &svg,
            &[
                ("viewBox", &units),
                ("preserveAspectRatio", "none"),
                ("aria-hidden", "true"),
                ("class", "constellation-lines"),
            ],
        );
        let dust_layer = dom::svg_element(document, "g")?;
        for dust in dust_field(DUST_COUNT) {
            let c = dom::svg_element(document, "circle")?;
            dom::set_attrs(
                &c,
                &[
                    ("cx", &format!("{:.1}", dust.position.x)),
                    ("cy", &format!("{:.1}", dust.position.y)),
                    ("r", &format!("{:.2}", dust.radius)),
                    ("fill", STAR_FILL),
                    ("opacity", &format!("{:.3}", dust.opacity)),
                ],
            );
            dust_layer.append_child(&c).map_err(dom::js_err)?;
        }
        let edge_layer = dom::svg_element(document, "g")?;
        svg.append_child(&dust_layer).map_err(dom::js_err)?;
        svg.append_child(&edge_layer).map_err(dom::js_err)?;
        container
            .insert_before(&svg, container.first_child().as_ref())
            .map_err(dom::js_err)?;

        let focus_overlay: web::HtmlElement = document
            .create_element("div")
            .map_err(dom::js_err)?
            .dyn_into()
            .map_err(dom::js_err)?;
        _ = focus_overlay.set_attribute("class", "constellation-focus");
        dom::set_style(&focus_overlay, "position", "absolute");
        dom::set_style(&focus_overlay, "inset", "0");
        dom::set_style(&focus_overlay, "pointer-events", "none");
        dom::set_style(&focus_overlay, "background", FOCUS_OVERLAY_BG);
        dom::set_style(&focus_overlay, "transition", &format!("opacity {VIEW_FADE_MS}ms ease"));
        container.append_child(&focus_overlay).map_err(dom::js_err)?;

        log::info!(
            "[constellation] mounted {} nodes, {} edges",
            layout.nodes().len(),
            layout.edges().len()
        );
        let view = Self {
            container,
            edge_layer,
            focus_overlay,
            node_els,
            layout,
            interaction: Interaction::default(),
            interactive: true,
        };
        view.render(document);
        Ok(view)
    }

    pub fn selected(&self) -> Option<&str> {
        self.interaction.selected.as_deref()
    }

    pub fn set_selected(&mut self, id: Option<String>) {
        if self.interaction.selected != id {
            self.interaction.selected = id;
            self.rerender();
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        if self.interactive == interactive {
            return;
        }
        self.interactive = interactive;
        dom::set_style(
            &self.container,
            "pointer-events",
            if interactive { "auto" } else { "none" },
        );
        dom::set_style(&self.container, "opacity", if interactive { "1" } else { "0" });
        if !interactive {
            self.handle(NodeEvent::Leave);
        }
    }

    fn canvas(&self) -> Rect {
        dom::element_rect(&self.container)
    }

    fn handle(&mut self, event: NodeEvent) {
        if event.apply(&mut self.interaction) {
            self.rerender();
        }
    }

    /// Externally designated focus node; dims everything not linked to it.
    pub fn set_focus(&mut self, id: Option<String>) {
        if self.interaction.focus != id {
            self.interaction.focus = id;
            self.rerender();
        }
    }

    fn hit(&self, client: DVec2) -> Option<String> {
        self.layout
            .hit_test(client, self.canvas(), &self.interaction)
            .map(|n| n.id.clone())
    }

    /// Selection for `id`, carrying its on-screen rect as the morph origin.
    fn selection_for(&self, id: &str) -> Option<Selection> {
        let node = match self.layout.require(id) {
            Ok(node) => node,
            Err(e) => {
                log::warn!("[constellation] {}", e);
                return None;
            }
        };
        let active = self.layout.node_style(node, &self.interaction).active;
        let rect = self.layout.node_rect(node, self.canvas(), active);
        Some(Selection::from_node(node, rect.is_finite().then_some(rect)))
    }

    fn rerender(&self) {
        if let Some(document) = dom::window_document() {
            self.render(&document);
        }
    }

    fn render(&self, document: &web::Document) {
        self.render_edges(document);
        for (id, el) in &self.node_els {
            let Some(node) = self.layout.node(id) else {
                continue;
            };
            let style = self.layout.node_style(node, &self.interaction);
            let scale = style.radius / node.size.radius_px();
            dom::set_style(el, "left", &format!("{:.3}%", node.position.x * 100.0));
            dom::set_style(el, "top", &format!("{:.3}%", node.position.y * 100.0));
            dom::set_style(el, "transform", &format!("translate(-50%, -50%) scale({scale:.3})"));
            dom::set_style(el, "opacity", &format!("{:.2}", style.opacity));
            dom::set_style(el, "z-index", &style.z_index.to_string());
            dom::set_style(el, "--labelOffset", &format!("{:.1}px", style.label_offset));
            let flag = |b: bool| if b { "true" } else { "false" };
            dom::set_attrs(
                el,
                &[
                    ("data-active", flag(style.active)),
                    ("data-selected", flag(style.selected)),
                    ("data-dimmed", flag(style.dimmed)),
                ],
            );
        }
        let overlay = Constellation::focus_overlay_opacity(&self.interaction);
        dom::set_style(&self.focus_overlay, "opacity", &format!("{overlay}"));
        if self.interaction.has_focus() {
            _ = self.container.set_attribute(FOCUS_ATTR, "true");
        } else {
            _ = self.container.remove_attribute(FOCUS_ATTR);
        }
    }

    fn render_edges(&self, document: &web::Document) {
        self.edge_layer.set_inner_html("");
        for routed in self.layout.routed_edges(&self.interaction) {
            let style = routed.style;
            let stroke = format!("rgba({EDGE_RGB},{:.3})", style.opacity);
            let width = format!("{:.2}", style.width);
            for seg in &routed.segments {
                let Ok(line) = dom::svg_element(document, "line") else {
                    continue;
                };
                dom::set_attrs(
                    &line,
                    &[
                        ("x1", &format!("{:.1}", seg.a.x)),
                        ("y1", &format!("{:.1}", seg.a.y)),
                        ("x2", &format!("{:.1}", seg.b.x)),
                        ("y2", &format!("{:.1}", seg.b.y)),
                        ("stroke", &stroke),
                        ("stroke-width", &width),
                        ("stroke-linecap", "round"),
                        ("vector-effect", "non-scaling-stroke"),
                    ],
                );
                if style.dashed {
                    _ = line.set_attribute("stroke-dasharray", "4 6");
                }
                if style.glow {
                    _ = line.set_attribute("class", "is-glow");
                }
                _ = self.edge_layer.append_child(&line);
            }
        }
    }
}

fn node_id_of(ev: &web::Event) -> Option<String> {
    let target = ev.target()?.dyn_into::<web::Element>().ok()?;
    target
        .closest(NODE_SELECTOR)
        .ok()
        .flatten()?
        .get_attribute("data-node-id")
}

fn client_point(ev: &web::Event) -> Option<DVec2> {
    let ev = ev.dyn_ref::<web::MouseEvent>()?;
    Some(DVec2::new(f64::from(ev.client_x()), f64::from(ev.client_y())))
}

/// Hover, click and keyboard-focus wiring. Listeners live as long as the returned guards.
pub fn wire(view: &Rc<RefCell<ConstellationView>>, on_select: SelectHandler) -> anyhow::Result<Vec<Listener>> {
    let target: web::EventTarget = view.borrow().container.clone().into();
    let weak = Rc::downgrade(view);
    let mut listeners = Vec::new();

    let w = weak.clone();
    listeners.push(Listener::new(&target, "pointermove", move |ev| {
        with_view(&w, |v| {
            if v.interactive {
                let id = client_point(&ev).and_then(|p| v.hit(p));
                v.handle(NodeEvent::Hover(id));
            }
        });
    })?);

    let w = weak.clone();
    listeners.push(Listener::new(&target, "pointerleave", move |_| {
        with_view(&w, |v| v.handle(NodeEvent::Leave));
    })?);

    let w = weak.clone();
    listeners.push(Listener::new(&target, "click", move |ev| {
        let selection = with_view(&w, |v| {
            if !v.interactive {
                return None;
            }
            let id = client_point(&ev)
                .and_then(|p| v.hit(p))
                .or_else(|| node_id_of(&ev))?;
            ev.prevent_default();
            v.selection_for(&id)
        })
        .flatten();
        // The view borrow is released before the scene reacts.
        if let Some(selection) = selection {
            on_select(selection);
        }
    })?);

    let w = weak.clone();
    listeners.push(Listener::new(&target, "focusin", move |ev| {
        with_view(&w, |v| v.handle(NodeEvent::FocusIn(node_id_of(&ev))));
    })?);

    listeners.push(Listener::new(&target, "focusout", move |_| {
        with_view(&weak, |v| v.handle(NodeEvent::FocusOut));
    })?);

    Ok(listeners)
}

fn with_view<T>(weak: &Weak<RefCell<ConstellationView>>, f: impl FnOnce(&mut ConstellationView) -> T) -> Option<T> {
    let view = weak.upgrade()?;
    let mut v = view.try_borrow_mut().ok()?;
    Some(f(&mut v))
}
