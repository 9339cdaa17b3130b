use glam::DVec2;
use intro_core::{parse_css_number, ConstellationNode, CoreError, Interaction, NodeSize, ViewBoxTransform};

/// Last known pointer position in client pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Option<DVec2>,
    pub moves: u32,
}

impl PointerState {
    /// Returns false (and keeps the previous sample) for non-finite coordinates.
    pub fn record(&mut self, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        self.position = Some(DVec2::new(x, y));
        self.moves = self.moves.wrapping_add(1);
        true
    }

    pub fn clear(&mut self) {
        self.position = None;
    }

    /// Pointer in view-box units, when both the pointer and the transform are known.
    pub fn local(&self, transform: Option<&ViewBoxTransform>) -> Option<DVec2> {
        let t = transform?;
        self.position.map(|p| t.to_local(p))
    }
}

/// Pointer and keyboard changes to constellation emphasis.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeEvent {
    Hover(Option<String>),
    Leave,
    FocusIn(Option<String>),
    FocusOut,
}

impl NodeEvent {
    /// Keyboard focus highlights like hover. Focus mode (`Interaction::focus`) is
    /// supplied from outside and never touched here. Returns true on change.
    pub fn apply(self, interaction: &mut Interaction) -> bool {
        let hover = match self {
            NodeEvent::Hover(id) | NodeEvent::FocusIn(id) => id,
            NodeEvent::Leave | NodeEvent::FocusOut => None,
        };
        if interaction.hover == hover {
            return false;
        }
        interaction.hover = hover;
        true
    }
}

/// `data-links="a, b,,c"` -> `["a", "b", "c"]`.
pub fn parse_links(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw `data-*` attributes of a node element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeAttrs {
    pub id: String,
    pub title: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub size: Option<String>,
    pub links: Option<String>,
}

impl NodeAttrs {
    /// Fails on malformed coordinates; an unknown size falls back to `sm`.
    pub fn into_node(self) -> Result<ConstellationNode, CoreError> {
        let x = self
            .x
            .as_deref()
            .map(|v| parse_css_number("data-x", v))
            .transpose()?;
        let y = self
            .y
            .as_deref()
            .map(|v| parse_css_number("data-y", v))
            .transpose()?;
        Ok(ConstellationNode {
            title: self.title.unwrap_or_else(|| self.id.clone()),
            x,
            y,
            size: self
                .size
                .as_deref()
                .and_then(NodeSize::parse)
                .unwrap_or_default(),
            links: self.links.as_deref().map(parse_links).unwrap_or_default(),
            id: self.id,
        })
    }

    /// Same as `into_node` but drops unusable coordinates so the node is auto-placed.
    pub fn into_node_lenient(self) -> ConstellationNode {
        match self.clone().into_node() {
            Ok(node) => node,
            Err(e) => {
                log::warn!("[constellation] node {}: {}; auto-placing", self.id, e);
                NodeAttrs {
                    x: None,
                    y: None,
                    ..self
                }
                .into_node()
                .unwrap_or_default()
            }
        }
    }
}
