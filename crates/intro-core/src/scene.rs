//! Which view is showing: constellation, a morph in flight, or an open project.

use crate::bus::ScenePublisher;
use crate::constellation::Selection;
use crate::math::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorphKind {
    Open,
    Close,
}

/// What the front end should do in response to a scene event.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    None,
    /// Show the project immediately, no transition.
    OpenProject(String),
    /// Hide the project immediately, no transition.
    CloseProject,
    /// Run a morph from `rect`; reverse for closing.
    StartMorph { kind: MorphKind, rect: Rect },
}

#[derive(Clone, Debug, PartialEq)]
struct PendingOpen {
    id: String,
    rect: Rect,
}

#[derive(Clone, Debug, Default)]
pub struct SceneState {
    selected: Option<String>,
    open: Option<String>,
    opening: Option<PendingOpen>,
    closing: Option<Rect>,
    last_rect: Option<Rect>,
}

impl SceneState {
    pub fn new(initial_selection: Option<String>) -> Self {
        Self {
            selected: initial_selection,
            ..Default::default()
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn open(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn in_project_mode(&self) -> bool {
        self.open.is_some() || self.opening.is_some()
    }

    pub fn is_closing(&self) -> bool {
        self.closing.is_some()
    }

    pub fn eye_visible(&self) -> bool {
        !(self.in_project_mode() || self.is_closing())
    }

    /// Constellation accepts pointer input only while nothing is in flight or open.
    pub fn constellation_interactive(&self) -> bool {
        !(self.in_project_mode() || self.is_closing())
    }

    pub fn select(&mut self, selection: &Selection) -> SceneCommand {
        self.selected = Some(selection.id.clone());
        if self.open.as_deref() == Some(selection.id.as_str()) {
            return SceneCommand::None;
        }
        let command = match selection.rect {
            None => {
                self.open = Some(selection.id.clone());
                SceneCommand::OpenProject(selection.id.clone())
            }
            Some(rect) => {
                self.last_rect = Some(rect);
                self.opening = Some(PendingOpen {
                    id: selection.id.clone(),
                    rect,
                });
                SceneCommand::StartMorph {
                    kind: MorphKind::Open,
                    rect,
                }
            }
        };
        log::debug!("[scene] select {} -> {:?}", selection.id, command);
        command
    }

    pub fn close(&mut self) -> SceneCommand {
        self.open = None;
        let command = match self.last_rect {
            None => SceneCommand::CloseProject,
            Some(rect) => {
                self.closing = Some(rect);
                SceneCommand::StartMorph {
                    kind: MorphKind::Close,
                    rect,
                }
            }
        };
        log::debug!("[scene] close -> {:?}", command);
        command
    }

    /// The polygon now covers (or uncovers) the paper; swap content underneath.
    pub fn morph_done(&mut self, kind: MorphKind) -> SceneCommand {
        match kind {
            MorphKind::Open => match &self.opening {
                Some(p) => {
                    self.open = Some(p.id.clone());
                    SceneCommand::OpenProject(p.id.clone())
                }
                None => SceneCommand::None,
            },
            MorphKind::Close => {
                self.open = None;
                SceneCommand::CloseProject
            }
        }
    }

    /// The overlay is gone; forget the finished transition.
    pub fn fade_done(&mut self, kind: MorphKind) {
        match kind {
            MorphKind::Open => self.opening = None,
            MorphKind::Close => self.closing = None,
        }
    }

    pub fn publish(&self, publisher: &ScenePublisher) {
        publisher.set_eye_visible(self.eye_visible());
    }
}
