// DOM contract between the page markup and the front-end.

// Intro section
pub const INTRO_SELECTOR: &str = ".intro";
pub const STAGE_SELECTOR: &str = ".intro-stage";
pub const LINE_SPLIT_SELECTOR: &str = ".intro-lineSplit";
pub const EYE_ANCHOR_SELECTOR: &str = ".intro-eyeAnchor";
pub const ABOUT_LINK_SELECTOR: &str = ".intro-link";
pub const ABOUT_TARGET_ID: &str = "about";
pub const ABOUT_VISIBLE_ATTR: &str = "data-about-visible";

// Eye illustration (inline SVG, 600x300 view box)
pub const EYE_SVG_ID: &str = "eye-svg";
pub const EYE_PUPIL_ID: &str = "eye-pupil";
pub const EYE_TOP_LID_ID: &str = "eye-lid-top";
pub const EYE_BOTTOM_LID_ID: &str = "eye-lid-bottom";

// Constellation
pub const CONSTELLATION_ID: &str = "constellation";
pub const NODE_SELECTOR: &str = "[data-node-id]";
pub const FOCUS_ATTR: &str = "data-focus";

// Project panel
pub const PROJECT_PANEL_ID: &str = "project-panel";
pub const PROJECT_CLOSE_ID: &str = "project-close";
pub const PROJECT_ITEM_SELECTOR: &str = "[data-project-id]";

// Colours shared with the stylesheet
pub const STAR_FILL: &str = "rgba(233,221,196,1)";
pub const EDGE_RGB: &str = "233,221,196";
pub const FOCUS_OVERLAY_BG: &str = "radial-gradient(ellipse at center, rgba(15,15,15,0.0) 0%, rgba(15,15,15,0.18) 65%, rgba(15,15,15,0.35) 100%)";
pub const VIEW_FADE_MS: u32 = 220;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
