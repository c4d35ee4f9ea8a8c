//! Anchor blocks: the positioned text bodies of the "who" page and the
//! microtexts they spawn when clicked.

use glam::Vec2;
use serde::Deserialize;

use crate::Error;

/// Vertical spacing between stacked microtexts spawned by one click.
pub const MICROTEXT_STACK_PX: f32 = 36.0;

/// Restitution of freshly spawned microtext bodies.
pub const MICROTEXT_RESTITUTION: f32 = 0.9;

#[derive(Clone, Debug, Deserialize)]
pub struct AnchorSet {
    pub anchors: Vec<AnchorDef>,
}

impl AnchorSet {
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::JsonParse {
            message: e.to_string(),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnchorDef {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub size: AnchorSize,
    pub position: AnchorPosition,
    #[serde(default, rename = "microTexts")]
    pub micro_texts: Vec<MicroText>,
}

impl AnchorDef {
    /// Pixel position for the given viewport: fractional coordinates
    /// scaled up, plus the optional pixel nudge, rounded to whole pixels.
    pub fn resolve(&self, viewport: Vec2, mobile: bool) -> Vec2 {
        let p = if mobile {
            &self.position.mobile
        } else {
            &self.position.desktop
        };
        Vec2::new(
            (p.x * viewport.x + p.dx).round(),
            (p.y * viewport.y + p.dy).round(),
        )
    }

    /// Multi-line anchors collapse to one line on desktop for the ids the
    /// original content calls out; mobile keeps the line breaks.
    pub fn display_text(&self, mobile: bool) -> String {
        if !mobile && matches!(self.id.as_str(), "main-name" | "contact") {
            self.text.replace('\n', " ")
        } else {
            self.text.clone()
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSize {
    Big,
    #[default]
    Small,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnchorPosition {
    pub desktop: FractionalPoint,
    pub mobile: FractionalPoint,
}

/// Viewport-fractional position with an optional pixel nudge.
#[derive(Copy, Clone, Debug, Default, Deserialize)]
pub struct FractionalPoint {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MicroText {
    pub text: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
}
