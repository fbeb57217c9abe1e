use serde::{Deserialize, Serialize};

pub const LIGHT_STYLESHEET: &str = "link1";
pub const DARK_STYLESHEET: &str = "link2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ThemeEvent {
    Click,
    Touch,
    Key {
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        meta: bool,
    },
}

impl ThemeEvent {
    /// Shortcuts with a modifier held belong to the browser, not the toggle.
    pub fn toggles(&self) -> bool {
        match self {
            ThemeEvent::Click | ThemeEvent::Touch => true,
            ThemeEvent::Key { ctrl, alt, meta } => !(*ctrl || *alt || *meta),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeToggle {
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub active: bool,
    pub enabled_stylesheet: &'static str,
    pub disabled_stylesheet: &'static str,
}

impl ThemeToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `event`, returning whether the theme flipped.
    pub fn handle(&mut self, event: ThemeEvent) -> bool {
        if !event.toggles() {
            return false;
        }

        self.active = !self.active;
        true
    }

    pub fn active_stylesheet(&self) -> &'static str {
        if self.active {
            DARK_STYLESHEET
        } else {
            LIGHT_STYLESHEET
        }
    }

    pub fn state(&self) -> ThemeState {
        ThemeState {
            active: self.active,
            enabled_stylesheet: self.active_stylesheet(),
            disabled_stylesheet: if self.active {
                LIGHT_STYLESHEET
            } else {
                DARK_STYLESHEET
            },
        }
    }
}
