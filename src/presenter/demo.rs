//! Sub-screens of the demo center and which one is shown.

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoScreen {
    pub id: &'static str,
    pub title: &'static str,
}

const STANDARD: &[DemoScreen] = &[
    DemoScreen {
        id: "parent-journey",
        title: "מסע ההורה",
    },
    DemoScreen {
        id: "therapist-journey",
        title: "הצטרפות מטפלים",
    },
    DemoScreen {
        id: "results",
        title: "תוצאות התאמה",
    },
    DemoScreen {
        id: "booking",
        title: "קביעת פגישה",
    },
    DemoScreen {
        id: "insurance",
        title: "ניתוח פוליסה",
    },
];

/// Demo menu state. Exactly one screen is active; the first one until switched.
#[derive(Debug, Clone, Copy)]
pub struct DemoScreens {
    screens: &'static [DemoScreen],
    active: usize,
}

impl Default for DemoScreens {
    fn default() -> Self {
        Self::new(STANDARD)
    }
}

impl DemoScreens {
    pub const fn new(screens: &'static [DemoScreen]) -> Self {
        Self { screens, active: 0 }
    }

    pub fn screens(&self) -> &'static [DemoScreen] {
        self.screens
    }

    pub fn active(&self) -> Option<&'static DemoScreen> {
        self.screens.get(self.active)
    }

    /// Activates the screen with `id`. An unknown id leaves the active screen as it was.
    pub fn switch(&mut self, id: &str) -> Option<&'static DemoScreen> {
        let Some(index) = self.screens.iter().position(|screen| screen.id == id) else {
            warn!(demo = id, "demo screen not found");
            return None;
        };
        self.active = index;
        debug!(demo = id, "demo screen switched");
        self.screens.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_screen_is_active_until_switched() {
        let mut demo = DemoScreens::default();
        assert_eq!(demo.active().map(|screen| screen.id), Some("parent-journey"));
        assert_eq!(demo.switch("booking").map(|screen| screen.id), Some("booking"));
        assert_eq!(demo.active().map(|screen| screen.id), Some("booking"));
    }

    #[test]
    fn unknown_screen_keeps_the_current_one() {
        let mut demo = DemoScreens::default();
        demo.switch("insurance");
        assert!(demo.switch("missing").is_none());
        assert_eq!(demo.active().map(|screen| screen.id), Some("insurance"));
    }

    #[test]
    fn empty_menu_has_no_active_screen() {
        assert!(DemoScreens::new(&[]).active().is_none());
    }
}
