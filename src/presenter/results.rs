use std::collections::BTreeSet;

use crate::domain::FlowState;

/// One mocked match shown after the parent flow is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub id: String,
    pub name: String,
    pub profession: String,
    pub city: String,
    /// Match score in percent.
    pub score: u8,
    pub reasons: Vec<String>,
}

impl ResultCard {
    fn fixed(
        id: &str,
        name: &str,
        profession: &str,
        city: &str,
        score: u8,
        reasons: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            profession: profession.to_string(),
            city: city.to_string(),
            score,
            reasons: reasons.iter().map(|reason| reason.to_string()).collect(),
        }
    }
}

/// Produces result cards for a completed parent flow.
pub trait MatchSource {
    fn matches(&self, flow: &FlowState) -> Vec<ResultCard>;
}

/// Always returns the same three matches, whatever was entered.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMatches;

impl MatchSource for StaticMatches {
    fn matches(&self, _flow: &FlowState) -> Vec<ResultCard> {
        vec![
            ResultCard::fixed(
                "match-1",
                "ד\"ר מיכל לוי",
                "קלינאית תקשורת",
                "תל אביב",
                95,
                &[
                    "מתמחה בעיכוב שפתי",
                    "זמינה לפגישות בשבוע הקרוב",
                    "עובדת עם קופות החולים",
                ],
            ),
            ResultCard::fixed(
                "match-2",
                "יעל כהן",
                "מרפאה בעיסוק",
                "רמת גן",
                89,
                &["ניסיון רב עם גיל הגן", "טיפול בבית הילד", "ממליצים רבים"],
            ),
            ResultCard::fixed(
                "match-3",
                "אורי שמעוני",
                "פסיכולוג חינוכי",
                "גבעתיים",
                82,
                &["אבחונים מקיפים", "ליווי הורים", "פגישות אונליין"],
            ),
        ]
    }
}

/// Result cards of the current session with their expanded/collapsed state.
#[derive(Debug, Clone, Default)]
pub struct ResultsView {
    cards: Vec<ResultCard>,
    expanded: BTreeSet<String>,
    revealed: bool,
}

impl ResultsView {
    /// Cards are loaded but stay hidden until [`ResultsView::reveal`].
    pub fn load(&mut self, cards: Vec<ResultCard>) {
        self.cards = cards;
        self.expanded.clear();
        self.revealed = false;
    }

    pub fn reveal(&mut self) -> bool {
        if self.cards.is_empty() {
            return false;
        }
        self.revealed = true;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn cards(&self) -> &[ResultCard] {
        &self.cards
    }

    pub fn card(&self, id: &str) -> Option<&ResultCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Flips the reasons panel of `id`. Returns the new state, or `None` for unknown ids.
    pub fn toggle_details(&mut self, id: &str) -> Option<bool> {
        self.card(id)?;
        if self.expanded.remove(id) {
            Some(false)
        } else {
            self.expanded.insert(id.to_string());
            Some(true)
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }
}
