//! Result cards and the booking calendar.

use tracing::info;

use crate::errors::{BookingError, SessionError};
use crate::messages;
use crate::notify::Severity;
use crate::presenter::{BookingCalendar, BookingConfirmation, PendingBooking};
use crate::wizard::FormSurface;

use super::{Deferred, Session};

impl<S: FormSurface> Session<S> {
    /// Expands or collapses a card's match reasons. Returns whether it is expanded.
    pub fn toggle_details(&mut self, id: &str) -> Result<bool, SessionError> {
        self.results
            .toggle_details(id)
            .ok_or_else(|| SessionError::UnknownMatch(id.to_string()))
    }

    /// Saves or un-saves a match. Returns whether it is saved afterwards.
    pub fn toggle_saved_match(&mut self, id: &str) -> Result<bool, SessionError> {
        if self.results.card(id).is_none() {
            return Err(SessionError::UnknownMatch(id.to_string()));
        }
        let saved = self.state.toggle_saved_match(id);
        self.persist();
        let message = if saved {
            messages::MATCH_SAVED
        } else {
            messages::MATCH_UNSAVED
        };
        self.notifier.notify(message, Severity::Info);
        Ok(saved)
    }

    /// "Not relevant" feedback on a card.
    pub fn not_relevant(&mut self, id: &str) -> Result<(), SessionError> {
        if self.results.card(id).is_none() {
            return Err(SessionError::UnknownMatch(id.to_string()));
        }
        info!(card = id, "match marked not relevant");
        self.notifier
            .notify(messages::NOT_RELEVANT_FEEDBACK, Severity::Info);
        Ok(())
    }

    /// Opens the booking calendar for `therapist`.
    pub fn open_booking(&mut self, therapist: &str) -> Result<&BookingCalendar, SessionError> {
        Ok(self.booking.open(self.backend.as_mut(), therapist)?)
    }

    /// Picks a calendar cell. Unavailable or unknown cells raise a warning toast.
    pub fn select_slot(&mut self, day: &str, time: &str) -> Result<PendingBooking, SessionError> {
        match self.booking.select(day, time) {
            Ok(pending) => Ok(pending.clone()),
            Err(err) => {
                if matches!(
                    err,
                    BookingError::SlotUnavailable { .. } | BookingError::UnknownSlot { .. }
                ) {
                    self.notifier
                        .notify(messages::SLOT_UNAVAILABLE, Severity::Warning);
                }
                Err(err.into())
            }
        }
    }

    /// Books the pending slot and schedules the confirmation e-mail notice.
    pub fn confirm_booking(&mut self) -> Result<BookingConfirmation, SessionError> {
        let confirmation = self.booking.confirm(self.backend.as_mut())?.clone();
        self.notifier.notify(
            messages::booking_requested(&confirmation.booking.therapist),
            Severity::Success,
        );
        self.scheduler
            .schedule(self.config.booking_notice_delay(), Deferred::BookingNotice);
        Ok(confirmation)
    }

    pub fn close_booking(&mut self) {
        self.booking.close();
    }
}
