//! Mocked results and booking presentation.
//!
//! Nothing here talks to a real service. Availability comes from an
//! [`AvailabilityProvider`], bookings go through a [`SchedulingBackend`] and
//! result cards come from a [`MatchSource`], so each can be swapped for a
//! real backend without touching the wizard.

pub mod availability;
pub mod booking;
pub mod demo;
pub mod directory;
pub mod results;

pub use availability::{AvailabilityProvider, FixedAvailability, RandomAvailability};
pub use booking::{
    BookingCalendar, BookingConfirmation, BookingFlow, CalendarCell, MockScheduler,
    PendingBooking, SchedulingBackend, CALENDAR_DAYS, CALENDAR_TIMES,
};
pub use demo::{DemoScreen, DemoScreens};
pub use directory::{TherapistDirectory, TherapistProfile, DEFAULT_PHONE};
pub use results::{MatchSource, ResultCard, ResultsView, StaticMatches};
