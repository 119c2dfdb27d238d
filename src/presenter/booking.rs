//! Booking calendar, pending selection and confirmation.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::BookingError;

use super::availability::AvailabilityProvider;
use super::directory::TherapistDirectory;

/// Working days shown in the calendar, Sunday through Thursday.
pub const CALENDAR_DAYS: &[&str] = &["ראשון", "שני", "שלישי", "רביעי", "חמישי"];
pub const CALENDAR_TIMES: &[&str] = &["09:00", "10:00", "11:00", "14:00", "15:00", "16:00"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: String,
    pub time: String,
    pub available: bool,
}

/// Day by time grid for one therapist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingCalendar {
    pub therapist: String,
    cells: Vec<CalendarCell>,
}

impl BookingCalendar {
    /// Draws every cell from `provider`, row by row.
    pub fn generate(therapist: &str, provider: &mut dyn AvailabilityProvider) -> Self {
        let cells = CALENDAR_DAYS
            .iter()
            .flat_map(|day| CALENDAR_TIMES.iter().map(move |time| (*day, *time)))
            .map(|(day, time)| CalendarCell {
                day: day.to_string(),
                time: time.to_string(),
                available: provider.query_availability(day, time),
            })
            .collect();
        Self {
            therapist: therapist.to_string(),
            cells,
        }
    }

    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    pub fn cell(&self, day: &str, time: &str) -> Option<&CalendarCell> {
        self.cells
            .iter()
            .find(|cell| cell.day == day && cell.time == time)
    }

    pub fn available_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.available).count()
    }
}

/// A selected, not yet confirmed slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBooking {
    pub therapist: String,
    pub day: String,
    pub time: String,
}

impl PendingBooking {
    pub fn summary(&self) -> String {
        format!(
            "מטפל/ת: {}\nיום: {}\nשעה: {}",
            self.therapist, self.day, self.time
        )
    }
}

impl fmt::Display for PendingBooking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} · יום {} · {}", self.therapist, self.day, self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub booking: PendingBooking,
    pub phone: String,
    pub confirmed_at: DateTime<Utc>,
}

/// Availability and booking service.
///
/// Stands in for `GET /availability` and `POST /booking`.
pub trait SchedulingBackend {
    fn calendar(&mut self, therapist: &str) -> Result<BookingCalendar, BookingError>;

    fn book(&mut self, booking: &PendingBooking) -> Result<BookingConfirmation, BookingError>;
}

/// In-process backend: random or injected availability, static phone directory.
pub struct MockScheduler {
    availability: Box<dyn AvailabilityProvider>,
    directory: TherapistDirectory,
}

impl fmt::Debug for MockScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockScheduler")
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

impl MockScheduler {
    pub fn new(availability: Box<dyn AvailabilityProvider>, directory: TherapistDirectory) -> Self {
        Self {
            availability,
            directory,
        }
    }

    pub fn directory(&self) -> &TherapistDirectory {
        &self.directory
    }
}

impl SchedulingBackend for MockScheduler {
    fn calendar(&mut self, therapist: &str) -> Result<BookingCalendar, BookingError> {
        let therapist = therapist.trim();
        if therapist.is_empty() {
            return Err(BookingError::UnknownTherapist(therapist.to_string()));
        }
        let calendar = BookingCalendar::generate(therapist, self.availability.as_mut());
        debug!(
            therapist,
            available = calendar.available_count(),
            "calendar generated"
        );
        Ok(calendar)
    }

    fn book(&mut self, booking: &PendingBooking) -> Result<BookingConfirmation, BookingError> {
        Ok(BookingConfirmation {
            booking: booking.clone(),
            phone: self.directory.phone_for(&booking.therapist).to_string(),
            confirmed_at: Utc::now(),
        })
    }
}

/// Calendar modal state: open calendar, pending selection, then confirmation.
#[derive(Debug, Clone, Default)]
pub struct BookingFlow {
    calendar: Option<BookingCalendar>,
    pending: Option<PendingBooking>,
    confirmed: Option<BookingConfirmation>,
}

impl BookingFlow {
    pub fn open(
        &mut self,
        backend: &mut dyn SchedulingBackend,
        therapist: &str,
    ) -> Result<&BookingCalendar, BookingError> {
        let calendar = backend.calendar(therapist)?;
        self.pending = None;
        self.confirmed = None;
        Ok(self.calendar.insert(calendar))
    }

    /// Records a pending booking for an available cell.
    pub fn select(&mut self, day: &str, time: &str) -> Result<&PendingBooking, BookingError> {
        let calendar = self.calendar.as_ref().ok_or(BookingError::NoCalendar)?;
        let cell = calendar
            .cell(day, time)
            .ok_or_else(|| BookingError::UnknownSlot {
                day: day.to_string(),
                time: time.to_string(),
            })?;
        if !cell.available {
            return Err(BookingError::SlotUnavailable {
                day: day.to_string(),
                time: time.to_string(),
            });
        }
        let pending = PendingBooking {
            therapist: calendar.therapist.clone(),
            day: cell.day.clone(),
            time: cell.time.clone(),
        };
        Ok(self.pending.insert(pending))
    }

    /// Books the pending selection and replaces the calendar with the confirmation.
    pub fn confirm(
        &mut self,
        backend: &mut dyn SchedulingBackend,
    ) -> Result<&BookingConfirmation, BookingError> {
        if self.calendar.is_none() {
            return Err(BookingError::NoCalendar);
        }
        let pending = self.pending.as_ref().ok_or(BookingError::NothingSelected)?;
        let confirmation = backend.book(pending)?;
        info!(booking = %confirmation.booking, "booking confirmed");
        self.calendar = None;
        self.pending = None;
        Ok(self.confirmed.insert(confirmation))
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn calendar(&self) -> Option<&BookingCalendar> {
        self.calendar.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingBooking> {
        self.pending.as_ref()
    }

    pub fn confirmed(&self) -> Option<&BookingConfirmation> {
        self.confirmed.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.calendar.is_some() || self.confirmed.is_some()
    }
}
