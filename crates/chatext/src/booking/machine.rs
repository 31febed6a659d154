//! The booking state machine.
//!
//! [`BookingMachine`] owns the [`BookingSelection`] for one session and is the
//! only thing that mutates it. Every operation either applies completely or
//! returns a [`BookingError`] with the state untouched. The machine performs
//! no I/O; rendering and host calls belong to
//! [`BookingSession`](super::session::BookingSession).

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::calendar::{BookingDate, CalendarBounds, Clock, MonthCursor, days_in_month};
use super::validate::{ContactForm, validate_contact};
use crate::error::BookingError;

/// One screen of the booking flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    LocationVehicle,
    DateTime,
    Contact,
}

impl Step {
    pub fn index(self) -> usize {
        match self {
            Self::LocationVehicle => 0,
            Self::DateTime => 1,
            Self::Contact => 2,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::LocationVehicle => Some(Self::DateTime),
            Self::DateTime => Some(Self::Contact),
            Self::Contact => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::LocationVehicle => None,
            Self::DateTime => Some(Self::LocationVehicle),
            Self::Contact => Some(Self::DateTime),
        }
    }
}

/// The user's accumulated choices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BookingSelection {
    pub location: Option<String>,
    /// Vehicle id.
    pub vehicle: Option<String>,
    pub date: Option<BookingDate>,
    /// Only set while `date` is set.
    pub time: Option<String>,
    pub contact: Option<ContactForm>,
}

/// The flat record handed to the host when the booking is submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPayload {
    pub location: String,
    pub vehicle: String,
    /// `YYYY/MM/DD`.
    pub date: String,
    pub time: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub phone: String,
    pub zip_code: String,
}

/// Session state: current step, selection, and calendar view.
pub struct BookingMachine {
    step: Step,
    selection: BookingSelection,
    displayed: MonthCursor,
    frozen: bool,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for BookingMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingMachine")
            .field("step", &self.step)
            .field("selection", &self.selection)
            .field("displayed", &self.displayed)
            .field("frozen", &self.frozen)
            .finish()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl BookingMachine {
    /// Begin a session at the first step with nothing selected and the
    /// calendar on the current month.
    pub fn start(clock: Arc<dyn Clock>) -> Self {
        let displayed = MonthCursor::of(clock.today());
        Self {
            step: Step::LocationVehicle,
            selection: BookingSelection::default(),
            displayed,
            frozen: false,
            clock,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    /// The month shown by the date step.
    pub fn displayed_month(&self) -> MonthCursor {
        self.displayed
    }

    /// Whether the booking was submitted.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn bounds(&self) -> CalendarBounds {
        CalendarBounds::from_today(self.today())
    }

    fn ensure_mutable(&self) -> Result<(), BookingError> {
        if self.frozen {
            Err(BookingError::Frozen)
        } else {
            Ok(())
        }
    }

    fn ensure_step(&self, step: Step, what: &'static str) -> Result<(), BookingError> {
        self.ensure_mutable()?;
        if self.step == step {
            Ok(())
        } else {
            Err(BookingError::Precondition(what))
        }
    }

    pub fn select_location(&mut self, value: &str) -> Result<(), BookingError> {
        self.ensure_step(Step::LocationVehicle, "location is chosen on the first step")?;
        let value = non_empty(value).ok_or(BookingError::Precondition("location is empty"))?;
        self.selection.location = Some(value);
        Ok(())
    }

    pub fn select_vehicle(&mut self, id: &str) -> Result<(), BookingError> {
        self.ensure_step(Step::LocationVehicle, "vehicle is chosen on the first step")?;
        let id = non_empty(id).ok_or(BookingError::Precondition("vehicle is empty"))?;
        self.selection.vehicle = Some(id);
        Ok(())
    }

    /// Whether the current step's required fields are set.
    pub fn can_advance(&self) -> bool {
        if self.frozen {
            return false;
        }
        let s = &self.selection;
        match self.step {
            Step::LocationVehicle => s.location.is_some() && s.vehicle.is_some(),
            Step::DateTime => {
                s.time.is_some() && s.date.is_some_and(|d| !d.is_past(self.today()))
            }
            Step::Contact => false,
        }
    }

    /// Move to the next step. Nothing from earlier steps is reset.
    pub fn advance(&mut self) -> Result<Step, BookingError> {
        self.ensure_mutable()?;
        let next = self
            .step
            .next()
            .ok_or(BookingError::Precondition("contact step is left by submitting"))?;
        if !self.can_advance() {
            return Err(BookingError::Precondition("required fields are missing"));
        }
        if next == Step::DateTime {
            self.displayed = match self.selection.date {
                Some(date) => date.cursor(),
                None => MonthCursor::of(self.today()),
            };
        }
        debug!(from = ?self.step, to = ?next, "booking step advanced");
        self.step = next;
        Ok(next)
    }

    /// Move to the previous step. Never clears data.
    pub fn retreat(&mut self) -> Result<Step, BookingError> {
        self.ensure_mutable()?;
        let previous = self
            .step
            .previous()
            .ok_or(BookingError::Precondition("already at the first step"))?;
        debug!(from = ?self.step, to = ?previous, "booking step retreated");
        self.step = previous;
        Ok(previous)
    }

    /// Shift the displayed month by `delta`, clamped to the navigable range.
    /// When the month changes, the selected date and time are cleared.
    pub fn navigate_month(&mut self, delta: i32) -> Result<MonthCursor, BookingError> {
        self.ensure_step(Step::DateTime, "month navigation belongs to the date step")?;
        let target = self.bounds().clamp(self.displayed.offset(delta));
        if target == self.displayed {
            return Err(BookingError::Precondition("calendar is at its bound"));
        }
        self.displayed = target;
        self.selection.date = None;
        self.selection.time = None;
        Ok(target)
    }

    /// Select a day of the displayed month. The time slot is kept.
    pub fn select_date(&mut self, day: u32) -> Result<BookingDate, BookingError> {
        self.ensure_step(Step::DateTime, "dates are chosen on the date step")?;
        let MonthCursor { year, month } = self.displayed;
        if day == 0 || day > days_in_month(month, year) {
            return Err(BookingError::Precondition("day is outside the displayed month"));
        }
        let date = BookingDate { day, month, year };
        if date.is_past(self.today()) {
            return Err(BookingError::Precondition("day is in the past"));
        }
        self.selection.date = Some(date);
        Ok(date)
    }

    pub fn select_time(&mut self, slot: &str) -> Result<(), BookingError> {
        self.ensure_step(Step::DateTime, "times are chosen on the date step")?;
        if self.selection.date.is_none() {
            return Err(BookingError::Precondition("pick a date before a time"));
        }
        let slot = non_empty(slot).ok_or(BookingError::Precondition("time slot is empty"))?;
        self.selection.time = Some(slot);
        Ok(())
    }

    /// Keep in-progress contact input so the form is pre-filled later.
    pub fn save_contact_draft(&mut self, form: ContactForm) -> Result<(), BookingError> {
        self.ensure_step(Step::Contact, "contact details belong to the contact step")?;
        self.selection.contact = Some(form);
        Ok(())
    }

    /// Validate the contact fields and, on success, freeze the session and
    /// return the completion payload.
    pub fn submit_contact(&mut self, form: &ContactForm) -> Result<CompletionPayload, BookingError> {
        self.ensure_step(Step::Contact, "submission belongs to the contact step")?;
        let s = &self.selection;
        let (Some(location), Some(vehicle), Some(date), Some(time)) =
            (&s.location, &s.vehicle, &s.date, &s.time)
        else {
            return Err(BookingError::Precondition("earlier steps are incomplete"));
        };
        let errors = validate_contact(form);
        if !errors.is_empty() {
            return Err(BookingError::Validation(errors));
        }
        let payload = CompletionPayload {
            location: location.clone(),
            vehicle: vehicle.clone(),
            date: date.to_slash_format(),
            time: time.clone(),
            email: form.email.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            country: form.country.clone(),
            phone: form.phone.clone(),
            zip_code: form.zip_code.clone(),
        };
        self.selection.contact = Some(form.clone());
        self.frozen = true;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::calendar::FixedClock;
    use crate::booking::validate::Field;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn machine() -> BookingMachine {
        BookingMachine::start(Arc::new(FixedClock(today())))
    }

    fn valid_contact() -> ContactForm {
        ContactForm {
            email: "a@b.co".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            country: "United States".into(),
            phone: "1234567890".into(),
            zip_code: "94105".into(),
        }
    }

    fn at_date_step() -> BookingMachine {
        let mut m = machine();
        m.select_location("PARIS INTRA MUROS").unwrap();
        m.select_vehicle("r5i").unwrap();
        m.advance().unwrap();
        m
    }

    fn at_contact_step() -> BookingMachine {
        let mut m = at_date_step();
        m.select_date(15).unwrap();
        m.select_time("10:15-11:00 AM PST").unwrap();
        m.advance().unwrap();
        m
    }

    #[test]
    fn start_is_empty_on_first_step() {
        let m = machine();
        assert_eq!(m.step(), Step::LocationVehicle);
        assert_eq!(*m.selection(), BookingSelection::default());
        assert_eq!(m.displayed_month(), MonthCursor { year: 2026, month: 9 });
        assert!(!m.is_frozen());
    }

    #[test]
    fn advance_requires_location_and_vehicle() {
        let mut m = machine();
        assert!(matches!(m.advance(), Err(BookingError::Precondition(_))));
        m.select_location("RENAULT MONTROUGE").unwrap();
        assert!(m.advance().is_err());
        assert_eq!(m.step(), Step::LocationVehicle);
        m.select_vehicle("r5t").unwrap();
        assert_eq!(m.advance(), Ok(Step::DateTime));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let mut m = machine();
        assert!(m.select_location("  ").is_err());
        assert!(m.select_vehicle("").is_err());
        assert!(m.selection().location.is_none());
    }

    #[test]
    fn retreat_keeps_data_and_stops_at_first_step() {
        let mut m = at_contact_step();
        assert_eq!(m.retreat(), Ok(Step::DateTime));
        assert_eq!(m.retreat(), Ok(Step::LocationVehicle));
        assert!(m.retreat().is_err());
        let s = m.selection();
        assert_eq!(s.location.as_deref(), Some("PARIS INTRA MUROS"));
        assert_eq!(s.vehicle.as_deref(), Some("r5i"));
        assert!(s.date.is_some());
        assert!(s.time.is_some());
    }

    #[test]
    fn advance_requires_date_and_time() {
        let mut m = at_date_step();
        assert!(m.advance().is_err());
        m.select_date(20).unwrap();
        assert!(m.advance().is_err());
        m.select_time("2:30-3:15 PM PST").unwrap();
        assert_eq!(m.advance(), Ok(Step::Contact));
        assert!(m.advance().is_err());
    }

    #[test]
    fn contact_step_unreachable_without_all_fields() {
        // Exhaustively drive every sequence of six operations and check the
        // machine is never on the contact step with a missing field.
        #[derive(Clone, Copy)]
        enum Op {
            Advance,
            Retreat,
            Location,
            Vehicle,
            Date,
            Time,
            Month,
        }
        let ops = [
            Op::Advance,
            Op::Retreat,
            Op::Location,
            Op::Vehicle,
            Op::Date,
            Op::Time,
            Op::Month,
        ];
        let len = 6;
        let total = ops.len().pow(len);
        for mut code in 0..total {
            let mut m = machine();
            for _ in 0..len {
                let op = ops[code % ops.len()];
                code /= ops.len();
                let _ = match op {
                    Op::Advance => m.advance().map(|_| ()),
                    Op::Retreat => m.retreat().map(|_| ()),
                    Op::Location => m.select_location("PARIS INTRA MUROS"),
                    Op::Vehicle => m.select_vehicle("r5i"),
                    Op::Date => m.select_date(20).map(|_| ()),
                    Op::Time => m.select_time("10:15-11:00 AM PST"),
                    Op::Month => m.navigate_month(1).map(|_| ()),
                };
                let s = m.selection();
                if m.step() == Step::Contact {
                    assert!(s.location.is_some() && s.vehicle.is_some());
                    assert!(s.date.is_some() && s.time.is_some());
                }
                if s.time.is_some() {
                    assert!(s.date.is_some());
                }
            }
        }
    }

    #[test]
    fn navigate_month_is_idempotent_at_bounds() {
        let mut m = at_date_step();
        assert!(m.navigate_month(-1).is_err());
        assert!(m.navigate_month(-1).is_err());
        assert_eq!(m.displayed_month(), MonthCursor { year: 2026, month: 9 });

        assert_eq!(m.navigate_month(1), Ok(MonthCursor { year: 2026, month: 10 }));
        assert_eq!(m.navigate_month(1), Ok(MonthCursor { year: 2026, month: 11 }));
        assert!(m.navigate_month(1).is_err());
        assert!(m.navigate_month(1).is_err());
        assert_eq!(m.displayed_month(), MonthCursor { year: 2026, month: 11 });
    }

    #[test]
    fn upper_bound_rolls_into_next_year() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 12, 3).unwrap());
        let mut m = BookingMachine::start(Arc::new(clock));
        m.select_location("PARIS INTRA MUROS").unwrap();
        m.select_vehicle("r5i").unwrap();
        m.advance().unwrap();
        assert_eq!(m.navigate_month(1), Ok(MonthCursor { year: 2027, month: 0 }));
        assert_eq!(m.navigate_month(1), Ok(MonthCursor { year: 2027, month: 1 }));
        assert!(m.navigate_month(1).is_err());
    }

    #[test]
    fn navigate_month_clears_date_and_time() {
        let mut m = at_date_step();
        m.select_date(20).unwrap();
        m.select_time("10:15-11:00 AM PST").unwrap();
        m.navigate_month(1).unwrap();
        assert!(m.selection().date.is_none());
        assert!(m.selection().time.is_none());

        // Leaving and re-entering the step does not bring the date back.
        m.retreat().unwrap();
        m.advance().unwrap();
        assert!(m.selection().date.is_none());
        assert!(m.selection().time.is_none());
    }

    #[test]
    fn blocked_navigation_keeps_selection() {
        let mut m = at_date_step();
        m.select_date(20).unwrap();
        assert!(m.navigate_month(-1).is_err());
        assert!(m.selection().date.is_some());
    }

    #[test]
    fn select_date_rejects_past_and_out_of_range_days() {
        let mut m = at_date_step();
        assert!(m.select_date(13).is_err());
        assert!(m.select_date(0).is_err());
        assert!(m.select_date(32).is_err());
        assert!(m.selection().date.is_none());
        assert_eq!(
            m.select_date(14),
            Ok(BookingDate { day: 14, month: 9, year: 2026 })
        );
        m.navigate_month(1).unwrap();
        assert!(m.select_date(1).is_ok());
        assert!(m.select_date(31).is_err());
    }

    #[test]
    fn select_date_keeps_time() {
        let mut m = at_date_step();
        m.select_date(20).unwrap();
        m.select_time("2:30-3:15 PM PST").unwrap();
        m.select_date(21).unwrap();
        assert_eq!(m.selection().time.as_deref(), Some("2:30-3:15 PM PST"));
    }

    #[test]
    fn select_time_requires_date() {
        let mut m = at_date_step();
        assert!(m.select_time("10:15-11:00 AM PST").is_err());
        assert!(m.selection().time.is_none());
    }

    #[test]
    fn reentering_date_step_shows_selected_month() {
        let mut m = at_date_step();
        m.navigate_month(1).unwrap();
        m.select_date(5).unwrap();
        m.select_time("10:15-11:00 AM PST").unwrap();
        m.retreat().unwrap();
        m.advance().unwrap();
        assert_eq!(m.displayed_month(), MonthCursor { year: 2026, month: 10 });
    }

    #[test]
    fn invalid_contact_changes_nothing() {
        let mut m = at_contact_step();
        let before = m.selection().clone();
        let form = ContactForm {
            email: "not-an-email".into(),
            phone: "12345".into(),
            zip_code: "1234".into(),
            ..valid_contact()
        };
        let Err(BookingError::Validation(errors)) = m.submit_contact(&form) else {
            panic!("expected validation error");
        };
        assert!(errors.contains(Field::Email));
        assert!(errors.contains(Field::Phone));
        assert!(errors.contains(Field::ZipCode));
        assert_eq!(*m.selection(), before);
        assert_eq!(m.step(), Step::Contact);
        assert!(!m.is_frozen());
    }

    #[test]
    fn submit_freezes_and_formats_date() {
        let mut m = at_contact_step();
        let payload = m.submit_contact(&valid_contact()).unwrap();
        assert_eq!(payload.date, "2026/10/15");
        assert_eq!(payload.location, "PARIS INTRA MUROS");
        assert_eq!(payload.vehicle, "r5i");
        assert_eq!(payload.time, "10:15-11:00 AM PST");
        assert_eq!(payload.zip_code, "94105");
        assert!(m.is_frozen());

        assert_eq!(m.retreat(), Err(BookingError::Frozen));
        assert_eq!(m.submit_contact(&valid_contact()), Err(BookingError::Frozen));
        assert_eq!(m.step(), Step::Contact);
    }

    #[test]
    fn payload_serializes_camel_case() {
        let mut m = at_contact_step();
        let payload = m.submit_contact(&valid_contact()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in [
            "location",
            "vehicle",
            "date",
            "time",
            "email",
            "firstName",
            "lastName",
            "country",
            "phone",
            "zipCode",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn draft_is_kept_across_back_navigation() {
        let mut m = at_contact_step();
        let draft = ContactForm {
            first_name: "Ada".into(),
            ..ContactForm::with_country("United States")
        };
        m.save_contact_draft(draft.clone()).unwrap();
        m.retreat().unwrap();
        m.advance().unwrap();
        assert_eq!(m.selection().contact.as_ref(), Some(&draft));
    }

    #[test]
    fn selectors_are_scoped_to_their_step() {
        let mut m = at_date_step();
        assert!(m.select_location("RENAULT MONTROUGE").is_err());
        assert_eq!(m.selection().location.as_deref(), Some("PARIS INTRA MUROS"));
        let mut m = machine();
        assert!(m.select_date(20).is_err());
        assert!(m.navigate_month(1).is_err());
    }
}
