//! Stateless screen rendering for the booking flow.
//!
//! [`render_screen`] maps the machine's current step and selection to a
//! serializable [`Screen`]. The host frontend draws it; nothing here holds
//! state between calls.

use serde::Serialize;

use super::calendar::{GridCell, WEEKDAY_LABELS, month_grid, month_label};
use super::catalog::Catalog;
use super::machine::{BookingMachine, Step};
use super::validate::{ContactForm, Field, FieldErrors};

pub const LOCATION_VEHICLE_TITLE: &str = "Let's set up your drive";
pub const DATE_TIME_TITLE: &str = "Appointment times";
pub const CONTACT_TITLE: &str = "Contact Information";

/// One rendered step of the booking flow.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Screen {
    LocationVehicle(LocationVehicleScreen),
    DateTime(DateTimeScreen),
    Contact(ContactScreen),
}

impl Screen {
    pub fn step(&self) -> Step {
        match self {
            Self::LocationVehicle(_) => Step::LocationVehicle,
            Self::DateTime(_) => Step::DateTime,
            Self::Contact(_) => Step::Contact,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationVehicleScreen {
    pub title: &'static str,
    pub locations: Vec<LocationOption>,
    pub vehicles: Vec<VehicleTile>,
    pub next_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocationOption {
    pub value: String,
    /// `NAME - address`.
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VehicleTile {
    pub id: String,
    pub name: String,
    pub image: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DateTimeScreen {
    pub title: &'static str,
    pub month_label: String,
    pub prev_month_enabled: bool,
    pub next_month_enabled: bool,
    pub weekdays: [&'static str; 7],
    pub cells: Vec<CalendarCell>,
    /// Present only once a date is selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slots: Option<Vec<TimeSlotOption>>,
    pub next_enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    Blank,
    Day {
        day: u32,
        disabled: bool,
        selected: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeSlotOption {
    pub slot: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContactScreen {
    pub title: &'static str,
    pub summary: BookingSummary,
    pub form: ContactForm,
    pub countries: Vec<String>,
    pub consent_text: String,
    pub errors: Vec<FieldMessage>,
    /// Set after a successful submission; the frontend hides its buttons.
    pub submitted: bool,
}

/// Read-only recap of the earlier steps.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookingSummary {
    /// e.g. `"October 15, 2026"`.
    pub date: String,
    pub time: String,
    pub location: String,
}

/// An inline validation message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldMessage {
    pub field: Field,
    pub message: &'static str,
}

/// A submission that failed validation, kept only so the form can be
/// re-rendered with the user's input and inline errors.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedContact {
    pub form: ContactForm,
    pub errors: FieldErrors,
}

/// Render the machine's current step.
pub fn render_screen(
    machine: &BookingMachine,
    catalog: &Catalog,
    rejected: Option<&RejectedContact>,
) -> Screen {
    match machine.step() {
        Step::LocationVehicle => Screen::LocationVehicle(location_vehicle(machine, catalog)),
        Step::DateTime => Screen::DateTime(date_time(machine, catalog)),
        Step::Contact => Screen::Contact(contact(machine, catalog, rejected)),
    }
}

fn location_vehicle(machine: &BookingMachine, catalog: &Catalog) -> LocationVehicleScreen {
    let selection = machine.selection();
    let locations = catalog
        .dealerships
        .iter()
        .map(|d| LocationOption {
            value: d.name.clone(),
            label: format!("{} - {}", d.name, d.address),
            selected: selection.location.as_deref() == Some(d.name.as_str()),
        })
        .collect();
    let vehicles = catalog
        .vehicles
        .iter()
        .map(|v| VehicleTile {
            id: v.id.clone(),
            name: v.name.clone(),
            image: v.image.clone(),
            selected: selection.vehicle.as_deref() == Some(v.id.as_str()),
        })
        .collect();
    LocationVehicleScreen {
        title: LOCATION_VEHICLE_TITLE,
        locations,
        vehicles,
        next_enabled: machine.can_advance(),
    }
}

fn date_time(machine: &BookingMachine, catalog: &Catalog) -> DateTimeScreen {
    let selection = machine.selection();
    let shown = machine.displayed_month();
    let bounds = machine.bounds();
    let selected_day = selection
        .date
        .filter(|d| d.cursor() == shown)
        .map(|d| d.day);

    let cells = month_grid(shown.month, shown.year, machine.today())
        .into_iter()
        .map(|cell| match cell {
            GridCell::Blank => CalendarCell::Blank,
            GridCell::Day { day, past } => CalendarCell::Day {
                day,
                disabled: past,
                selected: selected_day == Some(day),
            },
        })
        .collect();

    let time_slots = selection.date.map(|_| {
        catalog
            .time_slots
            .iter()
            .map(|slot| TimeSlotOption {
                slot: slot.clone(),
                selected: selection.time.as_deref() == Some(slot.as_str()),
            })
            .collect()
    });

    DateTimeScreen {
        title: DATE_TIME_TITLE,
        month_label: month_label(shown.month, shown.year),
        prev_month_enabled: bounds.can_go_back(shown),
        next_month_enabled: bounds.can_go_forward(shown),
        weekdays: WEEKDAY_LABELS,
        cells,
        time_slots,
        next_enabled: machine.can_advance(),
    }
}

fn contact(
    machine: &BookingMachine,
    catalog: &Catalog,
    rejected: Option<&RejectedContact>,
) -> ContactScreen {
    let selection = machine.selection();
    let summary = BookingSummary {
        date: selection
            .date
            .map(|d| d.long_label())
            .unwrap_or_default(),
        time: selection.time.clone().unwrap_or_default(),
        location: selection.location.clone().unwrap_or_default(),
    };
    let form = rejected
        .map(|r| r.form.clone())
        .or_else(|| selection.contact.clone())
        .unwrap_or_else(|| ContactForm::with_country(catalog.default_country.clone()));
    let errors = rejected
        .map(|r| {
            r.errors
                .iter()
                .map(|field| FieldMessage {
                    field,
                    message: field.message(),
                })
                .collect()
        })
        .unwrap_or_default();
    ContactScreen {
        title: CONTACT_TITLE,
        summary,
        form,
        countries: catalog.countries.clone(),
        consent_text: catalog.consent_text.clone(),
        errors,
        submitted: machine.is_frozen(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::calendar::FixedClock;
    use crate::booking::validate::validate_contact;
    use crate::config::ExtensionConfig;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn machine() -> BookingMachine {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        BookingMachine::start(Arc::new(FixedClock(today)))
    }

    fn catalog() -> Catalog {
        ExtensionConfig::default().catalog()
    }

    #[test]
    fn first_step_lists_catalog_and_marks_selection() {
        let mut m = machine();
        m.select_vehicle("r5t").unwrap();
        let Screen::LocationVehicle(screen) = render_screen(&m, &catalog(), None) else {
            panic!("expected first step");
        };
        assert_eq!(screen.title, "Let's set up your drive");
        assert_eq!(screen.locations.len(), 4);
        assert_eq!(
            screen.locations[0].label,
            "PARIS INTRA MUROS - 72 Rue DU FAUBOURG SAINT JACQUES, 75011 Paris"
        );
        assert!(screen.locations.iter().all(|l| !l.selected));
        let selected: Vec<&str> = screen
            .vehicles
            .iter()
            .filter(|v| v.selected)
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(selected, vec!["r5t"]);
        assert!(!screen.next_enabled);
    }

    #[test]
    fn date_step_grid_and_navigation_flags() {
        let mut m = machine();
        m.select_location("PARIS INTRA MUROS").unwrap();
        m.select_vehicle("r5i").unwrap();
        m.advance().unwrap();
        let Screen::DateTime(screen) = render_screen(&m, &catalog(), None) else {
            panic!("expected date step");
        };
        assert_eq!(screen.month_label, "October 2026");
        assert!(!screen.prev_month_enabled);
        assert!(screen.next_month_enabled);
        assert!(screen.time_slots.is_none());
        assert!(!screen.next_enabled);
        // 2026-10-01 is a Thursday.
        let blanks = screen
            .cells
            .iter()
            .filter(|c| **c == CalendarCell::Blank)
            .count();
        assert_eq!(blanks, 4);
        let disabled = screen
            .cells
            .iter()
            .filter(|c| matches!(c, CalendarCell::Day { disabled: true, .. }))
            .count();
        assert_eq!(disabled, 13);
    }

    #[test]
    fn time_slots_appear_after_date_selection() {
        let mut m = machine();
        m.select_location("PARIS INTRA MUROS").unwrap();
        m.select_vehicle("r5i").unwrap();
        m.advance().unwrap();
        m.navigate_month(1).unwrap();
        m.navigate_month(1).unwrap();
        m.select_date(24).unwrap();
        m.select_time("2:30-3:15 PM PST").unwrap();
        let Screen::DateTime(screen) = render_screen(&m, &catalog(), None) else {
            panic!("expected date step");
        };
        assert!(screen.prev_month_enabled);
        assert!(!screen.next_month_enabled);
        let slots = screen.time_slots.unwrap();
        assert_eq!(slots.len(), 2);
        assert!(!slots[0].selected);
        assert!(slots[1].selected);
        assert!(screen.next_enabled);
        assert!(screen.cells.contains(&CalendarCell::Day {
            day: 24,
            disabled: false,
            selected: true
        }));
    }

    #[test]
    fn contact_step_summarizes_and_shows_errors() {
        let mut m = machine();
        m.select_location("RENAULT MONTROUGE").unwrap();
        m.select_vehicle("r5i").unwrap();
        m.advance().unwrap();
        m.select_date(15).unwrap();
        m.select_time("10:15-11:00 AM PST").unwrap();
        m.advance().unwrap();

        let Screen::Contact(screen) = render_screen(&m, &catalog(), None) else {
            panic!("expected contact step");
        };
        assert_eq!(screen.summary.date, "October 15, 2026");
        assert_eq!(screen.summary.location, "RENAULT MONTROUGE");
        assert_eq!(screen.form.country, "United States");
        assert!(screen.errors.is_empty());
        assert!(!screen.submitted);

        let form = ContactForm {
            email: "nope".into(),
            ..ContactForm::with_country("United States")
        };
        let rejected = RejectedContact {
            errors: validate_contact(&form),
            form,
        };
        let Screen::Contact(screen) = render_screen(&m, &catalog(), Some(&rejected)) else {
            panic!("expected contact step");
        };
        assert_eq!(screen.form.email, "nope");
        assert!(screen.errors.iter().any(|e| e.field == Field::Email));
    }

    #[test]
    fn screen_serializes_with_step_tag() {
        let json = serde_json::to_value(render_screen(&machine(), &catalog(), None)).unwrap();
        assert_eq!(json["step"], "location_vehicle");
        assert_eq!(json["vehicles"][0]["id"], "r5i");
    }
}
