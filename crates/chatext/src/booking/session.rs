//! A live booking session bound to its host.
//!
//! [`BookingSession`] wraps a [`BookingMachine`] and performs the side
//! effects around it: re-rendering after each state change, asking the host
//! to scroll, surfacing field errors inline, and emitting the `complete`
//! interaction exactly once.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use super::calendar::Clock;
use super::catalog::Catalog;
use super::machine::{BookingMachine, CompletionPayload};
use super::screens::{RejectedContact, Screen, render_screen};
use super::validate::{ContactForm, FieldErrors};
use crate::error::{BookingError, ExtensionError};
use crate::ext::{Activation, Extension, ExtensionFuture, ExtensionKind};
use crate::host::{Host, Interaction, Mount, RenderContext};
use crate::view::View;

/// User input from the booking screens.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingAction {
    SelectLocation { value: String },
    SelectVehicle { id: String },
    Next,
    /// Leave the current step. From the contact step, `draft` carries the
    /// form as typed so far.
    Back {
        #[serde(default)]
        draft: Option<ContactForm>,
    },
    PrevMonth,
    NextMonth,
    SelectDate { day: u32 },
    SelectTime { slot: String },
    Submit { contact: ContactForm },
}

/// What handling an action did.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// State changed and the screen was re-rendered.
    Updated,
    /// The action was not valid here; nothing changed.
    Ignored(BookingError),
    /// Submission failed validation; errors are shown inline.
    Rejected(FieldErrors),
    /// The booking was submitted and reported to the host.
    Completed(CompletionPayload),
}

pub struct BookingSession {
    machine: BookingMachine,
    catalog: Arc<Catalog>,
    host: Arc<dyn Host>,
    mount: Arc<dyn Mount>,
    rejected: Option<RejectedContact>,
}

impl BookingSession {
    /// Start a session and render its first step.
    pub fn start(
        ctx: &RenderContext,
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ExtensionError> {
        let host = ctx.require_host()?;
        let mount = ctx.require_mount()?;
        let session = Self {
            machine: BookingMachine::start(clock),
            catalog,
            host,
            mount,
            rejected: None,
        };
        info!(today = %session.machine.today(), "booking session started");
        session.render();
        Ok(session)
    }

    pub fn machine(&self) -> &BookingMachine {
        &self.machine
    }

    /// The screen for the current state.
    pub fn screen(&self) -> Screen {
        render_screen(&self.machine, &self.catalog, self.rejected.as_ref())
    }

    pub fn is_completed(&self) -> bool {
        self.machine.is_frozen()
    }

    /// Apply one user action.
    pub fn handle(&mut self, action: BookingAction) -> ActionOutcome {
        let result = match action {
            BookingAction::SelectLocation { value } => {
                self.machine.select_location(&value).map(|_| None)
            }
            BookingAction::SelectVehicle { id } => self.machine.select_vehicle(&id).map(|_| None),
            BookingAction::Next => self.machine.advance().map(|_| None),
            BookingAction::Back { draft } => self.back(draft).map(|_| None),
            BookingAction::PrevMonth => self.machine.navigate_month(-1).map(|_| None),
            BookingAction::NextMonth => self.machine.navigate_month(1).map(|_| None),
            BookingAction::SelectDate { day } => self.machine.select_date(day).map(|_| None),
            BookingAction::SelectTime { slot } => self.machine.select_time(&slot).map(|_| None),
            BookingAction::Submit { contact } => self.submit(contact).map(Some),
        };

        match result {
            Ok(None) => {
                self.render();
                ActionOutcome::Updated
            }
            Ok(Some(payload)) => {
                self.render();
                info!(
                    location = %payload.location,
                    vehicle = %payload.vehicle,
                    date = %payload.date,
                    "booking submitted"
                );
                self.host.interact(Interaction::Complete {
                    payload: payload.clone(),
                });
                ActionOutcome::Completed(payload)
            }
            Err(BookingError::Validation(errors)) => {
                debug!(fields = %errors, "contact form rejected");
                self.render();
                ActionOutcome::Rejected(errors)
            }
            Err(e) => {
                debug!(error = %e, "booking action ignored");
                ActionOutcome::Ignored(e)
            }
        }
    }

    fn back(&mut self, draft: Option<ContactForm>) -> Result<(), BookingError> {
        if let Some(draft) = draft {
            self.machine.save_contact_draft(draft)?;
        }
        self.machine.retreat()?;
        self.rejected = None;
        Ok(())
    }

    fn submit(&mut self, contact: ContactForm) -> Result<CompletionPayload, BookingError> {
        match self.machine.submit_contact(&contact) {
            Ok(payload) => {
                self.rejected = None;
                Ok(payload)
            }
            Err(BookingError::Validation(errors)) => {
                self.rejected = Some(RejectedContact {
                    form: contact,
                    errors: errors.clone(),
                });
                Err(BookingError::Validation(errors))
            }
            Err(e) => Err(e),
        }
    }

    fn render(&self) {
        self.mount.render(View::Booking(self.screen()));
        self.host.scroll_to_bottom();
    }
}

impl std::fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSession")
            .field("machine", &self.machine)
            .field("rejected", &self.rejected)
            .finish()
    }
}

// ── Extension ─────────────────────────────────────────────────────────

pub const BOOKING_DISCRIMINATOR: &str = "ext_booking";

/// Response extension rendering the three-step test-drive booking form.
pub struct BookingExtension {
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
}

impl BookingExtension {
    pub fn new(catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, clock }
    }
}

impl Extension for BookingExtension {
    fn name(&self) -> &'static str {
        "Booking"
    }

    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Response
    }

    fn discriminator(&self) -> &'static str {
        BOOKING_DISCRIMINATOR
    }

    fn activate(&self, ctx: RenderContext) -> ExtensionFuture<'_> {
        Box::pin(async move {
            let session = BookingSession::start(&ctx, self.catalog.clone(), self.clock.clone())?;
            Ok(Activation::Booking(session))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::calendar::FixedClock;
    use crate::booking::machine::Step;
    use crate::booking::validate::Field;
    use crate::config::ExtensionConfig;
    use crate::host::Trace;
    use crate::host::testing::{RecordingHost, RecordingMount};
    use chrono::NaiveDate;

    struct Fixture {
        host: Arc<RecordingHost>,
        mount: Arc<RecordingMount>,
        session: BookingSession,
    }

    fn fixture() -> Fixture {
        let host = Arc::new(RecordingHost::default());
        let mount = Arc::new(RecordingMount::default());
        let ctx = RenderContext::new(Trace::new("ext_booking", serde_json::Value::Null))
            .with_host(host.clone())
            .with_mount(mount.clone());
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        let session = BookingSession::start(
            &ctx,
            Arc::new(ExtensionConfig::default().catalog()),
            Arc::new(clock),
        )
        .unwrap();
        Fixture {
            host,
            mount,
            session,
        }
    }

    fn contact() -> ContactForm {
        ContactForm {
            email: "a@b.co".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            country: "United States".into(),
            phone: "1234567890".into(),
            zip_code: "94105".into(),
        }
    }

    fn to_contact_step(f: &mut Fixture) {
        for action in [
            BookingAction::SelectLocation {
                value: "PARIS INTRA MUROS".into(),
            },
            BookingAction::SelectVehicle { id: "r5i".into() },
            BookingAction::Next,
            BookingAction::SelectDate { day: 15 },
            BookingAction::SelectTime {
                slot: "10:15-11:00 AM PST".into(),
            },
            BookingAction::Next,
        ] {
            assert_eq!(f.session.handle(action), ActionOutcome::Updated);
        }
    }

    fn last_screen(f: &Fixture) -> Screen {
        match f.mount.last_view() {
            Some(View::Booking(screen)) => screen,
            other => panic!("expected booking view, got {other:?}"),
        }
    }

    #[test]
    fn start_renders_first_step_and_scrolls() {
        let f = fixture();
        assert_eq!(last_screen(&f).step(), Step::LocationVehicle);
        assert_eq!(*f.host.scrolls.lock().unwrap(), 1);
        assert!(f.host.interactions().is_empty());
    }

    #[test]
    fn start_without_mount_fails() {
        let ctx = RenderContext::new(Trace::default()).with_host(Arc::new(RecordingHost::default()));
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        let err = BookingSession::start(
            &ctx,
            Arc::new(ExtensionConfig::default().catalog()),
            Arc::new(clock),
        )
        .unwrap_err();
        assert!(matches!(err, ExtensionError::HostIntegrationMissing(_)));
    }

    #[test]
    fn invalid_actions_are_ignored_without_render() {
        let mut f = fixture();
        let renders = f.mount.views.lock().unwrap().len();
        assert!(matches!(
            f.session.handle(BookingAction::Next),
            ActionOutcome::Ignored(BookingError::Precondition(_))
        ));
        assert_eq!(f.mount.views.lock().unwrap().len(), renders);
    }

    #[test]
    fn rejected_submission_renders_inline_errors() {
        let mut f = fixture();
        to_contact_step(&mut f);
        let bad = ContactForm {
            zip_code: "1234".into(),
            ..contact()
        };
        let ActionOutcome::Rejected(errors) = f.session.handle(BookingAction::Submit { contact: bad })
        else {
            panic!("expected rejection");
        };
        assert!(errors.contains(Field::ZipCode));
        let Screen::Contact(screen) = last_screen(&f) else {
            panic!("expected contact screen");
        };
        assert_eq!(screen.form.zip_code, "1234");
        assert_eq!(screen.errors.len(), 1);
        assert!(f.session.machine().selection().contact.is_none());
        assert!(f.host.interactions().is_empty());
    }

    #[test]
    fn completes_exactly_once() {
        let mut f = fixture();
        to_contact_step(&mut f);
        let outcome = f.session.handle(BookingAction::Submit { contact: contact() });
        let ActionOutcome::Completed(payload) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(payload.date, "2026/10/15");
        assert!(f.session.is_completed());

        assert_eq!(
            f.session.handle(BookingAction::Submit { contact: contact() }),
            ActionOutcome::Ignored(BookingError::Frozen)
        );
        assert_eq!(
            f.session.handle(BookingAction::Back { draft: None }),
            ActionOutcome::Ignored(BookingError::Frozen)
        );
        assert_eq!(
            f.host.interactions(),
            vec![Interaction::Complete { payload }]
        );
        let Screen::Contact(screen) = last_screen(&f) else {
            panic!("expected contact screen");
        };
        assert!(screen.submitted);
    }

    #[test]
    fn back_with_draft_prefills_form() {
        let mut f = fixture();
        to_contact_step(&mut f);
        let draft = ContactForm {
            email: "ada@".into(),
            ..ContactForm::with_country("United States")
        };
        assert_eq!(
            f.session.handle(BookingAction::Back {
                draft: Some(draft.clone())
            }),
            ActionOutcome::Updated
        );
        assert_eq!(f.session.handle(BookingAction::Next), ActionOutcome::Updated);
        let Screen::Contact(screen) = last_screen(&f) else {
            panic!("expected contact screen");
        };
        assert_eq!(screen.form, draft);
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: BookingAction =
            serde_json::from_str(r#"{"type":"select_date","day":15}"#).unwrap();
        assert_eq!(action, BookingAction::SelectDate { day: 15 });
        let action: BookingAction = serde_json::from_str(r#"{"type":"back"}"#).unwrap();
        assert_eq!(action, BookingAction::Back { draft: None });
        let action: BookingAction = serde_json::from_str(
            r#"{"type":"submit","contact":{"email":"a@b.co","zipCode":"94105"}}"#,
        )
        .unwrap();
        let BookingAction::Submit { contact } = action else {
            panic!("expected submit");
        };
        assert_eq!(contact.zip_code, "94105");
    }

    #[tokio::test]
    async fn extension_activates_a_session() {
        let host = Arc::new(RecordingHost::default());
        let mount = Arc::new(RecordingMount::default());
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        let ext = BookingExtension::new(
            Arc::new(ExtensionConfig::default().catalog()),
            Arc::new(clock),
        );
        let ctx = RenderContext::new(Trace::new("custom", serde_json::json!({"name": "ext_booking"})))
            .with_host(host)
            .with_mount(mount.clone());
        assert!(ext.matches(&ctx.trace));
        let Activation::Booking(session) = ext.activate(ctx).await.unwrap() else {
            panic!("expected booking activation");
        };
        assert_eq!(session.machine().step(), Step::LocationVehicle);
        assert!(mount.last_view().is_some());
    }
}
