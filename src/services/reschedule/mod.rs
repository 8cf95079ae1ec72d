//! Four-step reschedule sheet: barber, date, time, confirm.
//!
//! The wizard is opened against the server's copy of the appointment, never
//! against whatever the caller navigated with. Navigation params only fill
//! fields the detail response left out.

pub mod state;
pub mod status_gate;

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{RescheduleError, StepError, GENERIC_FETCH_ERROR};
use crate::models::{
    merge_barbers, normalize_appointment, normalize_barber, Appointment, Barber, ChangeSet,
    ScheduleFields, TimeSlot,
};
use crate::models::time::parse_calendar_date;
use crate::services::api::{AppointmentGateway, BarberDirectory};
use crate::services::cache::{QueryInvalidator, QueryKey};
use crate::services::slots::{SlotQuery, SlotResolver, MIN_SLOT_DURATION_MIN};

pub use state::{Phase, WizardState, WizardStep};

/// Whatever the opening screen already knew about the appointment.
#[derive(Debug, Clone, Default)]
pub struct NavigationParams {
    pub barber_id: Option<i64>,
    pub barber_name: Option<String>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration_min: Option<i64>,
    pub barbers: Vec<Barber>,
}

/// The appointment as fetched when the wizard opened; the diff baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Original {
    pub appointment: Appointment,
    pub fields: ScheduleFields,
    pub duration_min: i64,
}

impl Original {
    fn from_detail(appointment: Appointment, nav: &NavigationParams) -> Self {
        let barber_id = Some(appointment.barber_id)
            .filter(|id| *id != 0)
            .or(nav.barber_id);
        let date = appointment
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .or_else(|| nav.date.clone());
        let start = appointment
            .start
            .map(|t| t.to_string())
            .or_else(|| nav.start.clone());
        let end = appointment
            .end
            .map(|t| t.to_string())
            .or_else(|| nav.end.clone());

        let fields = ScheduleFields {
            barber_id,
            date,
            start,
            end,
        };
        let span = fields
            .start
            .as_deref()
            .zip(fields.end.as_deref())
            .and_then(|(s, e)| TimeSlot::parse(s, e))
            .map(|slot| slot.duration_min());
        let duration_min = Some(appointment.total_duration_min)
            .filter(|d| *d > 0)
            .or(nav.duration_min.filter(|d| *d > 0))
            .or(span)
            .unwrap_or(MIN_SLOT_DURATION_MIN)
            .max(MIN_SLOT_DURATION_MIN);

        Self {
            appointment,
            fields,
            duration_min,
        }
    }

    fn slot(&self) -> Option<TimeSlot> {
        TimeSlot::parse(self.fields.start.as_deref()?, self.fields.end.as_deref()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RescheduleResult {
    pub appointment_id: i64,
    pub changed: ChangeSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Nothing differed from the original; closed without a request.
    Unchanged,
    Rescheduled(RescheduleResult),
}

/// Collaborators the wizard talks to.
#[derive(Clone)]
pub struct WizardDeps {
    pub appointments: Arc<dyn AppointmentGateway>,
    pub barbers: Arc<dyn BarberDirectory>,
    pub slots: SlotResolver,
    pub invalidator: Arc<dyn QueryInvalidator>,
}

pub struct RescheduleWizard {
    appointment_id: i64,
    nav: NavigationParams,
    deps: WizardDeps,
    today: Option<NaiveDate>,
    phase: Phase,
    state: WizardState,
    original: Option<Original>,
    barbers: Vec<Barber>,
    slots: Vec<TimeSlot>,
    slots_for: Option<SlotQuery>,
    submitting: bool,
    submit_error: Option<String>,
}

impl RescheduleWizard {
    pub fn new(deps: WizardDeps, appointment_id: i64, nav: NavigationParams) -> Self {
        Self {
            appointment_id,
            nav,
            deps,
            today: None,
            phase: Phase::Closed,
            state: WizardState::default(),
            original: None,
            barbers: Vec::new(),
            slots: Vec::new(),
            slots_for: None,
            submitting: false,
            submit_error: None,
        }
    }

    /// Pins "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn appointment_id(&self) -> i64 {
        self.appointment_id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn original(&self) -> Option<&Original> {
        self.original.as_ref()
    }

    pub fn barbers(&self) -> &[Barber] {
        &self.barbers
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    fn reset(&mut self) {
        self.state = WizardState::default();
        self.original = None;
        self.barbers.clear();
        self.slots.clear();
        self.slots_for = None;
        self.submitting = false;
        self.submit_error = None;
    }

    /// Fetches the appointment, applies the status gate and seeds the draft.
    /// Every open starts from scratch.
    pub async fn open(&mut self) -> Result<(), RescheduleError> {
        self.reset();
        self.phase = Phase::Loading;

        let detail = match self.deps.appointments.fetch_detail(self.appointment_id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(appointment_id = self.appointment_id, error = %e, "appointment detail fetch failed");
                let message = e.message_or(GENERIC_FETCH_ERROR);
                self.phase = Phase::FetchFailed {
                    message: message.clone(),
                };
                return Err(RescheduleError::DetailFetch(message));
            }
        };

        let original = Original::from_detail(normalize_appointment(&detail), &self.nav);
        if let Err(e) = status_gate::check(&original.appointment) {
            let appt = &original.appointment;
            self.phase = Phase::NotEligible {
                status: appt.status,
                label: appt.status.label_or(&appt.status_raw),
            };
            return Err(e);
        }

        let fetched: Vec<Barber> = match self.deps.barbers.list_barbers().await {
            Ok(list) => list
                .iter()
                .map(normalize_barber)
                .filter(|b| b.id != 0)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "barber list fetch failed, using supplied list");
                Vec::new()
            }
        };
        let mut supplied = self.nav.barbers.clone();
        if let Some(id) = original.fields.barber_id {
            if !supplied.iter().any(|b| b.id == id) && !fetched.iter().any(|b| b.id == id) {
                let name = Some(original.appointment.barber_name.clone())
                    .filter(|n| !n.is_empty())
                    .or_else(|| self.nav.barber_name.clone())
                    .unwrap_or_default();
                supplied.push(Barber::new(id, name));
            }
        }
        self.barbers = merge_barbers(&supplied, &fetched);

        self.state = WizardState {
            step: WizardStep::Barber,
            barber_id: original.fields.barber_id,
            date: original
                .fields
                .date
                .as_deref()
                .and_then(parse_calendar_date),
            slot: original.slot(),
        };

        tracing::info!(
            appointment_id = self.appointment_id,
            barber_id = ?self.state.barber_id,
            date = ?self.state.date,
            duration_min = original.duration_min,
            "reschedule wizard opened"
        );
        self.original = Some(original);
        self.phase = Phase::Editing;
        Ok(())
    }

    pub async fn retry(&mut self) -> Result<(), RescheduleError> {
        self.open().await
    }

    /// Drops the draft. Nothing carries over to the next open.
    pub fn close(&mut self) {
        self.reset();
        self.phase = Phase::Closed;
    }

    fn ensure_editing(&self) -> Result<(), StepError> {
        if self.phase.shows_stepper() {
            Ok(())
        } else {
            Err(StepError::NotEditing)
        }
    }

    fn clear_slots(&mut self) {
        self.state.slot = None;
        self.slots.clear();
        self.slots_for = None;
    }

    /// A barber or date change invalidates the slot, so the wizard cannot
    /// stay past the time step.
    fn rewind_to_time(&mut self) {
        if self.state.step > WizardStep::Time {
            self.state.step = WizardStep::Time;
        }
    }

    pub fn select_barber(&mut self, barber_id: i64) -> Result<(), StepError> {
        self.ensure_editing()?;
        if !self.barbers.iter().any(|b| b.id == barber_id) {
            return Err(StepError::UnknownBarber(barber_id));
        }
        if self.state.barber_id != Some(barber_id) {
            self.state.barber_id = Some(barber_id);
            self.clear_slots();
            self.rewind_to_time();
        }
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), StepError> {
        self.ensure_editing()?;
        let today = self.today();
        if date < today {
            return Err(StepError::PastDate { date, today });
        }
        if self.state.date != Some(date) {
            self.state.date = Some(date);
            self.clear_slots();
            self.rewind_to_time();
        }
        Ok(())
    }

    pub fn select_slot(&mut self, slot: TimeSlot) -> Result<(), StepError> {
        self.ensure_editing()?;
        if !self.slot_offered(&slot) {
            return Err(StepError::SlotUnavailable);
        }
        self.state.slot = Some(slot);
        Ok(())
    }

    fn slot_offered(&self, slot: &TimeSlot) -> bool {
        self.slots_for.is_some()
            && self.slots_for == self.slot_query()
            && self.slots.contains(slot)
    }

    /// Current `(barber, date, duration)` key, once barber and date are set.
    pub fn slot_query(&self) -> Option<SlotQuery> {
        let duration = self.original.as_ref()?.duration_min;
        Some(SlotQuery::new(self.state.barber_id?, self.state.date?, duration))
    }

    /// Applies a resolution result if it is still current. Results from a
    /// superseded request, or for a key the draft has moved away from, are
    /// dropped.
    pub fn receive_slots(&mut self, query: SlotQuery, result: Option<Vec<TimeSlot>>) -> bool {
        let Some(slots) = result else {
            return false;
        };
        if !self.phase.shows_stepper() || self.slot_query() != Some(query) {
            tracing::debug!(barber_id = query.barber_id(), date = %query.date(), "ignoring slots for stale query");
            return false;
        }
        self.slots = slots;
        self.slots_for = Some(query);
        true
    }

    /// Starts a lookup for the current draft without holding the wizard.
    ///
    /// This is the path for callers that keep editing while a lookup is
    /// pending: feed the output to `receive_slots` together with the query.
    /// A lookup started later on the same resolver makes this one yield
    /// `None`.
    pub fn slot_lookup(
        &self,
    ) -> Option<(SlotQuery, impl Future<Output = Option<Vec<TimeSlot>>> + Send + 'static)> {
        let query = self.slot_query()?;
        Some((query, self.deps.slots.resolve_latest(query)))
    }

    /// Resolves slots for the current draft and applies them. Holds the
    /// wizard until the lookup finishes; see `slot_lookup` otherwise.
    pub async fn refresh_slots(&mut self) -> &[TimeSlot] {
        match self.slot_lookup() {
            Some((query, lookup)) => {
                let result = lookup.await;
                self.receive_slots(query, result);
            }
            None => self.clear_slots(),
        }
        &self.slots
    }

    fn step_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Barber => self
                .state
                .barber_id
                .is_some_and(|id| self.barbers.iter().any(|b| b.id == id)),
            WizardStep::Date => self.state.date.is_some_and(|d| d >= self.today()),
            WizardStep::Time => self.state.slot.as_ref().is_some_and(|s| self.slot_offered(s)),
            WizardStep::Confirm => false,
        }
    }

    /// First of the selection steps whose predicate no longer holds.
    fn first_incomplete_step(&self) -> Option<WizardStep> {
        [WizardStep::Barber, WizardStep::Date, WizardStep::Time]
            .into_iter()
            .find(|step| !self.step_complete(*step))
    }

    /// Whether the current step's selection is complete.
    pub fn can_advance(&self) -> bool {
        self.phase.shows_stepper() && self.step_complete(self.state.step)
    }

    pub fn next(&mut self) -> Result<WizardStep, StepError> {
        self.ensure_editing()?;
        let next = self.state.step.next().ok_or(StepError::AtLastStep)?;
        if !self.can_advance() {
            return Err(StepError::Incomplete(self.state.step.number()));
        }
        self.state.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, StepError> {
        self.ensure_editing()?;
        let prev = self.state.step.prev().ok_or(StepError::AtFirstStep)?;
        self.state.step = prev;
        self.submit_error = None;
        Ok(prev)
    }

    pub fn draft_fields(&self) -> ScheduleFields {
        ScheduleFields {
            barber_id: self.state.barber_id,
            date: self.state.date.map(|d| d.format("%Y-%m-%d").to_string()),
            start: self.state.slot.map(|s| s.start().to_string()),
            end: self.state.slot.map(|s| s.end().to_string()),
        }
    }

    /// What confirming would send right now.
    pub fn pending_changes(&self) -> Option<ChangeSet> {
        let original = self.original.as_ref()?;
        Some(ChangeSet::compute(&original.fields, &self.draft_fields()))
    }

    pub fn can_confirm(&self) -> bool {
        self.phase.shows_stepper()
            && self.state.step == WizardStep::Confirm
            && !self.submitting
            && self.first_incomplete_step().is_none()
    }

    pub async fn confirm(&mut self) -> Result<ConfirmOutcome, RescheduleError> {
        if !self.phase.shows_stepper() {
            return Err(RescheduleError::NotEditing);
        }
        if self.state.step != WizardStep::Confirm {
            return Err(RescheduleError::WrongStep(self.state.step.number()));
        }
        if self.submitting {
            return Err(RescheduleError::SubmissionInFlight);
        }
        if let Some(step) = self.first_incomplete_step() {
            tracing::debug!(appointment_id = self.appointment_id, step = step.number(), "draft incomplete, back to step");
            self.state.step = step;
            return Err(RescheduleError::IncompleteDraft(step.number()));
        }
        let Some(original) = self.original.clone() else {
            return Err(RescheduleError::NotEditing);
        };

        let changes = ChangeSet::compute(&original.fields, &self.draft_fields());
        if changes.is_empty() {
            tracing::info!(appointment_id = self.appointment_id, "no changes, closing without update");
            self.close();
            return Ok(ConfirmOutcome::Unchanged);
        }

        self.submit_error = None;
        let appointment_id = self.appointment_id;
        let result = {
            let _in_flight = InFlight::start(&mut self.submitting);
            self.deps
                .appointments
                .update_partial(appointment_id, &changes)
                .await
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    appointment_id = self.appointment_id,
                    fields = ?changes.changed_fields(),
                    "appointment rescheduled"
                );
                self.invalidate_after_update(&original, &changes);
                let outcome = RescheduleResult {
                    appointment_id: self.appointment_id,
                    changed: changes,
                };
                self.close();
                Ok(ConfirmOutcome::Rescheduled(outcome))
            }
            Err(e) => {
                tracing::warn!(appointment_id = self.appointment_id, error = %e, "reschedule submission failed");
                let message = e.user_message();
                self.submit_error = Some(message.clone());
                Err(RescheduleError::Submission(message))
            }
        }
    }

    fn invalidate_after_update(&self, original: &Original, changes: &ChangeSet) {
        let invalidator = &self.deps.invalidator;
        invalidator.invalidate(QueryKey::Appointment(self.appointment_id));
        invalidator.invalidate(QueryKey::Appointments);
        if let Some(id) = original.fields.barber_id {
            invalidator.invalidate(QueryKey::BarberAgenda(id));
        }
        if let Some(id) = changes.barber_id {
            invalidator.invalidate(QueryKey::BarberAgenda(id));
        }
        if original.appointment.client_id != 0 {
            invalidator.invalidate(QueryKey::ClientAppointments(original.appointment.client_id));
        }
        invalidator.refetch(QueryKey::Appointment(self.appointment_id));
    }
}

/// Holds the submission flag for the duration of one update request. The
/// flag is cleared on drop, so an abandoned `confirm` future releases it.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
