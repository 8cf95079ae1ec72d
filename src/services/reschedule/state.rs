use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AppointmentStatus, TimeSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Barber = 1,
    Date = 2,
    Time = 3,
    Confirm = 4,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::Barber => Some(WizardStep::Date),
            WizardStep::Date => Some(WizardStep::Time),
            WizardStep::Time => Some(WizardStep::Confirm),
            WizardStep::Confirm => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            WizardStep::Barber => None,
            WizardStep::Date => Some(WizardStep::Barber),
            WizardStep::Time => Some(WizardStep::Date),
            WizardStep::Confirm => Some(WizardStep::Time),
        }
    }
}

/// The in-progress selection. Discarded on close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub barber_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub slot: Option<TimeSlot>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::Barber,
            barber_id: None,
            date: None,
            slot: None,
        }
    }
}

/// What the sheet shows. Only `Editing` renders the stepper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Loading,
    FetchFailed { message: String },
    NotEligible { status: AppointmentStatus, label: String },
    Editing,
}

impl Phase {
    pub fn shows_stepper(&self) -> bool {
        matches!(self, Phase::Editing)
    }

    pub fn can_retry(&self) -> bool {
        matches!(self, Phase::FetchFailed { .. })
    }
}
