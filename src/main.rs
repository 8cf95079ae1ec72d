use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use barbershop::config::AppConfig;
use barbershop::models::time::{to_display_long_date, to_display_range};
use barbershop::services::api::http::HttpBackend;
use barbershop::services::cache::BroadcastInvalidator;
use barbershop::services::reschedule::{NavigationParams, Phase, RescheduleWizard, WizardDeps};
use barbershop::services::slots::SlotResolver;
use barbershop::session::SessionContext;

/// Opens the reschedule wizard for an appointment against the configured
/// backend and prints what the sheet would show.
///
/// Usage: barbershop <appointment-id> [YYYY-MM-DD]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let appointment_id: i64 = args
        .next()
        .context("usage: barbershop <appointment-id> [YYYY-MM-DD]")?
        .parse()
        .context("appointment id must be a number")?;
    let date: Option<NaiveDate> = args
        .next()
        .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
        .transpose()
        .context("date must be YYYY-MM-DD")?;

    let config = AppConfig::from_env();
    let session: Arc<dyn SessionContext> = Arc::new(config.session());
    anyhow::ensure!(
        session.is_authenticated(),
        "BARBERSHOP_API_TOKEN must be set"
    );
    tracing::info!("using backend at {}", config.api_base_url);

    let backend = Arc::new(HttpBackend::new(
        config.api_base_url.clone(),
        Arc::clone(&session),
        config.request_timeout,
    )?);
    let deps = WizardDeps {
        appointments: backend.clone(),
        barbers: backend.clone(),
        slots: SlotResolver::new(backend, session),
        invalidator: Arc::new(BroadcastInvalidator::default()),
    };

    let mut wizard = RescheduleWizard::new(deps, appointment_id, NavigationParams::default());
    if let Err(e) = wizard.open().await {
        match wizard.phase() {
            Phase::NotEligible { label, .. } => println!("Not eligible for reschedule: {label}"),
            Phase::FetchFailed { message } => println!("Could not load appointment: {message}"),
            _ => println!("{e}"),
        }
        return Ok(());
    }

    if let Some(original) = wizard.original() {
        let appt = &original.appointment;
        println!(
            "Appointment {} with {} ({} min, {})",
            appt.id, appt.barber_name, original.duration_min, appt.service_summary
        );
    }
    let barbers: Vec<String> = wizard
        .barbers()
        .iter()
        .map(|b| format!("{} ({})", b.name, b.id))
        .collect();
    println!("Barbers: {}", barbers.join(", "));

    if let Some(date) = date {
        wizard.select_date(date)?;
    }
    let Some(date) = wizard.state().date else {
        println!("No date to look up");
        return Ok(());
    };

    let slots = wizard.refresh_slots().await;
    println!("{}", to_display_long_date(&date));
    if slots.is_empty() {
        println!("  no slots available");
    }
    for slot in slots {
        println!("  {}", to_display_range(&slot.start(), Some(&slot.end())));
    }

    Ok(())
}
