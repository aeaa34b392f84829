use crate::app::infra::{parse_date, InMemoryBloodBankStore};
use crate::config::AppConfig;
use crate::eligibility::{
    BloodAvailability, BloodType, EligibilityService, EligibilityVerdict, HealthProfile,
    InventoryReport,
};
use crate::error::AppError;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DonationArgs {
    /// Donor age in whole years
    #[arg(long)]
    pub(crate) age: Option<u32>,
    /// Donor weight in kilograms
    #[arg(long)]
    pub(crate) weight: Option<f64>,
    /// Date of the most recent donation (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) last_donation: Option<NaiveDate>,
    /// Self-reported medical condition; repeat for several
    #[arg(long = "condition")]
    pub(crate) conditions: Vec<String>,
    /// Current medication; repeat for several
    #[arg(long = "medication")]
    pub(crate) medications: Vec<String>,
    #[arg(long)]
    pub(crate) recent_surgery: bool,
    #[arg(long)]
    pub(crate) recent_tattoo: bool,
    #[arg(long)]
    pub(crate) recent_travel: bool,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct CompatibleArgs {
    /// Recipient blood type label, e.g. AB+
    pub(crate) recipient: String,
    /// Inventory CSV snapshot (falls back to BLOOD_BANK_INVENTORY_CSV)
    #[arg(long)]
    pub(crate) inventory: Option<PathBuf>,
    /// Blood request CSV snapshot (falls back to BLOOD_BANK_REQUESTS_CSV)
    #[arg(long)]
    pub(crate) requests: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct InventoryReportArgs {
    /// Inventory CSV snapshot (falls back to BLOOD_BANK_INVENTORY_CSV)
    #[arg(long)]
    pub(crate) inventory: Option<PathBuf>,
    /// Blood request CSV snapshot (falls back to BLOOD_BANK_REQUESTS_CSV)
    #[arg(long)]
    pub(crate) requests: Option<PathBuf>,
}

pub(crate) fn run_donation_check(args: DonationArgs) -> Result<(), AppError> {
    let DonationArgs {
        age,
        weight,
        last_donation,
        conditions,
        medications,
        recent_surgery,
        recent_tattoo,
        recent_travel,
        today,
    } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let service = EligibilityService::new(
        Arc::new(InMemoryBloodBankStore::default()),
        config.policy,
    );

    let profile = HealthProfile {
        age,
        weight_kg: weight,
        last_donation_date: last_donation,
        medical_conditions: conditions,
        medications,
        recent_surgery,
        recent_tattoo,
        recent_travel,
    };

    let verdict = service.check_donation_eligibility_on(&profile, today);
    println!("Donation eligibility as of {today}");
    render_verdict(&verdict);
    Ok(())
}

pub(crate) fn run_compatible(args: CompatibleArgs) -> Result<(), AppError> {
    let service = snapshot_service(args.inventory, args.requests)?;
    // Typed input is normalized here; the service only matches exact labels.
    let recipient = args
        .recipient
        .parse::<BloodType>()
        .map(|blood_type| blood_type.label().to_string())
        .unwrap_or(args.recipient);
    let matches = service.check_compatible_blood_types(&recipient)?;

    if matches.is_empty() {
        println!("No compatible donor types known for '{recipient}'");
        return Ok(());
    }

    println!("Compatible donor types for {recipient}");
    for availability in &matches {
        render_availability(availability);
    }
    Ok(())
}

pub(crate) fn run_inventory_report(args: InventoryReportArgs) -> Result<(), AppError> {
    let service = snapshot_service(args.inventory, args.requests)?;
    let report = InventoryReport::from_inventory(&service.blood_inventory_with_requests()?);
    render_inventory_report(&report);
    Ok(())
}

fn snapshot_service(
    inventory: Option<PathBuf>,
    requests: Option<PathBuf>,
) -> Result<EligibilityService<InMemoryBloodBankStore>, AppError> {
    let config = AppConfig::load()?;
    let inventory = inventory.or(config.store.inventory_csv);
    let requests = requests.or(config.store.requests_csv);

    let store = InMemoryBloodBankStore::default();
    store.seed_from_paths(inventory.as_deref(), requests.as_deref())?;
    Ok(EligibilityService::new(Arc::new(store), config.policy))
}

fn render_verdict(verdict: &EligibilityVerdict) {
    if verdict.is_eligible {
        println!("- Eligible to donate");
    } else {
        println!("- Not eligible:");
        for reason in &verdict.reasons {
            println!("  - {reason}");
        }
    }
    if let Some(next) = verdict.next_eligible_date {
        println!("- Next eligible date: {next}");
    }
}

fn render_availability(availability: &BloodAvailability) {
    println!(
        "- {}: {} / {} units ({}) | {} units pending",
        availability.blood_type,
        availability.available_units,
        availability.capacity,
        availability.stock_level.label(),
        availability.pending_requests
    );
}

fn render_inventory_report(report: &InventoryReport) {
    println!("Inventory triage report");
    if report.rows.is_empty() {
        println!("- No inventory rows loaded");
        return;
    }

    for row in &report.rows {
        let flags = row
            .flags
            .iter()
            .map(|flag| flag.label())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "- {:<4} {:>4}/{:<4} {:>5.1}% {:<8} | {} units across {} pending requests{}",
            row.blood_type,
            row.quantity,
            row.capacity,
            row.stock_percentage,
            row.stock_level.label(),
            row.pending_requests,
            row.request_count,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{flags}]")
            }
        );
    }

    let totals = &report.totals;
    println!(
        "Totals: {} units on hand of {} capacity | {} units pending | {} critical types",
        totals.units_on_hand, totals.capacity, totals.pending_units, totals.critical_types
    );
}
