use crate::infra::{InMemoryCapacityStore, InMemoryRegistrationStore};
use chrono::{Local, NaiveDate};
use clap::Args;
use harvest_quota::config::AppConfig;
use harvest_quota::error::AppError;
use harvest_quota::quota::{
    BucketStatus, FarmerId, HarvestProjection, QuotaEvaluator, RegistrationOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    /// Farmer identity; omitted to exercise the unauthenticated path
    #[arg(long)]
    pub(crate) farmer: Option<String>,
    /// Crop name as listed in the catalog (e.g. "Carrot")
    #[arg(long)]
    pub(crate) crop: String,
    /// Planting date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) planting_date: NaiveDate,
    /// Capacity limits CSV used to seed the capacity store
    #[arg(long)]
    pub(crate) limits_csv: Option<PathBuf>,
    /// Print the JSON result instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StatusArgs {
    /// Crop name as listed in the catalog
    #[arg(long)]
    pub(crate) crop: String,
    /// Planting date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) planting_date: NaiveDate,
    /// Capacity limits CSV used to seed the capacity store
    #[arg(long)]
    pub(crate) limits_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Crop to register repeatedly
    #[arg(long, default_value = "Carrot")]
    pub(crate) crop: String,
    /// Planting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) planting_date: Option<NaiveDate>,
    /// Capacity of the demo bucket
    #[arg(long, default_value_t = 10)]
    pub(crate) max_farmers: u32,
}

type MemoryEvaluator = QuotaEvaluator<InMemoryCapacityStore, InMemoryRegistrationStore>;

fn build_evaluator(
    config: &AppConfig,
    limits_csv: Option<PathBuf>,
) -> Result<(MemoryEvaluator, Arc<InMemoryCapacityStore>), AppError> {
    let limits_csv = limits_csv.or_else(|| config.limits_csv.clone());
    let capacities = Arc::new(InMemoryCapacityStore::load(limits_csv.as_deref())?);
    let registrations = Arc::new(InMemoryRegistrationStore::default());
    let evaluator = QuotaEvaluator::new(capacities.clone(), registrations, config.quota.clone());
    Ok((evaluator, capacities))
}

pub(crate) async fn run_register(args: RegisterArgs) -> Result<(), AppError> {
    let RegisterArgs {
        farmer,
        crop,
        planting_date,
        limits_csv,
        json,
    } = args;

    let config = AppConfig::load()?;
    let (evaluator, _) = build_evaluator(&config, limits_csv)?;
    let farmer = farmer.map(FarmerId);

    let outcome = evaluator
        .check_and_register(farmer.as_ref(), &crop, planting_date)
        .await;

    if json {
        match serde_json::to_string_pretty(&outcome.result()) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Result payload unavailable: {err}"),
        }
    } else {
        render_outcome(&crop, planting_date, &outcome);
    }

    Ok(())
}

pub(crate) async fn run_status(args: StatusArgs) -> Result<(), AppError> {
    let StatusArgs {
        crop,
        planting_date,
        limits_csv,
    } = args;

    let config = AppConfig::load()?;
    let (evaluator, _) = build_evaluator(&config, limits_csv)?;

    match evaluator.bucket_status(&crop, planting_date).await {
        Ok(status) => render_status(&status),
        Err(err) => println!("Capacity lookup unavailable: {err}"),
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        crop,
        planting_date,
        max_farmers,
    } = args;

    let config = AppConfig::load()?;
    let planting_date = planting_date.unwrap_or_else(|| Local::now().date_naive());
    let (evaluator, capacities) = build_evaluator(&config, None)?;

    let projection = match HarvestProjection::for_crop(
        evaluator.catalog(),
        &crop,
        planting_date,
        config.quota.default_cycle_months,
    ) {
        Ok(projection) => projection,
        Err(err) => {
            println!("Cannot project a harvest for {crop}: {err}");
            return Ok(());
        }
    };
    capacities.set_limit(&crop, projection.harvest_month(), max_farmers);

    println!("Crop registration quota demo");
    println!(
        "{} planted {} -> harvest {} ({} month cycle), capacity {} farmers",
        crop,
        planting_date,
        projection.harvest_date,
        projection.cycle_months,
        max_farmers
    );

    let attempts = max_farmers.saturating_add(2);
    for attempt in 1..=attempts {
        let farmer = FarmerId(format!("demo-farmer-{attempt:03}"));
        let outcome = evaluator
            .check_and_register(Some(&farmer), &crop, planting_date)
            .await;
        let result = outcome.result();
        println!(
            "- #{attempt:>3} {:<15} {}",
            format!("{:?}", result.outcome).to_lowercase(),
            result.message
        );
    }

    println!("\nUnauthenticated attempt");
    let outcome = evaluator
        .check_and_register(None, &crop, planting_date)
        .await;
    println!("- {}", outcome.message());

    println!();
    match evaluator.bucket_status(&crop, planting_date).await {
        Ok(status) => render_status(&status),
        Err(err) => println!("Capacity lookup unavailable: {err}"),
    }

    Ok(())
}

fn render_outcome(crop: &str, planting_date: NaiveDate, outcome: &RegistrationOutcome) {
    let result = outcome.result();
    println!("Registration for {} planted {}", crop, planting_date);
    println!(
        "Decision: {:?} (status {:?}, success {})",
        result.outcome, result.status, result.success
    );
    if let Some(month) = &result.harvest_month_name {
        println!("Harvest month: {}", month);
    }
    if let Some(harvest_date) = result.harvest_date {
        println!("Harvest date: {}", harvest_date);
    }
    if let Some(id) = &result.registration_id {
        println!("Registration id: {}", id.0);
    }
    println!("{}", result.message);
    if !result.alternatives.is_empty() {
        println!("Open alternatives: {}", result.alternatives.join(", "));
    }
}

fn render_status(status: &BucketStatus) {
    println!(
        "{} harvesting in {} ({}): {}/{} registered, {} remaining [{}]",
        status.crop_name,
        status.harvest_month_name,
        status.harvest_date,
        status.registered,
        status.max_farmers,
        status.remaining,
        status.tier.label()
    );
}
