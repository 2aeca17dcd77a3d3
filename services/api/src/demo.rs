use crate::infra::{load_catalog, parse_datetime, parse_duration, parse_money, parse_sort};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use equiprent::config::{parse_refund_tiers, AppConfig};
use equiprent::error::AppError;
use equiprent::policy::{
    standard_duration_options, CancellationContext, DurationOption, EquipmentListing, Money,
    PolicyError, PriceRange, RefundResult, RentalDuration, RentalPolicyEngine, SearchCriteria,
    SortKey,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RefundArgs {
    /// Booking total being cancelled
    #[arg(long, value_parser = parse_money)]
    pub(crate) total: Money,
    /// Hours remaining until the rental starts
    #[arg(long, conflicts_with = "starts_at", required_unless_present = "starts_at")]
    pub(crate) hours: Option<f64>,
    /// Rental start (RFC 3339 or YYYY-MM-DD HH:MM, UTC)
    #[arg(long, value_parser = parse_datetime)]
    pub(crate) starts_at: Option<DateTime<Utc>>,
    /// Cancellation time used with --starts-at (defaults to now)
    #[arg(long, value_parser = parse_datetime, requires = "starts_at")]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Supplier refund table as hours:percent pairs, e.g. 72:100,48:90,24:75,0:50
    #[arg(long)]
    pub(crate) tiers: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RentalTotalArgs {
    /// Flat daily rate
    #[arg(long, value_parser = parse_money)]
    pub(crate) daily: Money,
    /// Flat weekly rate
    #[arg(long, value_parser = parse_money)]
    pub(crate) weekly: Money,
    /// Flat monthly rate
    #[arg(long, value_parser = parse_money)]
    pub(crate) monthly: Money,
    /// Selected period (daily, weekly, monthly); omitted means nothing selected yet
    #[arg(long, value_parser = parse_duration)]
    pub(crate) select: Option<RentalDuration>,
}

#[derive(Args, Debug)]
pub(crate) struct PremiumArgs {
    /// Replacement value of the insured equipment
    #[arg(long, value_parser = parse_money)]
    pub(crate) value: Money,
    /// Rental length in days
    #[arg(long)]
    pub(crate) days: u32,
    /// Plan id from the insurance catalog
    #[arg(long, default_value = "standard")]
    pub(crate) plan: String,
    /// Add-on coverage id (repeatable)
    #[arg(long = "add-on")]
    pub(crate) add_ons: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogSearchArgs {
    /// Supplier CSV export to search instead of the bundled sample catalog
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Case-insensitive text matched against name and category
    #[arg(long)]
    pub(crate) text: Option<String>,
    /// Restrict to a category (repeatable)
    #[arg(long)]
    pub(crate) category: Vec<String>,
    /// Lowest daily price
    #[arg(long, value_parser = parse_money)]
    pub(crate) min_price: Option<Money>,
    /// Highest daily price
    #[arg(long, value_parser = parse_money)]
    pub(crate) max_price: Option<Money>,
    /// Minimum rating (0-5)
    #[arg(long)]
    pub(crate) min_rating: Option<f32>,
    /// Case-insensitive location text
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Hide listings that are already booked
    #[arg(long)]
    pub(crate) available_only: bool,
    /// relevance, price_asc, price_desc, or rating_desc
    #[arg(long, value_parser = parse_sort)]
    pub(crate) sort: Option<SortKey>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Supplier CSV export to use instead of the bundled sample catalog
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

fn engine_from_env() -> Result<RentalPolicyEngine, AppError> {
    let config = AppConfig::load()?;
    Ok(RentalPolicyEngine::new(config.policy))
}

pub(crate) fn run_refund(args: RefundArgs) -> Result<(), AppError> {
    let RefundArgs {
        total,
        hours,
        starts_at,
        now,
        tiers,
    } = args;

    let mut engine = engine_from_env()?;
    if let Some(raw) = tiers {
        let mut config = engine.config().clone();
        config.refund_tiers = parse_refund_tiers(&raw)?;
        engine = RentalPolicyEngine::new(config);
    }

    let context = match (hours, starts_at) {
        (Some(hours), _) => CancellationContext::new(total, hours),
        (None, Some(starts_at)) => {
            CancellationContext::from_schedule(total, starts_at, now.unwrap_or_else(Utc::now))?
        }
        (None, None) => {
            return Err(PolicyError::InvalidInput {
                field: "hours_until_start",
                reason: "pass --hours or --starts-at".to_string(),
            }
            .into())
        }
    };

    let refund = engine.refund(&context)?;
    println!("Cancellation of a {} booking", total);
    render_refund(&context, &refund);
    Ok(())
}

pub(crate) fn run_rental_total(args: RentalTotalArgs) -> Result<(), AppError> {
    let engine = engine_from_env()?;
    let options = standard_duration_options(args.daily, args.weekly, args.monthly);
    let total = engine.rental_total(&options, args.select.map(RentalDuration::key))?;

    match args.select {
        Some(duration) => println!("{} rental total: {}", duration.key(), total),
        None => println!("No rental period selected: total {}", total),
    }
    Ok(())
}

pub(crate) fn run_premium(args: PremiumArgs) -> Result<(), AppError> {
    let engine = engine_from_env()?;
    let quote = engine
        .insurance_quote(args.value, args.days, &args.plan, args.add_ons.as_slice())?
        .rounded();
    let plan = engine.config().insurance.plan(&args.plan)?;

    println!(
        "{} for {} over {} day(s)",
        plan.name, args.value, args.days
    );
    println!("- Base premium: {}", quote.base_premium);
    println!("- Add-on premium: {}", quote.add_on_premium);
    println!("- Total premium: {}", quote.total_premium);
    println!("- Deductible: {}", plan.deductible);
    if !plan.covers(args.value) {
        println!(
            "  Warning: equipment value exceeds the plan's {} coverage limit",
            plan.max_coverage
        );
    }
    Ok(())
}

pub(crate) fn run_catalog_search(args: CatalogSearchArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.csv.as_deref())?;
    let engine = engine_from_env()?;

    let defaults = PriceRange::default();
    let criteria = SearchCriteria {
        text: args.text,
        categories: args.category.into_iter().collect::<BTreeSet<_>>(),
        price_range: PriceRange::new(
            args.min_price.unwrap_or(defaults.min),
            args.max_price.unwrap_or(defaults.max),
        ),
        min_rating: args.min_rating,
        location: args.location,
        available_only: args.available_only,
    };

    let results = engine.search(&catalog, &criteria, args.sort);
    render_listings(&results);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.csv.as_deref())?;
    let engine = engine_from_env()?;

    println!("Equipment rental checkout demo");

    let criteria = SearchCriteria {
        text: Some("excavator".to_string()),
        available_only: true,
        ..SearchCriteria::default()
    };
    let results = engine.search(&catalog, &criteria, Some(SortKey::RatingDesc));
    println!("\nSearch: available excavators, best rated first");
    render_listings(&results);

    let Some(listing) = results.first() else {
        println!("\nNo listing to book; demo stops here");
        return Ok(());
    };

    let options = demo_duration_options(listing);
    println!("\nRental periods for {}", listing.name);
    for option in &options {
        println!("  - {}: {}", option.key, option.rate_per_unit);
    }
    let total = engine.rental_total(&options, Some(RentalDuration::Weekly.key()))?;
    println!("Selected weekly: total {}", total);

    let equipment_value = Money::whole(180_000);
    let quote = engine
        .insurance_quote(equipment_value, 7, "standard", &["theft", "transit"])?
        .rounded();
    println!(
        "\nInsurance (standard plan + theft + transit, {} value, 7 days)",
        equipment_value
    );
    println!(
        "  base {} | add-ons {} | total {}",
        quote.base_premium, quote.add_on_premium, quote.total_premium
    );

    println!("\nCancellation outcomes");
    let booked_at = Utc::now();
    for lead_hours in [96, 60, 30, 6] {
        let starts_at = booked_at + Duration::hours(lead_hours);
        let context = CancellationContext::from_schedule(total, starts_at, booked_at)?;
        let refund = engine.refund(&context)?;
        render_refund(&context, &refund);
    }

    Ok(())
}

fn demo_duration_options(listing: &EquipmentListing) -> Vec<DurationOption> {
    // Weekly bills six days, monthly bills twenty-two.
    let daily = listing.price_per_day;
    standard_duration_options(daily, daily * 6, daily * 22)
}

fn render_refund(context: &CancellationContext, refund: &RefundResult) {
    println!(
        "  - {:.1}h before start ({}): refund {}% = {} | fee {}",
        context.hours_until_start,
        refund.policy_label,
        refund.refund_percentage,
        refund.refund_amount,
        refund.cancellation_fee
    );
}

fn render_listings(listings: &[EquipmentListing]) {
    if listings.is_empty() {
        println!("  No listings match");
        return;
    }

    println!("  {} listing(s)", listings.len());
    for listing in listings {
        println!(
            "  - [{}] {} ({}) | {} | {}/day | {:.1} stars | {}",
            listing.id,
            listing.name,
            listing.category,
            listing.location,
            listing.price_per_day,
            listing.rating,
            listing.availability.label()
        );
    }
}
