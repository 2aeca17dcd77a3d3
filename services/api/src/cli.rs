use crate::demo::{
    run_catalog_search, run_demo, run_premium, run_refund, run_rental_total, CatalogSearchArgs,
    DemoArgs, PremiumArgs, RefundArgs, RentalTotalArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use equiprent::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Equipment Rental Policy Service",
    about = "Serve and exercise the equipment rental pricing, refund, and insurance rules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute the refund for cancelling a booking
    Refund(RefundArgs),
    /// Compute the booking total for a selected rental period
    RentalTotal(RentalTotalArgs),
    /// Quote an insurance premium from the plan catalog
    Premium(PremiumArgs),
    /// Browse the equipment catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Walk through search, checkout, insurance, and cancellation for a sample booking
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Filter and sort listings
    Search(CatalogSearchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Refund(args) => run_refund(args),
        Command::RentalTotal(args) => run_rental_total(args),
        Command::Premium(args) => run_premium(args),
        Command::Catalog {
            command: CatalogCommand::Search(args),
        } => run_catalog_search(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["equiprent-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn refund_requires_hours_or_start_time() {
        assert!(Cli::try_parse_from(["equiprent-api", "refund", "--total", "2500"]).is_err());

        let cli = Cli::try_parse_from([
            "equiprent-api",
            "refund",
            "--total",
            "2500",
            "--hours",
            "48",
        ])
        .expect("hours accepted");
        match cli.command {
            Some(Command::Refund(args)) => assert_eq!(args.hours, Some(48.0)),
            other => panic!("expected refund command, got {other:?}"),
        }
    }

    #[test]
    fn catalog_search_collects_repeated_categories() {
        let cli = Cli::try_parse_from([
            "equiprent-api",
            "catalog",
            "search",
            "--category",
            "Crane",
            "--category",
            "Excavator",
            "--max-price",
            "3000",
            "--sort",
            "price_desc",
        ])
        .expect("search args parse");

        match cli.command {
            Some(Command::Catalog {
                command: CatalogCommand::Search(args),
            }) => {
                assert_eq!(args.category, vec!["Crane", "Excavator"]);
                assert!(args.max_price.is_some());
            }
            other => panic!("expected catalog search, got {other:?}"),
        }
    }
}
