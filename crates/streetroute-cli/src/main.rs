mod commands;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use streetroute_cli::output::OutputFormat;
use streetroute_lib::{RegionStrategy, TravelMode, WeightKind, DEFAULT_ADDRESS, DEFAULT_MARGIN};

use commands::route::RouteCommandArgs;
use commands::Sources;

#[derive(Parser, Debug)]
#[command(author, version, about = "Street routing between addresses over OpenStreetMap data")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Resolve addresses from this gazetteer file instead of Nominatim.
    #[arg(long, global = true)]
    gazetteer: Option<PathBuf>,

    /// Read street data from this Overpass JSON export instead of the API.
    #[arg(long, global = true)]
    network_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geocode an address and print its coordinate.
    Locate {
        /// Address to look up.
        #[arg(default_value = DEFAULT_ADDRESS)]
        address: String,
    },
    /// Show the bounding box that would be fetched for two addresses.
    Region {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Padding around the endpoints, in degrees.
        #[arg(long, default_value_t = DEFAULT_MARGIN, allow_negative_numbers = true)]
        margin: f64,
    },
    /// Compute the shortest street route between two addresses.
    Route(RouteArgs),
    /// Build a route interactively, one field at a time.
    Session,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Origin address.
    #[arg(long = "from")]
    from: String,
    /// Destination address.
    #[arg(long = "to")]
    to: String,
    /// Travel mode (walk, drive or bike).
    #[arg(long, default_value = "drive")]
    mode: TravelMode,
    /// Quantity to minimise (length or time).
    #[arg(long, default_value = "length")]
    weight: WeightKind,
    /// Fetch the endpoints' envelope padded by this many degrees.
    #[arg(long, allow_negative_numbers = true, conflicts_with_all = ["around", "place"])]
    margin: Option<f64>,
    /// Fetch a square of this many metres around the origin.
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "1000",
        conflicts_with = "place"
    )]
    around: Option<f64>,
    /// Fetch the extent of a named place, e.g. a city.
    #[arg(long)]
    place: Option<String>,
}

impl RouteArgs {
    fn region(&self) -> RegionStrategy {
        if let Some(distance_m) = self.around {
            return RegionStrategy::AroundOrigin { distance_m };
        }
        if let Some(name) = &self.place {
            return RegionStrategy::Place { name: name.clone() };
        }
        RegionStrategy::Envelope {
            margin: self.margin.unwrap_or(DEFAULT_MARGIN),
        }
    }

    fn into_command_args(self) -> RouteCommandArgs {
        let region = self.region();
        RouteCommandArgs {
            from: self.from,
            to: self.to,
            mode: self.mode,
            weight: self.weight,
            region,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let sources = Sources {
        gazetteer: cli.gazetteer,
        network_file: cli.network_file,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Locate { address } => {
            commands::locate::handle_locate(&mut out, &sources, &address, cli.format)?
        }
        Command::Region { from, to, margin } => {
            commands::region::handle_region(&mut out, &sources, &from, &to, margin, cli.format)?
        }
        Command::Route(args) => {
            let args = args.into_command_args();
            commands::route::handle_route(&mut out, &sources, &args, cli.format)?
        }
        Command::Session => {
            let stdin = io::stdin();
            commands::session::run_session(stdin.lock(), &mut out, &sources, cli.format)?
        }
    }
    out.flush()?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
