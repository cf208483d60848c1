// Module exports for CLI subcommands.
//
// Each module handles one subcommand; main.rs parses arguments and dispatches
// here. Shared pieces (data sources, friendly error messages) live below.

pub mod locate;
pub mod region;
pub mod route;
pub mod session;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use streetroute_lib::geocode::GAZETTEER_ENV;
use streetroute_lib::{
    geocoder_from_env, network_provider_from_env, Error as LibError, FileNetworkProvider,
    Gazetteer, Geocoder, NetworkProvider, Place, RouteRequest,
};

/// File name looked up in the user's config directory when no gazetteer is
/// given explicitly.
const DEFAULT_GAZETTEER_FILE: &str = "gazetteer.json";

/// Maximum number of "did you mean" suggestions in error messages.
const MAX_SUGGESTIONS: usize = 3;

/// Where addresses and street networks come from, as chosen on the command
/// line.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub gazetteer: Option<PathBuf>,
    pub network_file: Option<PathBuf>,
}

impl Sources {
    /// Open the geocoder: `--gazetteer`, then `STREETROUTE_GAZETTEER`, then a
    /// `gazetteer.json` in the config directory, then Nominatim.
    pub fn resolver(&self) -> Result<Resolver> {
        let explicit = self
            .gazetteer
            .clone()
            .or_else(|| env::var_os(GAZETTEER_ENV).map(PathBuf::from));
        if let Some(path) = explicit {
            let gazetteer = Gazetteer::from_path(&path)
                .with_context(|| format!("failed to load gazetteer from {}", path.display()))?;
            return Ok(Resolver::Offline(gazetteer));
        }

        if let Some(path) = default_gazetteer_path().filter(|path| path.exists()) {
            debug!(path = %path.display(), "using gazetteer from config directory");
            let gazetteer = Gazetteer::from_path(&path)
                .with_context(|| format!("failed to load gazetteer from {}", path.display()))?;
            return Ok(Resolver::Offline(gazetteer));
        }

        let online = geocoder_from_env().context("failed to initialise the geocoder")?;
        Ok(Resolver::Online(online))
    }

    /// Open the street-network provider: `--network-file`, then the
    /// environment, then Overpass.
    pub fn provider(&self) -> Result<Box<dyn NetworkProvider>> {
        if let Some(path) = &self.network_file {
            return Ok(Box::new(FileNetworkProvider::new(path.clone())));
        }
        network_provider_from_env().context("failed to initialise the street-network provider")
    }
}

/// `$XDG_CONFIG_HOME/streetroute/gazetteer.json` or the platform equivalent.
pub fn default_gazetteer_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "streetroute", "streetroute")
        .map(|dirs| dirs.config_dir().join(DEFAULT_GAZETTEER_FILE))
}

/// The geocoder in use. Offline gazetteers can also suggest near misses.
pub enum Resolver {
    Offline(Gazetteer),
    Online(Box<dyn Geocoder>),
}

impl Resolver {
    pub fn suggestions(&self, address: &str) -> Vec<String> {
        match self {
            Resolver::Offline(gazetteer) => gazetteer.suggestions(address, MAX_SUGGESTIONS),
            Resolver::Online(_) => Vec::new(),
        }
    }
}

impl Geocoder for Resolver {
    fn lookup(&self, address: &str) -> streetroute_lib::Result<Place> {
        match self {
            Resolver::Offline(gazetteer) => gazetteer.lookup(address),
            Resolver::Online(geocoder) => geocoder.lookup(address),
        }
    }
}

/// Turn library failures into messages with next steps. Anything without a
/// tailored message passes through unchanged.
pub fn explain_failure(
    err: LibError,
    resolver: &Resolver,
    request: Option<&RouteRequest>,
) -> anyhow::Error {
    match err {
        LibError::Resolution { address } => {
            anyhow::anyhow!(format_unknown_address_message(
                &address,
                &resolver.suggestions(&address)
            ))
        }
        LibError::NetworkFetch { reason } => anyhow::anyhow!(
            "No street data for this area ({reason}). Try a larger --margin, a different --mode, or check {} / {}.",
            streetroute_lib::network::OVERPASS_URL_ENV,
            streetroute_lib::network::NETWORK_SOURCE_ENV
        ),
        LibError::NoPath { .. } => match request {
            Some(request) => anyhow::anyhow!(
                "No route found between '{}' and '{}' by {}. Try a different --mode or a larger --margin.",
                request.origin,
                request.destination,
                request.mode
            ),
            None => anyhow::anyhow!("No route found. Try a different --mode or a larger --margin."),
        },
        LibError::MissingAddress { field } => {
            anyhow::anyhow!("The {field} address is empty. Both --from and --to are required.")
        }
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_address_message(address: &str, suggestions: &[String]) -> String {
    let mut message = format!("Could not find address '{}'.", address);
    if suggestions.is_empty() {
        message.push_str(" Check the spelling or add the city and country.");
        return message;
    }
    let formatted = if suggestions.len() == 1 {
        format!("Did you mean '{}'?", suggestions[0])
    } else {
        let joined = suggestions
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Did you mean one of: {}?", joined)
    };
    message.push(' ');
    message.push_str(&formatted);
    message
}
