use std::net::{IpAddr, SocketAddr};

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::api::{PlayPayload, ServeError, persona_infos, play, run_http_server};
use crate::core::{CatalogError, Journey, JourneyLibrary, Persona};
use crate::interactive::play_interactive;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPersona {
    WorkingParent,
    MidCareer,
    NewAmerican,
    PreRetiree,
    SmallBusiness,
}

impl From<CliPersona> for Persona {
    fn from(value: CliPersona) -> Self {
        match value {
            CliPersona::WorkingParent => Persona::WorkingParent,
            CliPersona::MidCareer => Persona::MidCareer,
            CliPersona::NewAmerican => Persona::NewAmerican,
            CliPersona::PreRetiree => Persona::PreRetiree,
            CliPersona::SmallBusiness => Persona::SmallBusiness,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fire-journey",
    about = "Stage-by-stage FIRE decision journeys for five financial personas"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print every persona with its meters and stage count
    Personas,
    /// Replay a sequence of choices and print the resulting state
    Play {
        #[arg(long, value_enum)]
        persona: CliPersona,
        #[arg(
            long,
            value_delimiter = ',',
            help = "Option ids to confirm, in stage order, e.g. keep-both-incomes,use-emergency-fund"
        )]
        choices: Vec<String>,
        #[arg(long, help = "Option id at the next stage to preview without confirming")]
        preview: Option<String>,
    },
    /// Play a journey interactively in the terminal
    Tour {
        #[arg(long, value_enum)]
        persona: CliPersona,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Serve(#[from] ServeError),
    #[error("terminal io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve { host, port } => {
            run_http_server(SocketAddr::new(host, port)).await?;
        }
        Command::Personas => {
            let library = JourneyLibrary::load()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&persona_infos(&library))?
            );
        }
        Command::Play {
            persona,
            choices,
            preview,
        } => {
            let library = JourneyLibrary::load()?;
            let payload = PlayPayload {
                persona: Some(persona.into()),
                choices,
                preview,
            };
            let response = play(&library, payload).map_err(CliError::Rejected)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Tour { persona } => {
            let journey = Journey::load(persona.into())?;
            play_interactive(&journey, std::io::stdin().lock(), std::io::stdout().lock())?;
        }
    }
    Ok(())
}
