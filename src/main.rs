use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eframe::egui;
use log::info;

use choosee::api::{HttpGateway, SessionGateway};
use choosee::config::AppConfig;
use choosee::gui::state::AppState;
use choosee::gui::ChooseeApp;
use choosee::models::session::{NewSession, RankBy, SessionEdits};
use choosee::models::user::LoggedInUser;

#[derive(Debug, Parser)]
#[command(name = "choosee", author, version, about = "Pick a restaurant together")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open a session to vote
    Vote {
        session_id: String,
        /// Skip the login screen with this phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Create a new session and print its id
    Create {
        #[arg(long)]
        address: String,
        /// Search radius in miles
        #[arg(long, default_value_t = 5.0)]
        radius: f64,
        #[arg(long = "type", default_value = "restaurant")]
        place_type: String,
        #[arg(long, default_value_t = 2)]
        voters: u32,
        #[arg(long, value_enum, default_value_t = RankByArg::Prominence)]
        rank_by: RankByArg,
    },
    /// Show a session and its status
    Status { session_id: String },
    /// Change a running session (owner only)
    Update {
        session_id: String,
        #[arg(long)]
        address: Option<String>,
        /// Search radius in miles
        #[arg(long)]
        radius: Option<f64>,
        #[arg(long)]
        voter_count: Option<u32>,
    },
    /// Text the session link to voters
    Invite {
        session_id: String,
        voter_id: Option<String>,
    },
    /// Look up the address nearest to a coordinate
    Geocode {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },
    /// List the place types sessions can search for
    PlaceTypes,
}

/// Order in which candidates are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RankByArg {
    Distance,
    Prominence,
}

impl From<RankByArg> for RankBy {
    fn from(arg: RankByArg) -> Self {
        match arg {
            RankByArg::Distance => RankBy::Distance,
            RankByArg::Prominence => RankBy::Prominence,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    match cli.command {
        None => run_gui(config, runtime.handle().clone(), None),
        Some(Command::Vote { session_id, phone }) => {
            let user = phone
                .as_deref()
                .map(LoggedInUser::from_phone)
                .transpose()
                .context("Invalid --phone")?;
            run_gui(config, runtime.handle().clone(), Some((session_id, user)))
        }
        Some(command) => runtime.block_on(run_command(&config, command)),
    }
}

fn run_gui(
    config: AppConfig,
    runtime: tokio::runtime::Handle,
    session: Option<(String, Option<LoggedInUser>)>,
) -> Result<()> {
    let mut state = AppState::new(config, runtime);
    if let Some((session_id, user)) = session {
        state.open_session(session_id, user);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Choosee")
            .with_inner_size(egui::vec2(480.0, 640.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Choosee",
        options,
        Box::new(move |cc| Ok(Box::new(ChooseeApp::new(cc, state)))),
    )
    .map_err(|e| anyhow!("GUI error: {}", e))
}

async fn run_command(config: &AppConfig, command: Command) -> Result<()> {
    let gateway = HttpGateway::from_config(config);

    match command {
        Command::Create {
            address,
            radius,
            place_type,
            voters,
            rank_by,
        } => {
            let new_session =
                NewSession::from_form(&address, radius, &place_type, rank_by.into(), voters)?;
            let session_id = gateway.create_session(&new_session).await?;
            println!("{}", session_id);
        }
        Command::Status { session_id } => {
            let session = gateway.session(&session_id).await?;
            let status = gateway.status(&session_id).await?;
            println!("Address:  {}", session.address);
            println!("Voters:   {}", session.voter_count);
            println!("Status:   {:?} (page {})", status.current, status.page_id);
            if let Some(winner) = status.winner {
                println!("Winner:   {}", winner.name);
            }
        }
        Command::Update {
            session_id,
            address,
            radius,
            voter_count,
        } => {
            let operations = SessionEdits {
                address,
                radius_miles: radius,
                voter_count,
            }
            .into_operations()?;
            let session = gateway.update_session(&session_id, &operations).await?;
            info!("Session {} updated", session_id);
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        Command::Invite {
            session_id,
            voter_id,
        } => {
            gateway.send_text(&session_id, voter_id.as_deref()).await?;
            println!("Invite sent");
        }
        Command::Geocode {
            latitude,
            longitude,
        } => {
            let address = gateway.reverse_geocode(latitude, longitude).await?;
            println!("{}", address);
        }
        Command::PlaceTypes => {
            for place_type in gateway.place_types().await? {
                println!("{:<24} {}", place_type.value, place_type.display);
            }
        }
        Command::Vote { .. } => return Err(anyhow!("vote runs in the GUI")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_longitude_parses() {
        let cli = Cli::try_parse_from(["choosee", "geocode", "38.95", "-92.33"]).unwrap();
        match cli.command {
            Some(Command::Geocode {
                latitude,
                longitude,
            }) => {
                assert_eq!(latitude, 38.95);
                assert_eq!(longitude, -92.33);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn create_accepts_rank_by() {
        let cli = Cli::try_parse_from([
            "choosee", "create", "--address", "Columbia, MO", "--rank-by", "distance",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Create { rank_by, voters, .. }) => {
                assert_eq!(RankBy::from(rank_by), RankBy::Distance);
                assert_eq!(voters, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["choosee", "create", "--address", "Columbia, MO"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Create {
                rank_by: RankByArg::Prominence,
                ..
            })
        ));
    }

    #[test]
    fn no_subcommand_opens_home() {
        let cli = Cli::try_parse_from(["choosee"]).unwrap();
        assert!(cli.command.is_none());
    }
}
