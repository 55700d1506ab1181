use crate::predict::{run_inspect, run_predict, InspectArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use placement_advisor::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Placement Advisor",
    about = "Serve and run placement-readiness predictions from the command line",
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
    /// Score one applicant and print the recommendation
    Predict(PredictArgs),
    /// Work with classifier artifacts
    Model {
        #[command(subcommand)]
        command: ModelCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ModelCommand {
    /// Verify an artifact and probe it at the edges of the feature domain
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured classifier artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Model {
            command: ModelCommand::Inspect(args),
        } => run_inspect(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["placement-advisor-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn predict_accepts_raw_field_values() {
        let cli = Cli::try_parse_from([
            "placement-advisor-api",
            "predict",
            "--iq",
            "130",
            "--cgpa",
            "8.5",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.iq.as_deref(), Some("130"));
                assert_eq!(args.cgpa.as_deref(), Some("8.5"));
                assert!(args.tenth_marks.is_none());
                assert!(args.json);
            }
            other => panic!("expected predict command, got {other:?}"),
        }
    }

    #[test]
    fn model_inspect_takes_a_path() {
        let cli = Cli::try_parse_from([
            "placement-advisor-api",
            "model",
            "inspect",
            "--model",
            "artifacts/tree.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Model {
                command: ModelCommand::Inspect(args),
            }) => assert_eq!(args.model, Some(PathBuf::from("artifacts/tree.json"))),
            other => panic!("expected model inspect, got {other:?}"),
        }
    }
}
