use crate::report::{run_match, run_score, MatchArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use critique_grader::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Critique Grader",
    about = "Match student annotations to a confirmed rubric and score them",
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
    /// Score one student's annotations from a JSON snapshot
    Score(ScoreArgs),
    /// Print the inferred annotation-to-rubric matches for a JSON snapshot
    Match(MatchArgs),
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
        Command::Score(args) => run_score(args),
        Command::Match(args) => run_match(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["critique-grader"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "critique-grader",
            "score",
            "--input",
            "snapshot.json",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.input.to_string_lossy(), "snapshot.json");
                assert!(args.json);
                assert!(args.scoring_config.is_none());
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }
}
