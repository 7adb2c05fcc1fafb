use clap::{Parser, Subcommand};

pub mod server;
pub mod service;

#[derive(Parser, Debug)]
#[command(
    name = "scorer",
    about = "Asynchronous scoring service for synthetic test functions",
    long_about = "Accepts scoring requests over HTTP, evaluates them in the background and \
    keeps one folder of artifacts per call until the result is retrieved.",
    after_help = "Examples:\n  \
    scorer run --port 8000 --data-folder ./api_data\n  \
    SCORER_WRITE_POD_SPEC=true scorer run"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scoring service
    Run {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct RunCmd {
    #[clap(flatten)]
    pub server_args: server::ServerCliArgs,

    #[clap(flatten)]
    pub service_args: service::ServiceCliArgs,
}
