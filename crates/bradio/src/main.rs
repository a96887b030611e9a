use crate::prelude::*;
use clap::{CommandFactory, Parser};

mod directory;
mod mcp;
mod prelude;
mod search;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about = "Search internet radio stations via radio-browser",
    long_about = "Search internet radio stations via radio-browser.\n\
                  Sorts results by popularity (click count for --name and --popular, \
                  trend for --tag).",
    after_help = "Examples:\n  \
                  bradio --name 'Milano Lounge'\n  \
                  bradio --tag 'ambient'\n  \
                  bradio --tag 'chillout' --limit 30\n  \
                  bradio mcp stdio\n\n\
                  Output format: (clicks) name; tags; codec[bitrate]; url",
    args_conflicts_with_subcommands = true
)]
pub struct App {
    #[command(subcommand)]
    pub command: Option<SubCommands>,

    #[command(flatten)]
    pub search: search::SearchOptions,

    #[clap(flatten)]
    pub global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Radio Browser API server
    #[clap(
        long,
        env = "RADIO_BROWSER_API_BASE",
        global = true,
        default_value = directory::DEFAULT_API_BASE
    )]
    pub api_base: String,

    /// Whether to display additional information.
    #[clap(long, env = "BRADIO_VERBOSE", global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();
    let directory = directory::RadioBrowserClient::new(app.global.api_base.clone())?;

    let result = match app.command {
        Some(SubCommands::MCP(sub_app)) => crate::mcp::run(sub_app, app.global, directory).await,
        None => {
            let mut stdout = anstream::stdout();
            match search::run(app.search, &app.global, &directory, &mut stdout).await {
                Ok(()) => Ok(()),
                Err(error) => {
                    let usage = App::command().render_help().to_string();
                    search::report_failure(&error, &usage, &mut anstream::stderr())?;
                    std::process::exit(1);
                }
            }
        }
    };

    result.map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
