use crate::directory::StationDirectory;
use crate::prelude::{eprintln, *};
use bradio_core::query::{QueryRequest, StationQuery};
use bradio_core::render::{build_output, format_output_json, format_station_lines};
use bradio_core::station::{votes_defaulted, Station};
use colored::Colorize;
use std::future::Future;
use std::io::Write;

const NO_STATIONS: &str = "No stations found for search criteria.";

#[derive(Debug, Clone, clap::Args)]
pub struct SearchOptions {
    /// Search stations by name
    #[arg(long, value_name = "TEXT")]
    pub name: Option<String>,

    /// Search stations by exact tag
    #[arg(long, value_name = "TEXT")]
    pub tag: Option<String>,

    /// List the most popular stations
    #[arg(long)]
    pub popular: bool,

    /// Limit the number of results (1-1000)
    #[arg(
        short,
        long,
        env = "BRADIO_LIMIT",
        default_value = "12",
        allow_negative_numbers = true
    )]
    pub limit: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchOptions {
    pub fn to_request(&self) -> QueryRequest {
        QueryRequest {
            name: self.name.clone(),
            tag: self.tag.clone(),
            popular: self.popular,
            limit: Some(self.limit),
        }
    }
}

/// Validate the options, fetch the stations and write them to `out`.
///
/// Validation happens before the directory is touched, so an invalid query
/// never produces a request.
pub async fn run<D, W>(
    options: SearchOptions,
    global: &crate::Global,
    directory: &D,
    out: &mut W,
) -> Result<(), Error>
where
    D: StationDirectory,
    W: Write,
{
    run_until(options, global, directory, out, ctrl_c()).await
}

/// Same as [`run`], with the fetch abandoned as soon as `cancel` resolves.
async fn run_until<D, W>(
    options: SearchOptions,
    global: &crate::Global,
    directory: &D,
    out: &mut W,
    cancel: impl Future<Output = ()>,
) -> Result<(), Error>
where
    D: StationDirectory,
    W: Write,
{
    let query = options.to_request().validate()?;

    if global.verbose {
        eprintln!(
            "Searching stations: mode={}, term={:?}, limit={}",
            query.mode().as_str(),
            query.term(),
            query.limit()
        );
    }

    let stations = fetch_cancellable(directory, &query, cancel).await?;
    warn_defaulted_fields(&stations);

    write_results(&query, &stations, options.json, out)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::debug!("unable to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Race the directory request against `cancel`.
async fn fetch_cancellable<D: StationDirectory>(
    directory: &D,
    query: &StationQuery,
    cancel: impl Future<Output = ()>,
) -> Result<Vec<Station>, Error> {
    tokio::select! {
        result = directory.fetch(query) => result,
        () = cancel => Err(Error::external("request cancelled")),
    }
}

fn warn_defaulted_fields(stations: &[Station]) {
    for station in stations.iter().filter(|s| votes_defaulted(&s.votes)) {
        log::debug!(
            "station {:?} has a non-numeric vote count {:?}, using 0",
            station.name,
            station.votes
        );
    }
}

fn write_results<W: Write>(
    query: &StationQuery,
    stations: &[Station],
    json: bool,
    out: &mut W,
) -> Result<(), Error> {
    let io_err = |e: std::io::Error| Error::external(format!("Failed to write output: {e}"));

    if json {
        let document = format_output_json(&build_output(query, stations))?;
        writeln!(out, "{document}").map_err(io_err)?;
        return Ok(());
    }

    if stations.is_empty() {
        writeln!(out, "{}", NO_STATIONS.yellow()).map_err(io_err)?;
        return Ok(());
    }

    write!(out, "{}", format_station_lines(stations)).map_err(io_err)
}

/// Print a failed search to `err`. Invalid input also gets the usage text.
pub fn report_failure<W: Write>(error: &Error, usage: &str, err: &mut W) -> std::io::Result<()> {
    writeln!(err, "{} {}", "Error:".red().bold(), error)?;
    if error.is_invalid_argument() {
        writeln!(err)?;
        write!(err, "{usage}")?;
    }
    Ok(())
}
