use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use variants_beacon::app::App;
use variants_beacon::config::ConfigLoader;
use variants_beacon::domain::{AlleleQueryParams, AlleleRequest, AlleleResponse};
use variants_beacon::error::{AlleleRequestError, BeaconError, Reason};
use variants_beacon::ga4gh::Ga4ghHttpClient;
use variants_beacon::output::JsonOutput;

#[derive(Parser)]
#[command(name = "variants-beacon")]
#[command(about = "Beacon answering allele queries against GA4GH variant stores")]
#[command(version, author)]
struct Cli {
    /// Beacon descriptor (defaults to ~/beacon.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the beacon descriptor")]
    Info,
    #[command(about = "Ask whether an allele exists")]
    Query(QueryArgs),
    #[command(about = "Run the sample allele requests listed in the descriptor")]
    Samples,
}

#[derive(Args)]
struct QueryArgs {
    #[arg(long)]
    reference_name: Option<String>,

    /// 0-based start position
    #[arg(long, allow_negative_numbers = true)]
    start: Option<i64>,

    #[arg(long)]
    reference_bases: Option<String>,

    #[arg(long)]
    alternate_bases: Option<String>,

    #[arg(long)]
    assembly_id: Option<String>,

    #[arg(long = "dataset-id")]
    dataset_ids: Vec<String>,

    #[arg(long)]
    include_dataset_responses: bool,
}

impl From<QueryArgs> for AlleleQueryParams {
    fn from(args: QueryArgs) -> Self {
        AlleleQueryParams {
            reference_name: args.reference_name,
            start: args.start,
            reference_bases: args.reference_bases,
            alternate_bases: args.alternate_bases,
            assembly_id: args.assembly_id,
            dataset_ids: Some(args.dataset_ids),
            include_dataset_responses: Some(args.include_dataset_responses),
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{report:?}");
            if let Some(error) = report.downcast_ref::<BeaconError>() {
                return ExitCode::from(map_exit_code(error.reason()));
            }
            ExitCode::from(1)
        }
    }
}

fn map_exit_code(reason: Reason) -> u8 {
    match reason {
        Reason::InvalidRequest | Reason::UnknownDataset => 2,
        Reason::ConnectionError => 3,
        Reason::Error => 1,
    }
}

fn run() -> miette::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let descriptor = ConfigLoader::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            JsonOutput::print_beacon(&descriptor).into_diagnostic()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Query(args) => {
            let app = App::from_descriptor(descriptor)?;
            let result = app.query_allele(args.into());
            Ok(ExitCode::from(report_query(&app, result)?))
        }
        Commands::Samples => {
            let requests = descriptor.sample_allele_requests.clone();
            let app = App::from_descriptor(descriptor)?;
            let mut code = 0;
            for request in requests {
                let result = run_sample(&app, &request);
                let sample_code = report_query(&app, result)?;
                if sample_code != 0 {
                    code = sample_code;
                }
            }
            Ok(ExitCode::from(code))
        }
    }
}

fn run_sample(
    app: &App<Ga4ghHttpClient>,
    request: &AlleleRequest,
) -> Result<AlleleResponse, AlleleRequestError> {
    tracing::info!(
        reference = %request.reference_name,
        start = request.start,
        "running sample request"
    );
    app.evaluate(request)
}

fn report_query(
    app: &App<Ga4ghHttpClient>,
    result: Result<AlleleResponse, AlleleRequestError>,
) -> miette::Result<u8> {
    match result {
        Ok(response) => {
            JsonOutput::print_response(&response).into_diagnostic()?;
            Ok(0)
        }
        Err(error) => {
            let code = map_exit_code(error.reason());
            eprintln!("{:?}", miette::Report::msg(error.to_string()));
            let response = error.into_response(&app.beacon().id);
            JsonOutput::print_response(&response).into_diagnostic()?;
            Ok(code)
        }
    }
}
