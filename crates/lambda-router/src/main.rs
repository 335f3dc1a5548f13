//! lambda-router-invoke - Entry point
//!
//! Runs one invocation locally: reads a proxy event, handles it and prints
//! the proxy response as JSON.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info};
use uuid::Uuid;

use lambda_router::app::{load_config, App, AppError};
use lambda_router::config::RouterConfig;
use lambda_router::core::InvocationContext;
use lambda_router::telemetry::init_logging;

/// Command-line arguments.
struct Args {
    /// Path to the event file; stdin when absent.
    event: Option<PathBuf>,
    /// Path to configuration file.
    config: Option<PathBuf>,
    /// Platform request id.
    request_id: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut event = None;
        let mut config = None;
        let mut request_id = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--event" | "-e" => {
                    event = args.next().map(PathBuf::from);
                }
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--request-id" | "-r" => {
                    request_id = args.next();
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("lambda-router-invoke {}", lambda_router::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self {
            event,
            config,
            request_id,
        }
    }
}

const HELP: &str = r#"lambda-router-invoke - Run one function invocation locally

USAGE:
    lambda-router-invoke [OPTIONS] < event.json

OPTIONS:
    -e, --event <PATH>       Proxy event file (default: stdin)
    -c, --config <PATH>      Configuration file (TOML or JSON)
    -r, --request-id <ID>    Platform request id (default: random UUID)
    -h, --help               Print help information
    -v, --version            Print version information

ENVIRONMENT VARIABLES:
    ENVIRONMENT      Deployment environment (default: dev)
    VERSION          Release version (default: 1.0.0)
    BUILD            Build identifier (default: 1)
    ORIGIN           Audit origin (default: LambdaMiddlewareRouter::api)
    TIMEOUT          Function timeout in seconds (default: 25)
    DYNAMO_TABLE     Person table name
    ENABLE_CHAOS     Enable fault injection (true/false)
    INJECT_ERROR     Fail every storage call (true/false)
    INJECT_LATENCY   Delay before every storage call, in milliseconds
    LOG_LEVEL        Log level filter (default: info)
    LOG_FORMAT       json or pretty (default: json)

EXAMPLES:
    # Ping
    echo '{"httpMethod":"GET","path":"/v1/ping"}' | lambda-router-invoke

    # Replay a captured event
    lambda-router-invoke --event events/create-person.json
"#;

fn print_help() {
    println!("{HELP}");
}

fn init(args: &Args) -> Result<RouterConfig, AppError> {
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging.to_log_config(&config.service.origin))?;
    Ok(config)
}

fn read_event(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() {
    // Parse arguments
    let args = Args::parse();

    // Load configuration and initialize logging
    let config = match init(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Startup failed: {e}");
            std::process::exit(1);
        }
    };

    // Read the event
    let event = match read_event(args.event.as_ref()) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(event) => event,
            Err(e) => {
                error!("Event is not valid JSON: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to read event: {}", e);
            std::process::exit(1);
        }
    };

    let timeout = Duration::from_secs(config.service.timeout_secs);
    let request_id = args
        .request_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    info!(request_id = %request_id, "Invoking lambda-router v{}", lambda_router::VERSION);

    let app = App::from_config(config);
    let response = app
        .handle(event, InvocationContext::new(request_id, timeout))
        .await;

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to encode response: {}", e);
            std::process::exit(1);
        }
    }
}
