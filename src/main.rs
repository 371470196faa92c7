//! pv-sizer entry point: CLI wiring, project loading and report output.

use std::path::Path;
use std::process;

use pv_sizer::config::EngineConfig;
use pv_sizer::dimension::Engine;
use pv_sizer::io::export::export_cash_flow_csv;
use pv_sizer::project::ProjectInput;
use pv_sizer::tables::TariffTable;
use tracing_subscriber::EnvFilter;

/// Parsed CLI arguments.
struct CliArgs {
    project_path: Option<String>,
    preset: Option<String>,
    config_path: Option<String>,
    region: Option<String>,
    locality: Option<String>,
    cash_flow_out: Option<String>,
    json: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("pv-sizer: solar PV and battery sizing with financial projection");
    eprintln!();
    eprintln!("Usage: pv-sizer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --project <path>         Load project from TOML file");
    eprintln!(
        "  --preset <name>          Use a built-in project ({})",
        ProjectInput::PRESETS.join(", ")
    );
    eprintln!("  --config <path>          Load engine configuration from TOML file");
    eprintln!("  --region <code>          Override project region (re-resolves tariff)");
    eprintln!("  --locality <name>        Override project locality (re-resolves tariff)");
    eprintln!("  --cash-flow-out <path>   Export yearly cash flow to CSV");
    eprintln!("  --json                   Print the result as JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the report");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --project or --preset is given, the grid_tied_home preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: warn).");
}

/// Returns the value following flag `args[*i]`, exiting if it is missing.
fn flag_value(args: &[String], i: &mut usize, what: &str) -> String {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        project_path: None,
        preset: None,
        config_path: None,
        region: None,
        locality: None,
        cash_flow_out: None,
        json: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--project" => cli.project_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--preset" => cli.preset = Some(flag_value(&args, &mut i, "a name argument")),
            "--config" => cli.config_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--region" => cli.region = Some(flag_value(&args, &mut i, "a region code")),
            "--locality" => cli.locality = Some(flag_value(&args, &mut i, "a locality name")),
            "--cash-flow-out" => {
                cli.cash_flow_out = Some(flag_value(&args, &mut i, "a path argument"));
            }
            "--json" => cli.json = true,
            #[cfg(feature = "api")]
            "--serve" => cli.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                let value = flag_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = value.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{value}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.project_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --project and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_project(cli: &CliArgs) -> ProjectInput {
    let loaded = if let Some(ref path) = cli.project_path {
        ProjectInput::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        ProjectInput::from_preset(name)
    } else {
        Ok(ProjectInput::grid_tied_home())
    };
    let mut project = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(ref region) = cli.region {
        project.region = region.clone();
        project.energy_price_per_kwh = None;
    }
    if let Some(ref locality) = cli.locality {
        project.locality = Some(locality.clone());
        project.energy_price_per_kwh = None;
    }

    project
}

fn main() {
    let cli = parse_args();
    init_tracing();

    let config = match cli.config_path {
        Some(ref path) => EngineConfig::from_toml_file(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        }),
        None => EngineConfig::default(),
    };

    let project = load_project(&cli);

    let mut errors = config.validate();
    errors.extend(project.validate());
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let tariffs = TariffTable::default();
    let project = project.with_resolved_price(&tariffs).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let engine = Engine::new(config);
    let result = engine.compute(&project);

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize result: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{result}");
    }

    if let Some(ref path) = cli.cash_flow_out {
        if let Err(e) = export_cash_flow_csv(&result.economics.years, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Cash flow written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(pv_sizer::api::AppState { engine, tariffs });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(pv_sizer::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
