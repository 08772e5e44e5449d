mod orbit;
mod risk;
mod scene;
mod session;
mod web;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::scene::Catalog;
use crate::web::Config;

#[derive(Parser)]
#[command(name = "debris-watch")]
#[command(about = "Satellite and debris orbit sampling with collision-risk estimates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Print the sample table of one object
    Track {
        object: String,
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Estimate collision risk for an object id
    Risk {
        object: String,
        /// Skip the remote risk service
        #[arg(long)]
        offline: bool,
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()),
        Commands::Track { object, config } => track(&object, config.as_deref()),
        Commands::Risk {
            object,
            offline,
            config,
        } => risk(&object, offline, config.as_deref()),
    }
}

fn load_config(path: Option<&str>) -> Option<Config> {
    match Config::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            None
        }
    }
}

fn runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => Some(rt),
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            None
        }
    }
}

fn serve(path: Option<&str>) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let Some(rt) = runtime() else {
        return ExitCode::FAILURE;
    };

    match rt.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn track(object: &str, path: Option<&str>) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let catalog = match Catalog::populate(&config.scene, Utc::now()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error building scene: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(tracked) = catalog.get(object) else {
        eprintln!("Unknown object: {}", object);
        eprintln!("Known objects: {}", catalog.ids().join(", "));
        return ExitCode::FAILURE;
    };

    println!(
        "{} ({}, {} orbit, period {:.0}s, {} samples)",
        tracked.name,
        tracked.kind,
        tracked.elements.kind(),
        tracked.table.period_s(),
        tracked.table.len()
    );
    for sample in tracked.table.samples() {
        let time = tracked
            .table
            .time_of(sample.offset_s)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());
        println!(
            "  +{:>8.1}s  {}  lon {:>9.4}  lat {:>8.4}  alt {:>10.0} m",
            sample.offset_s,
            time,
            sample.position.longitude_deg,
            sample.position.latitude_deg,
            sample.position.altitude_m
        );
    }
    ExitCode::SUCCESS
}

fn risk(object: &str, offline: bool, path: Option<&str>) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let resolver = match web::build_resolver(&config.risk, offline) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error building risk client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(rt) = runtime() else {
        return ExitCode::FAILURE;
    };

    let assessment = rt.block_on(resolver.estimate_risk(object));
    match serde_json::to_string_pretty(&assessment) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding result: {}", e);
            ExitCode::FAILURE
        }
    }
}
