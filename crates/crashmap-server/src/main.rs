// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! crashmap development server binary.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crashmap_server::{build_service, create_router, AppState};
use crashmap_server_config::{LogFormat, LoggingConfig, ServerConfig};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// crashmap - resolve bundled stack traces to original sources.
#[derive(Parser, Debug)]
#[command(
	name = "crashmap-server",
	about = "Stack trace symbolication server",
	version
)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/crashmap/server.toml)
	#[arg(long, env = "CRASHMAP_CONFIG", global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Symbolicate a stack trace from a file or stdin and print the result
	Symbolicate {
		/// File containing the stack trace; reads stdin when omitted
		#[arg(long)]
		input: Option<PathBuf>,
		/// Source lines shown around each resolved line
		#[arg(long, default_value_t = 3)]
		context: usize,
	},
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	let command = args.command.unwrap_or(Command::Serve);
	if let Command::Version = command {
		println!(
			"{} version: {}",
			env!("CARGO_PKG_NAME"),
			env!("CARGO_PKG_VERSION")
		);
		return Ok(());
	}

	let config = match &args.config {
		Some(path) => crashmap_server_config::load_config_with_file(path)?,
		None => crashmap_server_config::load_config()?,
	};

	init_tracing(&config.logging);

	match command {
		Command::Symbolicate { input, context } => symbolicate(&config, input, context).await,
		_ => serve(config).await,
	}
}

fn init_tracing(logging: &LoggingConfig) {
	let json = logging.format == LogFormat::Json;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| logging.level.clone().into()),
		)
		.with(json.then(|| {
			tracing_subscriber::fmt::layer()
				.json()
				.with_writer(std::io::stderr)
		}))
		.with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
		.init();
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		environment = %config.symbolicate.environment,
		"starting crashmap-server"
	);

	if !config.symbolicate.dev_mode() {
		tracing::warn!("not in development mode, symbolication routes will answer 404");
	}

	let addr = config.socket_addr();
	let state = AppState::from_config(config.symbolicate)?;
	let app = create_router(state).layer(TraceLayer::new_for_http());

	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}

async fn symbolicate(
	config: &ServerConfig,
	input: Option<PathBuf>,
	context: usize,
) -> Result<(), Box<dyn std::error::Error>> {
	let trace = match input {
		Some(path) => tokio::fs::read_to_string(&path).await?,
		None => {
			let mut text = String::new();
			std::io::stdin().read_to_string(&mut text)?;
			text
		}
	};

	let service = build_service(&config.symbolicate)?;
	let results = service.symbolicate_trace(&trace).await;

	let lines: Vec<&str> = trace.lines().collect();
	print!("{}", crashmap_server::report::render(&lines, &results, context));
	Ok(())
}
