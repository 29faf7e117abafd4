// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Letterhead: compose clinical letters and export them onto letterhead.
//
// Entry point. Initialises logging and backend services, then runs one
// command.

mod cli;
mod commands;
mod services;
mod session;

use std::process::ExitCode;

use clap::Parser;
use letterhead_core::human_errors::humanize_error;

use cli::Cli;
use services::app_services::AppServices;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("Letterhead starting");

    let mut svc = match AppServices::init(cli.data_dir.as_deref()) {
        Ok(s) => {
            tracing::info!("backend services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "persistent storage failed, using in-memory fallback");
            AppServices::fallback(cli.data_dir.as_deref())
        }
    };
    cli.apply_overrides(svc.config_mut());

    match commands::run(cli.command, &svc).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            let human = humanize_error(&e);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}
