// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! gurl CLI
//!
//! Prints the status line, optionally the response headers, then the raw
//! body to stdout. Exits with 1 on any error.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gurl::{Cli, Response};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let directive = if cli.verbose { "gurl=debug" } else { "gurl=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gurl: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let response = cli
        .run()
        .await
        .with_context(|| format!("{} {}", cli.method(), cli.url))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_response(&mut out, &response, cli.include)?;
    out.flush()?;
    Ok(())
}

fn print_response(out: &mut impl Write, response: &Response, include: bool) -> io::Result<()> {
    writeln!(out, "{}", response.status_line())?;

    if include {
        let mut headers: Vec<(&str, &str)> = response.headers.iter().collect();
        headers.sort_unstable();
        for (name, value) in headers {
            writeln!(out, "{}: {}", name, value)?;
        }
        writeln!(out)?;
    }

    out.write_all(&response.body)
}
