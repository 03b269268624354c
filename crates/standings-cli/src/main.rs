//! Standings CLI - Main entry point

use clap::Parser;
use standings_cli::commands::report::ReportFilter;
use standings_cli::commands::{query, report, schema, shell};
use standings_cli::{Cli, CliConfig, Commands, StandingsCache};
use standings_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries query output
    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .log_file_prefix("standings-cli")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(cli) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn execute_command(cli: Cli) -> standings_cli::Result<()> {
    let config = CliConfig::from_env()?.with_overrides(cli.db, cli.table, cli.csv)?;

    match cli.command {
        Commands::Query {
            sql,
            format,
            no_header,
        } => query::run(&config, &sql.join(" "), format, no_header),

        Commands::Tables => schema::run_tables(&config),

        Commands::Schema { table } => schema::run_schema(&config, &table),

        Commands::Shell { source } => {
            let mut session = shell::Shell::open(&config, source)?;
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            session.run(stdin.lock(), &mut stdout)
        },

        Commands::Report {
            from,
            to,
            teams,
            source,
            json,
        } => {
            let filter = ReportFilter { from, to, teams };
            report::run(&config, source, &filter, json, &mut StandingsCache::new())
        },
    }
}
