use anyhow::Result;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use logsift::cli::{Cli, Commands, ConfigActions, OutputFormat};
use logsift::config::Config;
use logsift::engine::{spawn_scan, ScanMessage, ScanOutcome};
use logsift::export::{to_csv, ScanReport};
use logsift::store::{ResultFilter, ResultStore};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let result = match Config::load() {
        Ok(config) => run(cli, config),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Scan {
            dir,
            format,
            out,
            filter,
            include_valid,
            quiet,
        } => run_scan(&dir, &config, format, out.as_deref(), filter, include_valid, quiet),
        Commands::Config { action } => run_config(action, config),
    }
}

fn run_scan(
    dir: &str,
    config: &Config,
    format: OutputFormat,
    out: Option<&str>,
    filter: ResultFilter,
    include_valid: bool,
    quiet: bool,
) -> Result<()> {
    let mut rule = config.rule.clone();
    if include_valid {
        rule.include_valid = true;
    }

    let start = Instant::now();
    let handle = spawn_scan(PathBuf::from(dir), rule);

    let outcome = drain_scan(&handle.receiver, quiet)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    let store = ResultStore::new();
    store.replace(outcome.results);
    let stats = store.statistics();
    let rows = store.filter(filter);

    match format {
        OutputFormat::Json => {
            let report = ScanReport::new(rows, stats, duration_ms);
            write_output(out, &serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Csv => {
            write_output(out, &to_csv(&rows))?;
        }
        OutputFormat::Human => {
            if rows.is_empty() {
                println!("No matching files.");
            } else {
                println!(
                    "{:<4} {:<32} {:<20} {:<8} {}",
                    "#", "File Name", "Serial Number", "Status", "Check Time"
                );
                for (idx, row) in rows.iter().enumerate() {
                    println!(
                        "{:<4} {:<32} {:<20} {:<8} {}",
                        idx + 1,
                        row.file_name,
                        row.serial_number,
                        row.status(),
                        row.checked_at.format("%Y-%m-%d %H:%M:%S"),
                    );
                }
            }

            println!();
            println!(
                "Total: {} matched, {} valid, {} invalid (in {}ms)",
                stats.total, stats.valid, stats.invalid, duration_ms
            );
            if outcome.cancelled {
                println!("Scan was cancelled; results are partial.");
            }
        }
    }

    Ok(())
}

fn drain_scan(
    receiver: &std::sync::mpsc::Receiver<ScanMessage>,
    quiet: bool,
) -> Result<ScanOutcome> {
    let mut progressed = false;

    for message in receiver.iter() {
        match message {
            ScanMessage::Progress(p) => {
                if !quiet {
                    eprint!(
                        "\rScanning {}/{} ({:.1}%)",
                        p.processed, p.total, p.percent
                    );
                    io::stderr().flush().ok();
                    progressed = true;
                }
            }
            ScanMessage::Notice(notice) => {
                if progressed {
                    eprintln!();
                    progressed = false;
                }
                eprintln!("warning: skipped {}: {}", notice.file_name, notice.message);
            }
            ScanMessage::Complete(outcome) => {
                if progressed {
                    eprintln!();
                }
                return Ok(outcome);
            }
            ScanMessage::Failed(e) => {
                if progressed {
                    eprintln!();
                }
                return Err(e.into());
            }
        }
    }

    anyhow::bail!("scan worker ended without a completion message")
}

fn write_output(out: Option<&str>, content: &str) -> Result<()> {
    if let Some(path) = out {
        fs::write(path, content)?;
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn run_config(action: ConfigActions, mut config: Config) -> Result<()> {
    match action {
        ConfigActions::Show => {
            println!("Current rule:");
            println!("  program_field:  {}", config.rule.program_field);
            println!("  program_prefix: {}", config.rule.program_prefix);
            println!("  mfg_field:      {}", config.rule.mfg_field);
            println!("  invalid_marker: {}", config.rule.invalid_marker);
            println!("  serial_field:   {}", config.rule.serial_field);
            println!("  include_valid:  {}", config.rule.include_valid);
        }
        ConfigActions::Set { key, value } => {
            config.set_rule_key(&key, &value)?;
            config.save()?;
            println!("Set {} to {}", key, value);
        }
    }

    Ok(())
}
