//! Candidate advisor: résumé suitability scoring and learning plans

use anyhow::{bail, Context};
use candidate_advisor::batch::{BatchInput, BatchRunner};
use candidate_advisor::cli::{self, Cli, Commands, ConfigAction, ReportArgs};
use candidate_advisor::config::{Config, OutputFormat};
use candidate_advisor::engine::Advisor;
use candidate_advisor::error::{AdvisorError, Result};
use candidate_advisor::input::{self, InputManager};
use candidate_advisor::output::{resolve_report_path, save_report_to_file, Report, ReportContent, ReportGenerator};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    match command {
        Commands::Extract { resume, report } => {
            let advisor = Advisor::from_config(&config)?;
            let (text, source) = read_resume(&resume).await?;
            let extracted = advisor.extract(&text, &source);
            emit(&config, &report, Report::new(ReportContent::Extraction(extracted)).with_source(source))
        }

        Commands::Predict { resume, position, report } => {
            let advisor = Advisor::from_config(&config)?;
            let (text, source) = read_resume(&resume).await?;
            let extracted = advisor.extract(&text, &source);
            let prediction = advisor.predict(&extracted.profile, &position)?;
            let out = Report::new(ReportContent::Prediction(prediction))
                .with_source(source)
                .with_model(advisor.has_model());
            emit(&config, &report, out)
        }

        Commands::Gap { resume, position, report } => {
            let advisor = Advisor::from_config(&config)?;
            let (text, source) = read_resume(&resume).await?;
            let extracted = advisor.extract(&text, &source);
            let gap = advisor.analyze_gap(&extracted.profile, &position)?;
            emit(&config, &report, Report::new(ReportContent::Gap(gap)).with_source(source))
        }

        Commands::Plan { resume, position, report } => {
            let advisor = Advisor::from_config(&config)?;
            let (text, source) = read_resume(&resume).await?;
            let extracted = advisor.extract(&text, &source);
            let gap = advisor.analyze_gap(&extracted.profile, &position)?;
            let plan = advisor.build_plan(&gap);
            emit(&config, &report, Report::new(ReportContent::Plan { gap, plan }).with_source(source))
        }

        Commands::Batch { inputs, position, workers, report } => {
            let mut batch_config = config.batch.clone();
            if let Some(workers) = workers {
                if workers == 0 {
                    bail!("--workers must be at least 1");
                }
                batch_config.workers = workers;
            }

            let files = cli::expand_batch_inputs(&inputs).context("Failed to list batch inputs")?;
            if files.is_empty() {
                bail!("No resume files found");
            }

            let advisor = Arc::new(Advisor::from_config(&config)?);
            let has_model = advisor.has_model();
            let runner = BatchRunner::new(advisor, &batch_config);

            let progress = ProgressBar::new(files.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );

            let units = files.into_iter().map(BatchInput::File).collect();
            let summary = runner
                .run_with_progress(units, &position, |name| {
                    progress.set_message(name.to_string());
                    progress.inc(1);
                })
                .await?;
            progress.finish_and_clear();

            info!("{} of {} candidates suitable for {}", summary.suitable, summary.total, summary.position_id);
            emit(&config, &report, Report::new(ReportContent::Batch(summary)).with_model(has_model))
        }

        Commands::Positions { report } => {
            let advisor = Advisor::from_config(&config)?;
            let positions = advisor.catalogs().positions.positions().to_vec();
            emit(&config, &report, Report::new(ReportContent::Positions(positions)))
        }

        Commands::Config { action } => {
            let path = config_path.clone().unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
                    println!("⚙️  Configuration ({})\n", path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    match &config_path {
                        Some(custom) => Config::default().save_to(custom)?,
                        None => Config::default().save()?,
                    }
                    println!("✅ Configuration reset: {}", path.display());
                }
            }
            Ok(())
        }
    }
}

async fn read_resume(path: &Path) -> anyhow::Result<(String, String)> {
    let mut input_manager = InputManager::new();
    let text = input_manager
        .extract_text(path)
        .await
        .with_context(|| format!("Failed to read resume {}", path.display()))?;
    Ok((text, input::source_name(path)))
}

fn emit(config: &Config, args: &ReportArgs, report: Report) -> anyhow::Result<()> {
    let format = match &args.output {
        Some(name) => cli::parse_output_format(name).map_err(AdvisorError::InvalidInput)?,
        None => config.output.format,
    };

    let detailed = args.detailed || config.output.detailed;
    let generator = ReportGenerator::from_config(&config.output).with_detail(detailed);

    match &args.save {
        Some(path) => {
            // Saved console reports are plain text
            let generator = if format == OutputFormat::Console {
                generator.without_colors()
            } else {
                generator
            };
            let content = generator.generate_report(&report, format)?;
            let path = resolve_report_path(path, format, &report);
            save_report_to_file(&content, &path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", generator.generate_report(&report, format)?),
    }
    Ok(())
}
