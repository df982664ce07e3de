//! Resume analyzer: AI-powered resume evaluation with optional job matching

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_analyzer::cli::{self, Cli, Commands, ConfigAction, JobArgs};
use resume_analyzer::config::{Config, OutputFormat};
use resume_analyzer::error::{Result, ResumeAnalyzerError};
use resume_analyzer::input::{ExtractionSource, InputManager};
use resume_analyzer::llm::{AnalysisClient, PromptBuilder};
use resume_analyzer::output::formatter;
use resume_analyzer::output::AnalysisReport;
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            model,
            output,
            save,
        } => {
            let output_format = match output {
                Some(format) => {
                    cli::parse_output_format(&format).map_err(ResumeAnalyzerError::InvalidInput)?
                }
                None => config.output.format,
            };

            if let Some(model) = model {
                config.model.name = model;
            }

            // The credential is checked before any input is touched
            let client = AnalysisClient::from_env(&config)?;

            analyze(&config, &client, &resume, &job, output_format, save.as_deref()).await
        }

        Commands::Extract { resume } => {
            validate_resume(&resume)?;
            let input_manager = InputManager::new(&config);
            let slot = input_manager.store_upload(&resume).await?;
            let extraction = input_manager.extract_resume(&slot).await;

            println!("📄 Source: {}", extraction.source);
            if extraction.degraded {
                println!("⚠️  One or more extraction stages failed; see log for details");
            }
            println!("📊 {} characters\n", extraction.text.chars().count());
            println!("{}", extraction.text);
            Ok(())
        }

        Commands::Prompt { resume, job } => {
            validate_resume(&resume)?;
            let input_manager = InputManager::new(&config);
            let slot = input_manager.store_upload(&resume).await?;
            let extraction = input_manager.extract_resume(&slot).await;
            let job_description = read_job(&input_manager, &job).await?;

            let request = PromptBuilder::new().build(&extraction.text, job_description.as_deref())?;
            println!("{}", request.as_str());
            Ok(())
        }

        Commands::Config { action } => run_config_command(action, &config, config_path),
    }
}

async fn analyze(
    config: &Config,
    client: &AnalysisClient,
    resume: &Path,
    job: &JobArgs,
    output_format: OutputFormat,
    save: Option<&Path>,
) -> Result<()> {
    validate_resume(resume)?;
    if let Some(job_file) = &job.job {
        cli::validate_file_extension(job_file, &["txt", "md", "markdown"])
            .map_err(|e| ResumeAnalyzerError::InvalidInput(format!("Job description file: {}", e)))?;
    }

    let start = Instant::now();
    info!("Starting resume analysis");

    let input_manager = InputManager::new(config);
    let slot = input_manager.store_upload(resume).await?;
    println!("✅ Resume uploaded successfully!");

    let extraction = input_manager.extract_resume(&slot).await;
    let job_description = read_job(&input_manager, job).await?;

    match extraction.source {
        ExtractionSource::Structured => println!(
            "📄 Extracted {} characters from the text layer",
            extraction.text.chars().count()
        ),
        ExtractionSource::Ocr => println!(
            "🔍 Extracted {} characters with OCR",
            extraction.text.chars().count()
        ),
        ExtractionSource::Empty => warn!("No text could be extracted from {}", resume.display()),
    }

    if config.output.show_resume_preview {
        println!("\n📄 Resume Content Preview:");
        println!("{}\n", truncate_text(&extraction.text, 300));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Analyzing resume...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.analyze(&extraction.text, job_description.as_deref()).await;
    spinner.finish_and_clear();
    let analysis = result?;

    println!("🎉 Analysis complete!\n");

    let report = AnalysisReport::new(
        analysis,
        resume.display().to_string(),
        &extraction,
        job_description.is_some(),
        client.model(),
        start.elapsed().as_millis() as u64,
    );

    let rendered = formatter::render(&report, output_format, config.output.color_output)?;
    println!("{}", rendered);

    if let Some(path) = save {
        // Saved files never carry terminal color codes
        let rendered = formatter::render(&report, output_format, false)?;
        formatter::save_report(&rendered, path)?;
        println!("💾 Saved report to {}", path.display());
    }

    Ok(())
}

async fn read_job(input_manager: &InputManager, job: &JobArgs) -> Result<Option<String>> {
    input_manager
        .job_description(job.job.as_deref(), job.job_text.as_deref())
        .await
}

fn validate_resume(resume: &Path) -> Result<()> {
    cli::validate_file_extension(resume, &["pdf"])
        .map_err(|e| ResumeAnalyzerError::InvalidInput(format!("Resume file: {}", e)))
}

fn run_config_command(action: Option<ConfigAction>, config: &Config, config_path: &Path) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).map_err(|e| {
                ResumeAnalyzerError::Configuration(format!("Failed to serialize config: {}", e))
            })?;
            println!("{}", content);
        }
        ConfigAction::Reset => {
            Config::default().save_to(config_path)?;
            println!("✅ Configuration reset to defaults: {}", config_path.display());
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
