//! Mirra CLI - dataset management and analysis runs
//!
//! Simple CLI for interacting with the Mirra API.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use std::fs;

use api::{CreatePersonaRequest, MirraClient};
use config::Config;

#[derive(Parser)]
#[command(name = "mirra")]
#[command(about = "Mirra CLI - consumer persona analysis", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Analyze a product description
    Analyze {
        /// The product description to analyze
        description: String,
    },

    /// Persona dataset operations
    Persona {
        #[command(subcommand)]
        action: PersonaAction,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum PersonaAction {
    /// List dataset personas
    List {
        /// Max personas to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Add a persona
    Add {
        /// Persona summary (prompts if not provided)
        summary: Option<String>,
        #[arg(short, long)]
        age: Option<i32>,
        /// female, male, or other
        #[arg(short, long)]
        gender: Option<String>,
        #[arg(short, long)]
        occupation: Option<String>,
    },
    /// Bulk import personas from a JSON file
    Import {
        /// Path to a JSON array of personas
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Analyze { description } => cmd_analyze(description).await,
        Commands::Persona { action } => cmd_persona(action).await,
        Commands::Config => cmd_config(),
    }
}

// ============================================
// Command Implementations
// ============================================

fn client(config: &Config) -> Result<MirraClient> {
    let api_key = config
        .api_key
        .as_ref()
        .context("Not logged in. Run 'mirra login' first.")?;
    Ok(MirraClient::new(&config.base_url, api_key))
}

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = MirraClient::new(&config.base_url, &api_key);
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to the Mirra API. Check the base URL and your key.");
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    Ok(())
}

async fn cmd_analyze(description: String) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;

    println!("{}", "Running persona analysis (this takes a while)...".dimmed());
    let analysis = client.analyze(&description).await?;

    let total = analysis.would_buy_pie.yes + analysis.would_buy_pie.no;
    println!("\n{}", "Would buy:".bold());
    println!(
        "  {} yes / {} no ({} simulated)",
        analysis.would_buy_pie.yes.to_string().green(),
        analysis.would_buy_pie.no.to_string().red(),
        total
    );

    println!("\n{}", "Buyers per archetype:".bold());
    for (archetype, count) in &analysis.yes_pie {
        println!("  {} {}", count.to_string().cyan(), archetype);
    }

    println!("\n{}", "Age distribution:".bold());
    for (bucket, count) in &analysis.age_distribution {
        println!("  {:>5}  {}", bucket, count);
    }

    println!(
        "\n{} target ages {:?}, gender {}",
        "Demographics:".bold(),
        analysis.demographics.target_age_ranges,
        analysis.demographics.target_gender
    );

    for (archetype, insight) in &analysis.consumer_insights {
        println!(
            "\n{} {} ({})",
            "Insights for".bold(),
            archetype.cyan().bold(),
            insight.persona_id.to_string().dimmed()
        );
        println!("{}", insight.insights);
    }

    Ok(())
}

async fn cmd_persona(action: PersonaAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;

    match action {
        PersonaAction::List { limit } => {
            let personas = client.list_personas(limit).await?;

            if personas.is_empty() {
                println!("No personas in the dataset.");
                return Ok(());
            }

            println!("{}", "Personas:".bold());
            for persona in personas {
                println!(
                    "  {} [{} {}] {}",
                    persona.id.to_string().dimmed(),
                    persona.age,
                    persona.gender,
                    truncate_string(&persona.summary, 70)
                );
            }
        }

        PersonaAction::Add {
            summary,
            age,
            gender,
            occupation,
        } => {
            let summary = match summary {
                Some(s) => s,
                None => Input::new()
                    .with_prompt("Persona summary")
                    .interact_text()
                    .context("Failed to read input")?,
            };
            let age = match age {
                Some(a) => a,
                None => Input::new()
                    .with_prompt("Age")
                    .interact_text()
                    .context("Failed to read input")?,
            };
            let gender = gender.unwrap_or_else(|| "other".to_string());

            let persona = client
                .create_persona(&CreatePersonaRequest {
                    summary,
                    age,
                    gender,
                    occupation,
                    location: None,
                    traits: None,
                })
                .await?;

            println!("{} Persona added ({})", "✓".green(), persona.id);
        }

        PersonaAction::Import { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read file: {}", file))?;
            let personas: Vec<CreatePersonaRequest> =
                serde_json::from_str(&content).context("Expected a JSON array of personas")?;

            println!("Importing {} personas...", personas.len());
            let result = client.import_personas(&personas).await?;

            println!(
                "{} {} imported, {} failed",
                "✓".green(),
                result.imported,
                result.failed
            );
            for error in result.errors {
                println!("  {} {}", "!".yellow(), error.dimmed());
            }
        }
    }

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );

    Ok(())
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}
