use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vpp_matcher::batteries::{match_battery, BATTERIES};
use vpp_matcher::chat::{detect_signals, rank_reply, system_prompt, RankedReply};
use vpp_matcher::config::{Config, ConfigOverrides};
use vpp_matcher::error::MatchError;
use vpp_matcher::matching::{rank_profile, FilterMode, MatchResult};
use vpp_matcher::output::csv::{matches_to_csv, programs_to_csv};
use vpp_matcher::output::json::render_json;
use vpp_matcher::output::table::{
    render_batteries_table, render_matches_table, render_program_detail, render_programs_table,
    render_signals_table, render_summary,
};
use vpp_matcher::profile::{RetailerPreference, UserProfile};
use vpp_matcher::programs::{PaymentModel, VppProgram};
use vpp_matcher::region::{lookup_postcode, Region};
use vpp_matcher::server::run_server;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "vpp-matcher",
    about = "Match home batteries to Australian virtual power plant programs"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// JSON program catalog to use instead of the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone)]
struct ProfileArgs {
    #[arg(short, long)]
    battery: String,
    #[arg(short, long)]
    postcode: String,
    /// Solar system size in kW; omit when there is no solar.
    #[arg(short, long)]
    solar: Option<f64>,
    #[arg(long, default_value = "open")]
    preference: String,
    #[arg(long = "payment-model")]
    payment_model: Option<String>,
}

impl ProfileArgs {
    fn to_profile(&self) -> Result<UserProfile, MatchError> {
        let preference = self.preference.parse::<RetailerPreference>()?;
        let profile = UserProfile::new(
            self.battery.clone(),
            self.postcode.clone(),
            self.solar,
            preference,
        );
        profile.validate()?;
        Ok(profile)
    }

    fn payment_model(&self) -> Result<Option<PaymentModel>, MatchError> {
        self.payment_model
            .as_deref()
            .map(str::parse::<PaymentModel>)
            .transpose()
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Match {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long, default_value = "all")]
        filter: String,
    },
    Top {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        count: Option<usize>,
    },
    Programs {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        independent: bool,
        #[arg(long = "payment-model")]
        payment_model: Option<String>,
    },
    Program {
        id: String,
    },
    Region {
        postcode: String,
    },
    Batteries {
        #[arg(long)]
        query: Option<String>,
    },
    Detect {
        text: String,
    },
    /// Parse an advisor reply carrying a QUALIFIED line and rank the result.
    Qualify {
        text: String,
    },
    Prompt,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    config.apply_overrides(ConfigOverrides {
        host,
        port,
        catalog_path: cli.catalog.clone(),
        chat_model: None,
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let registry = config.load_registry()?;
    info!(programs = registry.len(), "catalog loaded");

    if matches!(cli.command, Commands::Serve { .. }) {
        let bind = format!("{}:{}", config.server.host, config.server.port);
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, registry, addr).await;
    }

    let threshold = config.matching.available_threshold;
    match &cli.command {
        Commands::Match { profile, filter } => {
            let filter = filter.parse::<FilterMode>()?;
            let output = rank_profile(
                &registry,
                profile.to_profile()?,
                filter,
                profile.payment_model()?,
                &config.matching,
            );
            print_matches(&output, threshold, cli.output)?;
        }
        Commands::Top { profile, count } => {
            let mut output = rank_profile(
                &registry,
                profile.to_profile()?,
                FilterMode::All,
                profile.payment_model()?,
                &config.matching,
            );
            output
                .matches
                .truncate(count.unwrap_or(config.matching.top_count));
            print_matches(&output, threshold, cli.output)?;
        }
        Commands::Programs {
            region,
            independent,
            payment_model,
        } => {
            let region = region.as_deref().map(str::parse::<Region>).transpose()?;
            let payment_model = payment_model
                .as_deref()
                .map(str::parse::<PaymentModel>)
                .transpose()?;
            let programs = registry.select(region, *independent, payment_model);
            print_programs(&programs, cli.output)?;
        }
        Commands::Program { id } => {
            let program = registry
                .by_id(id)
                .ok_or_else(|| MatchError::UnknownProgram(id.clone()))?;
            print_program(program, cli.output)?;
        }
        Commands::Region { postcode } => {
            let output = lookup_postcode(postcode);
            match cli.output {
                OutputFormat::Table => {
                    if !output.valid {
                        warn!("{postcode} is not a valid postcode, falling back to NSW");
                    }
                    println!(
                        "{} -> {} (earnings x{:.2})",
                        output.postcode, output.region, output.earnings_multiplier
                    );
                }
                OutputFormat::Json => println!("{}", render_json(&output)?),
                OutputFormat::Csv => {
                    println!("postcode,valid,region,earnings_multiplier");
                    println!(
                        "{},{},{},{}",
                        output.postcode,
                        output.valid,
                        output.region.code(),
                        output.earnings_multiplier
                    );
                }
            }
        }
        Commands::Batteries { query } => {
            let batteries = match query.as_deref() {
                Some(q) => match_battery(q).into_iter().collect::<Vec<_>>(),
                None => BATTERIES.iter().collect(),
            };
            match cli.output {
                OutputFormat::Table => println!("{}", render_batteries_table(&batteries)),
                OutputFormat::Json => println!("{}", render_json(&batteries)?),
                OutputFormat::Csv => {
                    warn!("CSV output for batteries not implemented, using JSON");
                    println!("{}", render_json(&batteries)?);
                }
            }
        }
        Commands::Detect { text } => {
            let signals = detect_signals(text);
            match cli.output {
                OutputFormat::Table => {
                    println!("{}", render_signals_table(&signals));
                    if signals.is_complete() {
                        println!("All four profile signals present.");
                    }
                }
                OutputFormat::Json => println!("{}", render_json(&signals)?),
                OutputFormat::Csv => {
                    warn!("CSV output for detect not implemented, using JSON");
                    println!("{}", render_json(&signals)?);
                }
            }
        }
        Commands::Qualify { text } => {
            let output = rank_reply(&registry, text, &config.matching);
            print_qualify(&output, threshold, cli.output)?;
        }
        Commands::Prompt => println!("{}", system_prompt(&registry)),
        Commands::Config { .. } | Commands::Serve { .. } => {}
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_matches(output: &MatchResult, threshold: u8, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_matches_table(&output.matches, threshold));
            println!("{}", render_summary(&output.summary));
        }
        OutputFormat::Json => println!("{}", render_json(output)?),
        OutputFormat::Csv => print!("{}", matches_to_csv(&output.matches)?),
    }
    Ok(())
}

fn print_programs(programs: &[&VppProgram], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_programs_table(programs)),
        OutputFormat::Json => println!("{}", render_json(programs)?),
        OutputFormat::Csv => print!("{}", programs_to_csv(programs)?),
    }
    Ok(())
}

fn print_program(program: &VppProgram, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_program_detail(program)),
        OutputFormat::Json => println!("{}", render_json(program)?),
        OutputFormat::Csv => print!("{}", programs_to_csv(&[program])?),
    }
    Ok(())
}

fn print_qualify(output: &RankedReply, threshold: u8, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if !output.message.is_empty() {
                println!("{}", output.message);
            }
            match (&output.qualified, &output.results) {
                (None, _) => println!("No QUALIFIED line found."),
                (Some(_), None) => println!(
                    "Qualified profile did not validate: {}",
                    output.profile_error.as_deref().unwrap_or("unknown error")
                ),
                (Some(_), Some(results)) => print_matches(results, threshold, format)?,
            }
        }
        OutputFormat::Json => println!("{}", render_json(output)?),
        OutputFormat::Csv => match &output.results {
            Some(results) => print!("{}", matches_to_csv(&results.matches)?),
            None => {
                warn!("no ranked programs to export, using JSON");
                println!("{}", render_json(output)?);
            }
        },
    }
    Ok(())
}
