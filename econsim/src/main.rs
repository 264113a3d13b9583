use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use econsim::report::{self, VerdictReport};
use econsim::{ConfigArgs, OwnerArgs};
use econsim_core::{load_world, EvaluationContext, World};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "econsim", author, version)]
#[command(about = "Check where buildings may stand and why they may not")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one building in one province for one owner
    Evaluate {
        /// Path to the world snapshot (JSON)
        #[arg(long)]
        world: PathBuf,

        #[arg(long)]
        province: String,

        #[arg(long)]
        building: String,

        #[command(flatten)]
        owner: OwnerArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-check every built and in-progress entry in the world
    Audit {
        /// Path to the world snapshot (JSON)
        #[arg(long)]
        world: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// List blocked entries only
        #[arg(long)]
        only_inactive: bool,

        /// Exit with an error if any entry is blocked
        #[arg(long)]
        deny_inactive: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List provinces where a building would be active for an owner
    Eligible {
        /// Path to the world snapshot (JSON)
        #[arg(long)]
        world: PathBuf,

        #[arg(long)]
        building: String,

        #[command(flatten)]
        owner: OwnerArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show agreements after counter-term expansion and expiry
    Agreements {
        /// Path to the world snapshot (JSON)
        #[arg(long)]
        world: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load(path: &Path) -> Result<World> {
    load_world(path).with_context(|| format!("failed to load world snapshot {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = std::str::FromStr::from_str(&cli.log_level).unwrap_or(log::LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Evaluate {
            world,
            province,
            building,
            owner,
            config,
            json,
        } => {
            let world = load(&world)?;
            let ctx = EvaluationContext::with_config(&world, config.apply(world.config.clone()));
            let Some(owner) = owner.owner() else {
                bail!("an owner is required (--state or --company)");
            };
            let verdict = ctx.evaluate_ids(&province, &building, &owner)?;
            let summary = VerdictReport::new(&province, &building, &owner, &verdict);
            if json {
                serde_json::to_writer_pretty(&mut out, &summary)?;
                writeln!(out)?;
            } else {
                report::print_verdict(&summary, &mut out)?;
            }
        }

        Commands::Audit {
            world,
            config,
            only_inactive,
            deny_inactive,
            json,
        } => {
            let world = load(&world)?;
            let ctx = EvaluationContext::with_config(&world, config.apply(world.config.clone()));
            let mut verdicts = ctx.audit();
            let total = verdicts.len();
            let inactive = verdicts.iter().filter(|v| !v.verdict.is_active()).count();

            if json {
                if only_inactive {
                    verdicts.retain(|v| !v.verdict.is_active());
                }
                serde_json::to_writer_pretty(&mut out, &verdicts)?;
                writeln!(out)?;
            } else {
                report::print_audit(&verdicts, only_inactive, &mut out)?;
            }

            if deny_inactive && inactive > 0 {
                bail!("{} of {} entries are blocked", inactive, total);
            }
        }

        Commands::Eligible {
            world,
            building,
            owner,
            config,
            json,
        } => {
            let world = load(&world)?;
            let ctx = EvaluationContext::with_config(&world, config.apply(world.config.clone()));
            let Some(owner) = owner.owner() else {
                bail!("an owner is required (--state or --company)");
            };
            let Some(def) = world.building(&building) else {
                bail!("Unknown building: {}", building);
            };
            let provinces = ctx.eligible_provinces(def, &owner);
            if json {
                let ids: Vec<&str> = provinces.iter().map(|p| p.id.as_str()).collect();
                serde_json::to_writer_pretty(&mut out, &ids)?;
                writeln!(out)?;
            } else {
                report::print_eligible(&building, &owner, &provinces, &mut out)?;
            }
        }

        Commands::Agreements { world, json } => {
            let world = load(&world)?;
            let ctx = EvaluationContext::new(&world);
            if json {
                serde_json::to_writer_pretty(&mut out, ctx.agreements())?;
                writeln!(out)?;
            } else {
                report::print_agreements(ctx.agreements(), &mut out)?;
            }
        }
    }

    Ok(())
}
