use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use upskill_advisor::catalog::{CourseStats, SearchFilters};
use upskill_advisor::client::BackendClient;
use upskill_advisor::config::{Config, ConfigOverrides};
use upskill_advisor::course::{cache, ranking, ScoredCourse, SortKey};
use upskill_advisor::metrics::aggregate::{
    accuracy_by_component, aggregate_kpis, cost_by_model, AggregateKpis,
};
use upskill_advisor::metrics::{ingest, MetricsReport};
use upskill_advisor::output::csv::{courses_to_csv, kpis_to_csv};
use upskill_advisor::output::json::render_json;
use upskill_advisor::output::report::render_plan_report;
use upskill_advisor::output::table::{
    render_comparison_table, render_component_accuracy_table, render_cost_by_model_table,
    render_courses_table, render_kpis_table, render_plan_table, render_stats_tables,
};
use upskill_advisor::profile::{parse_skill_list, UserProfile};
use upskill_advisor::server::run_server;
use upskill_advisor::session;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "upskill-advisor",
    about = "Course recommendations and pipeline KPIs from the advisor backend"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Backend base URL, overriding the config file.
    #[arg(short, long)]
    backend: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch recommendations for a profile and show the ranked courses.
    Advise {
        /// Comma-separated `name[:level]` skill list, e.g. "python:advanced,sql".
        #[arg(short, long)]
        skills: String,
        #[arg(short = 'g', long = "goal-role")]
        goal_role: String,
        #[arg(short = 'y', long = "years", default_value_t = 0)]
        years_experience: u32,
        #[arg(long = "search-online")]
        search_online: bool,
        /// Sort key: score, duration, difficulty or rating.
        #[arg(long)]
        sort: Option<String>,
        /// Difficulty filter ("all" disables filtering).
        #[arg(long)]
        difficulty: Option<String>,
        /// Keep only the N best courses.
        #[arg(long)]
        top: Option<usize>,
        /// Also show the retrieval-mode comparison.
        #[arg(long)]
        compare: bool,
        /// Write a plain-text learning plan report to this path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Search the course catalog.
    Search {
        query: String,
        #[arg(long = "provider")]
        providers: Vec<String>,
        #[arg(long = "difficulty")]
        difficulties: Vec<String>,
        #[arg(long = "skill")]
        skills: Vec<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long)]
        free: bool,
    },
    /// Catalog statistics: provider, difficulty and skill distributions.
    Stats,
    /// Aggregate pipeline KPIs from backend metrics, or from local CSV exports.
    Kpis {
        /// Directory with accuracy.csv / latency.csv / cost.csv instead of
        /// fetching from the backend.
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Re-fetch KPIs and catalog stats on an interval.
    Watch {
        #[arg(long)]
        interval_secs: Option<u64>,
        #[arg(long, default_value_t = 1)]
        iterations: u32,
    },
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3001)]
        port: u16,
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
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        backend_url: cli.backend.clone(),
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let client = BackendClient::new(&config.backend);

    match &cli.command {
        Commands::Advise {
            skills,
            goal_role,
            years_experience,
            search_online,
            sort,
            difficulty,
            top,
            compare,
            report,
        } => {
            let profile = UserProfile {
                skills: parse_skill_list(skills)?,
                years_experience: *years_experience,
                goal_role: goal_role.trim().to_string(),
                search_online: *search_online,
            };
            if profile.goal_role.is_empty() {
                return Err(anyhow!("goal role cannot be empty"));
            }

            let sort_key = sort
                .as_deref()
                .unwrap_or(config.display.default_sort.as_str());
            let sort_key = SortKey::from_str(sort_key)?;
            let filter = difficulty
                .as_deref()
                .unwrap_or(config.display.default_difficulty.as_str());
            let top = top.or(config.display.top);

            let advice = session::run_advice(&client, &profile).await?;
            let result = advice
                .primary
                .ok_or_else(|| anyhow!("backend returned no advise result"))?;

            let mut ranked = ranking::rank_courses(
                &cache::scored(&result.recommended_courses),
                filter,
                sort_key,
            );
            if let Some(top) = top {
                ranked.truncate(top);
            }

            print_advise(&result, &ranked, cli.output)?;
            if *compare {
                if let Some(runs) = &advice.comparison {
                    print_comparison(runs, cli.output)?;
                }
            }
            if let Some(metrics) = &advice.metrics {
                print_kpis(metrics, cli.output)?;
            }
            if let Some(path) = report {
                let rendered = render_plan_report(&profile, &result, &ranked);
                fs::write(path, rendered)
                    .with_context(|| format!("failed writing report: {}", path.display()))?;
                info!("wrote learning plan report to {}", path.display());
            }
        }
        Commands::Search {
            query,
            providers,
            difficulties,
            skills,
            categories,
            free,
        } => {
            let filters = SearchFilters {
                providers: providers.clone(),
                difficulties: difficulties.clone(),
                skills: skills.clone(),
                categories: categories.clone(),
                is_free: free.then_some(true),
            };
            let response = client.search_courses(query, &filters).await?;
            let scored = cache::scored(&response.courses);
            match cli.output {
                OutputFormat::Table => println!("{}", render_courses_table(&scored)),
                OutputFormat::Json => println!("{}", render_json(&response)?),
                OutputFormat::Csv => println!("{}", courses_to_csv(&scored)?),
            }
        }
        Commands::Stats => {
            let stats = client.course_stats().await?;
            print_stats(&stats, cli.output)?;
        }
        Commands::Kpis { from } => {
            let report = match from {
                Some(dir) => ingest::report_from_dir(dir)?,
                None => client.metrics_report().await?,
            };
            print_kpis(&report, cli.output)?;
        }
        Commands::Watch {
            interval_secs,
            iterations,
        } => {
            let interval = Duration::from_secs(
                interval_secs
                    .unwrap_or(config.dashboard.refresh_interval_secs)
                    .max(1),
            );
            let total = (*iterations).max(1);
            for i in 0..total {
                info!("dashboard refresh {}/{total}", i + 1);
                match session::fetch_dashboard(&client).await {
                    Ok((report, stats)) => {
                        print_kpis(&report, cli.output)?;
                        print_stats(&stats, cli.output)?;
                    }
                    Err(err) => warn!("dashboard refresh failed: {err}"),
                }
                if i + 1 < total {
                    tokio::time::sleep(interval).await;
                }
            }
        }
        Commands::Config { .. } => {}
        Commands::Serve { .. } => unreachable!("serve command handled before dispatch"),
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

fn print_advise(
    result: &upskill_advisor::advise::AdviseResult,
    ranked: &[ScoredCourse],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if !result.plan.is_empty() {
                println!("{}", render_plan_table(result));
            }
            println!("{}", render_courses_table(ranked));
            let summary = ranking::summarize_ranked(ranked);
            println!(
                "{} highly recommended, {} good matches, avg skill match {:.0}%, avg duration {:.1} weeks",
                summary.highly_recommended,
                summary.good_match,
                summary.avg_skill_match,
                summary.avg_duration_weeks
            );
        }
        OutputFormat::Json => println!("{}", render_json(&(result, ranked))?),
        OutputFormat::Csv => println!("{}", courses_to_csv(ranked)?),
    }
    Ok(())
}

fn print_comparison(
    runs: &[upskill_advisor::advise::AdviseResult],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_comparison_table(runs)),
        OutputFormat::Json => println!("{}", render_json(runs)?),
        OutputFormat::Csv => {
            warn!("CSV output for comparison not implemented, using JSON");
            println!("{}", render_json(runs)?);
        }
    }
    Ok(())
}

fn print_stats(stats: &CourseStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_stats_tables(stats)),
        OutputFormat::Json => println!("{}", render_json(stats)?),
        OutputFormat::Csv => {
            warn!("CSV output for stats not implemented, using JSON");
            println!("{}", render_json(stats)?);
        }
    }
    Ok(())
}

fn print_kpis(report: &MetricsReport, format: OutputFormat) -> Result<()> {
    let kpis: AggregateKpis = aggregate_kpis(report);
    match format {
        OutputFormat::Table => {
            println!("{}", render_kpis_table(&kpis));
            let by_component = accuracy_by_component(report);
            if !by_component.is_empty() {
                println!("{}", render_component_accuracy_table(&by_component));
            }
            let by_model = cost_by_model(report);
            if !by_model.is_empty() {
                println!("{}", render_cost_by_model_table(&by_model));
            }
        }
        OutputFormat::Json => println!("{}", render_json(&kpis)?),
        OutputFormat::Csv => println!("{}", kpis_to_csv(&kpis)?),
    }
    Ok(())
}
