//! crowdwatch CLI
//!
//! Terminal client for the crowd analytics dashboard:
//! - Log in and out
//! - List sites
//! - Print the overview panels and the visitor log for a day
//! - Follow live alerts and occupancy

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crowdwatch::analytics::format::{date_time, short_time, DASH};
use crowdwatch::config::generate_default_config;
use crowdwatch::panels::{self, EntriesTable};
use crowdwatch::view::calendar;
use crowdwatch::{
    AlertFeed, AnalyticsApi, ApiClient, CachedApi, Config, FileTokenStore, LiveChannel, LiveEvent,
    LoggingConfig, OccupancySlot, PageButton, Pager, PanelState, SessionController, ViewState,
};

#[derive(Parser)]
#[command(name = "crowdwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Crowd monitoring analytics from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Analytics API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exchange credentials for a token and store it
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "CROWDWATCH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Show session and connection settings
    Status,

    /// List monitored sites
    Sites,

    /// Footfall, dwell time, occupancy and demographics for a day
    Overview {
        /// Site id (default: first site)
        #[arg(short, long)]
        site: Option<String>,
        /// Day to show, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Visitor entry/exit log for a day
    Entries {
        #[arg(short, long)]
        site: Option<String>,
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Follow live alerts and occupancy until interrupted
    Watch {
        #[arg(short, long)]
        site: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Everything a command needs once config is resolved
struct App {
    config: Config,
    session: Arc<SessionController>,
    client: Arc<ApiClient>,
    format: OutputFormat,
}

impl App {
    fn api(&self) -> Arc<dyn AnalyticsApi + Send + Sync> {
        if self.config.dashboard.cache {
            Arc::new(CachedApi::new(self.client.as_ref().clone()))
        } else {
            Arc::clone(&self.client) as Arc<dyn AnalyticsApi + Send + Sync>
        }
    }

    fn require_login(&self) -> anyhow::Result<()> {
        if !self.session.is_authenticated() {
            bail!("Not logged in. Run `crowdwatch login --email <email>` first.");
        }
        Ok(())
    }

    /// Load sites and pick the requested one (or the first)
    async fn view(
        &self,
        api: &(dyn AnalyticsApi + Send + Sync),
        site: Option<&str>,
        date: Option<NaiveDate>,
    ) -> anyhow::Result<ViewState<Local>> {
        let now = Local::now();
        let mut view = ViewState::new(now);
        view.set_sites(api.sites().await?);

        if let Some(site) = site {
            view.select_site(site);
            if view.site().map(|s| s.id.as_str()) != Some(site) {
                bail!("Unknown site: {}", site);
            }
        }
        if let Some(day) = date {
            if !view.pick_day(day, now.date_naive()) {
                bail!("{} is in the future", day);
            }
        }
        if view.site().is_none() {
            bail!("No sites available for this account");
        }
        Ok(view)
    }

    fn check_expired(&self) -> anyhow::Result<()> {
        if !self.session.is_authenticated() {
            bail!("Session expired. Run `crowdwatch login` again.");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    init_logging(&config.logging);

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let format = cli.format;

    let token_path = config.token_path().unwrap_or_else(FileTokenStore::default_path);
    let session = Arc::new(SessionController::new(FileTokenStore::new(&token_path)));
    session.initialize();

    let client = Arc::new(ApiClient::new(config.api.client_config(), Arc::clone(&session))?);
    let ctx = App {
        config,
        session,
        client,
        format,
    };

    match cli.command {
        Commands::Login { email, password } => {
            let password = password
                .ok_or_else(|| anyhow!("Password required: pass --password or set CROWDWATCH_PASSWORD"))?;
            ctx.session.login(ctx.client.as_ref(), &email, &password).await?;
            println!("Logged in as {}", email);
        }

        Commands::Logout => {
            ctx.session.logout();
            println!("Logged out");
        }

        Commands::Status => print_status(&ctx, &token_path),

        Commands::Sites => {
            ctx.require_login()?;
            let sites = ctx.api().sites().await?;
            print_sites(&ctx, &sites)?;
        }

        Commands::Overview { site, date } => {
            ctx.require_login()?;
            let api = ctx.api();
            let view = ctx.view(api.as_ref(), site.as_deref(), date).await?;
            overview(&ctx, api.as_ref(), &view).await?;
            ctx.check_expired()?;
        }

        Commands::Entries { site, date, page } => {
            ctx.require_login()?;
            let api = ctx.api();
            let view = ctx.view(api.as_ref(), site.as_deref(), date).await?;

            // The server reports the real page count; start permissive and clamp after.
            let mut pager = Pager::default();
            pager.set_total(page.max(1));
            pager.go_to_page(page);

            let state = panels::load_entries(
                api.as_ref(),
                view.selection().as_ref(),
                pager,
                ctx.config.dashboard.page_size,
            )
            .await;
            ctx.check_expired()?;
            print_entries(&ctx, state)?;
        }

        Commands::Watch { site } => {
            ctx.require_login()?;
            let api = ctx.api();
            let view = ctx.view(api.as_ref(), site.as_deref(), None).await?;
            watch(&ctx, &view).await?;
        }

        // Written before the session is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crowdwatch=info"));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, &content).with_context(|| format!("Failed to write {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_status(ctx: &App, token_path: &std::path::Path) {
    let authenticated = ctx.session.is_authenticated();
    match ctx.format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "api_url": ctx.config.api.base_url,
                "token_path": token_path,
                "authenticated": authenticated,
                "cache": ctx.config.dashboard.cache,
            });
            println!("{}", status);
        }
        OutputFormat::Table => {
            println!("crowdwatch v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("API:        {}", ctx.config.api.base_url);
            println!("Token file: {}", token_path.display());
            println!("Session:    {}", if authenticated { "logged in" } else { "logged out" });
        }
    }
}

fn print_sites(ctx: &App, sites: &[crowdwatch::Site]) -> anyhow::Result<()> {
    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(sites)?),
        OutputFormat::Table => {
            if sites.is_empty() {
                println!("No sites available.");
                return Ok(());
            }
            println!("{:<38} {:<24} {:<16} {:<20} {}", "ID", "Name", "City", "Timezone", "Zones");
            println!("{}", "-".repeat(106));
            for site in sites {
                println!(
                    "{:<38} {:<24} {:<16} {:<20} {}",
                    site.id,
                    site.name,
                    site.city,
                    site.timezone,
                    site.zones.len()
                );
            }
        }
    }
    Ok(())
}

async fn overview(
    ctx: &App,
    api: &(dyn AnalyticsApi + Send + Sync),
    view: &ViewState<Local>,
) -> anyhow::Result<()> {
    let selection = view.selection();
    let selection = selection.as_ref();

    let (footfall, dwell, occupancy, demographics, split) = tokio::join!(
        panels::load_footfall(api, selection),
        panels::load_dwell(api, selection),
        panels::load_occupancy(api, selection),
        panels::load_demographics(api, selection),
        panels::load_demographics_split(api, selection),
    );

    let footfall = footfall.settled_or_default();
    let dwell = dwell.settled_or_default();
    let occupancy = occupancy.settled_or_default();
    let demographics = demographics.settled_or_default();
    let split = split.settled_or_default();
    let site_name = view.site().map(|s| s.name.as_str()).unwrap_or(DASH);
    let day = calendar::button_label(view.date().date_naive(), Local::now().date_naive());

    match ctx.format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "site": site_name,
                "date": view.date().to_rfc3339(),
                "footfall": { "value": footfall.footfall, "change": footfall.change.to_string() },
                "dwell": {
                    "avg_minutes": dwell.avg_minutes,
                    "display": dwell.duration(),
                    "change": dwell.change.to_string(),
                },
                "occupancy": occupancy.iter().map(|p| serde_json::json!({
                    "utc": p.utc, "label": p.label, "avg": p.occupancy,
                })).collect::<Vec<_>>(),
                "demographics": demographics.iter().map(|p| serde_json::json!({
                    "utc": p.utc, "label": p.label, "male": p.male, "female": p.female,
                })).collect::<Vec<_>>(),
                "split": {
                    "male": split.male,
                    "female": split.female,
                    "male_percent": split.male_percent(),
                    "female_percent": split.female_percent(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("{} · {}", site_name, day);
            println!();
            println!("Today's footfall   {:<10} {}", footfall.footfall, footfall.change);
            println!("Avg dwell time     {:<10} {}", dwell.duration(), dwell.change);
            println!();

            println!("Occupancy (last 10h)");
            if occupancy.is_empty() {
                println!("  No data");
            }
            for point in &occupancy {
                println!("  {:<9} {:>8.1}", point.label, point.occupancy);
            }
            println!();

            println!("Demographics (last 8h)");
            println!("  {:<9} {:>6} {:>6}", "Time", "Male", "Female");
            for point in &demographics {
                println!("  {:<9} {:>6} {:>6}", point.label, point.male, point.female);
            }
            println!();
            println!(
                "Last 24h: {} visitors · male {} ({}%) · female {} ({}%)",
                split.total(),
                split.male,
                split.male_percent(),
                split.female,
                split.female_percent()
            );
        }
    }
    Ok(())
}

fn print_entries(ctx: &App, state: PanelState<EntriesTable>) -> anyhow::Result<()> {
    let table = match state {
        PanelState::Ready(table) => table,
        _ => bail!("Failed to load the visitor log"),
    };

    match ctx.format {
        OutputFormat::Json => {
            let rows: Vec<_> = table
                .rows
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "person_id": r.person_id,
                        "name": r.person_name,
                        "gender": r.gender,
                        "zone": r.zone_name,
                        "severity": r.severity,
                        "entry": r.entry,
                        "exit": r.exit,
                        "dwell": r.dwell,
                    })
                })
                .collect();
            let out = serde_json::json!({
                "page": table.pager.current(),
                "total_pages": table.pager.total(),
                "total_records": table.total_records,
                "records": rows,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            if table.rows.is_empty() {
                println!("No entries for this day");
                return Ok(());
            }
            println!(
                "{:<4} {:<22} {:<7} {:<20} {:<7} {:<6} {:<6} {}",
                "", "Name", "Gender", "Zone", "Risk", "In", "Out", "Dwell"
            );
            println!("{}", "-".repeat(96));
            for row in &table.rows {
                println!(
                    "{:<4} {:<22} {:<7} {:<20} {:<7} {:<6} {:<6} {}",
                    row.initials,
                    row.person_name,
                    row.gender.to_string(),
                    row.zone_name,
                    row.severity.label(),
                    row.entry,
                    row.exit,
                    row.dwell
                );
            }
            println!();
            let buttons: Vec<String> = table
                .pager
                .buttons()
                .iter()
                .map(|b| match b {
                    PageButton::Page(n) if *n == table.pager.current() => format!("[{}]", n),
                    other => other.to_string(),
                })
                .collect();
            println!("Page {}   ({} records)", buttons.join(" "), table.total_records);
        }
    }
    Ok(())
}

async fn watch(ctx: &App, view: &ViewState<Local>) -> anyhow::Result<()> {
    if !ctx.config.live.enabled {
        bail!("Live updates are disabled in the config ([live] enabled = false)");
    }

    let site_id = view.site().map(|s| s.id.clone());
    let mut alerts = AlertFeed::default();
    let mut occupancy = OccupancySlot::default();
    alerts.select_site(site_id.clone());
    occupancy.select_site(site_id);

    let channel = LiveChannel::spawn(ctx.config.live_config(), ctx.session.subscribe());
    let mut events = channel.subscribe();
    let mut tokens = ctx.session.subscribe();

    if ctx.format == OutputFormat::Table {
        println!(
            "Watching {} (Ctrl-C to stop)",
            view.site().map(|s| s.name.as_str()).unwrap_or(DASH)
        );
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = tokens.changed() => {
                if changed.is_err() || tokens.borrow().is_none() {
                    bail!("Session ended");
                }
            }
            event = events.recv() => match event {
                Ok(event) => print_live_event(ctx, &event, &mut alerts, &mut occupancy)?,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Live events dropped");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}

fn print_live_event(
    ctx: &App,
    event: &LiveEvent,
    alerts: &mut AlertFeed,
    occupancy: &mut OccupancySlot,
) -> anyhow::Result<()> {
    if occupancy.apply(event) {
        if let Some(update) = occupancy.latest() {
            let at = update
                .ts
                .to_utc()
                .map(|t| short_time(t.timestamp_millis(), &Local))
                .unwrap_or_else(|| DASH.to_string());
            match ctx.format {
                OutputFormat::Json => println!("{}", serde_json::to_string(update)?),
                OutputFormat::Table => println!("[{}] Live occupancy: {}", at, update.site_occupancy),
            }
        }
    } else if alerts.apply(event) {
        if let Some(alert) = alerts.iter().next() {
            let at = alert
                .ts
                .to_utc()
                .map(|t| date_time(&t, &Local))
                .unwrap_or_else(|| DASH.to_string());
            match ctx.format {
                OutputFormat::Json => println!("{}", serde_json::to_string(alert)?),
                OutputFormat::Table => println!(
                    "[{}] {} alert: {} entered {}",
                    at,
                    alert.severity.label(),
                    alert.person_name,
                    alert.zone_name
                ),
            }
        }
    }
    Ok(())
}
