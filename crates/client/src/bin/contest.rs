use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use client::{
    FunctionGateway, HttpGateway, ViewState,
    display::{SiteTheme, daily_participations},
    export::{WINNERS_CSV_FILENAME, WinnersTable},
    participations::{ParticipationView, ParticipationViewModel, resolve_identifier},
    prize::{ConfirmationFlow, PointsFormula},
    ranking::RankingViewModel,
    registration::{
        RegistrationFlow, ResumeOutcome, field_errors, submission_error_message, utm_from_url,
    },
    share::{
        Clipboard, Notifier, PlatformError, ShareAction, ShareContent, ShareOutcome, ShareSheet,
    },
};
use storage::{
    FileStore, IdentityCache,
    dto::{common::PaginationParams, ranking::RankingMode, registration::RegistrationRequest},
    models::UtmParams,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "contest")]
#[command(about = "Contest campaign client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "GATEWAY_URL")]
    gateway_url: String,

    #[arg(long, env = "GATEWAY_ANON_KEY")]
    gateway_key: String,

    #[arg(long, env = "IDENTITY_STORE_PATH", default_value = ".contest/identity.json")]
    identity_store: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Registers (or finds) a participant and remembers their identifier
    Register {
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        accept_rules: bool,
        #[arg(long)]
        accept_marketing: bool,
        /// Landing page URL carrying the utm_* parameters
        #[arg(long)]
        landing_url: Option<String>,
    },
    /// Return visit: jump to the participation page or show the prefill
    Resume,
    /// Shows the participation page once
    Profile {
        #[arg(long)]
        id: Option<String>,
    },
    /// Keeps the participation page refreshed until Ctrl-C
    Watch {
        #[arg(long)]
        id: Option<String>,
        #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value_t = 5)]
        interval_secs: u64,
    },
    Ranking {
        #[arg(long)]
        full: bool,
        #[arg(long)]
        id: Option<String>,
    },
    /// Confirmation screen after a participation is validated
    Prize {
        participation_id: String,
        /// flat:<points> or scaled:<points per currency unit>
        #[arg(long)]
        formula: PointsFormula,
        #[arg(long)]
        id: Option<String>,
    },
    Share {
        #[arg(long, default_value = "lien")]
        channel: String,
        url: String,
    },
    /// Lists winners, or writes them as CSV
    Winners {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        /// Directory (or file path) for the CSV export
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    Stats,
    Settings,
    /// Forgets the cached identity
    Forget,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("contest={},client={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let gateway: Arc<dyn FunctionGateway> = Arc::new(
        HttpGateway::new(&cli.gateway_url, &cli.gateway_key)
            .context("Failed to build gateway client")?,
    );
    let cache = IdentityCache::new(Arc::new(FileStore::new(&cli.identity_store)));

    match cli.command {
        Commands::Register {
            last_name,
            first_name,
            email,
            phone,
            accept_rules,
            accept_marketing,
            landing_url,
        } => {
            let form = RegistrationRequest {
                last_name,
                first_name,
                email,
                phone,
                accepts_rules: accept_rules,
                accepts_marketing: accept_marketing,
                utm: landing_url
                    .as_deref()
                    .map(utm_from_url)
                    .unwrap_or_else(UtmParams::default),
            };
            handle_register(RegistrationFlow::new(gateway, cache), form).await?;
        }
        Commands::Resume => match RegistrationFlow::new(gateway, cache).resume().await {
            ResumeOutcome::Redirect(route) => println!("→ {}", route.path()),
            ResumeOutcome::Form {
                prefill,
                has_participated,
            } => {
                match prefill {
                    Some(form) => println!(
                        "Formulaire prérempli : {} {} <{}> {}",
                        form.first_name, form.last_name, form.email, form.phone
                    ),
                    None => println!("Nouveau formulaire d'inscription"),
                }
                if has_participated {
                    println!("Vous avez déjà participé.");
                }
            }
        },
        Commands::Profile { id } => {
            let id = require_identifier(id.as_deref(), &cache)?;
            let state = ParticipationViewModel::new(gateway).load(&id).await;
            print_participations(&state);
        }
        Commands::Watch { id, interval_secs } => {
            let id = require_identifier(id.as_deref(), &cache)?;
            handle_watch(gateway, id, Duration::from_secs(interval_secs.max(1))).await?;
        }
        Commands::Ranking { full, id } => {
            let mode = if full { RankingMode::Full } else { RankingMode::Home };
            let state = RankingViewModel::new(gateway, cache)
                .load(mode, id.as_deref())
                .await;
            match state {
                ViewState::Ready(board) => {
                    println!("{}", board.title());
                    for row in &board.rows {
                        let marker = if row.is_current_user { "▶" } else { " " };
                        println!(
                            "{} {:>4}  {:<24} {:>6}",
                            marker,
                            row.rank_label,
                            row.label(),
                            row.score
                        );
                    }
                }
                ViewState::Failed(message) => bail!(message),
                ViewState::Empty | ViewState::Loading => {}
            }
        }
        Commands::Prize {
            participation_id,
            formula,
            id,
        } => {
            let id = require_identifier(id.as_deref(), &cache)?;
            let (screen, prize) = ConfirmationFlow::new(gateway, formula)
                .load(&id, &participation_id)
                .await;
            println!("{}", screen.headline());
            if let (Some(score), Some(rank)) = (screen.total_score, &screen.rank_label) {
                println!("Total : {} points, {} au classement", score, rank);
            }
            let check = prize.await.unwrap_or_default();
            if let Some(won) = screen.with_prize(check.as_ref()).prize {
                println!("Vous avez gagné : {}", won.title);
                if let Some(instructions) = won.instructions {
                    println!("{}", instructions);
                }
            }
        }
        Commands::Share { channel, url } => {
            let id = require_identifier(None, &cache)?;
            let terminal = Arc::new(Terminal);
            let action = ShareAction::new(gateway, terminal.clone(), terminal.clone(), terminal);
            let content = ShareContent {
                title: "Jeu concours".to_string(),
                text: "Participez vous aussi !".to_string(),
                url,
            };
            let (outcome, logged) = action.share(&id, &channel, content, None).await;
            let _ = logged.await;
            if let ShareOutcome::Failed(message) = outcome {
                bail!(message);
            }
        }
        Commands::Winners {
            page,
            page_size,
            csv,
        } => {
            let table = WinnersTable::new(gateway);
            match csv {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(WINNERS_CSV_FILENAME)
                    } else {
                        path
                    };
                    let csv = table.csv().await.context("Failed to fetch winners")?;
                    tokio::fs::write(&path, csv)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Exported winners to {}", path.display());
                }
                None => {
                    let params = PaginationParams::new(page, page_size);
                    params.validate().map_err(anyhow::Error::msg)?;
                    let page = table.page(&params).await.context("Failed to fetch winners")?;
                    for winner in &page.data {
                        println!(
                            "{} {} | {} | {} | {}",
                            winner.first_name,
                            winner.last_name,
                            winner.email,
                            winner.prize_title,
                            winner.date_attribution
                        );
                    }
                    println!(
                        "Page {}/{} ({} gagnants)",
                        page.pagination.page,
                        page.pagination.total_pages.max(1),
                        page.pagination.total_items
                    );
                }
            }
        }
        Commands::Stats => {
            let response = gateway.statistics().await.context("Failed to fetch statistics")?;
            match response.stats {
                Some(stats) => {
                    for day in daily_participations(&stats) {
                        println!("{}  {}", day.date, day.participations);
                    }
                }
                None => println!("Aucune statistique disponible"),
            }
        }
        Commands::Settings => {
            let settings = gateway
                .site_settings()
                .await
                .context("Failed to fetch site settings")?;
            println!("{}", SiteTheme::resolve(settings.as_ref()).css_variables());
        }
        Commands::Forget => {
            cache.clear().context("Failed to clear identity cache")?;
            tracing::info!("Identity cache cleared");
        }
    }

    Ok(())
}

async fn handle_register(flow: RegistrationFlow, form: RegistrationRequest) -> anyhow::Result<()> {
    match flow.submit(form).await {
        Ok(outcome) => {
            match outcome.confirmation {
                client::registration::Confirmation::Registered => {
                    println!("Inscription réussie !")
                }
                client::registration::Confirmation::AlreadyRegistered => {
                    println!("Vous êtes déjà inscrit, bon retour !")
                }
            }
            println!("→ {}", outcome.next.path());
            Ok(())
        }
        Err(client::ClientError::ValidationError(errors)) => {
            for error in field_errors(&errors) {
                eprintln!("{}: {}", error.field, error.message);
            }
            bail!("Le formulaire contient des erreurs")
        }
        Err(e) => bail!(submission_error_message(&e)),
    }
}

async fn handle_watch(
    gateway: Arc<dyn FunctionGateway>,
    id: String,
    period: Duration,
) -> anyhow::Result<()> {
    let handle = ParticipationViewModel::new(gateway).watch(id, period);
    let mut updates = handle.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_participations(&state);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping refresh");
                break;
            }
        }
    }

    handle.cancel();
    Ok(())
}

fn require_identifier(url_id: Option<&str>, cache: &IdentityCache) -> anyhow::Result<String> {
    resolve_identifier(url_id, cache)
        .context("Failed to read identity cache")?
        .context("No registration found, run `contest register` first")
}

fn print_participations(state: &ViewState<ParticipationView>) {
    match state {
        ViewState::Loading => println!("Chargement..."),
        ViewState::Empty => {}
        ViewState::Failed(message) => eprintln!("{}", message),
        ViewState::Ready(view) => {
            println!(
                "{} | {} | {} points | {}",
                view.card.display_name,
                view.card.participation_text,
                view.card.points,
                view.card.position
            );
            for card in &view.participations {
                println!(
                    "  {} | {} | {} | {:?}{}",
                    card.restaurant,
                    card.purchased_at,
                    card.amount,
                    card.status,
                    card.prize_title
                        .as_deref()
                        .map(|title| format!(" | Lot : {}", title))
                        .unwrap_or_default()
                );
            }
        }
    }
}

/// Terminal stand-in for the platform share sheet and clipboard
struct Terminal;

#[async_trait::async_trait]
impl ShareSheet for Terminal {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _: &ShareContent) -> Result<(), PlatformError> {
        Err(PlatformError::Failed("no share sheet on a terminal".to_string()))
    }
}

impl Clipboard for Terminal {
    fn write_text(&self, text: &str) -> Result<(), PlatformError> {
        println!("{}", text);
        Ok(())
    }
}

impl Notifier for Terminal {
    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}
