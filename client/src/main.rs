use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use shared::config::{load_config, validate_config};
use shared::types::{AppConfig, LoginData, RegistrationData, Role};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use client::AppContext;
use client::api;
use client::http::{ProgressCallback, UploadFile};
use client::notify::Notification;

#[derive(Parser, Debug)]
#[command(name = "lims-client", version, about = "Laboratory sample-management client")]
struct Cli {
    /// TOML configuration file. Defaults are used when it does not exist.
    #[arg(long, short, default_value = "lims-client.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and persist the session tokens
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short, env = "LIMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long, short)]
        username: String,
        #[arg(long, short, env = "LIMS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, env = "LIMS_PASSWORD_CONFIRM", hide_env_values = true)]
        password_confirm: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// End the session, locally even if the server cannot be reached
    Logout,
    /// Show the current user
    Whoami,
    /// Run the navigation guard against a path
    Navigate { path: String },
    /// List the route table
    Routes,
    /// Upload a file as multipart form data
    Upload {
        file: PathBuf,
        /// Endpoint path, e.g. `/ocr/scans/`
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = read_config(&cli.config)?;
    let ctx = AppContext::new(config).context("Failed to open token storage")?;
    let mut notifications = ctx.notifier.subscribe();

    let outcome = run(&ctx, cli.command).await;
    drain(&mut notifications);
    outcome
}

fn read_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let path_str = path.to_str().context("Config path is not valid UTF-8")?;
        return load_config(path_str)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    warn!("{} not found, using defaults", path.display());
    let mut config = AppConfig::default();
    config.api.base_url = config.api.resolved_base_url();
    validate_config(&config).context("Invalid default configuration")?;
    Ok(config)
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let outcome = ctx.store.do_login(&LoginData::new(&username, &password)).await;
            if !outcome.success {
                bail!(
                    "Login failed: {}",
                    outcome.message.as_deref().unwrap_or("no reason given")
                );
            }
            ctx.notifier.success(format!("Welcome, {}", ctx.session.user_name()));
            let landed = ctx.router.push(ctx.router.home_path())?;
            println!("Logged in as {} ({})", ctx.session.user_name(), ctx.session.user_role());
            println!("Now at {}", landed);
        }
        Command::Register {
            username,
            password,
            password_confirm,
            email,
            role,
        } => {
            let mut data = RegistrationData::new(&username, &password);
            data.password_confirm = password_confirm;
            data.email = email;
            data.role = role;
            if !data.passwords_match() {
                bail!("Passwords do not match");
            }

            let envelope = api::user::register(&ctx.http, &data).await?;
            if !envelope.is_success() {
                bail!(
                    "Registration rejected: {}",
                    envelope.message.as_deref().unwrap_or("no reason given")
                );
            }
            ctx.notifier.success(format!("Account {} created", username));
        }
        Command::Logout => {
            ctx.store.do_logout().await;
            println!("Logged out, now at {}", ctx.router.current());
        }
        Command::Whoami => {
            if !ctx.session.is_logged_in() {
                println!("Not logged in");
                return Ok(());
            }
            if !ctx.store.fetch_user_info().await {
                bail!("Could not load the current user");
            }
            let session = ctx.session.snapshot();
            if let Some(profile) = session.user_profile() {
                println!("{} (id {})", profile.username, profile.id);
                println!("role:       {}", profile.role);
                if let Some(role) = Role::parse(&profile.role) {
                    println!("staff:      {}", if role.is_staff() { "yes" } else { "no" });
                }
                if let Some(dept) = &profile.department_name {
                    println!("department: {}", dept);
                }
                if let Some(email) = &profile.email {
                    println!("email:      {}", email);
                }
            }
        }
        Command::Navigate { path } => {
            if ctx.session.is_logged_in() && !ctx.store.fetch_user_info().await {
                warn!("Profile unavailable, role checks will deny");
            }
            let landed = ctx
                .router
                .push(&path)
                .with_context(|| format!("Cannot navigate to {}", path))?;
            let route = ctx.router.resolve(&landed.path)?;
            info!("Resolved {} to view {:?}", path, route.view);
            println!("{} -> {} ({})", path, landed, route.meta.title.as_deref().unwrap_or("-"));
        }
        Command::Routes => {
            for record in ctx.router.table().records() {
                print_route(record, 0);
            }
        }
        Command::Upload { file, to } => {
            let upload = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let on_progress: ProgressCallback = Arc::new(|pct| eprint!("\ruploading {:>3}%", pct));

            let envelope = ctx
                .http
                .upload::<serde_json::Value>(&to, &upload, Some(on_progress))
                .await?;
            eprintln!();
            if !envelope.is_success() {
                bail!(
                    "Upload rejected: {}",
                    envelope.message.as_deref().unwrap_or("no reason given")
                );
            }
            ctx.notifier.success(format!("Uploaded {}", upload.file_name));
        }
    }

    Ok(())
}

fn print_route(record: &client::router::RouteRecord, depth: usize) {
    let roles = record
        .meta
        .roles
        .as_ref()
        .map(|r| format!(" [{}]", r.join(", ")))
        .unwrap_or_default();
    println!(
        "{:indent$}{}{}{}",
        "",
        record.path,
        record.meta.title.as_deref().map(|t| format!("  {}", t)).unwrap_or_default(),
        roles,
        indent = depth * 2
    );
    for child in &record.children {
        print_route(child, depth + 1);
    }
}

fn drain(rx: &mut broadcast::Receiver<Notification>) {
    while let Ok(n) = rx.try_recv() {
        eprintln!("[{}] {}", n.severity, n.message);
    }
}
