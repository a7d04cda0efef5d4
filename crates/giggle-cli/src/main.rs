//! `giggle` — sign in to the Giggle API from the terminal.
//!
//! The session is kept in a local SQLite file and reused across invocations
//! until it expires or `giggle logout` is run.
//!
//! # Usage
//!
//! ```text
//! giggle register --username alice --email alice@example.com
//! giggle login --username alice
//! giggle whoami
//! curl -H "Authorization: Bearer $(giggle token)" http://localhost:8000/api/user/memes/
//! giggle logout
//! ```

mod form;
mod prompt;
mod settings;

use std::{io, path::PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand};
use giggle_client::HttpAuthService;
use giggle_core::SessionManager;
use giggle_store_sqlite::SqliteTokenStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use form::{
  LOGIN_FAILED, LoginForm, REGISTRATION_FAILED, RegisterForm, failure_message,
};
use prompt::{or_prompt, prompt};
use settings::Settings;

type Manager = SessionManager<SqliteTokenStore, HttpAuthService>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Sign in to the Giggle meme generator")]
struct Cli {
  /// Path to a TOML config file (base_url, store_path).
  #[arg(short, long, value_name = "FILE", default_value = "giggle.toml")]
  config: PathBuf,

  /// Root of the Giggle API; overrides the config file.
  #[arg(long, value_name = "URL")]
  url: Option<String>,

  /// Session database; overrides the config file.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Sign in with a username and password.
  Login(LoginArgs),
  /// Create an account and sign in to it.
  Register(RegisterArgs),
  /// Sign out and forget the stored tokens.
  Logout,
  /// Show who is signed in.
  Whoami,
  /// Print the current access token, for use as a bearer credential.
  Token,
}

#[derive(Args, Debug)]
struct LoginArgs {
  #[arg(short, long)]
  username: Option<String>,
  /// Prompted for when omitted.
  #[arg(short, long, env = "GIGGLE_PASSWORD", hide_env_values = true)]
  password: Option<String>,
}

#[derive(Args, Debug)]
struct RegisterArgs {
  #[arg(short, long)]
  username: Option<String>,
  #[arg(short, long)]
  email:    Option<String>,
  /// Prompted for (twice) when omitted.
  #[arg(short, long, env = "GIGGLE_PASSWORD", hide_env_values = true)]
  password: Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Flags override the config file, which overrides defaults.
  let mut settings = Settings::load(&cli.config)?;
  if let Some(url) = cli.url {
    settings.base_url = url;
  }
  if let Some(store) = cli.store {
    settings.store_path = store;
  }

  let manager = connect(&settings).await?;
  manager.restore().await;

  match cli.command {
    Command::Login(args) => login(&manager, args).await,
    Command::Register(args) => register(&manager, args).await,
    Command::Logout => {
      manager.logout().await;
      println!("Signed out.");
      Ok(())
    }
    Command::Whoami => {
      let state = manager.state();
      match state.session() {
        Some(session) => {
          let id = session.identity();
          print!("{} <{}> (id {})", id.username, id.email, id.id);
          match session.expires_at() {
            Some(at) => println!(", expires {at}"),
            None => println!(),
          }
        }
        None => println!("Not signed in."),
      }
      Ok(())
    }
    Command::Token => match manager.access_token() {
      Some(token) => {
        println!("{token}");
        Ok(())
      }
      None => bail!("not signed in"),
    },
  }
}

/// Build the manager for `settings`. Tokens are scoped by the client's
/// normalised base URL, so `…/api` and `…/api/` share a session.
async fn connect(settings: &Settings) -> Result<Manager> {
  let auth = HttpAuthService::new(settings.base_url.as_str())?;

  let store_path = settings.resolved_store_path();
  let store = SqliteTokenStore::open(&store_path, auth.base_url())
    .await
    .with_context(|| format!("failed to open session store at {store_path:?}"))?;

  Ok(SessionManager::new(store, auth))
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn login(manager: &Manager, args: LoginArgs) -> Result<()> {
  let form = LoginForm {
    username: or_prompt(args.username, "Username")?,
    password: or_prompt(args.password, "Password")?,
  };
  form.validate()?;

  match manager.login(&form.username, &form.password).await {
    Ok(Some(identity)) => {
      println!("Welcome back, {}!", identity.username);
      Ok(())
    }
    Ok(None) => bail!(LOGIN_FAILED),
    Err(e) => bail!(failure_message(&e, LOGIN_FAILED)),
  }
}

async fn register(manager: &Manager, args: RegisterArgs) -> Result<()> {
  let username = or_prompt(args.username, "Username")?;
  let email = or_prompt(args.email, "Email")?;
  let (password, confirm_password) = match args.password {
    Some(p) => (p.clone(), p),
    None => (prompt("Password")?, prompt("Confirm password")?),
  };
  let form = RegisterForm {
    username,
    email,
    password,
    confirm_password,
  };
  form.validate()?;

  match manager
    .register(&form.username, &form.email, &form.password)
    .await
  {
    Ok(Some(identity)) => {
      println!("Account created. Welcome to Giggle, {}!", identity.username);
      Ok(())
    }
    Ok(None) => bail!(REGISTRATION_FAILED),
    Err(e) => bail!(failure_message(&e, REGISTRATION_FAILED)),
  }
}
