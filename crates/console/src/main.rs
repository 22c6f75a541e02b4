//! Interactive console for the EXP3 events app, running against an in-memory
//! store and a demo identity provider.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod command;
mod render;

use std::path::PathBuf;

use clap::Parser;
use command::{Command, HELP};
use exp3_app::{App, AppConfig, AppOptions, SignInProgress};
use exp3_identity::UserIdentity;
use exp3_identity_mock::MockIdentityProvider;
use exp3_store_memory::MemoryStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI-specific error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Application error
    #[error(transparent)]
    App(#[from] exp3_app::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "EXP3_CONFIG")]
    config: Option<PathBuf>,

    /// Host the app is served from, checked against the sign-in allow-list
    #[arg(long, env = "EXP3_ORIGIN_HOST")]
    origin_host: Option<String>,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "warn", env = "EXP3_LOG_LEVEL")]
    log_level: String,

    /// Register free events when their register button is pressed
    #[arg(long, env = "EXP3_REGISTER_FREE_EVENTS")]
    register_free_events: bool,

    /// ID of the demo user the identity provider signs in
    #[arg(long, default_value = "demo-user", env = "EXP3_USER_ID")]
    user_id: String,

    /// Name of the demo user
    #[arg(long, default_value = "Demo User", env = "EXP3_USER_NAME")]
    user_name: String,

    /// Email of the demo user
    #[arg(long, env = "EXP3_USER_EMAIL")]
    user_email: Option<String>,
}

impl Args {
    fn app_config(&self) -> Result<AppConfig, Error> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(origin_host) = &self.origin_host {
            config.origin_host.clone_from(origin_host);
        }

        if self.register_free_events {
            config.registration.register_free_events = true;
        }

        Ok(config)
    }

    fn demo_user(&self) -> UserIdentity {
        let user = UserIdentity::new(&self.user_id).with_name(&self.user_name);

        match &self.user_email {
            Some(email) => user.with_email(email),
            None => user,
        }
    }
}

type ConsoleApp = App<MockIdentityProvider, MemoryStore>;

fn print_events(app: &ConsoleApp) -> Result<(), Error> {
    if app.events().is_empty() {
        println!("no events");
    }

    for (index, event) in app.events().iter().enumerate() {
        let action = app.call_to_action(index)?;
        println!("{}", render::event_line(index, event, &action));
    }

    Ok(())
}

/// Runs one command. Returns `false` when the user asked to leave.
async fn dispatch(app: &mut ConsoleApp, command: Command) -> Result<bool, Error> {
    match command {
        Command::Events => print_events(app)?,
        Command::Register(index) => {
            let effect = app.register(index).await?;
            println!("{}", render::effect(&effect));
        }
        Command::Click(index) => {
            let effect = app.card_clicked(index)?;
            println!("{}", render::effect(&effect));
        }
        Command::SignIn => {
            app.open_sign_in();
            println!("sign-in modal open (`connect` or `close-auth`)");
        }
        Command::Connect => match app.sign_in().await? {
            SignInProgress::Completed(effect) => {
                if let Some(user) = app.current_user() {
                    println!("signed in as {}", user.display_name());
                }
                println!("{}", render::effect(&effect));
            }
            SignInProgress::Redirecting => println!("redirecting to sign in"),
        },
        Command::CloseAuth => {
            app.cancel_sign_in();
            println!("sign-in modal closed");
        }
        Command::Pay => {
            let effect = app.confirm_payment().await?;
            println!("{}", render::effect(&effect));
        }
        Command::ClosePayment => {
            app.cancel_payment();
            println!("payment modal closed");
        }
        Command::Detail(event_id) => {
            let event = app.event_detail(&event_id).await?;
            print!("{}", render::event_detail(&event));
        }
        Command::Mine => {
            let events = app.my_events().await?;
            if events.is_empty() {
                println!("no registrations");
            }
            for event in events {
                println!("{} | {} {}", event.title, event.date, event.time);
            }
        }
        Command::WhoAmI => match app.current_user() {
            Some(user) => {
                let profile = app.profile().await?;
                println!("{} ({}) | {} XP", user.display_name(), user.id, profile.xp);
            }
            None => println!("not signed in"),
        },
        Command::SignOut => {
            app.sign_out().await?;
            println!("signed out");
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }

    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.app_config()?;
    debug!(?config, "loaded configuration");

    let mut app = App::new(AppOptions {
        config,
        identity_provider: MockIdentityProvider::with_default_user(args.demo_user()),
        store: MemoryStore::new(),
    });
    app.start().await?;
    info!(origin_host = %app.config().origin_host, "started");

    print_events(&app)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match dispatch(&mut app, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("error: {e}"),
        }
    }

    Ok(())
}
