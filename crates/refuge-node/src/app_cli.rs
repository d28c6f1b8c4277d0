//! refuge-app interactive client
//!
//! Browses shelters, checks in and manages the local account.
//!
//! Commands:
//!   map | list | dashboard              Switch view
//!   refresh                             Reload shelters now
//!   checkin <id>                        Reserve a spot
//!   register <name> <email> <pw> <pw>   Create the local account
//!   login <email> <pw>                  Sign in
//!   logout                              Sign out
//!   monitor [ticks]                     Watch simulated shelter sensors
//!   help | quit

use refuge_core::{EnvironmentMonitor, Registration, ShelterId, View};
use refuge_node::refresh::SIMULATED_INTERVAL;
use refuge_node::render::{render, render_reading};
use refuge_node::{AppConfig, Authenticator, Identity, LocalAccounts, ShelterSession, Storage};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MONITOR_TICKS: u32 = 5;

#[derive(Debug, PartialEq)]
enum Command {
    Show(View),
    Refresh,
    CheckIn(ShelterId),
    Register {
        name: String,
        email: String,
        password: String,
        confirm: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Monitor(u32),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let args: Vec<&str> = line.split_whitespace().collect();
    let Some((&cmd, rest)) = args.split_first() else {
        return Err(String::new());
    };

    match (cmd, rest) {
        ("map" | "list" | "dashboard", []) => cmd.parse().map(Command::Show),
        ("refresh", []) => Ok(Command::Refresh),
        ("checkin", [id]) => id
            .parse()
            .map(Command::CheckIn)
            .map_err(|_| format!("not a shelter id: {id}")),
        ("register", [name, email, password, confirm]) => Ok(Command::Register {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm: confirm.to_string(),
        }),
        ("login", [email, password]) => Ok(Command::Login {
            email: email.to_string(),
            password: password.to_string(),
        }),
        ("logout", []) => Ok(Command::Logout),
        ("monitor", []) => Ok(Command::Monitor(DEFAULT_MONITOR_TICKS)),
        ("monitor", [ticks]) => ticks
            .parse()
            .map(Command::Monitor)
            .map_err(|_| format!("not a tick count: {ticks}")),
        ("help", []) => Ok(Command::Help),
        ("quit" | "exit", []) => Ok(Command::Quit),
        _ => Err(format!("unknown command: {}", line.trim())),
    }
}

fn print_usage() {
    println!("refuge-app - Find a shelter and reserve a spot");
    println!();
    println!("Commands:");
    println!("  map | list | dashboard              Switch view");
    println!("  refresh                             Reload shelters now");
    println!("  checkin <id>                        Reserve a spot");
    println!("  register <name> <email> <pw> <pw>   Create the local account");
    println!("  login <email> <pw>                  Sign in");
    println!("  logout                              Sign out");
    println!("  monitor [ticks]                     Watch simulated shelter sensors");
    println!("  help                                Show this help");
    println!("  quit                                Exit");
    println!();
    println!("Environment:");
    println!("  REFUGE_SOURCE     Shelter API url or 'simulated' (default: simulated)");
    println!("  REFUGE_POLL_SECS  Refresh interval in seconds");
    println!("  REFUGE_APP_DIR    Local data directory (default: ./refuge-app-data)");
}

struct App {
    session: ShelterSession,
    accounts: LocalAccounts,
    monitor: EnvironmentMonitor,
    identity: Option<Identity>,
}

impl App {
    /// Run one command. Returns false when the user asked to quit.
    async fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Show(view) => {
                self.session.navigate(view).await;
                print!("{}", render(&self.session.snapshot().await));
            }
            Command::Refresh => match self.session.refresh_now().await {
                Ok(count) => {
                    println!("Loaded {count} shelters.");
                    print!("{}", render(&self.session.snapshot().await));
                }
                Err(e) => println!("{}", e.user_message()),
            },
            Command::CheckIn(id) => match self.session.check_in(id).await {
                Ok(outcome) => {
                    println!(
                        "Checked in to shelter {}. {} spots left.",
                        outcome.receipt.shelter_id, outcome.receipt.available_spots
                    );
                    if !outcome.synced {
                        println!("(not yet confirmed by the server)");
                    }
                }
                Err(e) => println!("{}", e.user_message()),
            },
            Command::Register {
                name,
                email,
                password,
                confirm,
            } => match self
                .accounts
                .register(Registration::new(name, email, password, confirm))
            {
                Ok(identity) => {
                    println!("Account created. Welcome, {}.", identity.name);
                    self.identity = Some(identity);
                }
                Err(e) => println!("{}", e.user_message()),
            },
            Command::Login { email, password } => {
                match self.accounts.authenticate(&email, &password).await {
                    Ok(identity) => {
                        println!("Signed in as {}.", identity.email);
                        self.identity = Some(identity);
                    }
                    Err(e) => println!("{}", e.user_message()),
                }
            }
            Command::Logout => match self.identity.take() {
                Some(identity) => {
                    tracing::info!("Signed out {}", identity.email);
                    println!("Signed out.");
                }
                None => println!("Not signed in."),
            },
            Command::Monitor(ticks) => self.watch_monitor(ticks).await,
            Command::Help => print_usage(),
            Command::Quit => return false,
        }
        true
    }

    async fn watch_monitor(&mut self, ticks: u32) {
        println!("{}", render_reading(&self.monitor.reading()));
        let mut interval = tokio::time::interval(SIMULATED_INTERVAL);
        // first tick completes immediately
        interval.tick().await;
        for _ in 0..ticks {
            interval.tick().await;
            println!("{}", render_reading(&self.monitor.tick()));
        }
    }
}

fn prompt(identity: Option<&Identity>) {
    match identity {
        Some(who) => print!("{}> ", who.name),
        None => print!("> "),
    }
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with rendered views
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "refuge_node=warn,refuge_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    std::fs::create_dir_all(&config.data_dir)?;
    let storage = Arc::new(Storage::open(&config.data_dir)?);

    let session = ShelterSession::new(config.build_source()?);
    let polling = session.start_polling(config.poll_interval);

    let mut app = App {
        session,
        accounts: LocalAccounts::new(storage),
        monitor: EnvironmentMonitor::new(config.seed),
        identity: None,
    };

    print_usage();
    println!();
    print!("{}", render(&app.session.snapshot().await));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(app.identity.as_ref());
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_command(&line) {
            Ok(command) => {
                if !app.execute(command).await {
                    break;
                }
            }
            Err(msg) if msg.is_empty() => {}
            Err(msg) => eprintln!("{msg} (try 'help')"),
        }
    }

    polling.stop().await;
    Ok(())
}
