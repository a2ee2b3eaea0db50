//! Terminal client for the medbear comparison chat.
//!
//! A readline loop over [`ChatShell`]: plain lines are sent as messages and
//! the transcript's new display units print after every change; slash
//! commands cover history, restore, the account panel, and logout.

use anyhow::{Context, Result, bail};
use clap::Parser;
use dotenvy::dotenv;
use medbear_client::account::AccountPanel;
use medbear_client::api::ChatId;
use medbear_client::auth::Authenticator;
use medbear_client::chat::{DisplayUnit, display_units};
use medbear_client::config::Settings;
use medbear_client::{Backend, ChatShell, GuardAction, HttpBackend};
use std::io::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (if present) before clap reads the environment
    let _ = dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::parse();
    let backend = Arc::new(
        HttpBackend::new(&settings.server_url)
            .with_context(|| format!("invalid server url: {}", settings.server_url))?,
    ) as Arc<dyn Backend>;

    let login = match settings.username {
        Some(username) => username,
        None => prompt("Username or email: ")?,
    };
    let password = match settings.password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };

    let auth = Authenticator::new(Arc::clone(&backend));
    let session = match auth.log_in(&login, &password).await {
        Ok(session) => session,
        Err(notice) => bail!("{notice}"),
    };

    let mut shell = ChatShell::new(Arc::clone(&backend), session);
    if let GuardAction::RedirectToLogin { notice } = shell.activate().await {
        bail!("{}", notice.unwrap_or_else(|| "Please log in.".into()));
    }

    println!("{}", shell.greeting());
    println!("Type a message, or /history, /open <n>, /account, /logout, /quit.");

    repl(&mut shell, &backend).await
}

async fn repl(shell: &mut ChatShell, backend: &Arc<dyn Backend>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Display units already printed; pairing can merge rows, so this counts
    // units, not messages.
    let mut printed = 0usize;

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            // stdin closed; same exit path as /quit
            let _ = shell.notify_unload().await;
            return Ok(());
        };
        let line = line.trim().to_owned();

        match line.split_whitespace().next() {
            Some("/quit") => {
                // Hold the process open just long enough for the dispatch to
                // leave; the response itself is not interpreted.
                let _ = shell.notify_unload().await;
                return Ok(());
            }
            Some("/logout") => {
                if let GuardAction::RedirectToLogin { notice: Some(notice) } =
                    shell.log_out().await
                {
                    println!("{notice}");
                }
                return Ok(());
            }
            Some("/history") => show_history(shell).await,
            Some("/open") => {
                open_chat(shell, line.split_whitespace().nth(1), &mut printed).await;
            }
            Some("/account") => show_account(shell, backend).await,
            Some(command) if command.starts_with('/') => {
                println!("Unknown command: {command}");
            }
            _ => send_message(shell, &line, &mut printed).await,
        }
    }
}

async fn send_message(shell: &mut ChatShell, line: &str, printed: &mut usize) {
    let Some(turn) = shell.begin_turn(line) else {
        if !line.trim().is_empty() {
            println!("Cannot send right now.");
        }
        return;
    };
    print_new_units(shell, printed);
    println!("medbear is typing...");
    shell.settle_turn(turn).await;
    print_new_units(shell, printed);
}

async fn show_history(shell: &mut ChatShell) {
    match shell.open_history().await {
        Ok(chats) => {
            if chats.is_empty() {
                println!("No past chats.");
            }
            for (position, chat) in chats.iter().enumerate() {
                println!("{}. {}", position + 1, chat.display_label(position));
            }
        }
        Err(error) => {
            tracing::warn!(error = %error, "history list failed");
            println!("Could not load chat history.");
        }
    }
}

async fn open_chat(shell: &mut ChatShell, argument: Option<&str>, printed: &mut usize) {
    let Some(position) = argument.and_then(|raw| raw.parse::<usize>().ok()) else {
        println!("Usage: /open <n>");
        return;
    };

    let chat_id = match shell.open_history().await {
        Ok(chats) => position
            .checked_sub(1)
            .and_then(|index| chats.get(index))
            .map(|chat| chat.chat_id),
        Err(error) => {
            tracing::warn!(error = %error, "history list failed");
            None
        }
    };
    let Some(chat_id) = chat_id else {
        println!("No such chat.");
        return;
    };

    restore(shell, chat_id, printed).await;
}

async fn restore(shell: &mut ChatShell, chat_id: ChatId, printed: &mut usize) {
    match shell.restore_chat(chat_id).await {
        Ok(()) => {
            println!("--- restored ---");
            *printed = 0;
            print_new_units(shell, printed);
        }
        Err(error) => {
            tracing::warn!(error = %error, "chat restore failed");
            println!("Could not restore that chat.");
        }
    }
}

async fn show_account(shell: &mut ChatShell, backend: &Arc<dyn Backend>) {
    let mut panel = AccountPanel::new(Arc::clone(backend));
    match panel.load(shell.session()).await {
        Ok(profile) => {
            println!("Username: {}", profile.username);
            println!("Email:    {}", profile.email);
        }
        Err(notice) => println!("{notice}"),
    }
}

fn print_new_units(shell: &ChatShell, printed: &mut usize) {
    let units = display_units(shell.transcript());
    for unit in &units[*printed..] {
        match unit {
            DisplayUnit::Single(message) => {
                println!("{}: {}", message.sender.label(), message.text);
            }
            DisplayUnit::Pair {
                biomistral,
                meditron,
            } => {
                println!("BioMistral: {}", biomistral.text);
                println!("Meditron:   {}", meditron.text);
            }
        }
    }
    *printed = units.len();
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut value = String::new();
    std::io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_owned())
}
