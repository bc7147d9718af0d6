// drafter-core/src/bin/suggest_probe.rs

use anyhow::{Context, Result};
use drafter_core::util::{init_tracing, install_panic_hook};
use drafter_core::{
    apply_with, ApplyMode, DrafterConfig, FetchState, SuggestionClient, SuggestionFetcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

fn config_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn print_state(state: &FetchState) {
    if state.loading {
        eprintln!("[suggest_probe] loading suggestions…");
    }
    if let Some(err) = &state.error {
        eprintln!("[suggest_probe] error: {}", err);
    }
    for (i, s) in state.suggestions.iter().enumerate() {
        println!("  [{}] {:?} -> {:?}  ({})", i, s.context, s.replacement, s.reason);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    install_panic_hook();

    let config = DrafterConfig::load(config_path().as_deref()).context("loading config")?;
    eprintln!(
        "[suggest_probe] starting against {} (Ctrl+C to exit)",
        config.api_base_url
    );
    eprintln!("[suggest_probe] lines append to the draft; :set <text>, :clear, :show, :apply N, :apply-all N, exit");

    let mut client = SuggestionClient::new(&config.api_base_url);
    if let Some(token) = &config.api_token {
        client = client.with_token(token);
    }
    let fetcher = SuggestionFetcher::spawn(Arc::new(client), config.fetcher());

    // Task: print every published state.
    let mut updates = fetcher.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            print_state(&state);
        }
    });

    let mut text = String::new();
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\n[suggest_probe] Ctrl+C received, exiting…");
                break;
            }

            line = lines.next_line() => {
                let Some(line) = line.context("stdin read failed")? else {
                    eprintln!("\n[suggest_probe] stdin closed, exiting…");
                    break;
                };

                match parse_command(&line) {
                    Command::Exit => break,
                    Command::Show => {
                        println!("{}", text);
                        print_state(&fetcher.state());
                        continue;
                    }
                    Command::Apply(mode, index) => {
                        let state = fetcher.state();
                        let Some(suggestion) = state.suggestions.get(index) else {
                            eprintln!("[suggest_probe] no suggestion #{}", index);
                            continue;
                        };
                        match apply_with(mode, &text, suggestion) {
                            Ok(updated) => text = updated,
                            Err(stale) => {
                                eprintln!("[suggest_probe] {}; keep editing to refresh suggestions", stale);
                                continue;
                            }
                        }
                    }
                    Command::Clear => text.clear(),
                    Command::Set(rest) => text = rest.to_string(),
                    Command::Append(raw) => {
                        if !text.is_empty() {
                            text.push('\n');
                        }
                        text.push_str(raw);
                    }
                }

                fetcher.update(text.clone()).context("fetcher update failed")?;
            }
        }
    }

    fetcher.shutdown().await;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Exit,
    Show,
    Clear,
    Apply(ApplyMode, usize),
    Set(&'a str),
    /// Anything else is draft text, kept untrimmed.
    Append(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        return Command::Exit;
    }
    match trimmed {
        ":show" => return Command::Show,
        ":clear" => return Command::Clear,
        _ => {}
    }
    if let Some((mode, index)) = parse_apply(trimmed) {
        return Command::Apply(mode, index);
    }
    match trimmed.strip_prefix(":set ") {
        Some(rest) => Command::Set(rest),
        None => Command::Append(line),
    }
}

fn parse_apply(input: &str) -> Option<(ApplyMode, usize)> {
    let (mode, rest) = if let Some(rest) = input.strip_prefix(":apply-all ") {
        (ApplyMode::All, rest)
    } else if let Some(rest) = input.strip_prefix(":apply ") {
        (ApplyMode::First, rest)
    } else {
        return None;
    };
    rest.trim().parse().ok().map(|i| (mode, i))
}
