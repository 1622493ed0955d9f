//! Line-oriented console for the match server.
//!
//! Stands in for the network layer: each line names a connection id and a
//! request, and outbound events are printed as JSON lines. With
//! `--log-events` they go to the tracing log instead.
//!
//! Usage: `match_server [--log-events] [config.toml]`
//!
//! ```text
//! 1 match alice        2 match bob
//! 1 move e2 e4         2 move e7e5
//! 1 chat good luck     2 resign
//! 1 board              1 leave
//! status               quit
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use match_server::{
    ChannelNotifier, ConnId, LogNotifier, MatchService, MoveOutcome, Notifier, ServerConfig,
    logging,
};
use tracing::info;

fn main() -> Result<()> {
    let mut log_events = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--log-events" => log_events = true,
            _ => config_path = Some(arg),
        }
    }

    let config = match config_path {
        Some(path) => ServerConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => ServerConfig::default(),
    };
    logging::init(&config.log_level)?;
    info!(?config, log_events, "match server console");

    let (notifier, printer): (Arc<dyn Notifier>, _) = if log_events {
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        (notifier, None)
    } else {
        let (notifier, events) = ChannelNotifier::new();
        let printer = thread::Builder::new()
            .name("event-printer".to_string())
            .spawn(move || {
                let mut stdout = io::stdout();
                for (conn, event) in events {
                    if let Ok(json) = event.to_json() {
                        writeln!(stdout, "-> {} {}", conn.0, json).ok();
                        stdout.flush().ok();
                    }
                }
            })?;
        let notifier: Arc<dyn Notifier> = Arc::new(notifier);
        (notifier, Some(printer))
    };

    let service = MatchService::new(config, notifier);
    let runner = service.start_clock()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&head) = parts.first() else {
            continue;
        };

        match head {
            "quit" => break,
            "status" => {
                let stats = service.stats();
                writeln!(stdout, "waiting {} active {}", stats.waiting, stats.active)?;
                service.log_status();
            }
            _ => {
                let Ok(id) = head.parse::<u64>() else {
                    writeln!(stdout, "unknown command: {head}")?;
                    continue;
                };
                let reply = handle(&service, ConnId(id), &parts[1..]);
                writeln!(stdout, "{reply}")?;
            }
        }
        stdout.flush()?;
    }

    runner.stop();
    drop(service);
    if let Some(printer) = printer {
        printer.join().ok();
    }
    Ok(())
}

fn handle(service: &MatchService, conn: ConnId, args: &[&str]) -> String {
    match args {
        ["match", name @ ..] => format!("{:?}", service.request_match(conn, &name.join(" "))),
        ["cancel"] => format!("{:?}", service.cancel_match(conn)),
        ["move", mv] if mv.len() == 4 && mv.is_ascii() => submit(service, conn, &mv[..2], &mv[2..]),
        ["move", from, to] => submit(service, conn, from, to),
        ["resign"] => format!("{:?}", service.resign(conn)),
        ["chat", words @ ..] => format!("{:?}", service.send_chat(conn, &words.join(" "))),
        ["leave"] => format!("{:?}", service.on_disconnect(conn)),
        ["board"] => match service.snapshot(conn) {
            Some(s) => format!(
                "{} you={} to_move={} white_ms={} black_ms={} fen={}",
                s.match_id,
                s.color,
                s.side_to_move,
                s.clock.white_ms,
                s.clock.black_ms,
                s.fen
            ),
            None => "not in a match".to_string(),
        },
        _ => "usage: <conn> match <name> | cancel | move <from> <to> | resign | chat <text> | leave | board"
            .to_string(),
    }
}

fn submit(service: &MatchService, conn: ConnId, from: &str, to: &str) -> String {
    match service.submit_move(conn, from, to) {
        MoveOutcome::Accepted(report) => match report.ended {
            Some(end) => format!("accepted {from}{to}, game over: {}", end.result()),
            None => format!("accepted {from}{to}"),
        },
        MoveOutcome::Rejected(reason) => format!("rejected: {reason}"),
    }
}
