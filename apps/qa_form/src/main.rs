use std::{
    io::{self, BufRead},
    path::PathBuf,
    thread,
};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::Result;
use clap::Parser;
use client_core::{HttpQaClient, QaClient};
use crossbeam_channel::{bounded, never, select, Receiver};
use tracing::info;

use backend_bridge::runtime;
use config::{load_settings, validate_backend_url};
use controller::{
    events::UiEvent, orchestration::dispatch_backend_command, reducer::FormState,
};
use ui::{
    input::{parse_line, InputCommand, HELP_TEXT},
    render::render_form,
};

const COMMAND_QUEUE_CAPACITY: usize = 64;
const EVENT_QUEUE_CAPACITY: usize = 256;

enum Incoming {
    Line(String),
    InputClosed,
    Event(UiEvent),
    WorkerGone,
}

#[derive(Parser, Debug)]
#[command(about = "Upload PDFs and ask questions about them")]
struct Cli {
    /// Base address of the question-answering backend.
    #[arg(long)]
    backend_url: Option<String>,
    /// Config file (defaults to ./qa_form.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(backend_url) = cli.backend_url {
        settings.backend_url = backend_url;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.request_timeout_secs = Some(timeout_secs);
    }
    if let Some(log_filter) = cli.log_filter {
        settings.log_filter = log_filter;
    }

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(io::stderr)
        .init();

    let backend_url = validate_backend_url(&settings.backend_url)?;
    info!(%backend_url, timeout = ?settings.request_timeout(), "starting qa form");
    let client = HttpQaClient::with_timeout(&backend_url, settings.request_timeout())?;

    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = bounded(EVENT_QUEUE_CAPACITY);
    let worker = runtime::launch(cmd_rx, ui_tx, QaClient::new(client));

    let mut state = FormState::default();
    let mount = state.mount();
    dispatch_backend_command(&cmd_tx, mount, &mut state);
    println!("{HELP_TEXT}");

    let mut input_rx = spawn_input_reader();
    let mut input_closed = false;
    loop {
        let incoming = select! {
            recv(input_rx) -> line => line.map_or(Incoming::InputClosed, Incoming::Line),
            recv(ui_rx) -> event => event.map_or(Incoming::WorkerGone, Incoming::Event),
        };

        match incoming {
            Incoming::Line(line) => match parse_line(&line) {
                InputCommand::Quit => break,
                InputCommand::Help => println!("{HELP_TEXT}"),
                InputCommand::Show => println!("{}", render_form(&state)),
                InputCommand::Empty => {}
                InputCommand::Unknown(message) => println!("{message}"),
                InputCommand::Actions(actions) => {
                    for action in actions {
                        if let Some(cmd) = state.handle(action) {
                            dispatch_backend_command(&cmd_tx, cmd, &mut state);
                        }
                    }
                    println!("{}", render_form(&state));
                }
            },
            Incoming::InputClosed => {
                input_closed = true;
                input_rx = never();
            }
            Incoming::Event(event) => {
                if let Some(cmd) = state.apply(event) {
                    dispatch_backend_command(&cmd_tx, cmd, &mut state);
                }
                println!("{}", render_form(&state));
            }
            Incoming::WorkerGone => break,
        }

        // stdin is done: finish in-flight requests, then exit
        if input_closed && state.is_idle() {
            break;
        }
    }

    drop(cmd_tx);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    Ok(())
}

fn spawn_input_reader() -> Receiver<String> {
    let (line_tx, line_rx) = bounded(16);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}
