use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::time::{self, timeout};

use webhouse::{DeviceId, Event, Frame, Panel, WsClient, WsError};
use webhuesli::{
    is_connection_lost, styled, Bell, Config, Console, Error, Input, Outbox, Outgoing,
    TerminalPanel, TextSurface, HELP,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const TICK_INTERVAL: Duration = Duration::from_millis(25);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    pretty_env_logger::init_timed();

    info!("webhuesli version {VERSION}");

    let config = Config::from_env()?;
    debug!("config {config:?}");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut panel = Panel::new(
        Outbox::new(tx),
        Bell::default(),
        Console::default(),
        TextSurface::default(),
    )
    .with_alarm_armed(config.alarm_armed)
    .with_debounce(config.debounce);

    let mut client = connect(&config, &mut panel).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = time::interval(TICK_INTERVAL);
    let debounced = !config.debounce.is_zero();
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        let reader = client.clone();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed, exiting...");
                    break;
                };

                if line.trim().is_empty() {
                    continue;
                }

                match Input::try_from(line.as_str()) {
                    Ok(Input::Panel(event)) => panel.handle(event),
                    Ok(Input::Connect) => {
                        if client.is_some() {
                            println!("already connected to {}", config.url);
                        } else {
                            client = connect(&config, &mut panel).await;
                        }
                    }
                    Ok(Input::ShowLog) => {
                        for entry in panel.log().history().entries() {
                            println!("{}", styled(&entry.to_string(), entry.style));
                        }
                    }
                    Ok(Input::ShowState) => print_state(&panel),
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Quit) => break,
                    Err(err) => println!("{err}"),
                }
            }
            frame = next_frame(reader) => match frame {
                Ok(Frame::Text(text)) => panel.handle(Event::MessageReceived(text)),
                Ok(Frame::Closed(reason)) => {
                    debug!("closed by controller: {reason:?}");
                    client = None;
                    panel.handle(Event::TransportClosed);
                }
                Err(WsError::StreamClosed) => {
                    client = None;
                    panel.handle(Event::TransportClosed);
                }
                Err(err @ WsError::WebSocketError(_)) => {
                    panel.handle(Event::TransportErrored(err.to_string()));
                    client = None;
                    panel.handle(Event::TransportClosed);
                }
                Err(err) => panel.handle(Event::TransportErrored(err.to_string())),
            },
            Some(outgoing) = rx.recv() => match outgoing {
                Outgoing::Text(text) => {
                    let Some(connection) = client.clone() else {
                        warn!("dropping {text}, not connected");
                        continue;
                    };

                    if let Err(err) = connection.send_text(&text).await {
                        let reason = format!("cannot send {text}: {err}");
                        panel.handle(Event::TransportErrored(reason));

                        if is_connection_lost(&err) {
                            client = None;
                            panel.handle(Event::TransportClosed);
                        }
                    }
                }
                Outgoing::Close => {
                    if let Some(connection) = client.take() {
                        if let Err(err) = connection.close().await {
                            debug!("cannot close {}: {err}", connection.url());
                        }
                        panel.handle(Event::TransportClosed);
                    }
                }
            },
            _ = tick.tick(), if debounced => panel.handle(Event::Tick),
            _ = sigterm.recv() => {
                info!("got SIGTERM, exiting...");
                break;
            }
        }
    }

    if let Some(connection) = client {
        _ = connection.close().await;
    }

    Ok(())
}

async fn connect(config: &Config, panel: &mut TerminalPanel) -> Option<WsClient> {
    info!("connecting to {}", config.url);

    let result = timeout(
        CONNECT_TIMEOUT,
        WsClient::connect(&config.url, config.protocol.as_deref()),
    )
    .await;

    match result {
        Ok(Ok(client)) => {
            panel.handle(Event::TransportOpened);
            Some(client)
        }
        Ok(Err(err)) => {
            error!("cannot connect to {}: {err}", config.url);
            panel.handle(Event::TransportErrored(format!(
                "cannot connect to {}: {err}",
                config.url
            )));
            None
        }
        Err(_) => {
            error!("timed out connecting to {}", config.url);
            panel.handle(Event::TransportErrored(format!(
                "timed out connecting to {}",
                config.url
            )));
            None
        }
    }
}

async fn next_frame(client: Option<WsClient>) -> Result<Frame, WsError> {
    match client {
        Some(client) => client.read_frame().await,
        None => std::future::pending().await,
    }
}

fn print_state(panel: &TerminalPanel) {
    let registry = panel.registry();

    for device in DeviceId::all() {
        println!("{device}: {}", device.describe(registry.get(device)));
    }

    println!("alarm: {}", panel.alarm_state());
    println!(
        "connection: {}",
        if panel.is_connected() {
            "open"
        } else {
            "closed"
        }
    );
}
