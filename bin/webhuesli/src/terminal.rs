use std::io::Write;
use std::time::Duration;

use log::{trace, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use webhouse::{
    AudioPlayer, ConsoleLog, LogSink, Panel, Rect, Sprite, Style, Surface, Transport,
};

const BELL_INTERVAL: Duration = Duration::from_secs(1);

pub type TerminalPanel = Panel<Outbox, Bell, Console, TextSurface>;

#[derive(Clone, Debug, PartialEq)]
pub enum Outgoing {
    Text(String),
    Close,
}

// the event loop owns the connection
pub struct Outbox {
    tx: UnboundedSender<Outgoing>,
}

impl Outbox {
    pub fn new(tx: UnboundedSender<Outgoing>) -> Self {
        Self { tx }
    }
}

impl Transport for Outbox {
    fn send(&mut self, text: &str) -> webhouse::Result<()> {
        self.tx
            .send(Outgoing::Text(text.to_string()))
            .map_err(|_| webhouse::Error::TransportClosed)
    }

    fn close(&mut self) {
        if self.tx.send(Outgoing::Close).is_err() {
            warn!("event loop is gone, nothing to close");
        }
    }
}

#[derive(Default)]
pub struct Bell {
    ringing: Option<JoinHandle<()>>,
}

impl Bell {
    pub fn is_ringing(&self) -> bool {
        self.ringing.is_some()
    }
}

impl AudioPlayer for Bell {
    fn play(&mut self) {
        if self.ringing.is_some() {
            return;
        }

        self.ringing = Some(tokio::spawn(async {
            let mut interval = tokio::time::interval(BELL_INTERVAL);

            loop {
                interval.tick().await;

                let mut stderr = std::io::stderr();
                _ = stderr.write_all(b"\x07");
                _ = stderr.flush();
            }
        }));
    }

    fn pause(&mut self) {
        if let Some(handle) = self.ringing.take() {
            handle.abort();
        }
    }
}

impl Drop for Bell {
    fn drop(&mut self) {
        self.pause();
    }
}

#[derive(Default)]
pub struct TextSurface {
    alarm_shown: bool,
}

impl TextSurface {
    pub fn is_alarm_shown(&self) -> bool {
        self.alarm_shown
    }
}

impl Surface for TextSurface {
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect, alpha: f32) {
        trace!(
            "draw {} at {},{} {}x{} alpha {alpha:.2}",
            sprite.file_name(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
    }

    fn show_alarm(&mut self, text: &str) {
        self.alarm_shown = true;
        println!("\n!!! {text} Type `reset` to acknowledge. !!!\n");
    }

    fn hide_alarm(&mut self) {
        if self.alarm_shown {
            self.alarm_shown = false;
            println!("alarm acknowledged");
        }
    }
}

#[derive(Default)]
pub struct Console {
    history: ConsoleLog,
}

impl Console {
    pub fn history(&self) -> &ConsoleLog {
        &self.history
    }
}

impl LogSink for Console {
    fn append(&mut self, text: &str, style: Style) {
        println!("{}", styled(text, style));
        self.history.append(text, style);
    }

    fn clear(&mut self) {
        self.history.clear();
    }
}

// a failed write leaves the socket unusable
pub fn is_connection_lost(err: &webhouse::Error) -> bool {
    matches!(
        err,
        webhouse::Error::TransportClosed | webhouse::Error::WebSocket(_)
    )
}

pub fn styled(text: &str, style: Style) -> String {
    match style {
        Style::Plain => text.to_string(),
        Style::Sent | Style::Received => format!("\x1b[34m{text}\x1b[0m"),
        Style::Error => format!("\x1b[31m{text}\x1b[0m"),
    }
}
