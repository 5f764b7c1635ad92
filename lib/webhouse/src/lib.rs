mod alarm;
pub use alarm::{Alarm, AlarmSignal, AlarmState, Transition};

mod command;
pub use command::{encode, Command};

pub mod console;
pub use console::{ConsoleLog, LogSink, Style};

mod debounce;
pub use debounce::Debouncer;

mod device;
pub use device::{DeviceId, Domain, Level, UnknownDevice, Value};

mod error;
pub use error::Error;

pub mod floor_plan;
pub use floor_plan::{Rect, Sprite, Surface};

mod panel;
pub use panel::{AudioPlayer, Event, Panel, Transport};

mod registry;
pub use registry::DeviceRegistry;

mod sync;
pub use sync::{Applied, Rejected, Synchronizer};

mod update;
pub use update::{decode, is_truthy, Field, InboundUpdate};

mod ws_client;
pub use ws_client::{Frame, WsClient, WsError};

pub type Result<T> = std::result::Result<T, Error>;
