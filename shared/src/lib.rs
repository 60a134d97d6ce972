// lib.rs - TrackIt shared client core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod model;

pub use app::{App, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use config::ClientConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{ClientError, TokenError};
pub use event::{Event, Failure, ResourceKind, ServerError};
pub use model::{AuthToken, Device, DeviceDelta, DeviceId, DeviceSnapshot, Model, TokenState};
