mod app;
pub mod backend;
pub mod bus;
pub mod cache;
mod cli;
mod config;
mod error;
pub mod location;
pub mod map;
pub mod metro;
pub mod preferences;
mod service;
pub mod storage;
pub mod utils;
pub mod voice;

pub use app::{App, LocatedPosition, locate, plan_routes, run_command};
pub use cli::{Cli, FiltersArgsBuilder, Mode, PositionArgsBuilder, PreferencesArgsBuilder};
pub use config::AppConfig;
pub use error::{AcError, AcResult, GeolocationError};
pub use service::{router, run_service};
pub use utils::Coordinates;
