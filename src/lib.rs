//! Keyboard-driven command palette: catalogue store, filter/rank engine and
//! navigation state machine, plus the terminal host that drives them.

pub mod actions;
pub mod app;
pub mod backend;
pub mod catalogue;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod filter;
pub mod offload;
pub mod state;
pub mod ui;


pub use catalogue::{Catalogue, LoadReport};
pub use config::{CatalogueFile, PaletteConfig};
pub use controller::{Palette, PaletteEvent, RankOutcome, RankRequest};
pub use error::PaletteError;
pub use filter::{rank, Heading, MatchTier, RankedList, Section};
pub use state::{Command, Direction, Group};
