//! Client-side mirror of the remote character collection.
//!
//! [`CharacterListController`] owns no list of its own: it drives a shared
//! [`CharacterStore`] from the responses of a [`CharacterApi`].

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod store;
pub mod view;

pub use api::{CharacterApi, HttpCharacterApi};
pub use config::{load_settings, parse_base_url, ClientSettings, DEFAULT_CONFIG_FILE};
pub use controller::{CharacterListController, ControllerEvent, Operation};
pub use error::{ApiError, ConfigError, ControllerError};
pub use store::{CharacterList, CharacterStore, StoreEvent, StoreSnapshot};
pub use view::{
    parse_field_assignments, FieldAssignmentsForm, FieldParseError, FormView, ListView,
    TextListView,
};

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
