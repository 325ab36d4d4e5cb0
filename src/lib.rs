//! Cascading address entry over the Philippine Standard Geographic Code tables:
//! region → province → city/municipality → barangay.

pub mod cache;
pub mod config;
pub mod dataset;
mod error;
pub mod models;
pub mod picker;
pub mod resolver;
pub mod search;
pub mod selection;

pub use cache::{CacheStats, LocationCache};
pub use config::{config_path, load_config, load_config_in, save_config, PickerConfig};
pub use dataset::{Dataset, IntegrityReport};
pub use error::{LocationError, SelectionError};
pub use models::{AnyNode, Barangay, City, Level, LocationNode, Province, Region, ResolvedAddress};
pub use picker::AddressPicker;
pub use resolver::{Lookup, Resolver};
pub use search::{filter_and_rank, DEFAULT_RESULT_CAP};
pub use selection::{AddressValue, PartialSelection, SelectionMachine, SelectionState, TypingPolicy};

/// Route `log` output through `env_logger` (`RUST_LOG` filters). Safe to call twice.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
