// Library root
// -----------
// The binary (`main.rs`) is a thin dispatcher over these modules.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the CloudLabel REST API (asset listing,
//   thumbnail download, dataset upload).
// - `asset`: asset records and thumbnail file naming.
// - `sync`: the asset/thumbnail synchronization routine.
// - `upload`: dry-run vs real upload dispatch and local file collection.
// - `config`: connection settings and the saved token file.
// - `cli`: command-line arguments.
// - `ui`: progress bar, output and prompts.
//
// `sync` and `upload` only see the `AssetSource` / `DatasetClient` traits,
// so they are tested against mocks instead of a live service.
pub mod api;
pub mod asset;
pub mod cli;
pub mod config;
pub mod error;
pub mod sync;
pub mod ui;
pub mod upload;

pub use error::{CloudLabelError, Result};
