//! CLI scraper for the Python documentation site and the PEP index.

pub mod cli;
pub mod error;
pub mod output;
pub mod parse;
pub mod pep;
pub mod process;
pub mod progress;
pub mod request;

pub use error::{Error, Result};

/// Root of the Python 3 documentation.
pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
/// Root of the PEP index.
pub const PEP_URL: &str = "https://peps.python.org/";

/// Timestamp embedded in result file names.
const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
/// Where `--output file` results land.
const RESULTS_DIR: &str = "results";
/// Where the `download` mode stores archives.
const DOWNLOADS_DIR: &str = "downloads";
/// On-disk page cache shared between runs.
const CACHE_DIR: &str = "http_cache";
