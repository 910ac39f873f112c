//! Runtime configuration from command-line flags, falling back to the
//! environment and then to defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "wine-quality-service", version, about)]
pub struct Config {
    /// Dataset file to load at startup (.csv, .json or .parquet).
    #[arg(long = "dataset", env = "WINE_DATASET_PATH", value_name = "PATH", default_value = "winequality.csv")]
    pub dataset_path: PathBuf,

    /// Address the HTTP server listens on.
    #[arg(long = "bind", env = "WINE_BIND_ADDR", value_name = "ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Directory the histogram images are written to.
    #[arg(long = "output-dir", env = "WINE_OUTPUT_DIR", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}
