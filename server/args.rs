use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use fakescope::config::{ServiceConfig, StoreKind, DEFAULT_ADDR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreArg {
    /// Keep heatmaps in process memory
    Memory,
    /// Write heatmaps as files under --store-dir
    Dir,
}

/// fakescope detection server
#[derive(Parser, Debug)]
#[command(name = "fakescope-server", version, about, long_about = None)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "FAKESCOPE_BIND", default_value = DEFAULT_ADDR, value_name = "HOST:PORT")]
    pub bind: String,

    /// Heatmap storage backend
    #[arg(long, env = "FAKESCOPE_STORE", value_enum, default_value = "memory")]
    pub store: StoreArg,

    /// Directory for the `dir` backend (default: system temp dir)
    #[arg(long, env = "FAKESCOPE_STORE_DIR", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// JPEG quality of served heatmaps (1-100)
    #[arg(long, env = "FAKESCOPE_JPEG_QUALITY", default_value = "90")]
    pub jpeg_quality: u8,

    /// Fixed verdict reported for every image
    #[arg(long, env = "FAKESCOPE_VERDICT_FAKE")]
    pub verdict_fake: bool,

    /// Fixed confidence reported for every image (0.0 - 1.0)
    #[arg(long, env = "FAKESCOPE_VERDICT_CONFIDENCE", default_value = "0.0")]
    pub verdict_confidence: f32,
}

impl Args {
    pub fn into_config(self) -> ServiceConfig {
        let store = match self.store {
            StoreArg::Memory => StoreKind::Memory,
            StoreArg::Dir => StoreKind::Dir(
                self.store_dir
                    .unwrap_or_else(|| std::env::temp_dir().join("fakescope-heatmaps")),
            ),
        };
        ServiceConfig {
            bind: self.bind,
            store,
            jpeg_quality: self.jpeg_quality,
            verdict_fake: self.verdict_fake,
            verdict_confidence: self.verdict_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_defaults() {
        let args = Args::try_parse_from(["fakescope-server"]).unwrap();
        assert_eq!(args.into_config(), ServiceConfig::default());
    }

    #[test]
    fn dir_store_uses_given_directory() {
        let args = Args::try_parse_from([
            "fakescope-server", "--store", "dir", "--store-dir", "/srv/heatmaps",
        ]).unwrap();
        assert_eq!(args.into_config().store, StoreKind::Dir(PathBuf::from("/srv/heatmaps")));
    }
}
