use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config TOML deserialization error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Missing `{0}`; set it in the config file or pass it on the command line")]
    Missing(&'static str),

    #[error(transparent)]
    Redux(#[from] redux::Error),
}
