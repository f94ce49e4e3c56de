use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use redux::Options;
use serde::Deserialize;

use crate::error::Error;

pub const PATH: &str = "ppmredux.toml";

#[derive(Deserialize, Default, Debug)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub reduction: ReductionConfig,
}

#[derive(Deserialize, Debug)]
pub struct InputConfig {
    /// The directory the input image is read from.
    #[serde(default = "current_dir")]
    pub directory: PathBuf,
    /// The base name of the input image, without its extension. Also used to name the output.
    pub name: Option<String>,
    /// The extension shared by the input and output files.
    #[serde(default = "ppm_extension")]
    pub extension: String,
}

#[derive(Deserialize, Debug)]
pub struct OutputConfig {
    /// The directory the reduced image is written to.
    #[serde(default = "current_dir")]
    pub directory: PathBuf,
}

#[derive(Deserialize, Default, Debug)]
pub struct ReductionConfig {
    /// The number of colors to reduce the image to.
    pub k: Option<usize>,
    #[serde(flatten)]
    pub options: Options,
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

fn ppm_extension() -> String {
    String::from("ppm")
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directory: current_dir(),
            name: None,
            extension: ppm_extension(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: current_dir(),
        }
    }
}

/// Command line overrides for values from the config file.
#[derive(clap::Args, Default, Debug)]
pub struct Overrides {
    /// The number of colors to reduce the image to.
    #[clap(short, long)]
    pub k: Option<usize>,
    /// The directory the input image is read from.
    #[clap(long)]
    pub input_dir: Option<PathBuf>,
    /// The base name of the input image, without its extension.
    #[clap(long)]
    pub name: Option<String>,
    /// The directory the reduced image is written to.
    #[clap(long)]
    pub output_dir: Option<PathBuf>,
    /// Give up on convergence after this many iterations.
    #[clap(long)]
    pub max_iterations: Option<usize>,
    /// Search for closest colors on all cores.
    #[clap(long)]
    pub parallel: bool,
}

/// A fully resolved reduction job.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub k: usize,
    pub options: Options,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Loads the config from `path`. When no path is given, [`PATH`] is tried and a missing
    /// file falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(PATH), false),
        };
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(error) if error.kind() == ErrorKind::NotFound && !required => {
                tracing::debug!("no config file at {path:?}, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(Error::ConfigRead {
                path: path.to_owned(),
                source,
            }),
        }
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(k) = overrides.k {
            self.reduction.k = Some(k);
        }
        if let Some(directory) = overrides.input_dir {
            self.input.directory = directory;
        }
        if let Some(name) = overrides.name {
            self.input.name = Some(name);
        }
        if let Some(directory) = overrides.output_dir {
            self.output.directory = directory;
        }
        if let Some(max_iterations) = overrides.max_iterations {
            self.reduction.options.max_iterations = max_iterations;
        }
        self.reduction.options.parallel |= overrides.parallel;
    }

    pub fn job(&self) -> Result<Job, Error> {
        let name = self.input.name.as_deref().ok_or(Error::Missing("name"))?;
        let k = self.reduction.k.ok_or(Error::Missing("k"))?;
        let extension = &self.input.extension;
        Ok(Job {
            input: self.input.directory.join(format!("{name}.{extension}")),
            output: self
                .output
                .directory
                .join(output_file_name(name, k, extension)),
            k,
            options: self.reduction.options.clone(),
        })
    }
}

/// Derives the name of the reduced image from the input's base name.
pub fn output_file_name(name: &str, k: usize, extension: &str) -> String {
    format!("{name}_K{k}_OUTPUT.{extension}")
}
