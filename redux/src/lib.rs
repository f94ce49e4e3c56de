//! Palette reduction of plain PPM images through k-means clustering.

pub mod cluster;
pub mod color;
pub mod error;
pub mod image;
pub mod kmeans;
pub mod palette;
pub mod ppm;

pub use color::{Color, Pixel};
pub use error::{ClusterError, Error, ExportError, IndexError, LoadError};
pub use image::Image;
pub use kmeans::{Convergence, EmptyClusterPolicy, Options, Report};
pub use ppm::load;
