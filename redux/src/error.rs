use thiserror::Error;

/// Failures while reading a plain PPM image.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File is not of P3 magic number (found {found:?})")]
    InvalidMagic { found: String },
    #[error("Malformed or missing {field} in header")]
    MalformedHeader { field: &'static str },
    #[error("Malformed channel value in pixel {index}")]
    MalformedPixel { index: usize },
    #[error("Pixel data is truncated ({got} of {expected} pixels read)")]
    Truncated { expected: usize, got: usize },
    #[error("Empty pixel data set from input stream")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClusterError {
    #[error("Image data not found (empty data set)")]
    EmptyImage,
    #[error("Cannot form {k} clusters out of {pixels} pixels")]
    InvalidClusterCount { k: usize, pixels: usize },
    #[error("Cluster {cluster} has no pixels to compute a centroid from")]
    EmptyCluster { cluster: usize },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Reduced palette not found (the image was never clustered)")]
    NoPalette,
    #[error("Cannot write reduced image: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Pixel index {got} is out of bounds ({count} pixels are stored in the image)")]
pub struct IndexError {
    pub got: usize,
    pub count: usize,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error while loading image: {0}")]
    Load(#[from] LoadError),
    #[error("Error while clustering: {0}")]
    Cluster(#[from] ClusterError),
    #[error("Error while exporting: {0}")]
    Export(#[from] ExportError),
}
