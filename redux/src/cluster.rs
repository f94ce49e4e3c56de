use crate::{
    color::{Color, Pixel},
    error::ClusterError,
};

/// A centroid together with the pixels assigned to it during the current iteration.
///
/// Members are stored as indices into the image's pixel buffer and rebuilt on every
/// assignment pass.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub centroid: Color,
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn new(centroid: Color) -> Self {
        Self {
            centroid,
            members: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Computes the centroid of this cluster's current members.
    ///
    /// A cluster does not know its own position, so an `EmptyCluster` error always reports
    /// cluster 0.
    pub fn compute_centroid(&self, pixels: &[Pixel]) -> Result<Color, ClusterError> {
        compute_centroid(self.members.iter().map(|&index| pixels[index].color))
    }
}

/// Returns the per-channel mean of `colors`, truncated toward zero.
pub fn compute_centroid<I>(colors: I) -> Result<Color, ClusterError>
where
    I: IntoIterator<Item = Color>,
{
    let (sum, count) = colors
        .into_iter()
        .fold(([0.0; 3], 0usize), |([r, g, b], count), color| {
            ([r + color.r, g + color.g, b + color.b], count + 1)
        });
    if count == 0 {
        return Err(ClusterError::EmptyCluster { cluster: 0 });
    }
    Ok(Color::from_array(sum.map(|x| x / count as f64)).trunc())
}
