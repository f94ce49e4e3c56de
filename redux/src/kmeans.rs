//! K-means clustering of pixel colors.

use serde::Deserialize;
use tracing::{debug, info, info_span, trace, warn};

use crate::{
    cluster::Cluster,
    color::{Color, Pixel},
    error::ClusterError,
    palette,
};

/// What to do with a cluster that ends up with no pixels after an assignment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyClusterPolicy {
    /// Move the cluster onto the pixel that is currently farthest from its nearest centroid.
    /// If every pixel already coincides with a centroid, the cluster is left where it is.
    #[default]
    Reseed,
    /// Leave the centroid where it is. The resulting palette may then contain fewer than `k`
    /// distinct colors.
    Retain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Options {
    /// Upper bound on the number of assign/update rounds. Reaching it is not an error; the
    /// centroids computed so far are returned.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub empty_clusters: EmptyClusterPolicy,
    /// Search for the closest centroid of each pixel on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_max_iterations() -> usize {
    300
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            empty_clusters: EmptyClusterPolicy::default(),
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeded,
    Assigning,
    Updating,
    Converged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    Converged { iterations: usize },
    DidNotConverge { iterations: usize },
}

/// The outcome of a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Final centroids, in seeding order.
    pub palette: Vec<Color>,
    pub convergence: Convergence,
}

impl Report {
    pub fn iterations(&self) -> usize {
        match self.convergence {
            Convergence::Converged { iterations } | Convergence::DidNotConverge { iterations } => {
                iterations
            }
        }
    }

    pub fn converged(&self) -> bool {
        matches!(self.convergence, Convergence::Converged { .. })
    }
}

/// Seeds `k` clusters from pixels spread evenly across the buffer: cluster `i` starts at pixel
/// `i * n / k`.
pub fn seed(pixels: &[Pixel], k: usize) -> Result<Vec<Cluster>, ClusterError> {
    let n = pixels.len();
    if n == 0 {
        return Err(ClusterError::EmptyImage);
    }
    if k == 0 || k > n {
        return Err(ClusterError::InvalidClusterCount { k, pixels: n });
    }
    Ok((0..k)
        .map(|i| {
            let pixel = &pixels[i * n / k];
            debug!(cluster = i, pixel = pixel.index, "seeded cluster");
            Cluster::new(pixel.color)
        })
        .collect())
}

/// A single k-means run over a borrowed pixel buffer.
pub struct KMeans<'a> {
    pixels: &'a [Pixel],
    clusters: Vec<Cluster>,
    options: Options,
    phase: Phase,
    iterations: usize,
}

impl<'a> KMeans<'a> {
    pub fn new(pixels: &'a [Pixel], k: usize, options: Options) -> Result<Self, ClusterError> {
        Ok(Self {
            pixels,
            clusters: seed(pixels, k)?,
            options,
            phase: Phase::Seeded,
            iterations: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The number of completed assign/update rounds.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn centroids(&self) -> Vec<Color> {
        self.clusters.iter().map(|cluster| cluster.centroid).collect()
    }

    /// Sum of squared distances from every pixel to its closest centroid.
    pub fn inertia(&self) -> f64 {
        let centroids = self.centroids();
        self.pixels
            .iter()
            .map(|pixel| palette::find_closest_with_distance(pixel.color, &centroids).1)
            .sum()
    }

    /// Runs one assignment pass followed by one update pass. Does nothing once converged.
    pub fn step(&mut self) -> Result<Phase, ClusterError> {
        if self.phase == Phase::Converged {
            return Ok(self.phase);
        }

        self.phase = Phase::Assigning;
        self.assign();

        self.phase = Phase::Updating;
        let changed = self.update()?;
        self.iterations += 1;
        trace!(iteration = self.iterations, changed, "k-means iteration");

        self.phase = if changed == 0 {
            Phase::Converged
        } else {
            Phase::Assigning
        };
        Ok(self.phase)
    }

    /// Iterates until the centroids settle or the iteration limit is reached.
    pub fn run(mut self) -> Result<Report, ClusterError> {
        let _span = info_span!("kmeans", k = self.clusters.len(), pixels = self.pixels.len())
            .entered();

        while self.phase != Phase::Converged {
            if self.iterations >= self.options.max_iterations {
                warn!(
                    iterations = self.iterations,
                    "centroids did not settle, returning best-effort palette"
                );
                return Ok(Report {
                    palette: self.centroids(),
                    convergence: Convergence::DidNotConverge {
                        iterations: self.iterations,
                    },
                });
            }
            self.step()?;
        }

        info!(iterations = self.iterations, "clustering converged");
        Ok(Report {
            palette: self.centroids(),
            convergence: Convergence::Converged {
                iterations: self.iterations,
            },
        })
    }

    fn assign(&mut self) {
        for cluster in &mut self.clusters {
            cluster.members.clear();
        }

        let centroids = self.centroids();
        let assignments = palette::assign(self.pixels, &centroids, self.options.parallel);
        for (pixel, cluster) in assignments.into_iter().enumerate() {
            self.clusters[cluster].members.push(pixel);
        }
    }

    /// Recomputes centroids from the current members and returns how many clusters moved.
    fn update(&mut self) -> Result<usize, ClusterError> {
        let mut changed = 0;
        let mut empty = vec![];

        for (i, cluster) in self.clusters.iter_mut().enumerate() {
            if cluster.is_empty() {
                empty.push(i);
                continue;
            }
            let previous = cluster.centroid;
            cluster.centroid = cluster
                .compute_centroid(self.pixels)
                .map_err(|_| ClusterError::EmptyCluster { cluster: i })?;
            if !previous.approx_eq(cluster.centroid) {
                changed += 1;
            }
        }

        if !empty.is_empty() {
            match self.options.empty_clusters {
                EmptyClusterPolicy::Reseed => changed += self.reseed(&empty),
                EmptyClusterPolicy::Retain => {
                    debug!(clusters = ?empty, "retaining stale centroids of empty clusters")
                }
            }
        }

        Ok(changed)
    }

    /// Moves each of the `empty` clusters onto the pixel farthest from its closest centroid.
    /// Returns the number of clusters that were moved.
    fn reseed(&mut self, empty: &[usize]) -> usize {
        let centroids = self.centroids();
        let mut distances: Vec<f64> = self
            .pixels
            .iter()
            .map(|pixel| palette::find_closest_with_distance(pixel.color, &centroids).1)
            .collect();

        let mut reseeded = 0;
        for &cluster in empty {
            let (farthest, distance) = distances.iter().copied().enumerate().fold(
                (0, 0.0),
                |(best, best_distance), (i, distance)| {
                    if distance > best_distance {
                        (i, distance)
                    } else {
                        (best, best_distance)
                    }
                },
            );
            if distance <= 0.0 {
                debug!(cluster, "every pixel coincides with a centroid, cluster stays empty");
                break;
            }

            let color = self.pixels[farthest].color;
            debug!(cluster, pixel = self.pixels[farthest].index, "reseeding empty cluster");
            self.clusters[cluster].centroid = color;
            for (nearest, pixel) in distances.iter_mut().zip(self.pixels) {
                *nearest = nearest.min(pixel.color.distance_squared(color));
            }
            reseeded += 1;
        }
        reseeded
    }
}

/// Clusters `pixels` into `k` colors.
pub fn cluster(pixels: &[Pixel], k: usize, options: Options) -> Result<Report, ClusterError> {
    KMeans::new(pixels, k, options)?.run()
}
