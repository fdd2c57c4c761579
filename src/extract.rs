//! k-means palette extraction.
//!
//! Clustering runs over plain sRGB triples with squared Euclidean distance.
//! The resulting clusters are ranked by how many pixels they hold.

use std::collections::HashMap;

use kmeans_colors::get_kmeans;
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::color::{Pixel, clamp_channel};
use crate::error::{PaletteError, Result};
use crate::preprocess::PixelSet;

/// Cluster indices from the k-means backend are `u8`.
pub const MAX_PALETTE_SIZE: usize = 256;

pub const DEFAULT_PALETTE_SIZE: usize = 5;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
pub const DEFAULT_CONVERGENCE: f32 = 1e-4;

/// One palette entry before presentation: a centroid and its membership.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub centroid: Pixel,
    pub count: usize,
}

/// Clusters ranked by descending count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub clusters: Vec<Cluster>,
    pub total_pixels: usize,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Fraction of sampled pixels held by `cluster`.
    pub fn share(&self, cluster: &Cluster) -> f32 {
        if self.total_pixels == 0 {
            0.0
        } else {
            cluster.count as f32 / self.total_pixels as f32
        }
    }
}

/// Knobs for a single k-means run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    pub k: usize,
    pub seed: u64,
    pub max_iterations: usize,
    pub convergence: f32,
}

impl Default for ClusterParams {
    fn default() -> Self {
        ClusterParams {
            k: DEFAULT_PALETTE_SIZE,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence: DEFAULT_CONVERGENCE,
        }
    }
}

/// Extract `k` dominant colors with the default iteration limits.
pub fn extract(pixels: &PixelSet, k: usize, seed: u64) -> Result<Palette> {
    extract_with(
        pixels,
        &ClusterParams {
            k,
            seed,
            ..ClusterParams::default()
        },
    )
}

/// Extract a palette with explicit k-means parameters.
pub fn extract_with(pixels: &PixelSet, params: &ClusterParams) -> Result<Palette> {
    let k = params.k;
    let total = pixels.len();
    if k == 0 || k > total {
        return Err(PaletteError::InvalidClusterCount {
            requested: k,
            available: total,
        });
    }
    if k > MAX_PALETTE_SIZE {
        return Err(PaletteError::invalid_parameter("palette_size", k));
    }
    if params.max_iterations == 0 {
        return Err(PaletteError::invalid_parameter("max_iterations", 0));
    }

    let distinct = distinct_colors(&pixels.pixels);
    log::debug!("{total} pixels, {} distinct colors, k = {k}", distinct.len());

    let mut clusters = if distinct.len() <= k {
        degenerate_clusters(&distinct, k)
    } else {
        kmeans_clusters(&pixels.pixels, params)
    };

    // Stable: equal counts keep cluster index order.
    clusters.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(Palette {
        clusters,
        total_pixels: total,
    })
}

/// Distinct colors with their counts, in order of first appearance.
fn distinct_colors(pixels: &[Pixel]) -> Vec<Cluster> {
    let mut index: HashMap<[u8; 3], usize> = HashMap::new();
    let mut distinct: Vec<Cluster> = Vec::new();

    for &p in pixels {
        let key = [p.red, p.green, p.blue];
        match index.get(&key) {
            Some(&i) => distinct[i].count += 1,
            None => {
                index.insert(key, distinct.len());
                distinct.push(Cluster { centroid: p, count: 1 });
            }
        }
    }

    distinct
}

/// With no more distinct colors than clusters, every color is its own
/// centroid; the remaining slots repeat the first color with no members.
fn degenerate_clusters(distinct: &[Cluster], k: usize) -> Vec<Cluster> {
    let mut clusters = distinct.to_vec();
    let filler = Cluster {
        centroid: distinct[0].centroid,
        count: 0,
    };
    clusters.resize(k, filler);
    clusters
}

fn kmeans_clusters(pixels: &[Pixel], params: &ClusterParams) -> Vec<Cluster> {
    let buf: Vec<Srgb> = pixels.iter().map(|p| p.into_format::<f32>()).collect();

    let kmeans = get_kmeans(
        params.k,
        params.max_iterations,
        params.convergence,
        false,
        &buf,
        params.seed,
    );
    log::debug!("k-means finished with score {}", kmeans.score);

    // Recompute every centroid as the exact mean of its final members.
    let mut sums = vec![[0u64; 3]; params.k];
    let mut counts = vec![0usize; params.k];
    for (p, &idx) in pixels.iter().zip(&kmeans.indices) {
        let idx = idx as usize;
        sums[idx][0] += p.red as u64;
        sums[idx][1] += p.green as u64;
        sums[idx][2] += p.blue as u64;
        counts[idx] += 1;
    }

    (0..params.k)
        .map(|idx| {
            let count = counts[idx];
            let centroid = if count == 0 {
                unit_to_pixel(kmeans.centroids[idx])
            } else {
                let n = count as f64;
                Srgb::new(
                    clamp_channel(sums[idx][0] as f64 / n),
                    clamp_channel(sums[idx][1] as f64 / n),
                    clamp_channel(sums[idx][2] as f64 / n),
                )
            };
            Cluster { centroid, count }
        })
        .collect()
}

/// Convert a backend centroid (channels in 0..=1) to 8-bit, rounded and clamped.
fn unit_to_pixel(c: Srgb) -> Pixel {
    Srgb::new(
        clamp_channel(c.red as f64 * 255.0),
        clamp_channel(c.green as f64 * 255.0),
        clamp_channel(c.blue as f64 * 255.0),
    )
}
