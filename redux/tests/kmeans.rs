mod helpers;

use helpers::{gray_image, noise_image, ppm_text};
use redux::{
    kmeans::{KMeans, Phase},
    ppm, Color, Convergence, EmptyClusterPolicy, Image, Options,
};

#[test]
fn every_pixel_belongs_to_exactly_one_cluster() {
    let image = noise_image(12, 9, 7);
    let mut kmeans = KMeans::new(&image.pixels, 6, Options::default()).unwrap();

    loop {
        let phase = kmeans.step().unwrap();

        let mut seen = vec![0usize; image.pixels.len()];
        for cluster in kmeans.clusters() {
            for &member in &cluster.members {
                seen[member] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));

        if phase == Phase::Converged || kmeans.iterations() >= 100 {
            break;
        }
    }
}

#[test]
fn inertia_does_not_increase_beyond_truncation() {
    let image = noise_image(16, 16, 42);
    let n = image.pixels.len() as f64;
    for policy in [EmptyClusterPolicy::Reseed, EmptyClusterPolicy::Retain] {
        let options = Options {
            empty_clusters: policy,
            ..Options::default()
        };
        let mut kmeans = KMeans::new(&image.pixels, 5, options).unwrap();
        let mut previous = kmeans.inertia();
        while kmeans.phase() != Phase::Converged && kmeans.iterations() < 100 {
            kmeans.step().unwrap();
            let current = kmeans.inertia();
            // Truncating a centroid moves it by less than one unit per channel, which costs
            // less than 3 per pixel.
            assert!(
                current <= previous + 3.0 * n,
                "inertia went from {previous} to {current}"
            );
            previous = current;
        }
    }
}

#[test]
fn separated_groups_strictly_improve() {
    let image = gray_image(3, 3, &[0.0, 2.0, 4.0, 10.0, 12.0, 14.0, 100.0, 102.0, 104.0]);
    let mut kmeans = KMeans::new(&image.pixels, 3, Options::default()).unwrap();
    let seeded = kmeans.inertia();
    kmeans.step().unwrap();
    assert!(kmeans.inertia() < seeded);
    assert_eq!(
        kmeans.centroids(),
        [
            Color::new(2.0, 2.0, 2.0),
            Color::new(12.0, 12.0, 12.0),
            Color::new(102.0, 102.0, 102.0),
        ]
    );
}

#[test]
fn runs_are_deterministic() {
    let run = |parallel| {
        let mut image = noise_image(20, 10, 3);
        let options = Options {
            parallel,
            ..Options::default()
        };
        let report = image.cluster(4, options).unwrap();
        let mut output = vec![];
        image.write_reduced(&mut output).unwrap();
        (report, output)
    };

    let first = run(false);
    assert_eq!(first, run(false));
    assert_eq!(first, run(true));
}

#[test]
fn clustering_terminates() {
    for seed in 0..5 {
        let mut image = noise_image(10, 10, seed);
        let report = image.cluster(8, Options::default()).unwrap();
        assert!(report.iterations() <= Options::default().max_iterations);
        assert_eq!(report.palette.len(), 8);
    }
}

#[test]
fn iteration_limit_returns_best_effort_palette() {
    let mut image = gray_image(2, 2, &[50.0, 0.0, 50.0, 100.0]);
    let options = Options {
        max_iterations: 1,
        ..Options::default()
    };
    let report = image.cluster(2, options).unwrap();
    assert_eq!(
        report.convergence,
        Convergence::DidNotConverge { iterations: 1 }
    );
    assert_eq!(
        report.palette,
        [Color::new(50.0, 50.0, 50.0), Color::new(0.0, 0.0, 0.0)]
    );
    // The best-effort palette is still usable for export.
    assert!(image.reduced().is_ok());
}

#[test]
fn reduced_image_keeps_dimensions_and_uses_only_palette_colors() {
    let mut image = noise_image(7, 5, 11);
    let report = image.cluster(3, Options::default()).unwrap();

    let mut output = vec![];
    image.write_reduced(&mut output).unwrap();
    let reduced = ppm::read(&output[..]).unwrap();

    assert_eq!((reduced.width, reduced.height), (7, 5));
    assert_eq!(reduced.pixels.len(), 35);
    for color in reduced.colors() {
        assert!(report.palette.contains(&color));
    }
}

#[test]
fn single_cluster_is_the_truncated_mean() {
    let mut image = noise_image(9, 4, 5);
    let count = image.pixels.len() as f64;
    let sum = image
        .colors()
        .fold([0.0; 3], |[r, g, b], color| [r + color.r, g + color.g, b + color.b]);
    let mean = Color::from_array(sum.map(|x| (x / count).trunc()));

    let report = image.cluster(1, Options::default()).unwrap();
    assert!(report.converged());
    assert_eq!(report.palette, [mean]);

    let reduced = image.reduced().unwrap();
    assert!(reduced.colors().all(|color| color == mean));
}

#[test]
fn one_cluster_per_pixel_reproduces_the_input() {
    let mut image = Image::from_colors(
        2,
        2,
        [
            Color::new(0.0, 0.0, 0.0),
            Color::new(255.0, 0.0, 0.0),
            Color::new(0.0, 255.0, 0.0),
            Color::new(0.0, 0.0, 255.0),
        ],
    );
    let report = image.cluster(4, Options::default()).unwrap();
    assert_eq!(report.convergence, Convergence::Converged { iterations: 1 });

    let reduced = image.reduced().unwrap();
    assert_eq!(ppm_text(&reduced), ppm_text(&image));
}

#[test]
fn negative_means_are_written_without_sign() {
    let mut image = Image::from_colors(
        2,
        1,
        [Color::new(-1.0, 0.0, 0.0), Color::new(0.0, 0.0, 0.0)],
    );
    image.cluster(1, Options::default()).unwrap();
    let reduced = ppm_text(&image.reduced().unwrap());
    assert_eq!(reduced, "P3\n2 1\n255\n0 0 0 0 0 0\n");
}
