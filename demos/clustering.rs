//! K-means and DBSCAN on the same jittered 2D dataset.
//!
//! Run with `RUST_LOG=debug` to see per-fit logging.

use huddle::{Clusterer, Dbscan, Kmeans, NOISE};
use rand::prelude::*;

/// Three blobs of `per_blob` points with uniform jitter around each center.
fn blobs(centers: &[[f64; 2]], per_blob: usize, jitter: f64, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(centers.len() * per_blob);
    for center in centers {
        for _ in 0..per_blob {
            data.push(vec![
                center[0] + rng.random_range(-jitter..jitter),
                center[1] + rng.random_range(-jitter..jitter),
            ]);
        }
    }
    data
}

fn main() {
    env_logger::init();

    let centers = [[0.0, 0.0], [10.0, 10.0], [20.0, 20.0]];
    let data = blobs(&centers, 50, 1.0, 42);
    println!("dataset: {} points in 2D, 3 true groups", data.len());

    // --- K-means (k=3) ---
    let mut kmeans = Kmeans::new(3).with_seed(42);
    kmeans.fit(&data).unwrap();
    println!("\n=== K-means (k=3) ===");
    let centroids = kmeans.centroids().unwrap();
    for (id, (cluster, centroid)) in kmeans
        .clusters()
        .unwrap()
        .iter()
        .zip(centroids.iter())
        .enumerate()
    {
        println!(
            "  cluster {} has {:3} points, centroid ({:6.2}, {:6.2})",
            id,
            cluster.len(),
            centroid[0],
            centroid[1]
        );
    }

    let probe = [15.0, 15.0];
    let label = kmeans.predict(&probe).unwrap();
    println!("  probe ({:.1}, {:.1}) => cluster {}", probe[0], probe[1], label);

    // --- DBSCAN (eps=2.0, min_pts=5) ---
    let mut dbscan = Dbscan::new(2.0, 5);
    dbscan.fit(&data).unwrap();
    println!("\n=== DBSCAN (eps=2.0, min_pts=5) ===");
    for (id, cluster) in dbscan.clusters().unwrap().iter().enumerate() {
        println!("  cluster {} has {:3} points", id + 1, cluster.len());
    }
    let noise = dbscan
        .labels()
        .unwrap()
        .iter()
        .filter(|&&l| l == NOISE)
        .count();
    println!("  noise points: {}", noise);

    let label = dbscan.predict(&probe).unwrap();
    let tag = if label == NOISE {
        "NOISE".to_string()
    } else {
        format!("cluster {}", label)
    };
    println!("  probe ({:.1}, {:.1}) => {}", probe[0], probe[1], tag);
}
