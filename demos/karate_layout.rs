use log::info;
use rs_forceatlas::graph::datasets::karate_club;
use rs_forceatlas::layout::{ForceAtlas2, ForceAtlasConfig};
use rs_forceatlas::utils::LayoutError;

// RUST_LOG=debug cargo run --example karate_layout
fn main() -> Result<(), LayoutError> {
    env_logger::init();

    let adjacency = karate_club();
    let config = ForceAtlasConfig::default()
        .with_n_iter(200)
        .with_random_state(42);
    let mut force_atlas = ForceAtlas2::new(config)?;
    force_atlas.fit(&adjacency)?;

    if let Some(report) = force_atlas.report() {
        info!(
            "{} iterations, converged: {}, final global speed {:.4}",
            report.iterations, report.converged, report.global_speed
        );
    }
    if let Some(embedding) = force_atlas.embedding() {
        for (node, row) in embedding.rows().enumerate() {
            println!("{:>2} {:>10.4} {:>10.4}", node, row[0], row[1]);
        }
    }
    Ok(())
}
