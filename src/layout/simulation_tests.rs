use std::f64::consts::PI;
use std::ops::ControlFlow;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::graph::datasets::karate_club;
use crate::graph::CsrMatrix;
use crate::layout::{Embedding, ForceAtlasConfig, IterationReport, Simulation};
use crate::utils::{LayoutError, CONVERGENCE_SWING};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_graph(n: usize, p: f64, seed: u64) -> CsrMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            if rng.random::<f64>() < p {
                edges.push((a, b, 1.0));
                edges.push((b, a, 1.0));
            }
        }
    }
    CsrMatrix::from_edges(n, &edges).expect("valid random graph")
}

fn ring(n: usize, radius: f64) -> Embedding {
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            vec![radius * angle.cos(), radius * angle.sin()]
        })
        .collect();
    Embedding::from_rows(&rows).expect("ring rows")
}

fn mean_radius(embedding: &Embedding) -> f64 {
    embedding
        .rows()
        .map(|row| row.iter().map(|x| x * x).sum::<f64>().sqrt())
        .sum::<f64>()
        / embedding.n_nodes() as f64
}

#[test]
fn test_single_node_never_moves() {
    init_logger();
    let adjacency = CsrMatrix::from_edges(1, &[]).expect("single node");
    for barnes_hut in [true, false] {
        let config = ForceAtlasConfig::default().with_barnes_hut(barnes_hut).with_n_iter(20);
        let start = Embedding::new(1, 2, vec![0.7, -0.3]).expect("one row");
        let mut sim = Simulation::new(&config, &adjacency, Some(start.clone())).expect("valid input");
        for _ in 0..5 {
            sim.step();
            assert_eq!(sim.positions(), &start);
        }
    }
}

#[test]
fn test_single_node_with_random_start_stays_put() {
    let adjacency = CsrMatrix::from_edges(1, &[(0, 0, 1.0)]).expect("self loop");
    let config = ForceAtlasConfig::default().with_random_state(5);
    let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");
    let start = sim.positions().clone();
    sim.run();
    assert_eq!(sim.positions(), &start);
}

#[test]
fn test_zero_global_swing_keeps_global_speed() {
    let adjacency = CsrMatrix::from_edges(1, &[]).expect("single node");
    let config = ForceAtlasConfig::default().with_random_state(0);
    let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");

    // First iteration: swing is the full gravity pull of 0.02.
    let first = sim.step();
    assert!(!first.converged);
    assert_relative_eq!(first.global_swing, 0.04, epsilon = 1e-12);
    assert_relative_eq!(first.global_speed, 0.05, epsilon = 1e-12);

    // Second iteration: nothing changed, so the swing is zero.
    let second = sim.step();
    assert_eq!(second.global_swing, 0.0);
    assert_eq!(second.global_speed, first.global_speed);
    assert!(second.converged);
    assert!(sim.is_finished());
}

#[test]
fn test_single_node_converges_after_two_iterations() {
    let adjacency = CsrMatrix::from_edges(1, &[]).expect("single node");
    let config = ForceAtlasConfig::default().with_random_state(0);
    let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");
    let report = sim.run();
    assert_eq!(report.iterations, 2);
    assert!(report.converged);
    assert!(!report.cancelled);
}

#[test]
fn test_edgeless_graph_ignores_attraction_options() {
    let adjacency = CsrMatrix::from_edges(12, &[]).expect("no edges");
    let plain = ForceAtlasConfig::default().with_random_state(3);
    let tweaked = plain
        .clone()
        .with_lin_log(true)
        .with_no_hubs(true)
        .with_weight_exponent(2.0);

    let mut a = Simulation::new(&plain, &adjacency, None).expect("valid input");
    let mut b = Simulation::new(&tweaked, &adjacency, None).expect("valid input");
    a.run();
    b.run();
    assert_eq!(a.positions(), b.positions());
}

#[test]
fn test_edgeless_graph_spreads_under_repulsion() {
    let adjacency = CsrMatrix::from_edges(8, &[]).expect("no edges");
    let config = ForceAtlasConfig::default()
        .with_barnes_hut(false)
        .with_repulsive_factor(1.0);
    let start = ring(8, 1.0);
    let mut sim = Simulation::new(&config, &adjacency, Some(start.clone())).expect("valid input");
    sim.step();
    assert!(mean_radius(sim.positions()) > mean_radius(&start));
}

#[test]
fn test_ring_contracts_under_attraction() {
    // An 8-cycle: strong attraction along the edges pulls the ring inward.
    let edges: Vec<(usize, usize, f64)> = (0..8)
        .flat_map(|i| [(i, (i + 1) % 8, 1.0), ((i + 1) % 8, i, 1.0)])
        .collect();
    let adjacency = CsrMatrix::from_edges(8, &edges).expect("cycle");
    let config = ForceAtlasConfig::default().with_barnes_hut(false);
    let start = ring(8, 1.0);
    let mut sim = Simulation::new(&config, &adjacency, Some(start.clone())).expect("valid input");
    sim.step();
    assert!(mean_radius(sim.positions()) < mean_radius(&start));
}

#[test]
fn test_seeded_runs_are_identical() {
    let adjacency = karate_club();
    for barnes_hut in [true, false] {
        let config = ForceAtlasConfig::default()
            .with_barnes_hut(barnes_hut)
            .with_random_state(2024);
        let mut a = Simulation::new(&config, &adjacency, None).expect("valid input");
        let mut b = Simulation::new(&config, &adjacency, None).expect("valid input");
        let report_a = a.run();
        let report_b = b.run();
        assert_eq!(report_a, report_b);
        assert_eq!(a.positions(), b.positions());
    }
}

#[test]
fn test_different_seeds_differ() {
    let adjacency = karate_club();
    let a = Simulation::new(&ForceAtlasConfig::default().with_random_state(1), &adjacency, None)
        .expect("valid input");
    let b = Simulation::new(&ForceAtlasConfig::default().with_random_state(2), &adjacency, None)
        .expect("valid input");
    assert_ne!(a.positions(), b.positions());
}

#[test]
fn test_small_theta_matches_exact_forces() {
    let adjacency = random_graph(10, 0.3, 9);
    let exact = ForceAtlasConfig::default().with_barnes_hut(false).with_random_state(4);
    let approx = exact.clone().with_barnes_hut(true).with_theta(1e-9);

    let mut a = Simulation::new(&exact, &adjacency, None).expect("valid input");
    let mut b = Simulation::new(&approx, &adjacency, None).expect("valid input");
    assert_eq!(a.positions(), b.positions());
    a.step();
    b.step();
    // On the first iteration each swing is the magnitude of the net force.
    for (exact_swing, approx_swing) in a.swings().iter().zip(b.swings()) {
        assert_relative_eq!(*exact_swing, *approx_swing, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn test_karate_club_swing_decreases() {
    init_logger();
    let adjacency = karate_club();
    let config = ForceAtlasConfig::default().with_random_state(34);
    let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");

    let mut reports = Vec::new();
    sim.run_with(|report| {
        reports.push(*report);
        ControlFlow::Continue(())
    });
    assert!(!reports.is_empty());
    assert!(reports.len() <= 50);

    let last = reports[reports.len() - 1];
    if last.converged {
        assert!(sim.swings().iter().all(|&swing| swing < CONVERGENCE_SWING));
    } else {
        // The shrinking step budget damps the oscillation over the run.
        assert_eq!(reports.len(), 50);
        let mean = |window: &[IterationReport]| {
            window.iter().map(|report| report.global_swing).sum::<f64>() / window.len() as f64
        };
        let early = mean(&reports[..10]);
        let late = mean(&reports[40..]);
        assert!(late < 0.5 * early, "mean global swing went from {} to {}", early, late);
    }
    assert!(sim.positions().as_slice().iter().all(|x| x.is_finite()));
}

#[test]
fn test_directed_input_is_symmetrized() {
    let undirected = karate_club();
    // Keep one direction of every edge.
    let mut edges = Vec::new();
    for node in 0..undirected.n_nodes() {
        for &other in undirected.neighbors(node).0 {
            if node < other {
                edges.push((node, other, 1.0));
            }
        }
    }
    let directed = CsrMatrix::from_edges(34, &edges).expect("valid edges");
    assert!(!directed.is_symmetric());

    let config = ForceAtlasConfig::default().with_random_state(8);
    let mut a = Simulation::new(&config, &directed, None).expect("valid input");
    let mut b = Simulation::new(&config, &undirected, None).expect("valid input");
    assert_eq!(a.degrees(), b.degrees());
    a.run();
    b.run();
    assert_eq!(a.positions(), b.positions());
}

#[test]
fn test_step_budget_shrinks() {
    let adjacency = karate_club();
    let config = ForceAtlasConfig::default().with_random_state(6).with_n_iter(9);
    let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");
    let initial = sim.step_max();
    assert!(initial > 0.0);
    assert_eq!(sim.tolerance(), 0.1);

    sim.step();
    assert_relative_eq!(sim.step_max(), initial * 0.9, epsilon = 1e-12);
    // Past the budget the step never goes negative.
    for _ in 0..20 {
        sim.step();
    }
    assert_eq!(sim.step_max(), 0.0);
}

#[test]
fn test_observer_can_cancel() {
    let adjacency = karate_club();
    let config = ForceAtlasConfig::default().with_random_state(10);
    let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");
    let report = sim.run_with(|report| {
        if report.iteration >= 3 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    assert!(report.cancelled);
    assert!(!report.converged);
    assert_eq!(report.iterations, 3);
    assert_eq!(sim.iteration(), 3);
}

#[test]
fn test_one_dimensional_barnes_hut() {
    let adjacency = karate_club();
    let config = ForceAtlasConfig::default().with_n_components(1).with_random_state(1);
    let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");
    sim.run();
    assert_eq!(sim.positions().n_components(), 1);
    assert!(sim.positions().as_slice().iter().all(|x| x.is_finite()));
}

#[test]
fn test_three_dimensional_exact_layout() {
    let adjacency = karate_club();
    let config = ForceAtlasConfig::default()
        .with_n_components(3)
        .with_barnes_hut(false)
        .with_strong_gravity(true)
        .with_random_state(1);
    let mut sim = Simulation::new(&config, &adjacency, None).expect("valid input");
    sim.run();
    assert_eq!(sim.positions().n_components(), 3);
    assert!(sim.positions().as_slice().iter().all(|x| x.is_finite()));
}

#[test]
fn test_three_dimensions_with_barnes_hut_rejected() {
    let adjacency = karate_club();
    let config = ForceAtlasConfig::default().with_n_components(3);
    let result = Simulation::new(&config, &adjacency, None);
    assert!(matches!(result, Err(LayoutError::InvalidDimension { n_components: 3 })));
}

#[test]
fn test_non_square_adjacency_rejected() {
    let adjacency = CsrMatrix::new(2, 3, vec![0, 1, 1], vec![2], vec![1.0]).expect("valid 2x3");
    let result = Simulation::new(&ForceAtlasConfig::default(), &adjacency, None);
    assert!(matches!(result, Err(LayoutError::NonSquareMatrix { rows: 2, cols: 3 })));
}

#[test]
fn test_initial_positions_shape_checked() {
    let adjacency = karate_club();
    let wrong_rows = Embedding::new(3, 2, vec![0.0; 6]).expect("3x2");
    assert_eq!(
        Simulation::new(&ForceAtlasConfig::default(), &adjacency, Some(wrong_rows)).err(),
        Some(LayoutError::DimensionMismatch { expected: 34, found: 3 })
    );

    let wrong_columns = Embedding::new(34, 1, vec![0.0; 34]).expect("34x1");
    assert_eq!(
        Simulation::new(&ForceAtlasConfig::default(), &adjacency, Some(wrong_columns)).err(),
        Some(LayoutError::DimensionMismatch { expected: 2, found: 1 })
    );
}

#[test]
fn test_empty_graph_is_finished() {
    let adjacency = CsrMatrix::from_edges(0, &[]).expect("empty graph");
    let mut sim = Simulation::new(&ForceAtlasConfig::default(), &adjacency, None).expect("valid input");
    assert!(sim.is_finished());
    let report = sim.run();
    assert_eq!(report.iterations, 0);
    assert_eq!(sim.positions().n_nodes(), 0);
}
