use approx::assert_abs_diff_eq;
use stochastic_core::markov::{
    analyze_absorbing, evolve_vector, matrix_powers, AbsorbingPartition, ChainConfig,
    StateVector, TransitionMatrix,
};
use stochastic_core::matrix::{invert, Matrix};
use stochastic_core::queue::{mm1, mmc, mmck, mmck_distribution, QueueModel, QueueParameters};
use stochastic_core::{compute, EngineError, ErrorKind, ModelKind, Outcome, Request};

/// A 3-state chain with transient states 0 and 1 and state 2 absorbing.
fn three_state_absorbing() -> TransitionMatrix {
    TransitionMatrix::from_rows(vec![
        vec![0.5, 0.2, 0.3],
        vec![0.3, 0.4, 0.3],
        vec![0.0, 0.0, 1.0],
    ])
    .unwrap()
}

#[test]
fn two_state_uniform_chain_is_already_stationary() {
    let p = TransitionMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
    let v0 = StateVector::new(vec![1.0, 0.0]).unwrap();

    let history = evolve_vector(&v0, &p, 1, &ChainConfig::default()).unwrap();
    assert_eq!(history.len(), 2);
    assert_abs_diff_eq!(history[1][0], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(history[1][1], 0.5, epsilon = 1e-12);

    let powers: Vec<Matrix> = matrix_powers(&p, 1).unwrap().iter().collect();
    assert_eq!(powers.len(), 2);
    for m in &powers {
        for &x in m.as_slice() {
            assert_abs_diff_eq!(x, 0.5, epsilon = 1e-12);
        }
    }
}

#[test]
fn absorbing_rows_of_b_sum_to_one() {
    let p = three_state_absorbing();
    let partition = AbsorbingPartition::new(3, &[2]).unwrap();
    assert_eq!(partition.transient(), &[0, 1]);

    let analysis = analyze_absorbing(&p, &partition, None, &ChainConfig::default()).unwrap();

    // N = (I - Q)^-1 with det(I - Q) = 0.24
    let n = analysis.fundamental();
    assert_abs_diff_eq!(n.get(0, 0), 0.6 / 0.24, epsilon = 1e-10);
    assert_abs_diff_eq!(n.get(0, 1), 0.2 / 0.24, epsilon = 1e-10);
    assert_abs_diff_eq!(n.get(1, 0), 0.3 / 0.24, epsilon = 1e-10);
    assert_abs_diff_eq!(n.get(1, 1), 0.5 / 0.24, epsilon = 1e-10);

    let b = analysis.absorption_probabilities();
    assert_eq!((b.rows(), b.cols()), (2, 1));
    assert_abs_diff_eq!(b.get(0, 0), b.get(1, 0), epsilon = 1e-10);
    for s in b.row_sums() {
        assert_abs_diff_eq!(s, 1.0, epsilon = 1e-6);
    }
    assert!(analysis.absorption().is_none());
}

#[test]
fn absorbing_rows_of_b_sum_to_one_with_several_targets() {
    let p = TransitionMatrix::from_rows(vec![
        vec![0.2, 0.3, 0.1, 0.25, 0.15],
        vec![0.1, 0.1, 0.4, 0.1, 0.3],
        vec![0.3, 0.2, 0.2, 0.0, 0.3],
        vec![0.0, 0.0, 0.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 1.0],
    ])
    .unwrap();
    let partition = AbsorbingPartition::new(5, &[3, 4]).unwrap();
    let values = [10.0, 20.0, 30.0, 0.0, 0.0];
    let analysis =
        analyze_absorbing(&p, &partition, Some(&values[..]), &ChainConfig::default()).unwrap();

    for s in analysis.absorption_probabilities().row_sums() {
        assert_abs_diff_eq!(s, 1.0, epsilon = 1e-6);
    }
    // The whole population is absorbed somewhere
    let absorbed: f64 = analysis.absorption().unwrap().iter().sum();
    assert_abs_diff_eq!(absorbed, 60.0, epsilon = 1e-9);
}

#[test]
fn powers_keep_rows_stochastic() {
    let p = TransitionMatrix::from_rows(vec![
        vec![0.1, 0.6, 0.3],
        vec![0.45, 0.45, 0.1],
        vec![0.2, 0.2, 0.6],
    ])
    .unwrap();
    for m in &matrix_powers(&p, 20).unwrap() {
        for s in m.row_sums() {
            assert_abs_diff_eq!(s, 1.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn inverse_round_trip() {
    let m = Matrix::from_rows(vec![
        vec![3.0, 1.0, -1.0],
        vec![2.0, 4.0, 1.0],
        vec![-1.0, 2.0, 5.0],
    ])
    .unwrap();
    let back = invert(&invert(&m).unwrap()).unwrap();
    for (a, b) in back.as_slice().iter().zip(m.as_slice()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-10);
    }
}

#[test]
fn mm1_reference_scenario() {
    let m = mm1(&QueueParameters::new(5.0, 8.0).unwrap()).unwrap();
    let rounded = |x: f64| (x * 1e4).round() / 1e4;
    assert_eq!(rounded(m.utilization), 0.625);
    assert_eq!(rounded(m.mean_in_system), 1.6667);
    assert_eq!(rounded(m.mean_in_queue), 1.0417);
    assert_eq!(rounded(m.mean_time_in_system), 0.3333);
    assert_eq!(rounded(m.mean_time_in_queue), 0.2083);
    assert_eq!(rounded(m.idle_probability), 0.375);
}

#[test]
fn mm1_littles_law() {
    for (lambda, mu) in [(0.5, 1.0), (2.0, 3.0), (7.5, 8.0), (0.01, 100.0)] {
        let m = mm1(&QueueParameters::new(lambda, mu).unwrap()).unwrap();
        assert_abs_diff_eq!(m.mean_in_system, lambda * m.mean_time_in_system, epsilon = 1e-9);
        assert_abs_diff_eq!(m.mean_in_queue, lambda * m.mean_time_in_queue, epsilon = 1e-9);
    }
}

#[test]
fn mm1_overloaded_is_unstable() {
    let err = mm1(&QueueParameters::new(9.0, 8.0).unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Instability);
    match err {
        EngineError::Unstable { utilization } => assert_abs_diff_eq!(utilization, 1.125),
        other => panic!("expected instability, got {other:?}"),
    }
}

#[test]
fn mmck_capacity_below_servers_is_configuration_error() {
    let params = QueueParameters::new(3.0, 2.0).unwrap();
    let err = mmck(&params, 2, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn mmck_total_probability() {
    let params = QueueParameters::new(12.0, 5.0).unwrap();
    let probs = mmck_distribution(&params, 3, 8).unwrap();
    assert_abs_diff_eq!(probs[0] + probs[1..].iter().sum::<f64>(), 1.0, epsilon = 1e-12);
}

#[test]
fn mmc_instability() {
    let params = QueueParameters::new(8.0, 2.0).unwrap();
    assert!(mmc(&params, 4).is_err());
    assert!(mmc(&params, 5).is_ok());
}

#[test]
fn dispatcher_tags_every_mode() {
    let transition = vec![vec![0.5, 0.5], vec![0.25, 0.75]];
    let requests = [
        Request::MatrixPowers {
            transition: transition.clone(),
            periods: 2,
        },
        Request::VectorEvolution {
            transition: transition.clone(),
            initial: vec![1.0, 0.0],
            periods: 2,
        },
        Request::Absorbing {
            transition: vec![vec![0.5, 0.5], vec![0.0, 1.0]],
            absorbing_states: vec![1],
            initial_values: Some(vec![10.0, 0.0]),
        },
        Request::Queue {
            model: QueueModel::Mm1,
            arrival_rate: 1.0,
            service_rate: 2.0,
        },
        Request::Queue {
            model: QueueModel::Mmc { servers: 2 },
            arrival_rate: 1.0,
            service_rate: 2.0,
        },
        Request::Queue {
            model: QueueModel::Mmck {
                servers: 2,
                capacity: 4,
            },
            arrival_rate: 1.0,
            service_rate: 2.0,
        },
    ];
    let tags: Vec<&str> = requests
        .iter()
        .map(|r| compute(r).unwrap().kind().as_str())
        .collect();
    assert_eq!(
        tags,
        vec![
            "regular-matrix",
            "regular-vector",
            "absorbing",
            "queue-mm1",
            "queue-mmc",
            "queue-mmck"
        ]
    );
}

#[test]
fn dispatcher_absorbing_population() {
    let outcome = compute(&Request::Absorbing {
        transition: vec![vec![0.5, 0.5], vec![0.0, 1.0]],
        absorbing_states: vec![1],
        initial_values: Some(vec![10.0, 0.0]),
    })
    .unwrap();
    assert_eq!(outcome.kind(), ModelKind::Absorbing);
    let Outcome::Absorbing(analysis) = outcome else {
        panic!("expected absorbing outcome");
    };
    assert_abs_diff_eq!(analysis.fundamental().get(0, 0), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(analysis.absorption().unwrap()[0], 10.0, epsilon = 1e-12);
}

#[test]
fn dispatcher_reports_singular_chain() {
    let err = compute(&Request::Absorbing {
        transition: vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        absorbing_states: vec![2],
        initial_values: None,
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SingularMatrix);
}
