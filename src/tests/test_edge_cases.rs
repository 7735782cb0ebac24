use ndarray::array;

use super::FixedQ;
use crate::agent::{ActionValueFunction, DqnAgent};
use crate::config::DqnConfig;
use crate::error::DqnError;

#[test]
fn test_error_messages() {
    let err = DqnError::InsufficientData { requested: 32, available: 3 };
    assert_eq!(err.to_string(), "Insufficient data: requested 32 transitions, buffer holds 3");

    let err = DqnError::shape_mismatch("4", "3");
    assert_eq!(err.to_string(), "Shape mismatch: expected 4, got 3");

    let err = DqnError::invalid_configuration("discount", "1.5 is outside (0, 1]");
    assert_eq!(err.to_string(), "Invalid configuration 'discount': 1.5 is outside (0, 1]");

    let err = DqnError::InvalidAction { action: 3, num_actions: 2 };
    assert_eq!(err.to_string(), "Invalid action 3: must be less than 2");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert!(matches!(DqnError::from(io), DqnError::Io(_)));
}

#[test]
fn test_capacity_one_buffer_keeps_latest() {
    let config = DqnConfig::new(2, 2).buffer_capacity(1).batch_size(1).seed(0);
    let mut agent = DqnAgent::with_approximator(config, FixedQ::new(2, array![0.0, 1.0])).unwrap();
    for i in 0..5 {
        let s = array![i as f32, 0.0];
        assert!(agent.step(s.view(), 0, i as f32, s.view(), false).unwrap().is_some());
    }
    assert_eq!(agent.buffer().len(), 1);
    assert_eq!(agent.buffer().iter().next().map(|t| t.reward), Some(4.0));
}

#[test]
fn test_undiscounted_targets() {
    let config = DqnConfig::new(2, 2).batch_size(1).discount(1.0).seed(0);
    let mut agent = DqnAgent::with_approximator(config, FixedQ::new(2, array![2.0, -3.0])).unwrap();
    let s = array![0.0, 0.0];
    agent.step(s.view(), 1, 0.5, s.view(), false).unwrap();
    let (_, _, targets) = &agent.approximator().updates[0];
    assert_eq!(targets[0], 2.5);
}

#[test]
fn test_terminal_transitions_never_bootstrap() {
    let config = DqnConfig::new(2, 2).batch_size(2).seed(0);
    let mut agent = DqnAgent::with_approximator(config, FixedQ::new(2, array![1e6, 1e6])).unwrap();
    let s = array![0.0, 0.0];
    agent.step(s.view(), 0, -1.0, s.view(), true).unwrap();
    agent.step(s.view(), 1, -1.0, s.view(), true).unwrap();
    let (_, _, targets) = &agent.approximator().updates[0];
    assert_eq!(targets, &array![-1.0, -1.0]);
}

#[test]
fn test_mock_parameters_round_trip_through_agent() {
    let config = DqnConfig::new(2, 2).seed(0);
    let mut agent = DqnAgent::with_approximator(config, FixedQ::new(2, array![7.0, 8.0])).unwrap();
    let blob = agent.export_parameters().unwrap();
    agent.load_parameters(&blob).unwrap();
    assert_eq!(agent.approximator().values, array![7.0, 8.0]);
}

#[test]
fn test_mock_predict_batch_checks_state_width() {
    let q = FixedQ::new(2, array![1.0, 5.0]);
    let rows = q.predict_batch(array![[0.0, 0.0], [1.0, 1.0]].view()).unwrap();
    assert_eq!(rows, array![[1.0, 5.0], [1.0, 5.0]]);
    assert!(matches!(
        q.predict_batch(array![[0.0, 0.0, 0.0]].view()),
        Err(DqnError::ShapeMismatch { .. })
    ));
}
