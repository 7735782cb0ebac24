use crate::activations::Activation;
use crate::config::DqnConfig;
use crate::error::DqnError;
use crate::optimizer::OptimizerKind;

fn rejected(config: DqnConfig, field: &str) {
    match config.validate() {
        Err(DqnError::InvalidConfiguration { name, .. }) => assert_eq!(name, field),
        other => panic!("expected {} to be rejected, got {:?}", field, other),
    }
}

#[test]
fn test_default_config_is_valid() {
    assert!(DqnConfig::default().validate().is_ok());
    assert!(DqnConfig::new(4, 2).validate().is_ok());
}

#[test]
fn test_builder_setters() {
    let config = DqnConfig::new(6, 3)
        .buffer_capacity(500)
        .batch_size(16)
        .discount(0.9)
        .hidden_layers(&[32])
        .hidden_activation(Activation::Tanh)
        .learning_rate(5e-4)
        .optimizer(OptimizerKind::Sgd)
        .eps_start(0.8)
        .eps_end(0.05)
        .eps_decay(0.9)
        .learn_every(4)
        .target_update_freq(Some(100))
        .seed(17);

    assert_eq!(config.state_dim, 6);
    assert_eq!(config.num_actions, 3);
    assert_eq!(config.buffer_capacity, 500);
    assert_eq!(config.batch_size, 16);
    assert_eq!(config.hidden_layers, vec![32]);
    assert_eq!(config.hidden_activation, Activation::Tanh);
    assert_eq!(config.optimizer, OptimizerKind::Sgd);
    assert_eq!(config.learn_every, 4);
    assert_eq!(config.target_update_freq, Some(100));
    assert_eq!(config.seed, Some(17));
    assert!(config.validate().is_ok());
}

#[test]
fn test_out_of_range_values_rejected() {
    rejected(DqnConfig::new(0, 2), "state_dim");
    rejected(DqnConfig::new(4, 0), "num_actions");
    rejected(DqnConfig::new(4, 2).buffer_capacity(0), "buffer_capacity");
    rejected(DqnConfig::new(4, 2).batch_size(0), "batch_size");
    rejected(DqnConfig::new(4, 2).buffer_capacity(10).batch_size(11), "batch_size");
    rejected(DqnConfig::new(4, 2).discount(0.0), "discount");
    rejected(DqnConfig::new(4, 2).discount(1.01), "discount");
    rejected(DqnConfig::new(4, 2).hidden_layers(&[16, 0]), "hidden_layers");
    rejected(
        DqnConfig::new(4, 2).hidden_activation(Activation::LeakyRelu { alpha: f32::NAN }),
        "hidden_activation",
    );
    rejected(DqnConfig::new(4, 2).learning_rate(0.0), "learning_rate");
    rejected(DqnConfig::new(4, 2).learning_rate(f32::NAN), "learning_rate");
    rejected(DqnConfig::new(4, 2).eps_start(0.1).eps_end(0.5), "eps_end");
    rejected(DqnConfig::new(4, 2).eps_start(1.5), "eps_start");
    rejected(DqnConfig::new(4, 2).eps_decay(0.0), "eps_decay");
    rejected(DqnConfig::new(4, 2).eps_decay(1.2), "eps_decay");
    rejected(DqnConfig::new(4, 2).learn_every(0), "learn_every");
    rejected(DqnConfig::new(4, 2).target_update_freq(Some(0)), "target_update_freq");
}

#[test]
fn test_discount_of_one_is_allowed() {
    assert!(DqnConfig::new(4, 2).discount(1.0).validate().is_ok());
}

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dqn.json");
    let config = DqnConfig::new(4, 2).batch_size(32).target_update_freq(Some(50)).seed(3);
    config.save(&path).unwrap();
    assert_eq!(DqnConfig::load(&path).unwrap(), config);
}

#[test]
fn test_partial_json_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{ "state_dim": 8, "num_actions": 4, "hidden_layers": [128, 128] }"#).unwrap();

    let config = DqnConfig::load(&path).unwrap();
    assert_eq!(config.state_dim, 8);
    assert_eq!(config.num_actions, 4);
    assert_eq!(config.hidden_layers, vec![128, 128]);
    assert_eq!(config.batch_size, DqnConfig::default().batch_size);
    assert_eq!(config.target_update_freq, None);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(DqnConfig::load(dir.path().join("nope.json")), Err(DqnError::Io(_))));
}

#[test]
fn test_load_malformed_json_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(DqnConfig::load(&path), Err(DqnError::Serialization(_))));
}
