//! Offline training through to inference on the persisted artifacts.

use std::sync::Arc;

use persona_insight::config::{EncoderConfig, ModelConfig, TrainingConfig};
use persona_insight::corpus::LabeledCorpus;
use persona_insight::{ArtifactBundle, ModelHandle, OceanAnalyzer, PersonaConfig, PersonaError, Trainer};

const CORPUS: &str = "\
#AUTHID,STATUS,sEXT,sNEU,sAGR,sCON,sOPN
a1,love parties and meeting new friends tonight,0.9,0.2,0.6,0.4,0.7
a1,cannot wait for the big party with everyone,0.85,0.3,0.6,0.35,0.65
a2,stayed home reading a quiet book again,0.15,0.6,0.5,0.6,0.5
a2,prefer my own company and a calm evening,0.2,0.55,0.45,0.6,0.45
a3,finished every task on my schedule today,0.5,0.3,0.5,0.9,0.4
a3,planned the whole week in careful detail,0.45,0.35,0.5,0.85,0.4
a4,worried all day about what could go wrong,0.3,0.9,0.5,0.5,0.5
a4,so anxious and stressed about tomorrow,0.35,0.85,0.45,0.5,0.5
a5,exploring strange new ideas and art,0.55,0.4,0.55,0.4,0.95
a5,curious about philosophy and distant cultures,0.5,0.4,0.6,0.45,0.9
";

fn tiny_config(dir: &std::path::Path) -> PersonaConfig {
    let mut config = PersonaConfig {
        encoder: EncoderConfig {
            max_length: 8,
            normalize_input: false,
        },
        model: ModelConfig {
            embedding_dim: 4,
            lstm_units: 6,
            dense_units: 4,
        },
        training: TrainingConfig {
            epochs: 3,
            batch_size: 4,
            ..TrainingConfig::default()
        },
        ..PersonaConfig::default()
    };
    config.artifacts.dir = dir.join("artifacts");
    config
}

#[test]
fn test_train_save_load_analyze() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tiny_config(tmp.path());
    let corpus = LabeledCorpus::from_csv_str(CORPUS).unwrap();
    assert_eq!(corpus.len(), 10);

    let trainer = Trainer::new(config.training.clone());
    let (bundle, history) = trainer.train_bundle(&corpus, &config).unwrap();
    assert_eq!(history.epochs.len(), 3);
    // ceil(10 * 0.2) = 2 held out.
    assert!(history.epochs.iter().all(|e| e.validation_loss.is_some()));
    bundle.save(&config.artifacts.dir).unwrap();

    let handle = ModelHandle::new();
    assert!(handle.load(&config.artifacts.dir));
    let loaded = handle.current().unwrap();
    assert_eq!(loaded.max_length(), 8);

    let analyzer = OceanAnalyzer::from_bundle(loaded);
    let texts = ["parties with new friends", "a quiet calm evening", "words never seen before"];
    let report = analyzer.report(&texts).unwrap();
    assert_eq!(report.results.len(), 3);
    assert!(report.results.iter().all(|r| r.scores.is_finite()));
    assert!(report.average.is_some());
    assert!(!report.summary.is_insufficient());
}

#[test]
fn test_missing_artifacts_leave_handle_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let handle = ModelHandle::new();
    assert!(!handle.load(tmp.path().join("nothing-here")));
    assert!(!handle.is_loaded());
    assert!(ArtifactBundle::try_load(tmp.path()).is_none());
}

#[test]
fn test_empty_corpus_refuses_to_train() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tiny_config(tmp.path());
    let corpus = LabeledCorpus::from_csv_str("STATUS,sEXT,sNEU,sAGR,sCON,sOPN\n").unwrap();
    let err = Trainer::new(config.training.clone())
        .train_bundle(&corpus, &config)
        .unwrap_err();
    assert!(matches!(err, PersonaError::EmptyCorpus));
}

#[tokio::test]
async fn test_background_training_task() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tiny_config(tmp.path());
    let corpus = LabeledCorpus::from_csv_str(CORPUS).unwrap();

    let trainer = Arc::new(Trainer::new(config.training.clone()));
    let (bundle, history) = trainer.clone().train_bundle_task(corpus, config).await.unwrap();
    assert_eq!(history.last().map(|e| e.epoch), Some(3));
    assert!(bundle.predict_texts(&["party"]).unwrap()[0].is_finite());
}

#[tokio::test]
async fn test_cancelled_background_training() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tiny_config(tmp.path());
    let corpus = LabeledCorpus::from_csv_str(CORPUS).unwrap();

    let trainer = Arc::new(Trainer::new(config.training.clone()));
    trainer.cancel();
    let err = trainer.train_bundle_task(corpus, config).await.unwrap_err();
    assert!(matches!(err, PersonaError::TrainingCancelled { completed_epochs: 0 }));
}
