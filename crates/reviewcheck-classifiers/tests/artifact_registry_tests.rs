//! Registry integration tests
//!
//! Writes small artifacts and a stopword corpus to a temp directory, then
//! loads them the way the server does at startup.

use reviewcheck_classifiers::{
    init_registry_from_config, init_registry_from_file, ClassifierConfig, STOPWORDS_RELATIVE_PATH,
};
use reviewcheck_core::{Label, ModelKey};
use std::path::Path;
use tempfile::TempDir;

const VOCABULARY: &str = r#"{ "amazing": 0, "bought": 1, "great": 2, "product": 3, "recommend": 4 }"#;

fn lr_artifact() -> String {
    format!(
        r#"{{
            "format_version": 1,
            "name": "logistic",
            "classes": ["CG", "OR"],
            "vectorizer": {{ "vocabulary": {VOCABULARY}, "idf": [1.2, 1.9, 1.1, 1.0, 1.4] }},
            "estimator": {{
                "kind": "logistic_regression",
                "coef": [-1.5, 2.0, -0.4, 0.3, -0.8],
                "intercept": 0.1
            }}
        }}"#
    )
}

fn svc_artifact() -> String {
    format!(
        r#"{{
            "format_version": 1,
            "classes": ["CG", "OR"],
            "vectorizer": {{ "vocabulary": {VOCABULARY}, "sublinear_tf": true }},
            "estimator": {{
                "kind": "linear_svc",
                "coef": [-0.9, 1.1, -0.2, 0.1, -0.5],
                "intercept": -0.05,
                "platt_a": -2.3,
                "platt_b": 0.02
            }}
        }}"#
    )
}

fn rf_artifact() -> String {
    format!(
        r#"{{
            "format_version": 1,
            "classes": ["CG", "OR"],
            "vectorizer": {{ "vocabulary": {VOCABULARY}, "norm": null }},
            "estimator": {{
                "kind": "random_forest",
                "trees": [
                    {{ "nodes": [
                        {{ "split": {{ "feature": 0, "threshold": 0.5, "left": 1, "right": 2 }} }},
                        {{ "leaf": {{ "value": [10.0, 30.0] }} }},
                        {{ "leaf": {{ "value": [25.0, 5.0] }} }}
                    ] }},
                    {{ "nodes": [
                        {{ "split": {{ "feature": 1, "threshold": 0.5, "left": 1, "right": 2 }} }},
                        {{ "split": {{ "feature": 4, "threshold": 0.5, "left": 3, "right": 4 }} }},
                        {{ "leaf": {{ "value": [2.0, 18.0] }} }},
                        {{ "leaf": {{ "value": [12.0, 12.0] }} }},
                        {{ "leaf": {{ "value": [16.0, 4.0] }} }}
                    ] }}
                ]
            }}
        }}"#
    )
}

fn write_corpus(root: &Path) {
    let path = root.join("nltk_data").join(STOPWORDS_RELATIVE_PATH);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "i\nme\nthis\nis\na\nthe\nhighly\n").unwrap();
}

fn fixture() -> (TempDir, ClassifierConfig) {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(dir.path());
    std::fs::write(dir.path().join("lr_model.json"), lr_artifact()).unwrap();
    std::fs::write(dir.path().join("svc_model.json"), svc_artifact()).unwrap();
    std::fs::write(dir.path().join("rf_model.json"), rf_artifact()).unwrap();

    let config = ClassifierConfig {
        models_dir: dir.path().to_path_buf(),
        nltk_data: vec![dir.path().join("nltk_data")],
        ..Default::default()
    };
    (dir, config)
}

#[test]
fn test_all_models_load() {
    let (_dir, config) = fixture();
    let registry = init_registry_from_config(&config);

    assert_eq!(registry.keys(), ModelKey::ALL.to_vec());
    assert_eq!(registry.get(ModelKey::LogisticRegression).unwrap().name(), "logistic");
    assert_eq!(registry.get(ModelKey::SupportVector).unwrap().name(), "svc_model");
}

#[test]
fn test_empty_review_probabilities_sum_to_one() {
    let (_dir, config) = fixture();
    let registry = init_registry_from_config(&config);

    for key in registry.keys() {
        let classifier = registry.get(key).unwrap();
        assert!(classifier.predict("").is_ok(), "{key} failed on empty text");

        let proba = classifier.predict_proba("").unwrap();
        assert_eq!(proba.len(), 2);
        assert!(
            (proba.total() - 1.0).abs() < 1e-9,
            "{key} probabilities sum to {}",
            proba.total()
        );
    }
}

#[test]
fn test_predictions_follow_vocabulary() {
    let (_dir, config) = fixture();
    let registry = init_registry_from_config(&config);

    let review = "Amazing product, highly recommend!";
    let genuine = "I bought this";
    for key in registry.keys() {
        let classifier = registry.get(key).unwrap();
        // Vocabulary is lowercase: "Amazing" does not match "amazing"
        assert_eq!(classifier.predict(genuine).unwrap(), Label::Original, "{key}");
        assert_eq!(
            classifier.predict("amazing amazing recommend").unwrap(),
            Label::ComputerGenerated,
            "{key}"
        );
        assert!(classifier.predict_proba(review).is_ok());
    }
}

#[test]
fn test_predictions_are_deterministic() {
    let (_dir, config) = fixture();
    let registry = init_registry_from_config(&config);

    let review = "great product, would recommend";
    for key in registry.keys() {
        let classifier = registry.get(key).unwrap();
        let first = classifier.predict_proba(review).unwrap();
        let second = classifier.predict_proba(review).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_invalid_artifact_is_left_out() {
    let (dir, config) = fixture();
    std::fs::write(
        dir.path().join("svc_model.json"),
        svc_artifact().replace("[-0.9, 1.1, -0.2, 0.1, -0.5]", "[-0.9, 1.1]"),
    )
    .unwrap();
    std::fs::remove_file(dir.path().join("rf_model.json")).unwrap();

    let registry = init_registry_from_config(&config);
    assert_eq!(registry.keys(), vec![ModelKey::LogisticRegression]);
    assert!(registry.lookup("svc").is_none());
    assert!(registry.lookup("rf").is_none());
}

#[test]
fn test_missing_corpus_still_loads_models() {
    let (dir, mut config) = fixture();
    config.nltk_data = vec![dir.path().join("elsewhere")];

    let registry = init_registry_from_config(&config);
    assert_eq!(registry.len(), 3);

    let classifier = registry.get(ModelKey::RandomForest).unwrap();
    let err = classifier.predict("great product").unwrap_err();
    assert!(err.to_string().contains("stopwords corpus"));
}

#[test]
fn test_init_from_file() {
    let (dir, _config) = fixture();
    let yaml = format!(
        "models_dir: {}\nmodels:\n  lr: lr_model.json\nnltk_data:\n  - {}\n",
        dir.path().display(),
        dir.path().join("nltk_data").display()
    );
    let config_path = dir.path().join("classifiers.yaml");
    std::fs::write(&config_path, yaml).unwrap();

    let registry = init_registry_from_file(&config_path).unwrap();
    assert_eq!(registry.keys(), vec![ModelKey::LogisticRegression]);
}
