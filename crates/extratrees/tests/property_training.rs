use eml_extratrees::{
    predict_proba, ExtraTrees, FeatureSampling, Node, TreesConfig, LEAF_FEATURE,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct LabelledRows {
    n_features: usize,
    n_classes: usize,
    features: Vec<i16>,
    labels: Vec<i16>,
}

fn labelled_rows() -> impl Strategy<Value = LabelledRows> {
    (1usize..4, 2usize..5, 1usize..40).prop_flat_map(|(n_features, n_classes, n_samples)| {
        (
            prop::collection::vec(-20i16..20, n_features * n_samples),
            prop::collection::vec(0i16..n_classes as i16, n_samples),
        )
            .prop_map(move |(features, labels)| LabelledRows {
                n_features,
                n_classes,
                features,
                labels,
            })
    })
}

fn trees_config() -> impl Strategy<Value = TreesConfig> {
    (
        1usize..6,      // n_trees
        0usize..8,      // max_depth
        1usize..4,      // min_samples_leaf
        0.3f32..1.0,    // subsample_ratio
        0.3f32..1.0,    // feature_subsample_ratio
        any::<u32>(),   // rng_seed
        any::<bool>(),  // per-tree feature sampling
    )
        .prop_map(|params| {
            let (
                n_trees,
                max_depth,
                min_samples_leaf,
                subsample_ratio,
                feature_subsample_ratio,
                rng_seed,
                per_tree,
            ) = params;
            TreesConfig {
                n_trees,
                max_depth,
                min_samples_leaf,
                subsample_ratio,
                feature_subsample_ratio,
                rng_seed,
                feature_sampling: if per_tree {
                    FeatureSampling::PerTree
                } else {
                    FeatureSampling::PerNode
                },
                ..TreesConfig::default()
            }
        })
}

fn trained(rows: &LabelledRows, config: &TreesConfig) -> ExtraTrees {
    let mut clf = ExtraTrees::new(rows.n_features, rows.n_classes, config.clone())
        .expect("generated config is valid");
    clf.train(&rows.features, &rows.labels)
        .expect("capacity covers every generated ensemble");
    clf
}

proptest! {
    #[test]
    fn training_is_deterministic(rows in labelled_rows(), config in trees_config()) {
        let a = trained(&rows, &config);
        let b = trained(&rows, &config);

        prop_assert_eq!(a.model().nodes(), b.model().nodes());
        prop_assert_eq!(a.model().tree_starts(), b.model().tree_starts());
        prop_assert_eq!(a.model().fingerprint(), b.model().fingerprint());
    }
}

proptest! {
    #[test]
    fn retraining_the_same_classifier_reproduces_the_model(
        rows in labelled_rows(),
        config in trees_config(),
    ) {
        let mut clf = trained(&rows, &config);
        let first = clf.model().fingerprint();

        clf.train(&rows.features, &rows.labels).unwrap();
        prop_assert_eq!(first, clf.model().fingerprint());
    }
}

proptest! {
    #[test]
    fn trained_models_are_well_formed(rows in labelled_rows(), config in trees_config()) {
        let clf = trained(&rows, &config);
        let model = clf.model();

        prop_assert!(model.validate().is_ok());
        prop_assert!(model.n_nodes_used() <= model.max_nodes());
        prop_assert!(model.n_nodes_used() >= model.n_trees());

        // Roots are laid out in tree order.
        for pair in model.tree_starts().windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for node in model.nodes() {
            if node.feature == LEAF_FEATURE {
                prop_assert!((node.value as usize) < rows.n_classes);
            }
        }
    }
}

proptest! {
    #[test]
    fn pure_labels_give_single_leaf_trees(
        rows in labelled_rows(),
        config in trees_config(),
        class in 0i16..2,
    ) {
        let rows = LabelledRows {
            labels: vec![class; rows.labels.len()],
            ..rows
        };
        let clf = trained(&rows, &config);

        prop_assert_eq!(clf.n_nodes_used(), config.n_trees);
        for node in clf.model().nodes() {
            prop_assert_eq!(*node, Node::leaf(class));
        }
    }
}

proptest! {
    #[test]
    fn votes_cover_every_tree(
        rows in labelled_rows(),
        config in trees_config(),
        query in prop::collection::vec(-30i16..30, 3),
    ) {
        let clf = trained(&rows, &config);
        let query = &query[..rows.n_features];

        let mut probabilities = vec![0.0f32; rows.n_classes];
        let mut votes = vec![0u16; rows.n_classes];
        let class = predict_proba(clf.model(), query, &mut probabilities, &mut votes).unwrap();

        let total: usize = votes.iter().map(|&v| v as usize).sum();
        prop_assert_eq!(total, config.n_trees);
        for (p, v) in probabilities.iter().zip(&votes) {
            prop_assert_eq!(*p, *v as f32 / config.n_trees as f32);
        }

        let best = votes.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(votes.iter().position(|&v| v == best), Some(class));
        prop_assert_eq!(clf.predict(query).unwrap(), class);
    }
}
