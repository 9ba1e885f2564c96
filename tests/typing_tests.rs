//! Type algebra tests

use model_infer::typing::{
    Classifier, StringKind, StringSerializable, StringSerializableRegistry, TypeNode, merge,
    merge_all,
};
use model_infer::sample::SampleValue;

fn samples() -> Vec<TypeNode> {
    vec![
        TypeNode::Unknown,
        TypeNode::Null,
        TypeNode::integer(),
        TypeNode::float(),
        TypeNode::string(),
        TypeNode::serialized(StringKind::INTEGER),
        TypeNode::serialized(StringKind::FLOAT),
        TypeNode::optional(TypeNode::boolean()),
        TypeNode::Union(vec![TypeNode::integer(), TypeNode::string()]),
        TypeNode::list(TypeNode::integer()),
        TypeNode::list(TypeNode::Null),
        TypeNode::tuple(vec![TypeNode::integer(), TypeNode::string()]),
        TypeNode::tuple(vec![TypeNode::string()]),
        TypeNode::mapping([("id", TypeNode::integer())]),
        TypeNode::mapping([("id", TypeNode::string()), ("name", TypeNode::string())]),
    ]
}

mod merge_property_tests {
    use super::*;

    #[test]
    fn test_unknown_is_identity() {
        for x in samples() {
            assert_eq!(merge(x.clone(), TypeNode::Unknown), x);
            assert_eq!(merge(TypeNode::Unknown, x.clone()), x);
        }
    }

    #[test]
    fn test_commutative() {
        let all = samples();
        for a in &all {
            for b in &all {
                assert_eq!(
                    merge(a.clone(), b.clone()),
                    merge(b.clone(), a.clone()),
                    "merge({:?}, {:?})",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_associative() {
        let all = samples();
        for a in &all {
            for b in &all {
                for c in &all {
                    let left = merge(merge(a.clone(), b.clone()), c.clone());
                    let right = merge(a.clone(), merge(b.clone(), c.clone()));
                    assert_eq!(left, right, "({:?}, {:?}, {:?})", a, b, c);
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        for x in samples() {
            assert_eq!(merge(x.clone(), x.clone()), x);
        }
    }

    #[test]
    fn test_results_stay_normalized() {
        let all = samples();
        for a in &all {
            for b in &all {
                let merged = merge(a.clone(), b.clone());
                assert!(merged.is_normalized(), "{:?}", merged);
            }
        }
        assert!(merge_all(samples()).is_normalized());
    }

    #[test]
    fn test_fold_is_order_independent() {
        let forward = merge_all(samples());
        let backward = merge_all(samples().into_iter().rev());
        assert_eq!(forward, backward);
    }
}

mod string_serializable_tests {
    use super::*;

    fn classify_all(values: &[&str], registry: &StringSerializableRegistry) -> TypeNode {
        let classifier = Classifier::new(registry);
        merge_all(
            values
                .iter()
                .map(|v| classifier.classify(&SampleValue::String(v.to_string()))),
        )
    }

    #[test]
    fn test_boolean_before_integer() {
        let registry = StringSerializableRegistry::default();
        assert_eq!(
            classify_all(&["true", "false"], &registry),
            TypeNode::serialized(StringKind::BOOLEAN)
        );
        assert_eq!(
            classify_all(&["1", "0"], &registry),
            TypeNode::serialized(StringKind::INTEGER)
        );
    }

    #[test]
    fn test_refinement_downgrades_on_plain_value() {
        let registry = StringSerializableRegistry::default();
        assert_eq!(
            classify_all(&["1.5", "n/a", "2.5"], &registry),
            TypeNode::string()
        );
    }

    #[test]
    fn test_custom_descriptor() {
        fn is_uuid(value: &str) -> bool {
            value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
        }

        let mut registry = StringSerializableRegistry::default();
        registry.register(
            StringSerializable::new(StringKind::new("UuidString"), 10, is_uuid)
                .with_module("app.types"),
        );

        assert_eq!(
            classify_all(&["550e8400-e29b-41d4-a716-446655440000"], &registry),
            TypeNode::serialized(StringKind::new("UuidString"))
        );
        assert_eq!(
            registry.get(&StringKind::new("UuidString")).unwrap().module(),
            "app.types"
        );
    }
}
