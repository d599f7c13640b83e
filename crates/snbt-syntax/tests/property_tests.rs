//! Property tests: printed tags parse back to themselves

use proptest::collection::vec;
use proptest::prelude::*;
use snbt_syntax::{parse_snbt, CompoundTag, ListTag, Tag};

fn scalar() -> impl Strategy<Value = Tag> {
    prop_oneof![
        any::<i8>().prop_map(Tag::Byte),
        any::<i16>().prop_map(Tag::Short),
        any::<i32>().prop_map(Tag::Int),
        any::<i64>().prop_map(Tag::Long),
        any::<f32>().prop_filter("finite", |v| v.is_finite()).prop_map(Tag::Float),
        any::<f64>().prop_filter("finite", |v| v.is_finite()).prop_map(Tag::Double),
        any::<bool>().prop_map(Tag::Boolean),
        "[a-zA-Z0-9 _.+'\"\\\\\n\té-]{0,12}".prop_map(Tag::String),
        vec(any::<i8>(), 0..4).prop_map(Tag::ByteArray),
        vec(any::<i32>(), 0..4).prop_map(Tag::IntArray),
        vec(any::<i64>(), 0..4).prop_map(Tag::LongArray),
    ]
}

/// Lists repeat one element so they stay homogeneous.
fn tag() -> impl Strategy<Value = Tag> {
    scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), 0..4usize).prop_map(|(element, count)| {
                let elements = std::iter::repeat_n(element, count).collect();
                Tag::List(ListTag::from_elements(elements).unwrap())
            }),
            vec(("[a-zA-Z_][a-zA-Z0-9 _]{0,6}", inner), 0..4)
                .prop_map(|entries| Tag::Compound(entries.into_iter().collect::<CompoundTag>())),
        ]
    })
}

proptest! {
    #[test]
    fn printed_tags_parse_back(tag in tag(), indent in 0usize..4) {
        let printed = tag.as_string(indent);
        let parsed = parse_snbt(&printed);
        prop_assert!(parsed.is_ok(), "{:?} did not parse: {:?}", printed, parsed);
        prop_assert_eq!(parsed.unwrap(), tag);
    }

    #[test]
    fn indent_does_not_change_meaning(tag in tag()) {
        let compact = parse_snbt(&tag.as_string(0)).unwrap();
        let pretty = parse_snbt(&tag.as_string(3)).unwrap();
        prop_assert_eq!(compact, pretty);
    }

    #[test]
    fn ints_print_plainly(value in any::<i32>()) {
        prop_assert_eq!(Tag::Int(value).as_string(0), value.to_string());
        prop_assert_eq!(parse_snbt(&value.to_string()).unwrap(), Tag::Int(value));
    }

    #[test]
    fn parser_never_panics(input in "[\\[\\]{}():;,'\"\\\\a-zA-Z0-9._+ é-]{0,24}") {
        let _ = parse_snbt(&input);
    }
}
