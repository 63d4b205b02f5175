mod common;

use common::Function;
use proptest::prelude::*;
use rlualist::{Constant, UndumpError, undump};

fn arbitrary_constant() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(common::nil()),
        any::<bool>().prop_map(common::boolean),
        any::<i64>().prop_map(common::integer),
        any::<f64>().prop_map(common::float),
        proptest::collection::vec(any::<u8>(), 0..400).prop_map(|s| common::short_string(&s)),
    ]
}

proptest! {
    #[test]
    fn string_constants_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..600)) {
        let main = Function {
            constants: vec![common::long_string(&payload)],
            ..Function::default()
        };
        let proto = undump(&common::chunk(&main)).unwrap();
        prop_assert_eq!(proto.constants, vec![Constant::String(payload)]);
    }

    #[test]
    fn truncated_chunks_never_decode(
        constants in proptest::collection::vec(arbitrary_constant(), 0..8),
        code in proptest::collection::vec(any::<u32>(), 0..8),
        cut in any::<prop::sample::Index>(),
    ) {
        let main = Function {
            source: b"@prop.lua".to_vec(),
            line_info: vec![1; code.len()],
            code,
            constants,
            children: vec![common::hello()],
            ..Function::default()
        };
        let bytes = common::chunk(&main);
        let cut = cut.index(bytes.len());
        let truncated = matches!(
            undump(&bytes[..cut]),
            Err(UndumpError::TruncatedInput { .. })
        );
        prop_assert!(truncated);
    }

    #[test]
    fn arbitrary_bytes_after_header_never_panic(body in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut bytes = common::header();
        bytes.extend(body);
        // any outcome is fine as long as it is a value, not a panic
        let _ = undump(&bytes);
    }
}
