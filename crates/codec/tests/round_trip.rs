use fieldkv_codec::{
    Budget, CapacityTracker, Chunker, Codec, CodecError, DecodeOutcome, StoreMap,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Deterministic, poorly-compressible strings (xorshift over an alphanumeric alphabet).
fn noise(seed: &mut u64, len: usize) -> String {
    (0..len)
        .map(|_| {
            *seed ^= *seed << 13;
            *seed ^= *seed >> 7;
            *seed ^= *seed << 17;
            ALPHABET[(*seed % ALPHABET.len() as u64) as usize] as char
        })
        .collect()
}

fn round_trip(map: &StoreMap) -> StoreMap {
    let codec = Codec::default();
    let chunker = Chunker::new(Budget::default()).expect("budget");
    let payload = codec.encode(map).expect("encode");
    let chunks = chunker.split(payload.as_str());
    codec
        .decode(&Chunker::join(&chunks))
        .outcome
        .into_map_or_empty()
}

#[test]
fn empty_map_produces_no_chunks() {
    let codec = Codec::default();
    let chunker = Chunker::new(Budget::default()).unwrap();
    let payload = codec.encode(&StoreMap::new()).unwrap();

    assert_eq!(payload.as_str(), "");
    assert_eq!(payload.len(), 0);
    assert!(chunker.split(payload.as_str()).is_empty());
}

#[test]
fn single_pair_survives_split_and_join() {
    let codec = Codec::default();
    let chunker = Chunker::new(Budget::default()).unwrap();
    let mut map = StoreMap::new();
    map.insert("a".into(), "b".into());

    let payload = codec.encode(&map).unwrap();
    let chunks = chunker.split(payload.as_str());
    assert_eq!(chunks.len(), payload.len().div_ceil(255));

    let decoded = codec.decode(&Chunker::join(&chunks));
    assert_eq!(decoded.consumed_len, payload.len());
    assert_eq!(decoded.outcome, DecodeOutcome::Decoded(map));
}

#[test]
fn multi_chunk_map_round_trips() {
    let mut seed = 0x9E37_79B9_7F4A_7C15;
    let map: StoreMap = (0..40)
        .map(|_| (noise(&mut seed, 63), noise(&mut seed, 63)))
        .collect();

    let payload = Codec::default().encode(&map).unwrap();
    assert!(payload.len() > 255, "expected several chunks");
    assert_eq!(round_trip(&map), map);
}

#[test]
fn oversized_map_is_reported_as_capacity_exceeded() {
    let mut seed = 0x2545_F491_4F6C_DD1D;
    let map: StoreMap = (0..2_000)
        .map(|_| (noise(&mut seed, 63), noise(&mut seed, 63)))
        .collect();

    let payload = Codec::default().encode(&map).unwrap();
    assert!(payload.len() > 500 * 255);

    let tracker = CapacityTracker::new(Budget::default()).with_reporting(false);
    let err = tracker.ensure_fits(payload.len()).unwrap_err();
    assert!(matches!(err, CodecError::CapacityExceeded { max_records: 500, .. }));
}

#[test]
fn small_budget_rejects_multi_record_payload() {
    let budget = Budget {
        max_records: 1,
        max_field_chars: 8,
    };
    let mut map = StoreMap::new();
    map.insert("key".into(), "value".into());
    let payload = Codec::default().encode(&map).unwrap();

    let err = CapacityTracker::new(budget)
        .ensure_fits(payload.len())
        .unwrap_err();
    assert!(err.to_string().starts_with("Capacity exceeded"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_round_trip(
        entries in prop::collection::btree_map("\\PC{1,63}", "\\PC{0,63}", 0..40)
    ) {
        prop_assert_eq!(round_trip(&entries), entries);
    }

    #[test]
    fn proptest_garbage_never_panics(text in "\\PC{0,400}") {
        let decoded = Codec::default().decode(&text);
        prop_assert_eq!(decoded.consumed_len, text.len());
        if text.is_empty() {
            prop_assert_eq!(decoded.outcome, DecodeOutcome::Empty);
        }
    }
}
