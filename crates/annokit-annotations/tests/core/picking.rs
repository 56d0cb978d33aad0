use std::collections::HashSet;

use annokit_annotations::model::SizingHandle;
use annokit_annotations::{decode_color, encode_ordinal, PickingSession, SelectionRecord};
use glam::DVec3;
use proptest::prelude::*;
use uuid::Uuid;

proptest! {
    #[test]
    fn ordinals_map_to_distinct_colors(start in 0usize..0xFF_0000, count in 1usize..2000) {
        let mut seen = HashSet::new();
        for ordinal in start..start + count {
            let color = encode_ordinal(ordinal);
            prop_assert_eq!(color.a, 255);
            prop_assert!(seen.insert(color));
            prop_assert_eq!(decode_color(color), Some(ordinal));
        }
    }
}

#[test]
fn test_session_shares_one_sequence() {
    let mut session = PickingSession::new();
    let annotation_id = Uuid::new_v4();
    let handles = [SizingHandle::None, SizingHandle::BoxTop, SizingHandle::Rotation];

    let colors: Vec<_> = handles
        .iter()
        .map(|&handle| {
            session
                .next_color(SelectionRecord {
                    file_id: None,
                    annotation_id,
                    handle,
                    point: DVec3::ZERO,
                })
                .unwrap()
        })
        .collect();

    for (i, color) in colors.iter().enumerate() {
        let ordinal = decode_color(*color).unwrap();
        assert_eq!(ordinal, i);
        assert_eq!(session.record(ordinal).unwrap().handle, handles[i]);
    }
}
