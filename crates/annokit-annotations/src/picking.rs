//! Color-coded picking
//!
//! During a picking pass every selectable item is drawn in a unique opaque
//! color. After the pass the color under the mouse is read back and mapped
//! to the [`SelectionRecord`] that was recorded when the color was issued.

use annokit_core::Rgba;
use glam::DVec3;
use tracing::warn;
use uuid::Uuid;

use crate::model::SizingHandle;
use crate::services::PickReadback;

/// Largest ordinal that fits in 24 bits once offset past the background
pub const MAX_ORDINAL: usize = 0xFF_FFFE;

/// Color for the `ordinal`-th candidate: `ordinal + 1` packed in RGB.
///
/// Ordinals above [`MAX_ORDINAL`] wrap.
pub fn encode_ordinal(ordinal: usize) -> Rgba {
    let value = (ordinal % (MAX_ORDINAL + 1)) + 1;
    Rgba::new(
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
        255,
    )
}

/// Inverse of [`encode_ordinal`]; the background (RGB 0) decodes to `None`
pub fn decode_color(color: Rgba) -> Option<usize> {
    let value = (usize::from(color.r) << 16) | (usize::from(color.g) << 8) | usize::from(color.b);
    value.checked_sub(1)
}

/// What was drawn under one picking color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRecord {
    /// Owning file, `None` for color bars and annotations outside any file
    pub file_id: Option<Uuid>,
    pub annotation_id: Uuid,
    pub handle: SizingHandle,
    /// Representative drawing-space point of the item
    pub point: DVec3,
}

/// Picking state for one pass, owned by the caller
#[derive(Debug, Default)]
pub struct PickingSession {
    records: Vec<SelectionRecord>,
}

impl PickingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item and return the color it must be drawn with.
    ///
    /// Returns `None` once the color space is exhausted; the item is then
    /// not selectable.
    pub fn next_color(&mut self, record: SelectionRecord) -> Option<Rgba> {
        let ordinal = self.records.len();
        if ordinal > MAX_ORDINAL {
            warn!(
                "Picking colors exhausted after {} items, {} not selectable",
                ordinal, record.annotation_id
            );
            return None;
        }
        self.records.push(record);
        Some(encode_ordinal(ordinal))
    }

    pub fn records(&self) -> &[SelectionRecord] {
        &self.records
    }

    pub fn record(&self, ordinal: usize) -> Option<&SelectionRecord> {
        self.records.get(ordinal)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forget all records before the next pass
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Read back the pixel and return the record drawn there
    pub fn pick(
        &self,
        readback: &dyn PickReadback,
        x: i64,
        y: i64,
    ) -> Option<(SelectionRecord, f64)> {
        let hit = pick(readback, x, y)?;
        self.record(hit.ordinal).map(|record| (*record, hit.depth))
    }
}

/// Ordinal and depth read back at a pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub ordinal: usize,
    pub depth: f64,
}

/// Decode the item at viewport pixel (`x`, `y`), origin at the bottom left
pub fn pick(readback: &dyn PickReadback, x: i64, y: i64) -> Option<PickHit> {
    let (width, height) = readback.size();
    let x = u32::try_from(x).ok().filter(|&x| x < width)?;
    let y = u32::try_from(y).ok().filter(|&y| y < height)?;

    let ordinal = decode_color(readback.color_at(x, y))?;
    Some(PickHit {
        ordinal,
        depth: readback.depth_at(x, y),
    })
}

/// Nearest pick across several passes
#[derive(Debug, Clone, Default)]
pub struct AnnotationIdentification {
    best: Option<(SelectionRecord, f64)>,
}

impl AnnotationIdentification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `record` if it is nearer than the current best
    pub fn offer(&mut self, record: SelectionRecord, depth: f64) -> bool {
        match self.best {
            Some((_, best_depth)) if depth >= best_depth => false,
            _ => {
                self.best = Some((record, depth));
                true
            }
        }
    }

    pub fn selection(&self) -> Option<&SelectionRecord> {
        self.best.as_ref().map(|(record, _)| record)
    }

    pub fn depth(&self) -> Option<f64> {
        self.best.map(|(_, depth)| depth)
    }

    pub fn clear(&mut self) {
        self.best = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnePixel {
        color: Rgba,
        depth: f64,
    }

    impl PickReadback for OnePixel {
        fn size(&self) -> (u32, u32) {
            (1, 1)
        }

        fn color_at(&self, _x: u32, _y: u32) -> Rgba {
            self.color
        }

        fn depth_at(&self, _x: u32, _y: u32) -> f64 {
            self.depth
        }
    }

    fn record(handle: SizingHandle) -> SelectionRecord {
        SelectionRecord {
            file_id: None,
            annotation_id: Uuid::new_v4(),
            handle,
            point: DVec3::ZERO,
        }
    }

    #[test]
    fn test_encoding() {
        assert_eq!(encode_ordinal(0), Rgba::new(0, 0, 1, 255));
        assert_eq!(encode_ordinal(255), Rgba::new(0, 1, 0, 255));
        assert_eq!(encode_ordinal(MAX_ORDINAL), Rgba::new(255, 255, 255, 255));
        assert_eq!(decode_color(Rgba::new(0, 1, 0, 255)), Some(255));
        assert_eq!(decode_color(Rgba::TRANSPARENT), None);
    }

    #[test]
    fn test_session_ordinals_follow_records() {
        let mut session = PickingSession::new();
        let body = record(SizingHandle::None);
        let handle = record(SizingHandle::BoxTop);
        let c0 = session.next_color(body).unwrap();
        let c1 = session.next_color(handle).unwrap();
        assert_ne!(c0, c1);
        assert_eq!(session.record(decode_color(c1).unwrap()), Some(&handle));

        session.reset();
        assert!(session.is_empty());
    }

    #[test]
    fn test_pick_outside_or_background() {
        let target = OnePixel {
            color: Rgba::TRANSPARENT,
            depth: 1.0,
        };
        assert!(pick(&target, 0, 0).is_none());

        let target = OnePixel {
            color: encode_ordinal(4),
            depth: 0.25,
        };
        assert_eq!(
            pick(&target, 0, 0),
            Some(PickHit {
                ordinal: 4,
                depth: 0.25
            })
        );
        assert!(pick(&target, 1, 0).is_none());
        assert!(pick(&target, -1, 0).is_none());
    }

    #[test]
    fn test_identification_keeps_nearest() {
        let mut id = AnnotationIdentification::new();
        let far = record(SizingHandle::None);
        let near = record(SizingHandle::None);
        assert!(id.offer(far, 0.8));
        assert!(id.offer(near, 0.3));
        assert!(!id.offer(far, 0.5));
        assert!(!id.offer(far, 0.3));
        assert_eq!(id.selection(), Some(&near));
        assert_eq!(id.depth(), Some(0.3));
    }
}
