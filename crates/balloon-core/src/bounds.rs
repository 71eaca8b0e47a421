//! Bounding-box computation for bubbles and their protruding parts.

use crate::bubble::{Bubble, Part, Rect};

/// Padding added on every side of the union.
pub const BBOX_PADDING: f32 = 10.0;

/// Tight bounding box of the bubble outline plus all protruding parts, in
/// bubble-local coordinates.
///
/// Covers the body rectangle, every tail tip, and every dot circle extent,
/// padded by [`BBOX_PADDING`]. The result always contains the path produced
/// by [`crate::path::generate`] and its decoration circles, so a renderer
/// can size its surface without clipping.
pub fn bbox(bubble: &Bubble) -> Rect {
    let mut min_x = 0.0f32;
    let mut min_y = 0.0f32;
    let mut max_x = bubble.width;
    let mut max_y = bubble.height;

    for part in &bubble.parts {
        match part {
            Part::Tail { tip_x, tip_y, .. } => {
                min_x = min_x.min(*tip_x);
                min_y = min_y.min(*tip_y);
                max_x = max_x.max(*tip_x);
                max_y = max_y.max(*tip_y);
            }
            Part::Dot { x, y, size, .. } => {
                let r = size / 2.0;
                min_x = min_x.min(x - r);
                min_y = min_y.min(y - r);
                max_x = max_x.max(x + r);
                max_y = max_y.max(y + r);
            }
        }
    }

    Rect {
        x: min_x - BBOX_PADDING,
        y: min_y - BBOX_PADDING,
        width: (max_x - min_x) + 2.0 * BBOX_PADDING,
        height: (max_y - min_y) + 2.0 * BBOX_PADDING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::Archetype;

    fn bubble(w: f32, h: f32) -> Bubble {
        Bubble {
            id: "b".to_string(),
            archetype: Archetype::SpeechDown,
            width: w,
            height: h,
            ..Bubble::default()
        }
    }

    #[test]
    fn plain_bubble_gets_padding_only() {
        let b = bbox(&bubble(200.0, 100.0));
        assert_eq!(
            b,
            Rect { x: -10.0, y: -10.0, width: 220.0, height: 120.0 }
        );
    }

    #[test]
    fn tail_tip_outside_body_is_covered() {
        let mut b = bubble(200.0, 100.0);
        b.parts.push(Part::Tail {
            id: "t".to_string(),
            base_x: 100.0,
            base_y: 100.0,
            base_width: 40.0,
            tip_x: 80.0,
            tip_y: 160.0,
        });
        let r = bbox(&b);
        assert!(r.y + r.height >= 160.0 + BBOX_PADDING);
        assert!(r.x <= -BBOX_PADDING && r.y <= -BBOX_PADDING);
    }

    #[test]
    fn dot_extent_is_covered() {
        let mut b = bubble(200.0, 100.0);
        b.parts.push(Part::Dot {
            id: "d".to_string(),
            x: -20.0,
            y: 130.0,
            size: 16.0,
        });
        let r = bbox(&b);
        assert_eq!(r.x, -20.0 - 8.0 - BBOX_PADDING);
        assert!(r.y + r.height >= 130.0 + 8.0 + BBOX_PADDING);
    }

    #[test]
    fn bbox_is_deterministic() {
        let mut b = bubble(200.0, 100.0);
        b.parts.push(Part::Dot {
            id: "d".to_string(),
            x: 10.0,
            y: 10.0,
            size: 4.0,
        });
        assert_eq!(bbox(&b), bbox(&b.clone()));
    }
}
