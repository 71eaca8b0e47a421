//! Outline path generation for every bubble archetype.
//!
//! Produces SVG path data (absolute `M`/`L`/`Q` commands, `Z`-terminated) in
//! bubble-local coordinates, plus the floating dot circles that render
//! outside the main outline. Output is byte-stable for value-equal input so
//! path strings can be snapshot-tested.

use std::f32::consts::TAU;

use crate::bubble::{Archetype, Bubble, Part};

/// Lobes on a thought-cloud outline.
const THOUGHT_LOBES: usize = 9;
/// Horizontal/vertical cloud radius as a fraction of the bubble size.
const THOUGHT_RADIUS_RATIO: f32 = 0.3;
/// Outward push of the scallop control points.
const THOUGHT_BULGE: f32 = 1.4;
/// Points on a shout burst (alternating outer/inner).
const SHOUT_POINTS: usize = 28;
/// Inner ellipse divisor for the shout burst.
const SHOUT_INNER_DIVISOR: f32 = 3.5;
/// Corner radius for descriptive boxes.
const DESCRIPTIVE_RADIUS: f32 = 5.0;
/// Corner radius for any archetype without a specific rule.
const DEFAULT_RADIUS: f32 = 20.0;

/// Generated shape: one closed outline plus decoration circles.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubblePath {
    /// SVG path data for the body outline.
    pub body: String,
    /// Floating dot ornaments, not part of the outline.
    pub circles: Vec<DotCircle>,
}

/// A decoration circle in bubble-local coordinates.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DotCircle {
    pub id: String,
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

/// Generate the outline and decoration circles for a bubble.
///
/// Pure function of the bubble's geometry and parts; identical input yields
/// a byte-identical path string.
pub fn generate(bubble: &Bubble) -> BubblePath {
    let (w, h) = (bubble.width, bubble.height);

    let body = match bubble.archetype {
        Archetype::Thought => thought_outline(w, h),
        Archetype::Shout => shout_outline(w, h),
        archetype if archetype.is_speech_family() => {
            let r = corner_radius(bubble);
            let cut = first_tail(bubble).and_then(|t| match resolve_tail(t, w, h, r) {
                TailAttachment::Cut(cut) => Some(cut),
                TailAttachment::Unsupported => None,
            });
            rounded_rect(w, h, r, cut.as_ref())
        }
        _ => rounded_rect(w, h, corner_radius(bubble), None),
    };

    let circles = bubble
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Dot { id, x, y, size } => Some(DotCircle {
                id: id.clone(),
                cx: *x,
                cy: *y,
                r: size / 2.0,
            }),
            Part::Tail { .. } => None,
        })
        .collect();

    BubblePath { body, circles }
}

/// Corner radius for rounded-rect bodies, clamped so corners never overlap.
fn corner_radius(bubble: &Bubble) -> f32 {
    let max = (bubble.width / 2.0).min(bubble.height / 2.0).max(0.0);
    let r = if bubble.archetype.is_speech_family() {
        max
    } else if bubble.archetype == Archetype::Descriptive {
        DESCRIPTIVE_RADIUS
    } else {
        DEFAULT_RADIUS
    };
    r.min(max)
}

fn first_tail(bubble: &Bubble) -> Option<&Part> {
    bubble.parts.iter().find(|p| matches!(p, Part::Tail { .. }))
}

/// Which body edge a tail's clamped base landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TailEdge {
    Top,
    Bottom,
}

/// Where the outline is interrupted for a tail.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TailCut {
    pub edge: TailEdge,
    /// Cut span along the edge, left x < right x, inset past the corners.
    pub left: f32,
    pub right: f32,
    pub tip_x: f32,
    pub tip_y: f32,
}

pub(crate) enum TailAttachment {
    Cut(TailCut),
    /// Base landed on a left/right edge; those attachments are not drawn.
    Unsupported,
}

/// Clamp the tail base into the body and pick the attachment edge.
///
/// Nearest edge wins; ties prefer bottom, then top, so the resolution is
/// deterministic. A span that collapses once clamped past the corners
/// degenerates to no cut at all (plain rounded rect).
pub(crate) fn resolve_tail(part: &Part, w: f32, h: f32, r: f32) -> TailAttachment {
    let Part::Tail { base_x, base_y, base_width, tip_x, tip_y, .. } = part else {
        return TailAttachment::Unsupported;
    };

    let bx = base_x.clamp(0.0, w.max(0.0));
    let by = base_y.clamp(0.0, h.max(0.0));

    let to_bottom = h - by;
    let to_top = by;
    let to_left = bx;
    let to_right = w - bx;
    let nearest = to_bottom.min(to_top).min(to_left).min(to_right);

    let edge = if to_bottom <= nearest {
        TailEdge::Bottom
    } else if to_top <= nearest {
        TailEdge::Top
    } else {
        return TailAttachment::Unsupported;
    };

    let half = (base_width / 2.0).max(0.0);
    let left = (bx - half).clamp(r, (w - r).max(r));
    let right = (bx + half).clamp(r, (w - r).max(r));
    if right - left <= 0.0 {
        return TailAttachment::Unsupported;
    }

    TailAttachment::Cut(TailCut {
        edge,
        left,
        right,
        tip_x: *tip_x,
        tip_y: *tip_y,
    })
}

/// True when the bubble carries a tail that cannot be attached (left/right
/// edge or a span with no room). Used by the document layer for warnings.
pub(crate) fn has_unattachable_tail(bubble: &Bubble) -> bool {
    if !bubble.archetype.is_speech_family() {
        return false;
    }
    let r = corner_radius(bubble);
    match first_tail(bubble) {
        Some(part) => matches!(
            resolve_tail(part, bubble.width, bubble.height, r),
            TailAttachment::Unsupported
        ),
        None => false,
    }
}

/// Rounded rectangle outline, optionally interrupted by a tail cut.
///
/// Traversal is clockwise from just past the top-left corner. Zero-length
/// edge segments are skipped so no vertex appears twice.
fn rounded_rect(w: f32, h: f32, r: f32, cut: Option<&TailCut>) -> String {
    let mut p = PathBuilder::new();
    let top_cut = cut.filter(|c| c.edge == TailEdge::Top);
    let bottom_cut = cut.filter(|c| c.edge == TailEdge::Bottom);

    p.move_to(r, 0.0);

    // Top edge, left to right.
    if let Some(c) = top_cut {
        let mid_y = c.tip_y / 2.0;
        if c.left > r {
            p.line_to(c.left, 0.0);
        }
        p.quad_to((c.left + c.tip_x) / 2.0, mid_y, c.tip_x, c.tip_y);
        p.quad_to((c.right + c.tip_x) / 2.0, mid_y, c.right, 0.0);
        if c.right < w - r {
            p.line_to(w - r, 0.0);
        }
    } else if w - 2.0 * r > 0.0 {
        p.line_to(w - r, 0.0);
    }
    p.quad_to(w, 0.0, w, r);

    // Right edge.
    if h - 2.0 * r > 0.0 {
        p.line_to(w, h - r);
    }
    p.quad_to(w, h, w - r, h);

    // Bottom edge, right to left.
    if let Some(c) = bottom_cut {
        let mid_y = (h + c.tip_y) / 2.0;
        if c.right < w - r {
            p.line_to(c.right, h);
        }
        p.quad_to((c.right + c.tip_x) / 2.0, mid_y, c.tip_x, c.tip_y);
        p.quad_to((c.left + c.tip_x) / 2.0, mid_y, c.left, h);
        if c.left > r {
            p.line_to(r, h);
        }
    } else if w - 2.0 * r > 0.0 {
        p.line_to(r, h);
    }
    p.quad_to(0.0, h, 0.0, h - r);

    // Left edge.
    if h - 2.0 * r > 0.0 {
        p.line_to(0.0, r);
    }
    p.quad_to(0.0, 0.0, r, 0.0);

    p.close()
}

/// Scalloped cloud: lobe anchors on an ellipse, controls pushed outward at
/// the angular midpoints.
fn thought_outline(w: f32, h: f32) -> String {
    let (cx, cy) = (w / 2.0, h / 2.0);
    let rx = w * THOUGHT_RADIUS_RATIO;
    let ry = h * THOUGHT_RADIUS_RATIO;

    let anchor = |i: usize| {
        let angle = i as f32 * TAU / THOUGHT_LOBES as f32;
        (cx + rx * angle.cos(), cy + ry * angle.sin())
    };

    let mut p = PathBuilder::new();
    let (x0, y0) = anchor(0);
    p.move_to(x0, y0);
    for i in 0..THOUGHT_LOBES {
        let mid = (i as f32 + 0.5) * TAU / THOUGHT_LOBES as f32;
        let ctrl_x = cx + rx * THOUGHT_BULGE * mid.cos();
        let ctrl_y = cy + ry * THOUGHT_BULGE * mid.sin();
        let (x, y) = anchor((i + 1) % THOUGHT_LOBES);
        p.quad_to(ctrl_x, ctrl_y, x, y);
    }
    p.close()
}

/// Jagged burst: points alternate between an outer and an inner ellipse.
fn shout_outline(w: f32, h: f32) -> String {
    let (cx, cy) = (w / 2.0, h / 2.0);
    let point = |i: usize| {
        let angle = i as f32 * TAU / SHOUT_POINTS as f32;
        let (rx, ry) = if i % 2 == 0 {
            (w / 2.0, h / 2.0)
        } else {
            (w / SHOUT_INNER_DIVISOR, h / SHOUT_INNER_DIVISOR)
        };
        (cx + rx * angle.cos(), cy + ry * angle.sin())
    };

    let mut p = PathBuilder::new();
    let (x0, y0) = point(0);
    p.move_to(x0, y0);
    for i in 1..SHOUT_POINTS {
        let (x, y) = point(i);
        p.line_to(x, y);
    }
    p.close()
}

// ============================================================================
// Path assembly
// ============================================================================

struct PathBuilder {
    data: String,
}

impl PathBuilder {
    fn new() -> Self {
        Self { data: String::new() }
    }

    fn push_command(&mut self, command: &str) {
        if !self.data.is_empty() {
            self.data.push(' ');
        }
        self.data.push_str(command);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let cmd = format!("M {},{}", fmt_num(x), fmt_num(y));
        self.push_command(&cmd);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let cmd = format!("L {},{}", fmt_num(x), fmt_num(y));
        self.push_command(&cmd);
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let cmd = format!(
            "Q {},{} {},{}",
            fmt_num(cx),
            fmt_num(cy),
            fmt_num(x),
            fmt_num(y)
        );
        self.push_command(&cmd);
    }

    fn close(mut self) -> String {
        self.push_command("Z");
        self.data
    }
}

/// Stable plain-decimal formatting: two decimals, trailing zeros trimmed,
/// never exponential.
pub(crate) fn fmt_num(v: f32) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
