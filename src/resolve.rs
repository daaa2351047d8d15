//! Physical layout resolution.
//!
//! Turns OS pixel rectangles plus configured [`LayoutHints`] into a shared
//! millimeter coordinate space. Each axis is resolved independently:
//!
//! 1. Configured references become edges of a dependency graph.
//! 2. Displays are ordered: most-referenced first, then by pixel position.
//! 3. Displays without a configured reference get one discovered from pixel
//!    adjacency (exact edge contact with an already-ordered display), else from
//!    the nearest display strictly before them, else they are anchored.
//! 4. Positions are computed from a worklist, each display only after its
//!    reference. A reference cycle is broken by anchoring its latest member.
//! 5. The layout is translated so the minimum x and y are zero.
//!
//! # Example
//!
//! ```
//! use spanwall::{DisplayRecord, LayoutHints, resolve};
//!
//! let displays = [
//!     DisplayRecord::new("left", 0, 0, 800, 600).with_size_mm(8000.0, 6000.0),
//!     DisplayRecord::new("right", 800, 0, 1024, 768).with_size_mm(10240.0, 7680.0),
//! ];
//! let layout = resolve(&displays, &LayoutHints::new());
//! assert_eq!(layout.get("right").unwrap().mm_rect.x, 8000.0);
//! ```

use core::cmp::Reverse;

use crate::config::{AxisHint, HintTarget, LayoutHints};
use crate::display::{AxisReference, DisplayLayout, DisplayRecord, ReferenceMode};
use crate::geometry::{Axis, MmRect, PixelRect};

/// Resolved physical layout of every display, in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedLayout {
    displays: Vec<DisplayLayout>,
}

impl ResolvedLayout {
    /// Layout of the display called `name`.
    pub fn get(&self, name: &str) -> Option<&DisplayLayout> {
        self.displays.iter().find(|d| d.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayLayout> {
        self.displays.iter()
    }

    pub fn len(&self) -> usize {
        self.displays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    /// Union of all physical rects.
    pub fn mm_bounds(&self) -> Option<MmRect> {
        MmRect::union_all(self.displays.iter().map(|d| &d.mm_rect))
    }

    /// Union of all pixel rects.
    pub fn pixel_bounds(&self) -> Option<PixelRect> {
        PixelRect::union_all(self.displays.iter().map(|d| &d.record.rect))
    }
}

impl<'a> IntoIterator for &'a ResolvedLayout {
    type Item = &'a DisplayLayout;
    type IntoIter = core::slice::Iter<'a, DisplayLayout>;

    fn into_iter(self) -> Self::IntoIter {
        self.displays.iter()
    }
}

/// Resolves display layouts against a fixed set of hints.
#[derive(Clone, Copy, Debug)]
pub struct LayoutResolver<'h> {
    hints: &'h LayoutHints,
}

impl<'h> LayoutResolver<'h> {
    pub fn new(hints: &'h LayoutHints) -> Self {
        Self { hints }
    }

    /// Resolve `records`. Pure and deterministic for a given input order.
    pub fn resolve(&self, records: &[DisplayRecord]) -> ResolvedLayout {
        for record in records {
            log::debug!("display initial: {record}");
        }

        let sizes: Vec<(f64, f64)> = records.iter().map(DisplayRecord::physical_size).collect();
        let (x_pos, x_refs) = AxisPass::new(records, &sizes, self.hints, Axis::X).run();
        let (y_pos, y_refs) = AxisPass::new(records, &sizes, self.hints, Axis::Y).run();

        let origin_x = x_pos.iter().copied().fold(f64::INFINITY, f64::min);
        let origin_y = y_pos.iter().copied().fold(f64::INFINITY, f64::min);

        let displays: Vec<DisplayLayout> = records
            .iter()
            .zip(sizes)
            .zip(x_refs.into_iter().zip(y_refs))
            .enumerate()
            .map(|(i, ((record, (w, h)), (x, y)))| DisplayLayout {
                record: record.clone(),
                mm_rect: MmRect::new(x_pos[i] - origin_x, y_pos[i] - origin_y, w, h),
                x,
                y,
            })
            .collect();

        for display in &displays {
            log::debug!("display after adjust: {display}");
        }
        ResolvedLayout { displays }
    }
}

/// Resolve `records` using `hints`. See the [module docs](self).
pub fn resolve(records: &[DisplayRecord], hints: &LayoutHints) -> ResolvedLayout {
    LayoutResolver::new(hints).resolve(records)
}

/// Nearest display strictly left of `display`, by squared distance from each
/// candidate's (right edge, top) to `display`'s (left, top).
///
/// Ties go to the earliest candidate in `candidates`.
pub fn find_display_left<'a>(
    display: &DisplayRecord,
    candidates: &'a [DisplayRecord],
) -> Option<&'a DisplayRecord> {
    nearest_before(display, candidates.iter().enumerate(), Axis::X).map(|i| &candidates[i])
}

/// Nearest display strictly above `display`, by squared distance from each
/// candidate's (left, bottom edge) to `display`'s (left, top).
///
/// Ties go to the earliest candidate in `candidates`.
pub fn find_display_above<'a>(
    display: &DisplayRecord,
    candidates: &'a [DisplayRecord],
) -> Option<&'a DisplayRecord> {
    nearest_before(display, candidates.iter().enumerate(), Axis::Y).map(|i| &candidates[i])
}

fn nearest_before<'a, I>(display: &DisplayRecord, candidates: I, axis: Axis) -> Option<usize>
where
    I: IntoIterator<Item = (usize, &'a DisplayRecord)>,
{
    let me = display.rect;
    let mut best: Option<(i64, usize)> = None;
    for (key, other) in candidates {
        if other.name == display.name || other.rect.start(axis) >= me.start(axis) {
            continue;
        }
        let along = i64::from(other.rect.far(axis)) - i64::from(me.start(axis));
        let across = i64::from(other.rect.start(axis.other())) - i64::from(me.start(axis.other()));
        let dist = along * along + across * across;
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, key));
        }
    }
    best.map(|(_, key)| key)
}

/// Exact pixel contact of `display` with `other` on `axis`, in priority order.
fn adjacency(display: &PixelRect, other: &PixelRect, axis: Axis) -> Option<ReferenceMode> {
    if display.start(axis) == other.far(axis) {
        Some(ReferenceMode::FarToStart)
    } else if display.start(axis) == other.start(axis) {
        Some(ReferenceMode::StartToStart)
    } else if display.far(axis) == other.far(axis) {
        Some(ReferenceMode::FarToFar)
    } else {
        None
    }
}

// ============================================================================
// Per-axis resolution
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq)]
enum Link {
    /// Fixed position, no dependency.
    Anchor { offset: f64 },
    /// Depends on the display at `target`.
    Relative {
        target: usize,
        mode: ReferenceMode,
        offset: f64,
    },
}

struct AxisPass<'a> {
    records: &'a [DisplayRecord],
    /// Physical extent of each display on this axis.
    extents: Vec<f64>,
    hints: &'a LayoutHints,
    axis: Axis,
    links: Vec<Option<Link>>,
    /// Whether each link came from configuration rather than discovery.
    configured: Vec<bool>,
    counts: Vec<u32>,
}

impl<'a> AxisPass<'a> {
    fn new(
        records: &'a [DisplayRecord],
        sizes: &[(f64, f64)],
        hints: &'a LayoutHints,
        axis: Axis,
    ) -> Self {
        let extents = sizes
            .iter()
            .map(|&(w, h)| match axis {
                Axis::X => w,
                Axis::Y => h,
            })
            .collect();
        Self {
            records,
            extents,
            hints,
            axis,
            links: vec![None; records.len()],
            configured: vec![false; records.len()],
            counts: vec![0; records.len()],
        }
    }

    fn run(mut self) -> (Vec<f64>, Vec<AxisReference>) {
        self.apply_configured();
        let order = self.processing_order();
        self.discover(&order);
        let positions = self.place(&order);

        let references = self
            .links
            .iter()
            .zip(&self.counts)
            .map(|(link, &reference_count)| match link {
                Some(Link::Relative {
                    target,
                    mode,
                    offset,
                }) => AxisReference {
                    reference: Some(self.records[*target].name.clone()),
                    mode: *mode,
                    offset_mm: *offset,
                    reference_count,
                },
                Some(Link::Anchor { offset }) => AxisReference {
                    reference_count,
                    ..AxisReference::anchored(*offset)
                },
                None => AxisReference {
                    reference_count,
                    ..AxisReference::anchored(0.0)
                },
            })
            .collect();

        (positions, references)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }

    fn hint(&self, i: usize) -> Option<&'a AxisHint> {
        self.hints.get(&self.records[i].name, self.axis)
    }

    /// Turn configured hints into links. Unknown or self references are
    /// ignored so the display falls through to discovery.
    fn apply_configured(&mut self) {
        for i in 0..self.records.len() {
            let Some(hint) = self.hint(i) else { continue };
            let link = match &hint.from {
                None => None,
                Some(HintTarget::Absolute) => Some(Link::Anchor {
                    offset: hint.offset_mm,
                }),
                Some(HintTarget::Display { mode, .. }) if *mode == ReferenceMode::Absolute => {
                    Some(Link::Anchor {
                        offset: hint.offset_mm,
                    })
                }
                Some(HintTarget::Display { name, mode }) => match self.index_of(name) {
                    Some(target) if target != i => {
                        self.counts[target] += 1;
                        Some(Link::Relative {
                            target,
                            mode: *mode,
                            offset: hint.offset_mm,
                        })
                    }
                    Some(_) => {
                        log::warn!(
                            "{}: ignoring {:?} reference to itself",
                            self.records[i].name,
                            self.axis
                        );
                        None
                    }
                    None => {
                        log::warn!(
                            "{}: ignoring {:?} reference to unknown display {name:?}",
                            self.records[i].name,
                            self.axis
                        );
                        None
                    }
                },
            };
            self.configured[i] = link.is_some();
            self.links[i] = link;
        }
    }

    /// Most-referenced first; then by pixel start on this axis, primary
    /// before non-primary, pixel start on the other axis, input order.
    fn processing_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.records.len()).collect();
        order.sort_by_key(|&i| {
            let r = &self.records[i];
            (
                Reverse(self.counts[i]),
                r.rect.start(self.axis),
                !r.is_primary,
                r.rect.start(self.axis.other()),
                i,
            )
        });
        order
    }

    /// Fill in links for displays without a configured reference.
    fn discover(&mut self, order: &[usize]) {
        for (pos, &i) in order.iter().enumerate() {
            if self.links[i].is_some() {
                continue;
            }
            let rect = self.records[i].rect;

            let adjacent = order[..pos]
                .iter()
                .filter(|&&j| !self.reaches(j, i))
                .find_map(|&j| {
                    adjacency(&rect, &self.records[j].rect, self.axis).map(|mode| (j, mode))
                });

            let link = match adjacent {
                Some((target, mode)) => Link::Relative {
                    target,
                    mode,
                    offset: 0.0,
                },
                None => {
                    let nearest = nearest_before(
                        &self.records[i],
                        order
                            .iter()
                            .filter(|&&j| !self.reaches(j, i))
                            .map(|&j| (j, &self.records[j])),
                        self.axis,
                    );
                    match nearest {
                        Some(target) => Link::Relative {
                            target,
                            mode: ReferenceMode::FarToStart,
                            offset: 0.0,
                        },
                        None => Link::Anchor {
                            offset: self.hint(i).map_or(0.0, |h| h.offset_mm),
                        },
                    }
                }
            };

            if let Link::Relative { target, .. } = link {
                self.counts[target] += 1;
            }
            self.links[i] = Some(link);
        }
    }

    /// Whether following links from `from` arrives at `to`. A discovered
    /// link to such a display would close a cycle.
    fn reaches(&self, from: usize, to: usize) -> bool {
        let mut current = from;
        for _ in 0..self.records.len() {
            match self.links[current] {
                Some(Link::Relative { target, .. }) if target == to => return true,
                Some(Link::Relative { target, .. }) => current = target,
                _ => return false,
            }
        }
        false
    }

    /// Compute positions, each only after its reference. Bounded: every pass
    /// either resolves a display or breaks a cycle.
    fn place(&mut self, order: &[usize]) -> Vec<f64> {
        let mut positions: Vec<Option<f64>> = vec![None; self.records.len()];
        let mut pending: Vec<usize> = order.to_vec();

        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|&i| {
                let value = match self.links[i] {
                    None => Some(0.0),
                    Some(Link::Anchor { offset }) => Some(offset),
                    Some(Link::Relative {
                        target,
                        mode,
                        offset,
                    }) => positions[target]
                        .map(|start| mode.place((start, self.extents[target]), self.extents[i], offset)),
                };
                match value {
                    Some(v) => {
                        positions[i] = Some(v);
                        false
                    }
                    None => true,
                }
            });

            if pending.len() == before {
                self.break_cycle(&pending, order);
            }
        }

        positions.into_iter().map(|p| p.unwrap_or(0.0)).collect()
    }

    /// Every pending display depends on another pending one, so following
    /// links from any of them ends in a cycle. Anchor the cycle member that
    /// comes last in processing order, preferring discovered links over
    /// configured ones.
    fn break_cycle(&mut self, pending: &[usize], order: &[usize]) {
        let Some(&start) = pending.last() else { return };
        let rank = |i: usize| order.iter().position(|&j| j == i).unwrap_or(usize::MAX);

        let mut path: Vec<usize> = Vec::new();
        let mut current = start;
        let cycle_from = loop {
            if let Some(at) = path.iter().position(|&p| p == current) {
                break at;
            }
            path.push(current);
            match self.links[current] {
                Some(Link::Relative { target, .. }) => current = target,
                _ => break path.len() - 1,
            }
        };

        let members = &path[cycle_from..];
        let discovered = members.iter().copied().filter(|&i| !self.configured[i]);
        let Some(victim) = discovered
            .max_by_key(|&i| rank(i))
            .or_else(|| members.iter().copied().max_by_key(|&i| rank(i)))
        else {
            return;
        };
        if let Some(Link::Relative { target, .. }) = self.links[victim] {
            self.counts[target] = self.counts[target].saturating_sub(1);
            log::warn!(
                "{}: {:?} reference cycle through {}; anchoring at zero",
                self.records[victim].name,
                self.axis,
                self.records[target].name
            );
        }
        self.links[victim] = Some(Link::Anchor { offset: 0.0 });
        self.configured[victim] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mm(name: &str, x: i32, y: i32, w: i32, h: i32) -> DisplayRecord {
        DisplayRecord::new(name, x, y, w, h).with_size_mm(f64::from(w) * 10.0, f64::from(h) * 10.0)
    }

    // ── adjacency ───────────────────────────────────────────────────────

    #[test]
    fn adjacency_priority() {
        let a = PixelRect::new(0, 0, 800, 600);
        let touching = PixelRect::new(800, 0, 800, 600);
        assert_eq!(adjacency(&touching, &a, Axis::X), Some(ReferenceMode::FarToStart));
        assert_eq!(adjacency(&touching, &a, Axis::Y), Some(ReferenceMode::StartToStart));

        let right_aligned = PixelRect::new(400, 600, 400, 300);
        assert_eq!(adjacency(&right_aligned, &a, Axis::X), Some(ReferenceMode::FarToFar));
        assert_eq!(adjacency(&right_aligned, &a, Axis::Y), Some(ReferenceMode::FarToStart));

        let apart = PixelRect::new(1000, 1000, 10, 10);
        assert_eq!(adjacency(&apart, &a, Axis::X), None);
    }

    // ── nearest_before ──────────────────────────────────────────────────

    #[test]
    fn nearest_prefers_smaller_squared_distance() {
        let list = [
            mm("a", 0, 0, 800, 600),
            mm("b", 1024, 0, 1024, 768),
            mm("c", 0, 600, 1024, 768),
        ];
        // a: (800-1024)² + 0² = 50176; c: 0² + 600² = 360000
        assert_eq!(find_display_left(&list[1], &list).map(|d| d.name.as_str()), Some("a"));
        assert!(find_display_left(&list[2], &list).is_none());
        assert_eq!(find_display_above(&list[2], &list).map(|d| d.name.as_str()), Some("a"));
        assert!(find_display_above(&list[1], &list).is_none());
    }

    #[test]
    fn nearest_tie_goes_to_first_candidate() {
        let list = [
            mm("up", 0, -100, 100, 100),
            mm("down", 0, 100, 100, 100),
            mm("me", 100, 0, 100, 100),
        ];
        assert_eq!(find_display_left(&list[2], &list).map(|d| d.name.as_str()), Some("up"));
    }

    // ── cycle breaking ──────────────────────────────────────────────────

    #[test]
    fn mutual_references_terminate() {
        let records = [mm("a", 0, 0, 100, 100), mm("b", 100, 0, 100, 100)];
        let hints = LayoutHints::new()
            .with("a", Axis::X, AxisHint::relative("b", ReferenceMode::FarToStart, 0.0))
            .with("b", Axis::X, AxisHint::relative("a", ReferenceMode::FarToStart, 0.0));
        let layout = resolve(&records, &hints);
        let a = layout.get("a").unwrap();
        let b = layout.get("b").unwrap();
        // One of them is anchored, the other sits after it.
        let anchored = [a, b].iter().filter(|d| d.x.reference.is_none()).count();
        assert_eq!(anchored, 1);
        assert!(a.mm_rect.x.is_finite() && b.mm_rect.x.is_finite());
        assert_eq!(a.mm_rect.x.min(b.mm_rect.x), 0.0);
        assert_eq!((a.mm_rect.x - b.mm_rect.x).abs(), 1000.0);
    }

    #[test]
    fn cycle_break_spares_non_members() {
        // c depends on a, and a <-> b form a cycle.
        let records = [
            mm("a", 0, 0, 100, 100),
            mm("b", 100, 0, 100, 100),
            mm("c", 200, 0, 100, 100),
        ];
        let hints = LayoutHints::new()
            .with("a", Axis::X, AxisHint::relative("b", ReferenceMode::FarToStart, 0.0))
            .with("b", Axis::X, AxisHint::relative("a", ReferenceMode::FarToStart, 0.0))
            .with("c", Axis::X, AxisHint::relative("a", ReferenceMode::StartToStart, 5.0));
        let layout = resolve(&records, &hints);
        let c = layout.get("c").unwrap();
        assert_eq!(c.x.reference.as_deref(), Some("a"));
        assert_eq!(
            c.mm_rect.x - layout.get("a").unwrap().mm_rect.x,
            5.0
        );
    }

    #[test]
    fn discovery_never_points_back_at_a_configured_referrer() {
        // b is ordered first because a references it; a sits nearest to the
        // left of b, but b must not take a as its own reference.
        let records = [mm("a", 0, 0, 100, 50), mm("b", 100, 0, 100, 50)];
        let hints = LayoutHints::new().with(
            "a",
            Axis::X,
            AxisHint::relative("b", ReferenceMode::StartToStart, 50.0),
        );
        let layout = resolve(&records, &hints);
        let a = layout.get("a").unwrap();
        let b = layout.get("b").unwrap();
        assert_eq!(a.x.reference.as_deref(), Some("b"));
        assert_eq!(b.x.reference, None);
        assert_eq!(a.mm_rect.x - b.mm_rect.x, 50.0);
    }

    #[test]
    fn reaches_follows_link_chain() {
        let records = [
            mm("a", 0, 0, 100, 100),
            mm("b", 100, 0, 100, 100),
            mm("c", 200, 0, 100, 100),
        ];
        let hints = LayoutHints::new();
        let sizes: Vec<_> = records.iter().map(DisplayRecord::physical_size).collect();
        let mut pass = AxisPass::new(&records, &sizes, &hints, Axis::X);
        let to = |target| {
            Some(Link::Relative {
                target,
                mode: ReferenceMode::FarToStart,
                offset: 0.0,
            })
        };
        pass.links = vec![None, to(0), to(1)];
        assert!(pass.reaches(2, 0));
        assert!(pass.reaches(1, 0));
        assert!(!pass.reaches(0, 2));
    }

    #[test]
    fn cycle_break_drops_discovered_link_first() {
        let records = [mm("a", 0, 0, 100, 100), mm("b", 100, 0, 100, 100)];
        let hints = LayoutHints::new();
        let sizes: Vec<_> = records.iter().map(DisplayRecord::physical_size).collect();
        let mut pass = AxisPass::new(&records, &sizes, &hints, Axis::X);
        // a is configured relative to b; b's link back to a was discovered.
        pass.links = vec![
            Some(Link::Relative {
                target: 1,
                mode: ReferenceMode::StartToStart,
                offset: 50.0,
            }),
            Some(Link::Relative {
                target: 0,
                mode: ReferenceMode::FarToStart,
                offset: 0.0,
            }),
        ];
        pass.configured = vec![true, false];
        pass.counts = vec![1, 1];
        // a comes later in processing order, but its link is configured.
        let order = [1, 0];
        let positions = pass.place(&order);
        assert_eq!(pass.links[1], Some(Link::Anchor { offset: 0.0 }));
        assert_eq!(positions[0] - positions[1], 50.0);
        assert_eq!(pass.counts, vec![0, 1]);
    }

    #[test]
    fn reference_to_unresolved_display_waits_for_it() {
        // "z" is configured relative to "c". "c" is ordered first (it is
        // referenced) but its own position comes from "b", which is placed last.
        let records = [
            mm("a", 0, 0, 100, 100),
            mm("b", 100, 0, 100, 100),
            mm("c", 200, 0, 100, 100),
            mm("z", 0, 500, 100, 100),
        ];
        let hints = LayoutHints::new().with(
            "z",
            Axis::X,
            AxisHint::relative("c", ReferenceMode::StartToStart, 0.0),
        );
        let layout = resolve(&records, &hints);
        let x = |name: &str| layout.get(name).unwrap().mm_rect.x;
        assert_eq!(x("a"), 0.0);
        assert_eq!(x("b"), 1000.0);
        assert_eq!(x("c"), 2000.0);
        assert_eq!(x("z"), 2000.0);
    }

    #[test]
    fn reference_counts_are_reported() {
        let records = [
            mm("a", 0, 0, 100, 100),
            mm("b", 100, 0, 100, 100),
            mm("c", 200, 0, 100, 100),
        ];
        let layout = resolve(&records, &LayoutHints::new());
        // a <- b <- c
        assert_eq!(layout.get("a").unwrap().x.reference_count, 1);
        assert_eq!(layout.get("b").unwrap().x.reference_count, 1);
        assert_eq!(layout.get("c").unwrap().x.reference_count, 0);
    }
}
