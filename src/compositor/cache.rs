use std::collections::{BTreeMap, HashMap};

use kurbo::Shape;

use crate::element::descriptor::FlashElement;
use crate::element::host::WindowHost;
use crate::foundation::core::{BezPath, FlashKey, Point, Rect, RoundedRect, overlap};

/// Flattening tolerance for rounded-rect outlines.
const PATH_TOLERANCE: f64 = 0.1;

/// One element's cached fill geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CachedGeometry {
    /// Bounds after viewport clipping, in window-local coordinates.
    pub rect: Rect,
    /// Corner radius of the fill.
    pub radius: f64,
    /// `true` when the element paints itself; kept for visibility culling only.
    pub delegated: bool,
}

/// Rounded container outline with rectangular holes, filled even-odd.
///
/// Holes are clipped to the outline's bounds and overlapping holes are merged, so every point
/// lies inside at most one hole and the even-odd fill leaves every hole empty.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskShape {
    outer: RoundedRect,
    holes: Vec<Rect>,
}

impl MaskShape {
    /// Build a mask from an outline and raw child rects.
    pub fn new(outer: Rect, radius: f64, children: &[Rect]) -> Self {
        let mut holes: Vec<Rect> = children.iter().filter_map(|c| overlap(*c, outer)).collect();
        merge_overlapping(&mut holes);
        Self {
            outer: RoundedRect::from_rect(outer, radius),
            holes,
        }
    }

    /// Rounded outline.
    pub fn outer(&self) -> RoundedRect {
        self.outer
    }

    /// Disjoint holes.
    pub fn holes(&self) -> &[Rect] {
        &self.holes
    }

    /// `true` when `p` is painted by the even-odd fill.
    pub fn contains(&self, p: Point) -> bool {
        self.outer.contains(p) && !self.holes.iter().any(|h| h.contains(p))
    }

    /// Outline followed by every hole, for an even-odd fill.
    pub fn to_path(&self) -> BezPath {
        let mut path = self.outer.to_path(PATH_TOLERANCE);
        for hole in &self.holes {
            path.extend(hole.path_elements(PATH_TOLERANCE));
        }
        path
    }
}

/// Replace overlapping rects by their union bounds until all are disjoint.
fn merge_overlapping(rects: &mut Vec<Rect>) {
    let mut merged = true;
    while merged {
        merged = false;
        'outer: for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                if overlap(rects[i], rects[j]).is_some() {
                    let joined = rects[i].union(rects[j]);
                    rects.swap_remove(j);
                    rects[i] = joined;
                    merged = true;
                    break 'outer;
                }
            }
        }
    }
}

/// Per-compositor geometry store, rebuilt lazily at most once per paint pass.
#[derive(Debug, Default)]
pub struct GeometryCache {
    valid: bool,
    clip_rects: Vec<Rect>,
    element_geometry: HashMap<FlashKey, Vec<Option<CachedGeometry>>>,
    element_masks: HashMap<FlashKey, Vec<Option<MaskShape>>>,
    rebuild_count: u64,
}

impl GeometryCache {
    /// `false` after any invalidating event until the next rebuild.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark stale; the next paint rebuilds.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Rebuilds performed so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Scroll viewports captured by the last rebuild.
    pub fn clip_rects(&self) -> &[Rect] {
        &self.clip_rects
    }

    /// Cached geometry for `key`, one slot per registered element; `None` slots are hidden.
    pub fn geometry(&self, key: &FlashKey) -> &[Option<CachedGeometry>] {
        self.element_geometry.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cached masks for `key`, parallel to [`GeometryCache::geometry`].
    pub fn masks(&self, key: &FlashKey) -> &[Option<MaskShape>] {
        self.element_masks.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` when any cached rect for `key` intersects `bounds`.
    pub fn is_visible(&self, key: &FlashKey, bounds: Rect) -> bool {
        self.geometry(key)
            .iter()
            .flatten()
            .any(|g| overlap(g.rect, bounds).is_some())
    }

    /// Query every element once, clip to scroll viewports and compute masks.
    #[tracing::instrument(level = "debug", skip_all, fields(window = window.id().0))]
    pub(crate) fn rebuild(
        &mut self,
        window: &dyn WindowHost,
        elements: &mut BTreeMap<FlashKey, Vec<FlashElement>>,
    ) {
        self.element_geometry.clear();
        self.element_masks.clear();
        self.clip_rects = window.scroll_viewports();

        for (key, list) in elements.iter_mut() {
            let mut rects = Vec::with_capacity(list.len());
            let mut masks = Vec::with_capacity(list.len());
            for el in list.iter_mut() {
                let Some(raw) = el.query_rect(window) else {
                    rects.push(None);
                    masks.push(None);
                    continue;
                };
                let rect = if el.clips_to_viewports() && !self.clip_rects.is_empty() {
                    match clip_to_viewports(raw, &self.clip_rects) {
                        Some(r) => r,
                        None => {
                            rects.push(None);
                            masks.push(None);
                            continue;
                        }
                    }
                } else {
                    raw
                };

                let radius = el.corner_radius();
                let delegated = el.delegates_paint();
                let mask = (!delegated && el.has_mask()).then(|| {
                    let children = el.exclusion_rects(window);
                    MaskShape::new(rect, radius, &children)
                });
                rects.push(Some(CachedGeometry {
                    rect,
                    radius,
                    delegated,
                }));
                masks.push(mask);
            }
            self.element_geometry.insert(key.clone(), rects);
            self.element_masks.insert(key.clone(), masks);
        }

        self.valid = true;
        self.rebuild_count += 1;
        tracing::debug!(
            keys = self.element_geometry.len(),
            rebuilds = self.rebuild_count,
            "rebuilt geometry cache"
        );
    }
}

/// First viewport intersection, or `None` when the rect lies outside every viewport.
pub fn clip_to_viewports(rect: Rect, viewports: &[Rect]) -> Option<Rect> {
    viewports.iter().find_map(|vp| overlap(rect, *vp))
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/cache.rs"]
mod tests;
