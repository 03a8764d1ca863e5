use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

pub use kurbo::{BezPath, Point, Rect, RoundedRect, Size};

/// Separator between a flash key's scope prefix and the entity it names.
pub const SCOPE_SEPARATOR: &str = "::";

/// Scoped identity of one logical animated entity, e.g. `"plate1::config.threshold"`.
///
/// Two unrelated editing contexts never share a key: the owning UI layer prefixes keys with its
/// scope before handing them to the coordinator. Windows that register the same key are showing
/// the same entity and flash in sync.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct FlashKey(String);

impl FlashKey {
    /// Wrap an already-scoped key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Prefix `key` with `scope` (`"scope::key"`). An empty scope leaves the key unchanged.
    pub fn scoped(scope: &str, key: &str) -> Self {
        if scope.is_empty() {
            return Self(key.to_owned());
        }
        Self(format!("{scope}{SCOPE_SEPARATOR}{key}"))
    }

    /// Borrow the raw key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return `true` when the key carries a scope prefix.
    pub fn is_scoped(&self) -> bool {
        self.0.contains(SCOPE_SEPARATOR)
    }

    /// Text before the first separator, or the whole key when unscoped.
    ///
    /// Sibling entities under one parent scope share this prefix.
    pub fn parent_scope(&self) -> &str {
        match self.0.split_once(SCOPE_SEPARATOR) {
            Some((parent, _)) => parent,
            None => &self.0,
        }
    }

    /// Text after the last separator.
    pub fn leaf(&self) -> &str {
        match self.0.rsplit_once(SCOPE_SEPARATOR) {
            Some((_, leaf)) => leaf,
            None => &self.0,
        }
    }
}

impl fmt::Display for FlashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FlashKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FlashKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for FlashKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifies the concrete host region behind a descriptor (e.g. `"group:12"`, `"list:4:key"`).
///
/// Together with the flash key it forms the dedup identity inside one compositor, so a tree row
/// and a group box flashing the same key coexist.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(String);

impl SourceId {
    /// Wrap a source id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable handle of one open top-level window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

/// Stable handle of one host widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostId(pub u64);

/// Stable per-item address inside a list or tree view, used for targeted repaints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemHandle(pub u64);

/// Monotonic instant, measured as an offset from a clock-defined origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub Duration);

impl Timestamp {
    /// Timestamp at `ms` milliseconds after the origin.
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Time elapsed from `earlier` to `self`, or `None` when `earlier` is later.
    pub fn checked_since(self, earlier: Self) -> Option<Duration> {
        self.0.checked_sub(earlier.0)
    }

    /// Offset from the origin.
    pub const fn as_duration(self) -> Duration {
        self.0
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FlashColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl FlashColor {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    /// Same RGB with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// RGB channels as an array.
    pub const fn rgb_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for FlashColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

/// Return `true` when `rect` has positive width and height.
pub fn is_valid_rect(rect: Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0
}

/// Intersection of two rects, or `None` when they do not overlap with positive area.
pub fn overlap(a: Rect, b: Rect) -> Option<Rect> {
    let out = a.intersect(b);
    is_valid_rect(out).then_some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
