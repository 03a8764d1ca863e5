use std::rc::Rc;

use crate::color::palette::FlashPalette;
use crate::config::FlashConfig;
use crate::foundation::core::{FlashColor, FlashKey, SCOPE_SEPARATOR};

/// Namespace prefix tree rows put in front of their keys; stripped before resolution.
const TREE_PREFIX: &str = "tree::";

/// Host-supplied mapping from a key's scope to a themed accent color.
///
/// Returning `None` falls through to the deterministic palette.
pub trait SemanticColorSource {
    /// Themed base color for `key`, if the host knows one.
    fn resolve(&self, key: &FlashKey) -> Option<FlashColor>;
}

impl<F> SemanticColorSource for F
where
    F: Fn(&FlashKey) -> Option<FlashColor>,
{
    fn resolve(&self, key: &FlashKey) -> Option<FlashColor> {
        self(key)
    }
}

/// Deterministic `key -> base color` mapping.
///
/// Never fails: unscoped keys get the neutral color, everything else gets either the semantic
/// color or a palette entry.
#[derive(Clone)]
pub struct ColorResolver {
    neutral: FlashColor,
    palette: FlashPalette,
    by_parent_scope: bool,
    semantic: Option<Rc<dyn SemanticColorSource>>,
}

impl ColorResolver {
    /// Resolver using only the fallback palette described by `config`.
    pub fn from_config(config: &FlashConfig) -> Self {
        Self {
            neutral: config.neutral_color,
            palette: FlashPalette::generate(&config.palette),
            by_parent_scope: config.palette_by_parent_scope,
            semantic: None,
        }
    }

    /// Try `source` before the palette.
    pub fn with_semantic(mut self, source: Rc<dyn SemanticColorSource>) -> Self {
        self.semantic = Some(source);
        self
    }

    /// Color for keys without a scope.
    pub fn neutral(&self) -> FlashColor {
        self.neutral
    }

    /// Fallback palette.
    pub fn palette(&self) -> &FlashPalette {
        &self.palette
    }

    /// Opaque base color for `key`.
    pub fn base_color(&self, key: &FlashKey) -> FlashColor {
        let raw = key.as_str();
        if raw.is_empty() {
            return self.neutral;
        }
        let stripped = raw.strip_prefix(TREE_PREFIX).unwrap_or(raw);
        if !stripped.contains(SCOPE_SEPARATOR) && !stripped.starts_with('/') {
            return self.neutral;
        }

        let effective = FlashKey::from(stripped);
        if let Some(color) = self.semantic.as_ref().and_then(|s| s.resolve(&effective)) {
            return color.with_alpha(255);
        }
        self.palette.color_for(&effective, self.by_parent_scope)
    }
}

impl std::fmt::Debug for ColorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorResolver")
            .field("neutral", &self.neutral)
            .field("palette_len", &self.palette.colors().len())
            .field("by_parent_scope", &self.by_parent_scope)
            .field("semantic", &self.semantic.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/resolver.rs"]
mod tests;
