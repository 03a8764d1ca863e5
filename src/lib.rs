//! Formflash coordinates flash-highlight animations for desktop form editors.
//!
//! One [`FlashCoordinator`] owns the only tick clock in the process. Each open window gets one
//! [`WindowCompositor`] that paints every visible flash in a single pass over a cached geometry
//! snapshot. The host toolkit plugs in through capability traits:
//!
//! - [`WindowHost`], [`WidgetGeometry`], [`ContainerWidget`] and [`ItemView`] describe widgets
//! - [`Clock`] and [`TickTimer`] drive the animation loop
//! - [`FlashPainter`] receives fills ([`DisplayList`] and [`RasterPainter`] are built in)
//!
//! The [`headless`] module provides in-memory hosts for tests and previews.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod color;
pub(crate) mod compositor;
pub(crate) mod config;
pub(crate) mod coordinator;
pub(crate) mod element;
/// In-memory hosts, clock and timer.
pub mod headless;
pub(crate) mod scope;

pub use crate::foundation::core::{
    BezPath, FlashColor, FlashKey, HostId, ItemHandle, Point, Rect, RoundedRect, SCOPE_SEPARATOR,
    Size, SourceId, Timestamp, WindowId, is_valid_rect, overlap,
};
pub use crate::foundation::error::{FlashError, FlashResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::timing::{FlashPhase, TimingConfig, flash_color_at};
pub use crate::color::palette::{FlashPalette, contrast_ratio, relative_luminance};
pub use crate::color::resolver::{ColorResolver, SemanticColorSource};
pub use crate::compositor::cache::{CachedGeometry, GeometryCache, MaskShape, clip_to_viewports};
pub use crate::compositor::overlay::{
    LayoutEvent, PaintOutcome, RegisterOutcome, WindowCompositor, WindowWork,
};
pub use crate::compositor::painter::{DisplayList, FlashPainter, PaintOp};
pub use crate::compositor::raster::{FrameRGBA, RasterPainter};
pub use crate::compositor::registry::CompositorRegistry;
pub use crate::config::{
    DisplayInfo, FALLBACK_REFRESH_HZ, FixedDisplay, FlashConfig, FlashSettings, PaletteSettings,
    UnknownDisplay,
};
pub use crate::coordinator::clock::{Clock, MonotonicClock, TickTimer};
pub use crate::coordinator::engine::{
    CoordinatorStats, FlashCoordinator, InvalidateScope, Registration, TickReport,
};
pub use crate::coordinator::table::{AnimationScope, AnimationTable};
pub use crate::element::container::{container_element, leaf_in_container_element, widget_element};
pub use crate::element::descriptor::{
    ChildExclusion, DelegatedRepaint, FlashElement, GeometryQuery, ItemLocator, PaintDelegation,
};
pub use crate::element::host::{ContainerWidget, HostWidget, ItemView, WidgetGeometry, WindowHost};
pub use crate::element::item::{list_row_element, tree_row_element};
pub use crate::scope::FlashScope;
