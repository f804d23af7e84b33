pub mod controls;
#[cfg(feature = "egui")]
pub mod elements;
pub mod legend;
pub mod popup;
#[cfg(feature = "egui")]
pub mod widget;

pub use controls::{LayerControl, LayerEntry};
pub use legend::{Legend, LegendEntry};
pub use popup::{Popup, PopupContent, PopupManager};

#[cfg(feature = "egui")]
pub use elements::{Attribution, Position, ZoomControl};
#[cfg(feature = "egui")]
pub use popup::PopupStyle;
#[cfg(feature = "egui")]
pub use widget::MapView;
