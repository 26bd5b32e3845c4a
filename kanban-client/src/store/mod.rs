/// Client state containers
///
/// Each store owns the data one part of a front end renders and updates it
/// only after the matching API call completes. Failures are kept in the
/// store's `error` field instead of being returned.
///
/// - [`SpaceStore`]: spaces and the current selection
/// - [`ViewStore`]: active view tab
/// - [`BoardStore`]: columns and tasks of the default board

mod board;
mod space;
mod view;

pub use board::{BoardStore, ColumnGroup};
pub use space::SpaceStore;
pub use view::{View, ViewStore};
