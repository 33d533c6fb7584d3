//! Screen-level state: what the notifier and categories pages hold between
//! user actions. Map updates are pushed explicitly by the caller.

mod categories;
mod notifier;

pub use self::categories::CategoriesView;
pub use self::notifier::NotifierView;
