//! View-state composition: routes, date selector, pagination and the
//! dashboard's selection state.

pub mod calendar;
pub mod pagination;
pub mod route;
pub mod state;

pub use calendar::MonthPivot;
pub use pagination::{page_buttons, PageButton, Pager};
pub use route::{resolve, DashboardTab, Route};
pub use state::{Selection, ViewState};
