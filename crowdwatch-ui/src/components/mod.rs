//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod date_select;
pub mod entries_table;
pub mod loading;
pub mod nav;
pub mod notifications;
pub mod site_select;
pub mod tiles;

pub use chart::{DemographicsChart, DemographicsPie, OccupancyChart};
pub use date_select::DateSelect;
pub use entries_table::EntriesLog;
pub use nav::{Navbar, Sidebar};
pub use notifications::NotificationsPanel;
pub use site_select::SiteSelect;
pub use tiles::{DwellCard, FootfallCard};
