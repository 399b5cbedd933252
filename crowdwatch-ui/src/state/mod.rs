//! State Management
//!
//! Session context, dashboard view state and the live push connection.

pub mod dashboard;
pub mod live;
pub mod session;

pub use dashboard::{provide_dashboard_state, DashboardState};
pub use live::init_live_channel;
pub use session::{provide_auth_state, AuthState};
