mod nav_bar;
mod status_bar;
pub mod surface;

pub use nav_bar::NavBarWidget;
pub use status_bar::StatusBarWidget;
