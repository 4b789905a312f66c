pub mod config;
pub mod contact;
pub mod content;
pub mod error;
pub mod route;

pub use config::{AppConfig, DecayCurve, EasingType, MotionConfig, ScrollConfig};
pub use error::{Error, Result};
pub use route::Route;
