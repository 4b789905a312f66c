pub mod config;
pub mod preview;
pub mod route;
pub mod run;
pub mod submit;
