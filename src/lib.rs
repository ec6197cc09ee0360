pub mod bookmark;
pub mod citycare;
pub mod cli;
pub mod core;
pub mod device;
pub mod maptiler;
pub mod notify;
pub mod pages;
