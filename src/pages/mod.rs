//! Presenters for each page of the app along with the view contract
//! each of them renders through.

pub mod home;
pub mod report_detail;
pub use home::{HomePresenter, HomeView};
pub use report_detail::{ReportDetailPresenter, ReportDetailView};
