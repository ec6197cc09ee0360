pub mod presenter;
pub mod view;
pub use presenter::ReportDetailPresenter;
pub use view::ReportDetailView;
