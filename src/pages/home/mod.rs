pub mod presenter;
pub mod view;
pub use presenter::HomePresenter;
pub use view::HomeView;
