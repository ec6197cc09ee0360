use std::sync::Arc;

use crate::core::AppConfig;
use crate::pages::HomePresenter;

use super::view::TerminalView;

pub async fn run(config: &AppConfig) {
    let presenter = HomePresenter::new(
        Arc::new(TerminalView::default()),
        super::api(config),
        super::mapper(config),
    );
    presenter.initial_gallery_and_map().await;
}
