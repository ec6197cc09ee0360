use crate::core::AppConfig;

/// Load a report and its comments side by side, then show whether it
/// has been saved.
pub async fn run(config: &AppConfig, id: &str, notify_me: bool) {
    let presenter = super::report_detail_presenter(config, id);

    tokio::join!(
        async {
            presenter.show_report_detail().await;
            presenter.show_report_detail_map().await;
        },
        presenter.get_comments_list(),
    );
    presenter.show_save_button().await;

    if notify_me {
        presenter.notify_me().await;
    }
}

pub async fn notify_me(config: &AppConfig, id: &str) {
    let presenter = super::report_detail_presenter(config, id);
    presenter.notify_me().await;
}
