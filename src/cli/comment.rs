use crate::citycare::NewComment;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig, id: &str, body: String) {
    let presenter = super::report_detail_presenter(config, id);
    presenter.post_new_comment(NewComment { body }).await;
    // The report owner is notified in the background, let it finish
    // before the process exits.
    presenter.settle().await;
}

