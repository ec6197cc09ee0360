//! Renders pages to the terminal. Content goes to stdout, loading
//! indicators and errors to stderr so the output can be piped.

use anyhow::{Error, Result};
use async_trait::async_trait;

use crate::citycare::{Comment, Report};
use crate::pages::{HomeView, ReportDetailView};

#[derive(Default)]
pub struct TerminalView {
    // The report the page is showing, if any
    report_id: Option<String>,
}

impl TerminalView {
    pub fn for_report(report_id: &str) -> Self {
        Self {
            report_id: Some(report_id.to_string()),
        }
    }

    fn bookmark_hint(&self, label: &str, command: &str) -> String {
        match &self.report_id {
            Some(id) => format!("[ {} ]  citycare {} --id {}", label, command, id),
            None => format!("[ {} ]", label),
        }
    }
}

fn map_link(latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=17/{lat}/{lon}",
        lat = latitude,
        lon = longitude
    )
}

fn print_report_summary(report: &Report) {
    println!(
        "{}  {} [{}]\n    {} · reported by {} on {}",
        report.id,
        report.title,
        report.damage_level,
        report.location.place_name,
        report.reporter.name,
        report.created_at.format("%Y-%m-%d"),
    );
}

#[async_trait]
impl ReportDetailView for TerminalView {
    fn show_map_loading(&self) {
        eprintln!("Loading map...");
    }

    fn hide_map_loading(&self) {}

    async fn initial_map(&self) -> Result<(), Error> {
        Ok(())
    }

    fn show_report_detail_loading(&self) {
        eprintln!("Loading report...");
    }

    fn hide_report_detail_loading(&self) {}

    fn populate_report_detail_error(&self, message: &str) {
        eprintln!("Could not load report: {}", message);
    }

    fn populate_report_detail_and_initial_map(&self, _message: &str, report: &Report) {
        println!("# {}", report.title);
        println!();
        println!("Damage level: {}", report.damage_level);
        println!("Reported by:  {}", report.reporter.name);
        println!("Reported on:  {}", report.created_at.format("%Y-%m-%d %H:%M UTC"));
        println!("Location:     {}", report.location.place_name);
        println!(
            "Map:          {}",
            map_link(report.location.latitude, report.location.longitude)
        );
        println!();
        println!("{}", report.description);
        if !report.evidence_images.is_empty() {
            println!();
            println!("Evidence:");
            for image in &report.evidence_images {
                println!("  - {}", image);
            }
        }
        println!();
    }

    fn show_comments_loading(&self) {
        eprintln!("Loading comments...");
    }

    fn hide_comments_loading(&self) {}

    fn populate_report_detail_comments(&self, _message: &str, comments: &[Comment]) {
        if comments.is_empty() {
            println!("No comments yet.");
            return;
        }
        println!("## Comments ({})", comments.len());
        for comment in comments {
            println!(
                "\n{} ({})\n{}",
                comment.commenter.name,
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.body
            );
        }
    }

    fn populate_comments_list_error(&self, message: &str) {
        eprintln!("Could not load comments: {}", message);
    }

    fn show_submit_loading_button(&self) {
        eprintln!("Sending comment...");
    }

    fn hide_submit_loading_button(&self) {}

    fn post_new_comment_failed(&self, message: &str) {
        eprintln!("Could not post comment: {}", message);
    }

    fn post_new_comment_successfully(&self, message: &str, comment: &Comment) {
        println!("{} ({})", message, comment.id);
    }

    fn render_save_button(&self) {
        println!("{}", self.bookmark_hint("Save report", "save"));
    }

    fn render_remove_button(&self) {
        println!("{}", self.bookmark_hint("Remove from saved", "unsave"));
    }

    fn save_to_bookmark_successfully(&self, message: &str) {
        println!("{}", message);
    }

    fn save_to_bookmark_failed(&self, message: &str) {
        eprintln!("Could not save report: {}", message);
    }

    fn remove_from_bookmark_successfully(&self, message: &str) {
        println!("{}", message);
    }

    fn remove_from_bookmark_failed(&self, message: &str) {
        eprintln!("Could not remove report: {}", message);
    }
}

#[async_trait]
impl HomeView for TerminalView {
    fn show_map_loading(&self) {
        eprintln!("Loading map...");
    }

    fn hide_map_loading(&self) {}

    async fn initial_map(&self) -> Result<(), Error> {
        Ok(())
    }

    fn show_loading(&self) {
        eprintln!("Loading reports...");
    }

    fn hide_loading(&self) {}

    fn populate_reports_list(&self, _message: &str, reports: &[Report]) {
        if reports.is_empty() {
            println!("No reports yet.");
            return;
        }
        for report in reports {
            print_report_summary(report);
        }
    }

    fn populate_reports_list_error(&self, message: &str) {
        eprintln!("Could not load reports: {}", message);
    }
}

/// Print reports saved on this device.
pub fn print_saved_reports(reports: &[Report]) {
    if reports.is_empty() {
        println!("No saved reports.");
        return;
    }
    for report in reports {
        print_report_summary(report);
    }
}
