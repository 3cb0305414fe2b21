//! Client-side result filtering by the user's search facets.

use crate::backend::SourceKind;
use crate::search::adapter::DisplayResult;
use crate::settings::Settings;

/// Whether rows of this kind are shown under the given settings.
pub fn kind_visible(kind: SourceKind, settings: &Settings) -> bool {
    match kind {
        SourceKind::File => settings.show_files(),
        SourceKind::Webpage => settings.show_webpages(),
    }
}

/// Drop hidden kinds, then cap the count unless all results are shown.
///
/// Surviving rows keep their backend order.
pub fn apply_filters(rows: Vec<DisplayResult>, settings: &Settings) -> Vec<DisplayResult> {
    let visible = rows
        .into_iter()
        .filter(|row| kind_visible(row.kind(), settings));

    if settings.show_all_results() {
        visible.collect()
    } else {
        visible.take(settings.max_results().get()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn file(name: &str) -> DisplayResult {
        DisplayResult::File {
            path: format!("local/{}", name),
            label: name.to_string(),
            score: 0.5,
        }
    }

    fn page(url: &str) -> DisplayResult {
        DisplayResult::Webpage {
            url: url.to_string(),
            score: 0.5,
        }
    }

    fn labels(rows: &[DisplayResult]) -> Vec<&str> {
        rows.iter().map(DisplayResult::label).collect()
    }

    fn mixed() -> Vec<DisplayResult> {
        vec![
            file("a.txt"),
            page("http://b.com"),
            file("c.txt"),
            page("http://d.com"),
            file("e.txt"),
        ]
    }

    #[test]
    fn test_defaults_keep_everything() {
        let rows = apply_filters(mixed(), &Settings::default());
        assert_eq!(rows, mixed());
    }

    #[test]
    fn test_hide_webpages_keeps_order() {
        let mut settings = Settings::default();
        settings.set_show_webpages(false);
        let rows = apply_filters(mixed(), &settings);
        assert_eq!(labels(&rows), vec!["a.txt", "c.txt", "e.txt"]);
    }

    #[test]
    fn test_hide_files() {
        let mut settings = Settings::default();
        settings.set_show_files(false);
        let rows = apply_filters(mixed(), &settings);
        assert_eq!(labels(&rows), vec!["http://b.com", "http://d.com"]);
    }

    #[test]
    fn test_hide_both_is_empty() {
        let mut settings = Settings::default();
        settings.set_show_files(false);
        settings.set_show_webpages(false);
        assert!(apply_filters(mixed(), &settings).is_empty());
    }

    #[test]
    fn test_max_results_only_when_not_showing_all() {
        let mut settings = Settings::default();
        settings.set_max_results(NonZeroUsize::new(2).unwrap());

        // show_all_results defaults to true, so no truncation yet
        assert_eq!(apply_filters(mixed(), &settings).len(), 5);

        settings.set_show_all_results(false);
        let rows = apply_filters(mixed(), &settings);
        assert_eq!(labels(&rows), vec!["a.txt", "http://b.com"]);
    }

    #[test]
    fn test_truncation_applies_after_kind_filter() {
        let mut settings = Settings::default();
        settings.set_show_all_results(false);
        settings.set_show_webpages(false);
        settings.set_max_results(NonZeroUsize::new(2).unwrap());

        let rows = apply_filters(mixed(), &settings);
        assert_eq!(labels(&rows), vec!["a.txt", "c.txt"]);
    }
}
