// src/feed/mod.rs
pub mod providers;
pub mod scheduler;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::dedup::SeenSet;
use crate::feed::types::FeedSource;

/// Per-source cap on entries considered each poll.
pub const MAX_ENTRIES_PER_SOURCE: usize = 5;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_events_total", "Total entries fetched from sources.");
        describe_counter!("feed_kept_total", "Entries kept and rendered for delivery.");
        describe_counter!(
            "feed_dedup_total",
            "Entries dropped because their key was already seen."
        );
        describe_counter!("feed_provider_errors_total", "Source fetch/parse errors.");
        describe_histogram!("feed_parse_ms", "Source parse time in milliseconds.");
    });
}

/// Strip HTML tags/entities and collapse whitespace. Applied to titles and
/// summaries before keyword matching, since RSS descriptions routinely
/// carry markup.
pub fn scrub_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Case-insensitive keyword match over title and summary.
pub fn keyword_match(title: &str, summary: &str, keyword: &str) -> bool {
    let kw = keyword.to_lowercase();
    title.to_lowercase().contains(&kw) || summary.to_lowercase().contains(&kw)
}

/// One polling pass over every source: fetch, keyword-filter, dedup.
/// Returns rendered messages in source-then-entry order. A failing source
/// is logged and skipped; the remaining sources are still polled.
pub async fn poll_feeds(
    sources: &[Box<dyn FeedSource>],
    keyword: &str,
    seen: &mut SeenSet,
) -> Vec<String> {
    ensure_metrics_described();

    let mut messages = Vec::new();
    for src in sources {
        let entries = match src.fetch_latest().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, source = src.name(), "feed source error");
                counter!("feed_provider_errors_total").increment(1);
                continue;
            }
        };
        counter!("feed_events_total").increment(entries.len() as u64);

        for entry in entries.into_iter().take(MAX_ENTRIES_PER_SOURCE) {
            if !keyword_match(&entry.title, &entry.summary, keyword) {
                continue;
            }
            if !seen.insert(&entry.key) {
                counter!("feed_dedup_total").increment(1);
                continue;
            }
            counter!("feed_kept_total").increment(1);
            messages.push(entry.message);
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrub_text_strips_markup_and_ws() {
        let s = "  <p>El <b>Burgos CF</b>&nbsp;gana\n\n en El Plant&iacute;o</p>  ";
        assert_eq!(scrub_text(s), "El Burgos CF gana en El Plantío");
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(keyword_match("El BURGOS CF gana", "", "burgos cf"));
        assert!(keyword_match("Previa", "partido del Burgos CF", "burgos cf"));
        assert!(!keyword_match("El Mirandés gana", "sin mención", "burgos cf"));
    }
}
