//! Source list parsing and inline citation rewriting.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::api_types::Source;

fn citation_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(\d+)\]").ok()).as_ref()
}

fn list_marker_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\[\d+\]|\d+[.)]|[-*•])\s*").ok())
        .as_ref()
}

/// Parses the raw sources block into a dense, 1-based list.
///
/// One source per non-empty line, `title: url`, split at the first colon.
/// Lines that do not fit that shape are dropped.
pub fn parse_sources(sources_text: &str) -> Vec<Source> {
    sources_text
        .lines()
        .filter_map(parse_source_line)
        .enumerate()
        .map(|(i, (title, url))| Source {
            ordinal: i + 1,
            title,
            url,
        })
        .collect()
}

fn parse_source_line(line: &str) -> Option<(String, String)> {
    let (title, url) = line.trim().split_once(':')?;
    let url = url.trim();
    // `https://...` with no title in front: the colon is the scheme's
    if url.starts_with("//") {
        return None;
    }
    let title = match list_marker_re() {
        Some(re) => re.replace(title.trim(), ""),
        None => title.trim().into(),
    };
    let title = title.trim();
    if title.is_empty() || url.is_empty() {
        return None;
    }
    Some((title.to_string(), url.to_string()))
}

/// Parses `sources_text` and rewrites `[n]` markers in `body_text` as
/// markdown links to the n-th source.
///
/// Markers outside `1..=N` stay literal. With no parsable sources the body
/// is returned unchanged.
pub fn link(body_text: &str, sources_text: &str) -> (String, Vec<Source>) {
    let sources = parse_sources(sources_text);
    let Some(re) = citation_re().filter(|_| !sources.is_empty()) else {
        return (body_text.to_string(), sources);
    };

    let linked = re.replace_all(body_text, |caps: &Captures| {
        match caps[1].parse::<usize>() {
            Ok(n) if (1..=sources.len()).contains(&n) => {
                format!("[[{n}]]({})", sources[n - 1].url)
            }
            _ => caps[0].to_string(),
        }
    });

    (linked.into_owned(), sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCES: &str = "\n1. Label: http://x\n2. Guide: http://y\n3. [3] Trial results: https://z.org/a:b\n";

    #[test]
    fn ordinals_follow_position() {
        let sources = parse_sources(SOURCES);
        assert_eq!(
            sources,
            vec![
                Source { ordinal: 1, title: "Label".into(), url: "http://x".into() },
                Source { ordinal: 2, title: "Guide".into(), url: "http://y".into() },
                Source {
                    ordinal: 3,
                    title: "[3] Trial results".into(),
                    url: "https://z.org/a:b".into()
                },
            ]
        );
    }

    #[test]
    fn malformed_lines_are_dropped_without_gaps() {
        let text = "no colon here\n- FDA label: https://fda.gov\nhttps://bare.example\n : http://untitled\n* NIH:\n[9] NIH page: https://nih.gov";
        let sources = parse_sources(text);
        let titles: Vec<_> = sources.iter().map(|s| (s.ordinal, s.title.as_str())).collect();
        assert_eq!(titles, vec![(1, "FDA label"), (2, "NIH page")]);
    }

    #[test]
    fn markers_become_links() {
        let (body, sources) = link("Weekly dosing [1], titrate slowly [2].", SOURCES);
        assert_eq!(sources.len(), 3);
        assert_eq!(
            body,
            "Weekly dosing [[1]](http://x), titrate slowly [[2]](http://y)."
        );
    }

    #[test]
    fn out_of_range_markers_stay_literal() {
        let (body, _) = link("See [7] and [0] but [3].", SOURCES);
        assert_eq!(body, "See [7] and [0] but [[3]](https://z.org/a:b).");
    }

    #[test]
    fn empty_sources_leave_body_unchanged() {
        let (body, sources) = link("Text with [1] marker.", "");
        assert!(sources.is_empty());
        assert_eq!(body, "Text with [1] marker.");
    }

    #[test]
    fn huge_marker_does_not_panic() {
        let (body, _) = link("[99999999999999999999999]", SOURCES);
        assert_eq!(body, "[99999999999999999999999]");
    }

    #[test]
    fn linking_is_idempotent() {
        let body = "A [1] B [2] C [5]";
        assert_eq!(link(body, SOURCES), link(body, SOURCES));
    }
}
