use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::orbit::OrbitModel;

/// An element-set group that was dropped while parsing a feed.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SkippedTriplet {
    /// 1-based line number where the group starts.
    pub line: usize,
    pub name: Option<String>,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub models: Vec<OrbitModel>,
    pub skipped: Vec<SkippedTriplet>,
}

/// Parses 3-line (`name`, `line1`, `line2`) and bare 2-line groups.
/// Malformed groups are skipped and recorded; the valid remainder is kept
/// in feed order. Later duplicates of a catalog id are dropped.
pub fn parse_element_feed(content: &str) -> ParsedFeed {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let is_line1 = |i: usize| lines.get(i).is_some_and(|(_, l)| l.starts_with("1 "));
    let is_line2 = |i: usize| lines.get(i).is_some_and(|(_, l)| l.starts_with("2 "));

    let mut feed = ParsedFeed::default();
    let mut seen = HashSet::new();
    let mut i = 0;

    while i < lines.len() {
        let (lineno, text) = lines[i];

        let group = if is_line1(i) && is_line2(i + 1) {
            i += 2;
            Ok((None, text, lines[i - 1].1))
        } else if is_line1(i + 1) && is_line2(i + 2) {
            i += 3;
            Ok((Some(text), lines[i - 2].1, lines[i - 1].1))
        } else if is_line1(i) {
            i += 1;
            Err((None, "line 1 without a following line 2"))
        } else if is_line2(i) {
            i += 1;
            Err((None, "line 2 without a preceding line 1"))
        } else if is_line1(i + 1) {
            i += 2;
            Err((Some(text), "missing line 2"))
        } else {
            i += 1;
            Err((Some(text), "name without element lines"))
        };

        let skip = |name: Option<&str>, reason: String| {
            log::warn!(
                "Skipping element set at line {} ({}): {}",
                lineno,
                name.unwrap_or("unnamed"),
                reason
            );
            SkippedTriplet {
                line: lineno,
                name: name.map(String::from),
                reason,
            }
        };

        match group {
            Ok((name, line1, line2)) => match OrbitModel::create(line1, line2, name.unwrap_or("")) {
                Ok(model) if !seen.insert(model.catalog_id()) => {
                    let reason = format!("duplicate catalog id {}", model.catalog_id());
                    feed.skipped.push(skip(name, reason));
                }
                Ok(model) => feed.models.push(model),
                Err(e) => feed.skipped.push(skip(name, e.to_string())),
            },
            Err((name, reason)) => feed.skipped.push(skip(name, reason.to_string())),
        }
    }

    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{GEO_FEED, ISS_LINE1, ISS_LINE2, LEO_LINE1, LEO_LINE2};

    #[test]
    fn parses_three_and_two_line_groups() {
        let content = format!(
            "ISS (ZARYA)\n{}\n{}\n{}\n{}\n",
            ISS_LINE1, ISS_LINE2, LEO_LINE1, LEO_LINE2
        );
        let feed = parse_element_feed(&content);
        assert!(feed.skipped.is_empty());
        let ids: Vec<_> = feed.models.iter().map(|m| m.catalog_id()).collect();
        assert_eq!(ids, vec![25544, 90001]);
        assert_eq!(feed.models[0].name(), "ISS (ZARYA)");
        assert_eq!(feed.models[1].name(), "NORAD 90001");
    }

    #[test]
    fn tolerates_crlf_and_padding() {
        let content = format!("  ISS (ZARYA)  \r\n{}\r\n{}   \r\n\r\n", ISS_LINE1, ISS_LINE2);
        let feed = parse_element_feed(&content);
        assert_eq!(feed.models.len(), 1);
        assert_eq!(feed.models[0].name(), "ISS (ZARYA)");
    }

    #[test]
    fn skips_malformed_triplet_and_keeps_the_rest() {
        let feed = parse_element_feed(GEO_FEED);
        assert_eq!(feed.models.len(), 9);
        assert_eq!(feed.skipped.len(), 1);
        let skipped = &feed.skipped[0];
        assert_eq!(skipped.name.as_deref(), Some("GEO-SAT 10"));
        assert!(skipped.reason.contains("checksum"), "{}", skipped.reason);
        assert_eq!(skipped.line, 28);
    }

    #[test]
    fn records_structural_gaps() {
        let content = format!(
            "ORPHAN\nBROKEN\n{}\nISS (ZARYA)\n{}\n{}\n{}\n",
            LEO_LINE1, ISS_LINE1, ISS_LINE2, LEO_LINE2
        );
        let feed = parse_element_feed(&content);
        assert_eq!(feed.models.len(), 1);
        let reasons: Vec<_> = feed.skipped.iter().map(|s| s.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec![
                "name without element lines",
                "missing line 2",
                "line 2 without a preceding line 1"
            ]
        );
    }

    #[test]
    fn drops_duplicate_catalog_ids() {
        let content = format!(
            "FIRST\n{}\n{}\nSECOND\n{}\n{}\n",
            ISS_LINE1, ISS_LINE2, ISS_LINE1, ISS_LINE2
        );
        let feed = parse_element_feed(&content);
        assert_eq!(feed.models.len(), 1);
        assert_eq!(feed.models[0].name(), "FIRST");
        assert_eq!(feed.skipped[0].name.as_deref(), Some("SECOND"));
    }

    #[test]
    fn empty_feed_yields_nothing() {
        let feed = parse_element_feed("\n\n");
        assert!(feed.models.is_empty());
        assert!(feed.skipped.is_empty());
    }
}
