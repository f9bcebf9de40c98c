use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::model::{Forest, NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub url: Option<String>,
    pub score: i64,
}

/// Fuzzy-match `query` against names and link urls; a node scores the
/// better of the two. Descending score, ties in forest order.
pub fn search(forest: &Forest, query: &str) -> Vec<SearchHit> {
    let matcher = SkimMatcherV2::default();
    let mut hits: Vec<SearchHit> = forest
        .iter()
        .filter_map(|n| {
            let name_score = matcher.fuzzy_match(&n.name, query);
            let url_score = n
                .url
                .as_deref()
                .and_then(|url| matcher.fuzzy_match(url, query));
            let score = name_score.max(url_score)?;
            Some(SearchHit {
                id: n.id.clone(),
                name: n.name.clone(),
                kind: n.kind,
                url: n.url.clone(),
                score,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn forest() -> Forest {
        let mut campaigns = Node::folder(NodeId::from("1"), "Campaigns");
        campaigns.children.push(Node::link(
            NodeId::from("2"),
            "Newsletter signup",
            "https://example.com/newsletter",
        ));
        Forest::new(vec![
            campaigns,
            Node::link(NodeId::from("3"), "Bio", "https://example.com/bio"),
        ])
    }

    #[test]
    fn matches_names_and_urls() {
        let hits = search(&forest(), "newsletter");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, NodeId::from("2"));

        let hits = search(&forest(), "bio");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, NodeId::from("3"));
    }

    #[test]
    fn folders_match_on_name() {
        let hits = search(&forest(), "campaigns");
        assert_eq!(hits[0].id, NodeId::from("1"));
        assert_eq!(hits[0].kind, NodeKind::Folder);
        assert_eq!(hits[0].url, None);
    }

    #[test]
    fn consecutive_match_outranks_scattered_match() {
        let mut f = forest();
        // "news" is scattered across this url but a prefix of node 2's name
        f.roots.push(Node::link(
            NodeId::from("4"),
            "Reading list",
            "https://example.com/note-worthy-stuff",
        ));
        let hits = search(&f, "news");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, NodeId::from("2"));
        assert_eq!(hits[1].id, NodeId::from("4"));
    }

    #[test]
    fn no_match_means_no_hits() {
        assert!(search(&forest(), "zzzzqqqq").is_empty());
    }
}
