//! Problem URL detection.
//!
//! Recognizes the judge a problem link points to and, where the URL carries
//! enough information, the difficulty. Also derives a readable title and a
//! set of suggested tags from the link.

use crate::types::{DifficultyLevel, Platform};
use regex::Regex;
use std::sync::OnceLock;

/// What a problem URL revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Detection {
    pub platform: Option<Platform>,
    pub difficulty: Option<DifficultyLevel>,
}

/// Problem categories looked for in URLs and titles.
const PROBLEM_TYPES: &[&str] = &[
    "array",
    "string",
    "linked-list",
    "binary-tree",
    "tree",
    "graph",
    "dp",
    "dynamic-programming",
    "greedy",
    "backtracking",
    "recursion",
    "sorting",
    "search",
    "binary-search",
    "dfs",
    "bfs",
    "union-find",
    "stack",
    "queue",
    "heap",
    "hash",
    "map",
    "set",
    "two-pointer",
    "sliding-window",
    "bit",
    "math",
    "matrix",
    "simulation",
];

fn compiled(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("static pattern compiles"))
}

fn leetcode() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?i)leetcode\.com/problems/")
}

fn codeforces() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?i)codeforces\.com/problemset/problem/")
}

fn codeforces_rating() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"/(\d+)/\w+$")
}

fn hackerrank() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?i)hackerrank\.com/challenges/")
}

fn codechef() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?i)codechef\.com/problems/")
}

fn atcoder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?i)atcoder\.jp/contests/.+/tasks/")
}

fn atcoder_task() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"tasks/(?:[A-Za-z0-9]+_)?([A-Za-z]+)")
}

fn geeksforgeeks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?i)geeksforgeeks\.org/problems/")
}

/// Identify the platform and, when encoded in the URL, the difficulty.
pub fn detect_platform(url: &str) -> Detection {
    let url = url.trim();
    if url.is_empty() {
        return Detection::default();
    }

    if leetcode().is_match(url) {
        let lower = url.to_lowercase();
        let difficulty = if lower.contains("/easy/") {
            Some(DifficultyLevel::Easy)
        } else if lower.contains("/medium/") {
            Some(DifficultyLevel::Medium)
        } else if lower.contains("/hard/") {
            Some(DifficultyLevel::Hard)
        } else {
            None
        };
        return found(Platform::LeetCode, difficulty);
    }

    if codeforces().is_match(url) {
        let difficulty = codeforces_rating()
            .captures(url)
            .and_then(|c| c[1].parse::<u32>().ok())
            .map(|rating| match rating {
                0..=1299 => DifficultyLevel::Easy,
                1300..=1899 => DifficultyLevel::Medium,
                _ => DifficultyLevel::Hard,
            });
        return found(Platform::CodeForces, difficulty);
    }

    if hackerrank().is_match(url) {
        return found(Platform::HackerRank, None);
    }

    if codechef().is_match(url) {
        return found(Platform::CodeChef, None);
    }

    if atcoder().is_match(url) {
        let difficulty = atcoder_task()
            .captures(url)
            .map(|c| c[1].to_uppercase())
            .map(|task| match task.as_str() {
                "A" | "B" => DifficultyLevel::Easy,
                "C" | "D" => DifficultyLevel::Medium,
                _ => DifficultyLevel::Hard,
            });
        return found(Platform::AtCoder, difficulty);
    }

    if geeksforgeeks().is_match(url) {
        return found(Platform::GeeksForGeeks, None);
    }

    Detection::default()
}

fn found(platform: Platform, difficulty: Option<DifficultyLevel>) -> Detection {
    Detection {
        platform: Some(platform),
        difficulty,
    }
}

/// Title-cased last path segment, e.g. `.../problems/two-sum/` -> "Two Sum".
///
/// Returns an empty string when `url` has no scheme or no path.
pub fn extract_problem_title(url: &str) -> String {
    let Some((_, rest)) = url.trim().split_once("://") else {
        return String::new();
    };
    let path = rest
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .split_once('/')
        .map(|(_, path)| path)
        .unwrap_or_default();

    let Some(last) = path.split('/').filter(|s| !s.is_empty()).last() else {
        return String::new();
    };

    let last = last
        .strip_suffix(".html")
        .or_else(|| last.strip_suffix(".htm"))
        .unwrap_or(last);

    last.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Problem-type tags found in the URL or title, in [`PROBLEM_TYPES`] order.
pub fn suggest_tags(url: &str, title: &str) -> Vec<String> {
    let url = url.to_lowercase();
    let title = title.to_lowercase();

    PROBLEM_TYPES
        .iter()
        .filter(|kind| url.contains(*kind) || title.contains(&kind.replace('-', " ")))
        .map(|kind| kind.to_string())
        .collect()
}
