use regex::Regex;

/// Splits a channel keyword string on spaces, keeping quoted phrases together.
pub fn parse_keywords(keyword_str: &str) -> Vec<String> {
    let regex = Regex::new(r#"(?m)"([^"]+)"|([^\s"]+)"#).expect("keyword pattern is valid");

    regex
        .captures_iter(keyword_str)
        .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
        .map(|keyword| keyword.as_str().trim().to_string())
        .filter(|keyword| !keyword.is_empty())
        .collect::<Vec<String>>()
}
