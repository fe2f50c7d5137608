//! Deep-link construction: "search X on Y" → a platform search URL.
//!
//! A fixed table maps platform names to search URL templates. The query is
//! whatever remains of the command after stripping action words, the platform
//! name, and common filler words, form-encoded into the template.

/// Platform name → search URL template, tried in order. `{}` is replaced by
/// the form-encoded query.
const PLATFORMS: &[(&str, &str)] = &[
    ("youtube", "https://www.youtube.com/results?search_query={}"),
    ("google", "https://www.google.com/search?q={}"),
    ("amazon", "https://www.amazon.in/s?k={}"),
    ("bing", "https://www.bing.com/search?q={}"),
    ("duckduckgo", "https://duckduckgo.com/?q={}"),
    ("github", "https://github.com/search?q={}"),
    ("stackoverflow", "https://stackoverflow.com/search?q={}"),
    ("perplexity", "https://www.perplexity.ai/search?q={}"),
    ("gemini", "https://gemini.google.com/app?q={}"),
    ("chatgpt", "https://chat.openai.com/?q={}"),
    ("gpt", "https://chat.openai.com/?q={}"),
];

/// Verbs that signal a search/ask request.
pub(crate) const ACTION_WORDS: &[&str] = &["search", "ask", "find", "look for", "query"];

/// Tokens dropped from the query: the action verbs plus common filler words.
/// Stripping is token-level so that e.g. "on" inside "iphone" survives.
const STRIP_TOKENS: &[&str] = &[
    "search", "ask", "find", "look", "query", "on", "in", "at", "for", "about", "to", "write", "a",
];

/// A constructed platform search link.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepLink {
    pub platform: &'static str,
    pub query: String,
    pub url: String,
}

/// Try to build a deep link from an already-lowercased command.
///
/// Returns `None` when no platform is named, no search verb (or `on
/// <platform>` / `ask <platform>` phrase) is present, or the query strips
/// down to nothing — callers fall through to generic resource handling.
pub fn build(command_lower: &str) -> Option<DeepLink> {
    for &(platform, template) in PLATFORMS {
        if !command_lower.contains(platform) {
            continue;
        }

        let is_search = ACTION_WORDS.iter().any(|w| command_lower.contains(w))
            || command_lower.contains(&format!("on {platform}"))
            || command_lower.contains(&format!("ask {platform}"));
        if !is_search {
            continue;
        }

        // Drop action verbs, the platform name, and filler tokens; keep the rest.
        let query = command_lower
            .split_whitespace()
            .filter(|token| *token != platform && !STRIP_TOKENS.contains(token))
            .collect::<Vec<_>>()
            .join(" ");

        if query.is_empty() {
            continue;
        }

        let url = template.replace("{}", &encode_query(&query));
        return Some(DeepLink {
            platform,
            query,
            url,
        });
    }
    None
}

/// Form-encode a query string: space becomes `+`, anything outside
/// `[A-Za-z0-9-_.~]` is percent-encoded.
pub fn encode_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for byte in query.bytes() {
        match byte {
            b' ' => out.push('+'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
