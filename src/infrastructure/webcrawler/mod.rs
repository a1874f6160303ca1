//! Web Crawler Module
//!
//! Fetches a page and reduces it to its visible text

use reqwest::Client;
use std::time::Duration;

/// Plain-text page fetcher
#[derive(Clone)]
pub struct WebCrawler {
    client: Client,
}

impl WebCrawler {
    pub fn new(timeout_secs: u64) -> Result<Self, String> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self { client })
    }

    /// Fetch a URL and return its visible text
    pub async fn fetch(&self, url: &str) -> Result<String, String> {
        let response = self.client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        let html = response.text().await.map_err(|e| e.to_string())?;

        Ok(extract_content(&html))
    }
}

/// Drop every `<open ...>...</close>` block, case-insensitively
fn strip_blocks(text: &str, open: &str, close: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(start) = lower[pos..].find(open) {
        let start = pos + start;
        out.push_str(&text[pos..start]);
        match lower[start..].find(close) {
            Some(end) => pos = start + end + close.len(),
            None => {
                pos = text.len();
                break;
            }
        }
    }
    out.push_str(&text[pos..]);
    out
}

/// Decode the handful of entities that show up in ordinary pages
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Extract visible text from HTML (simple parser)
pub fn extract_content(html: &str) -> String {
    let text = strip_blocks(html, "<script", "</script>");
    let text = strip_blocks(&text, "<style", "</style>");
    let text = strip_blocks(&text, "<!--", "-->");

    // Tags become spaces so adjacent cells don't run together
    let mut in_tag = false;
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        if ch == '<' {
            in_tag = true;
        } else if ch == '>' {
            if in_tag {
                result.push(' ');
            }
            in_tag = false;
        } else if !in_tag {
            result.push(ch);
        }
    }

    let result = decode_entities(&result);

    // Clean up whitespace
    let mut clean = String::with_capacity(result.len());
    let mut last_space = false;

    for ch in result.chars() {
        if ch.is_whitespace() {
            if !last_space {
                clean.push(' ');
                last_space = true;
            }
        } else {
            clean.push(ch);
            last_space = false;
        }
    }

    clean.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let html = "<html><head><title>Test</title></head><body><p>Hello World</p></body></html>";
        assert_eq!(extract_content(html), "Test Hello World");
    }

    #[test]
    fn test_extract_content_drops_scripts_and_styles() {
        let html = "<p>ข่าว</p><SCRIPT>alert('x')</SCRIPT><style>p{}</style><!-- hidden --><p>ประกาศ</p>";
        assert_eq!(extract_content(html), "ข่าว ประกาศ");
    }

    #[test]
    fn test_extract_content_decodes_entities_and_trims() {
        let html = "\n\n  <div>A &amp; B&nbsp;&lt;C&gt;</div>  \n";
        assert_eq!(extract_content(html), "A & B <C>");
    }

    #[test]
    fn test_unterminated_script_is_dropped() {
        assert_eq!(extract_content("before<script>never closed"), "before");
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_errors() {
        let crawler = WebCrawler::new(2).unwrap();
        let result = crawler.fetch("http://127.0.0.1:9/").await;
        assert!(result.is_err());
    }
}
