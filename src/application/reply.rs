//! Reply rendering - Turns a strategy outcome into the text sent to the user

use crate::application::errors::StrategyError;
use crate::application::strategies::StrategyResult;

/// LINE rejects text messages longer than this many characters
pub const MAX_REPLY_CHARS: usize = 5000;

pub const FETCH_FAILED: &str = "❗️ไม่สามารถดึงข้อมูลข่าวได้ในขณะนี้";
pub const DOCUMENT_FAILED: &str = "❗️ไม่สามารถอ่านไฟล์เอกสารได้ในขณะนี้";
pub const EMPTY_COMPLETION: &str = "❗️Gemini ไม่ตอบกลับ";

/// Render a strategy outcome into the final reply text
pub fn render(outcome: &StrategyResult) -> String {
    match outcome {
        Ok(text) => truncate(text, MAX_REPLY_CHARS),
        Err(StrategyError::Fetch(_)) => FETCH_FAILED.to_string(),
        Err(StrategyError::Document(_)) => DOCUMENT_FAILED.to_string(),
        Err(StrategyError::EmptyCompletion) => EMPTY_COMPLETION.to_string(),
        Err(StrategyError::Generation(msg)) => {
            truncate(&format!("❗️เกิดข้อผิดพลาด: {}", msg), MAX_REPLY_CHARS)
        }
    }
}

/// Cut to at most `max` characters, never inside a code point
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_through() {
        assert_eq!(render(&Ok("สวัสดี".to_string())), "สวัสดี");
    }

    #[test]
    fn test_generation_error_embeds_message() {
        let outcome = Err(StrategyError::Generation("quota exceeded".to_string()));
        assert_eq!(render(&outcome), "❗️เกิดข้อผิดพลาด: quota exceeded");
    }

    #[test]
    fn test_fixed_error_strings() {
        assert_eq!(render(&Err(StrategyError::Fetch("timeout".to_string()))), FETCH_FAILED);
        assert_eq!(render(&Err(StrategyError::Document("missing".to_string()))), DOCUMENT_FAILED);
        assert_eq!(render(&Err(StrategyError::EmptyCompletion)), EMPTY_COMPLETION);
    }

    #[test]
    fn test_long_text_truncated_on_char_boundary() {
        let text = "ก".repeat(MAX_REPLY_CHARS + 10);
        let rendered = render(&Ok(text));
        assert_eq!(rendered.chars().count(), MAX_REPLY_CHARS);
    }
}
