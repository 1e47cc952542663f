//! FEN extraction from free-form model output
//!
//! Vision models wrap the position in commentary, truncate the trailing
//! fields, or label it with a `FEN:` line. Extraction is best-effort: an
//! ordered list of matchers, falling back to the raw text when none match.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const LICHESS_ANALYSIS_URL: &str = "https://lichess.org/analysis";

/// Eight slash-separated rank groups of one to eight characters each.
const PLACEMENT: &str = r"(?:[rnbqkpRNBQKP1-8]{1,8}/){7}[rnbqkpRNBQKP1-8]{1,8}";

/// Side to move, castling, en passant, halfmove clock, fullmove number.
const TRAILING_FIELDS: &str = r"\s+[wb]\s+[KQkq-]+\s+[a-h1-8-]+\s+\d+\s+\d+";

pub static LABELED_FEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i:FEN):\s*({}{})", PLACEMENT, TRAILING_FIELDS)).unwrap()
});

pub static BARE_FEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"{}(?:{})?", PLACEMENT, TRAILING_FIELDS)).unwrap());

static WHOLE_FEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{}(?:{})?$", PLACEMENT, TRAILING_FIELDS)).unwrap());

/// Step 1: a `FEN:` label followed by a complete six-field FEN.
///
/// The placement must have the same eight-rank shape the bare matcher
/// accepts, so a malformed labeled board falls through to step 2.
pub fn match_labeled(text: &str) -> Option<&str> {
    LABELED_FEN_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Step 2: a bare placement with optional trailing fields anywhere in the text.
pub fn match_bare(text: &str) -> Option<&str> {
    BARE_FEN_REGEX.find(text).map(|m| m.as_str().trim())
}

/// Returns the best FEN candidate in `text`, or the trimmed text itself.
///
/// Never fails. Every candidate returned is itself a whole bare match, so
/// feeding the output back in returns it unchanged.
pub fn extract_fen(text: &str) -> String {
    if let Some(fen) = match_labeled(text) {
        tracing::debug!("Matched labeled FEN");
        return fen.to_string();
    }

    if let Some(fen) = match_bare(text) {
        tracing::debug!("Matched bare FEN pattern");
        return fen.to_string();
    }

    tracing::debug!("No FEN pattern found, returning raw text");
    text.trim().to_string()
}

/// True when the whole trimmed text is FEN-shaped (trailing fields optional).
pub fn is_fen_shaped(text: &str) -> bool {
    WHOLE_FEN_REGEX.is_match(text.trim())
}

/// A syntactically FEN-shaped string. Legality of the position is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FenString(String);

impl FenString {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        is_fen_shaped(text).then(|| Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The piece-placement field.
    pub fn placement(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or_default()
    }

    /// Lichess takes the FEN as a path segment with spaces replaced by underscores.
    pub fn analysis_url(&self) -> String {
        format!("{}/{}", LICHESS_ANALYSIS_URL, self.0.replace(' ', "_"))
    }
}

impl fmt::Display for FenString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_labeled_fen_is_extracted() {
        let text = format!("Rank 8: ...\nFEN: {}", START);
        assert_eq!(extract_fen(&text), START);
    }

    #[test]
    fn test_labeled_fen_wins_over_earlier_bare_pattern() {
        let text = "Draft: 8/8/8/8/8/8/8/8\nFEN: 4k3/8/8/8/8/8/8/4K3 b - - 3 40";
        assert_eq!(extract_fen(text), "4k3/8/8/8/8/8/8/4K3 b - - 3 40");
    }

    #[test]
    fn test_label_is_case_insensitive() {
        let text = format!("fen:   {}\n", START);
        assert_eq!(extract_fen(&text), START);
    }

    #[test]
    fn test_bare_fen_discards_surrounding_prose() {
        let text = "Here is the position: r1b1r1k1/pp3ppp/2n1pn2/3p2N1/8/1B4P1/PP2PPBP/R2QR1K1 w - - 0 1 Good luck!";
        assert_eq!(
            extract_fen(text),
            "r1b1r1k1/pp3ppp/2n1pn2/3p2N1/8/1B4P1/PP2PPBP/R2QR1K1 w - - 0 1"
        );
    }

    #[test]
    fn test_truncated_fen_has_no_fields_appended() {
        let text = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
        assert_eq!(extract_fen(text), text);
    }

    #[test]
    fn test_labeled_but_truncated_falls_through_to_bare() {
        let text = "FEN: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR (side unknown)";
        assert_eq!(extract_fen(text), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    }

    #[test]
    fn test_malformed_labeled_placement_falls_through_to_bare() {
        assert_eq!(match_labeled("FEN: 8/8/8/8/8/8/8/8/8 w - - 0 1"), None);
        assert_eq!(extract_fen("FEN: 8/8/8/8/8/8/8/8/8 w - - 0 1"), "8/8/8/8/8/8/8/8");

        assert_eq!(match_labeled("FEN: rnbqkbnrr/8/8/8/8/8/8/8 w - - 0 1"), None);
        assert_eq!(
            extract_fen("FEN: rnbqkbnrr/8/8/8/8/8/8/8 w - - 0 1"),
            "nbqkbnrr/8/8/8/8/8/8/8 w - - 0 1"
        );
    }

    #[test]
    fn test_no_match_returns_trimmed_input() {
        let text = "  I could not determine the position.\n";
        assert_eq!(extract_fen(text), "I could not determine the position.");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let inputs = [
            format!("Rank 8: ...\nFEN: {}", START),
            "Here is the position: r1b1r1k1/pp3ppp/2n1pn2/3p2N1/8/1B4P1/PP2PPBP/R2QR1K1 w - - 0 1 Good luck!".to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR".to_string(),
            "I could not determine the position.".to_string(),
            "ERROR: image too blurry".to_string(),
            // Nine ranks behind the label.
            "FEN: 8/8/8/8/8/8/8/8/8 w - - 0 1".to_string(),
            // A nine-character rank behind the label.
            "FEN: rnbqkbnrr/8/8/8/8/8/8/8 w - - 0 1".to_string(),
        ];

        for input in inputs {
            let once = extract_fen(&input);
            assert_eq!(extract_fen(&once), once);
        }
    }

    #[test]
    fn test_matchers_are_independent() {
        assert_eq!(match_labeled(START), None);
        assert_eq!(match_bare(START), Some(START));
        assert_eq!(match_bare("no board here"), None);
    }

    #[test]
    fn test_is_fen_shaped() {
        assert!(is_fen_shaped(START));
        assert!(is_fen_shaped("  8/8/8/8/8/8/8/8  "));
        assert!(!is_fen_shaped("8/8/8/8/8/8/8"));
        assert!(!is_fen_shaped(&format!("FEN: {}", START)));
        assert!(!is_fen_shaped("I could not determine the position."));
    }

    #[test]
    fn test_fen_string_parse_and_placement() {
        let fen = FenString::parse(START).unwrap();
        assert_eq!(fen.placement(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
        assert_eq!(fen.to_string(), START);
        assert!(FenString::parse("not a fen").is_none());
    }

    #[test]
    fn test_analysis_url_replaces_spaces() {
        let fen = FenString::parse(START).unwrap();
        assert_eq!(
            fen.analysis_url(),
            "https://lichess.org/analysis/rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR_w_KQkq_-_0_1"
        );
    }
}
