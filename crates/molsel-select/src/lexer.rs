//! Chunker for the selection language
//!
//! Splits a selection string into whitespace-separated chunks with every
//! parenthesis isolated as its own chunk. No interpretation happens here;
//! the parser decides what each chunk means.

/// Split a selection string into chunks
///
/// A single outer pair of parentheses enclosing the whole string is removed.
/// Input with no content left (e.g. `"( )"`) yields one empty chunk, which
/// the parser reads as `all`.
pub fn chunk(input: &str) -> Vec<String> {
    let padded = input.replace('(', " ( ").replace(')', " ) ");
    let mut s = padded.trim();
    if wrapped_in_parens(s) {
        s = s[1..s.len() - 1].trim();
    }

    let chunks: Vec<String> = s.split_whitespace().map(str::to_owned).collect();
    if chunks.is_empty() {
        vec![String::new()]
    } else {
        chunks
    }
}

/// Whether the first `(` of `s` closes at its last character
///
/// `( a ) and ( b )` starts and ends with a paren but is not wrapped.
fn wrapped_in_parens(s: &str) -> bool {
    if !s.starts_with('(') || !s.ends_with(')') {
        return false;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == s.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_simple() {
        assert_eq!(chunk("protein and not backbone"), vec!["protein", "and", "not", "backbone"]);
    }

    #[test]
    fn test_chunk_isolates_parens() {
        assert_eq!(
            chunk("10-15 or (backbone and(30-35))"),
            vec!["10-15", "or", "(", "backbone", "and", "(", "30-35", ")", ")"]
        );
    }

    #[test]
    fn test_chunk_collapses_whitespace() {
        assert_eq!(chunk("  :A \t and\n .CA "), vec![":A", "and", ".CA"]);
    }

    #[test]
    fn test_chunk_strips_outer_parens() {
        assert_eq!(chunk("(:A and .CA)"), vec![":A", "and", ".CA"]);
        assert_eq!(chunk(" ( ( HOH ) ) "), vec!["(", "HOH", ")"]);
    }

    #[test]
    fn test_chunk_keeps_sibling_groups() {
        assert_eq!(
            chunk("( :A ) and ( .CA )"),
            vec!["(", ":A", ")", "and", "(", ".CA", ")"]
        );
    }

    #[test]
    fn test_chunk_empty_content() {
        assert_eq!(chunk("()"), vec![""]);
        assert_eq!(chunk("   "), vec![""]);
    }
}
