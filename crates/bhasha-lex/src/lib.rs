//! Lexer and token model for Bhasha (spec.md §4.1, §3 "Token").

mod cursor;
mod lexer;
mod token;
mod unicode;

pub use lexer::Lexer;
pub use token::{keyword_from_text, Token, TokenKind};

#[cfg(test)]
mod proptests {
    use super::*;
    use bhasha_util::Handler;
    use proptest::prelude::*;

    /// Every Bengali digit folds to its same-value ASCII digit, so a source
    /// program differing only in which digit block it uses for an integer
    /// literal lexes to a token stream that differs only in that literal's
    /// text form, never its parsed value (spec.md §8 "Digit folding").
    proptest! {
        #[test]
        fn digit_folding_preserves_value(n in 0u32..1_000_000u32) {
            const BENGALI: [char; 10] =
                ['০', '১', '২', '৩', '৪', '৫', '৬', '৭', '৮', '৯'];
            let ascii_src = n.to_string();
            let bengali_src: String = ascii_src
                .chars()
                .map(|c| BENGALI[c.to_digit(10).unwrap() as usize])
                .collect();

            let mut h1 = Handler::new();
            let mut l1 = Lexer::new(&ascii_src, &mut h1);
            let mut h2 = Handler::new();
            let mut l2 = Lexer::new(&bengali_src, &mut h2);

            let t1 = l1.next_token();
            let t2 = l2.next_token();

            prop_assert_eq!(&t1.kind, &t2.kind);
            if let TokenKind::Int(text) = &t1.kind {
                prop_assert_eq!(text.parse::<u32>().unwrap(), n);
            } else {
                prop_assert!(false, "expected an Int token");
            }
        }
    }
}
