use bhasha_util::Span;

/// The closed set of token kinds (spec.md §3 "Token").
///
/// `Int` carries the digit-folded (all-ASCII) literal text; `Str` carries the
/// string literal's content with no escape processing (spec.md §4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals / names
    Ident(String),
    Int(String),
    Str(String),

    // Keywords — statement heads
    Let,
    Return,
    Import,

    // Keywords — control flow
    If,
    Else,
    While,
    For,
    Break,
    Continue,

    // Keywords — literals
    True,
    False,
    Null,

    // Keywords — function
    Function,

    // Keywords — composite literals
    StructLiteral,
    EnumLiteral,

    // Keywords — OOP (parsed, not executed in the core; spec.md §9)
    SelfRef,
    ParentRef,
    New,
    Class,
    Method,
    Constructor,
    Extends,
    Public,
    Private,
    Protected,
    Static,
    Abstract,
    Interface,
    Implements,
    Override,
    Final,

    // Keyword — type cast infix operator
    As,

    // Keywords — type tags
    TypeByte,
    TypeShort,
    TypeInt,
    TypeLong,
    TypeFloat,
    TypeDouble,
    TypeChar,
    TypeString,
    TypeBool,
    TypeOrderedSequence,
    TypeMapping,

    // Operators and punctuation
    Assign,    // =
    Eq,        // ==
    Arrow,     // =>
    Lt,        // <
    LtEq,      // <=
    Shl,       // <<
    Gt,        // >
    GtEq,      // >=
    Shr,       // >>
    Bang,      // !
    NotEq,     // !=
    Amp,       // &
    AmpAmp,    // &&
    Pipe,      // |
    PipePipe,  // ||
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Tilde,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,

    /// An unrecognised scalar; `literal` is that scalar's own text (spec.md §4.1).
    Illegal(String),

    /// Sentinel returned indefinitely once input is exhausted (spec.md §4.1).
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Looks up `text` in the fixed keyword table (spec.md §4.1 identifier rule).
/// Returns `None` for anything that is not a reserved word, in which case the
/// caller produces an `Ident` token instead.
pub fn keyword_from_text(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match text {
        "ধরি" => Let,
        "ফেরত" => Return,
        "আমদানি" => Import,
        "যদি" => If,
        "নাহলে" => Else,
        "যতক্ষণ" => While,
        "জন্য" => For,
        "থামো" => Break,
        "চালিয়ে_যাও" => Continue,
        "সত্য" => True,
        "মিথ্যা" => False,
        "শূন্য" => Null,
        "কাজ" => Function,
        "কাঠামো" => StructLiteral,
        "গণনা" => EnumLiteral,
        "নিজ" => SelfRef,
        "মূল" => ParentRef,
        "নতুন" => New,
        "শ্রেণী" => Class,
        "পদ্ধতি" => Method,
        "নির্মাতা" => Constructor,
        "প্রসারিত" => Extends,
        "সর্বজনীন" => Public,
        "ব্যক্তিগত" => Private,
        "সুরক্ষিত" => Protected,
        "স্থির" => Static,
        "বিমূর্ত" => Abstract,
        "ইন্টারফেস" => Interface,
        "বাস্তবায়ন" => Implements,
        "পুনর্লিখন" => Override,
        "চূড়ান্ত" => Final,
        "রূপে" => As,
        "বাইট" => TypeByte,
        "ছোট" => TypeShort,
        "পূর্ণ" => TypeInt,
        "দীর্ঘ" => TypeLong,
        "ভাসমান" => TypeFloat,
        "দ্বিগুণ" => TypeDouble,
        "অক্ষর" => TypeChar,
        "লেখা" => TypeString,
        "বুলিয়ান" => TypeBool,
        "তালিকা" => TypeOrderedSequence,
        "মানচিত্র" => TypeMapping,
        _ => return None,
    })
}
