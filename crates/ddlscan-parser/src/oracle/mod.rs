// Oracle dialect: tokenizer rules, keyword table and statement grammar.

pub mod parser;
pub mod tokenizer;

pub use parser::{
    STATEMENT_LOOKAHEAD, TYPE_PARAM_LOOKAHEAD, Parser, parse, parse_with_origin, significant_tokens,
};
pub use tokenizer::{Tokenizer, tokenize};
