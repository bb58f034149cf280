use rune_derive::rune_error;
use std::borrow::Cow;

#[rune_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    std::fs::read_to_string("missing.txt").context("Reading fixture")
}

fn main() {
    let _ = read().map_err(|e| e.kind());
    let _ = DemoError::from("fallback");
}
