use api::CodeUnit;
use std::borrow::Cow;

/// U+2800 BRAILLE PATTERN BLANK.
pub const BLANK_CELL: CodeUnit = 0x2800;

const SPACE: CodeUnit = 0x0020;

#[derive(Debug, PartialEq, Eq)]
pub enum Sanitized<'a> {
    /// Input to hand to the engine, blank cells replaced by spaces.
    Text(Cow<'a, [CodeUnit]>),
    /// Non-empty input that is nothing but whitespace once blanks are replaced.
    /// The caller answers with this many spaces without calling the engine.
    Blank(usize),
}

pub fn sanitize(input: &[CodeUnit]) -> Sanitized<'_> {
    let text: Cow<'_, [CodeUnit]> = if input.contains(&BLANK_CELL) {
        Cow::Owned(
            input
                .iter()
                .map(|&u| if u == BLANK_CELL { SPACE } else { u })
                .collect(),
        )
    } else {
        Cow::Borrowed(input)
    };

    if !text.is_empty() && text.iter().all(|&u| is_whitespace(u)) {
        return Sanitized::Blank(input.len());
    }
    Sanitized::Text(text)
}

fn is_whitespace(unit: CodeUnit) -> bool {
    char::from_u32(u32::from(unit)).is_some_and(char::is_whitespace)
}
