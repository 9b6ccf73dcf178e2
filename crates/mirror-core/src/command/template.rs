//! Command template tokenizing and placeholder substitution
//!
//! A template such as `ffmpeg -i $INPUT -c:a libopus "$OUTPUT"` is split
//! once into argv tokens, honoring quotes and backslash escapes. Placeholders
//! are substituted per token afterwards, so a substituted path is never
//! re-split no matter what characters it contains.

use std::path::Path;

/// Placeholder replaced with the absolute source path
pub const INPUT_PLACEHOLDER: &str = "$INPUT";
/// Placeholder replaced with the absolute target path
pub const OUTPUT_PLACEHOLDER: &str = "$OUTPUT";

/// The quoting context an escape returns to once the escaped character has
/// been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Bare,
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitState {
    Bare,
    InSingleQuote,
    InDoubleQuote,
    Escaped(Region),
}

impl SplitState {
    fn region(self) -> Region {
        match self {
            Self::Bare => Region::Bare,
            Self::InSingleQuote => Region::Single,
            Self::InDoubleQuote => Region::Double,
            Self::Escaped(region) => region,
        }
    }

    fn resume(region: Region) -> Self {
        match region {
            Region::Bare => Self::Bare,
            Region::Single => Self::InSingleQuote,
            Region::Double => Self::InDoubleQuote,
        }
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Split a template string into argv tokens.
///
/// - Unquoted whitespace separates tokens; runs of it never yield empty tokens.
/// - `'` and `"` open a region closed by the same unescaped quote. The other
///   quote character inside a region is literal.
/// - `\` escapes the next character everywhere, including inside quotes.
/// - Quoted regions glued to other text concatenate into one token.
/// - Unbalanced input is tolerated: a dangling quote or escape still emits
///   whatever was accumulated.
pub fn split_command(template: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut state = SplitState::Bare;

    for c in template.chars() {
        state = match (state, c) {
            (SplitState::Escaped(region), c) => {
                current.push(c);
                SplitState::resume(region)
            }
            (state, '\\') => SplitState::Escaped(state.region()),
            (SplitState::Bare, '\'') => SplitState::InSingleQuote,
            (SplitState::Bare, '"') => SplitState::InDoubleQuote,
            (SplitState::InSingleQuote, '\'') | (SplitState::InDoubleQuote, '"') => {
                SplitState::Bare
            }
            (SplitState::Bare, c) if is_separator(c) => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
                SplitState::Bare
            }
            (state, c) => {
                current.push(c);
                state
            }
        };
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Replace every `$INPUT` and `$OUTPUT` in each token.
pub fn substitute(args: Vec<String>, input: &str, output: &str) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            arg.replace(INPUT_PLACEHOLDER, input)
                .replace(OUTPUT_PLACEHOLDER, output)
        })
        .collect()
}

/// A command template split once and rendered per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    raw: String,
    tokens: Vec<String>,
}

impl CommandTemplate {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            tokens: split_command(raw),
        }
    }

    /// The template text exactly as configured
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// An empty template means the file is copied verbatim
    pub fn is_copy(&self) -> bool {
        self.raw.is_empty()
    }

    /// Build the argv for one source/target pair.
    pub fn render(&self, input: &Path, output: &Path) -> Vec<String> {
        substitute(
            self.tokens.clone(),
            &input.to_string_lossy(),
            &output.to_string_lossy(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn split(s: &str) -> Vec<String> {
        split_command(s)
    }

    #[rstest]
    #[case(r#"a "b c" d"#, &["a", "b c", "d"])]
    #[case(r"x\ y", &["x y"])]
    #[case("'it' 's'", &["it", "s"])]
    #[case("'it''s'", &["its"])]
    #[case(r"'it'\''s'", &["it's"])]
    #[case(r#""say 'hi'""#, &["say 'hi'"])]
    #[case(r#"'say "hi"'"#, &[r#"say "hi""#])]
    #[case(r#""a\"b""#, &[r#"a"b"#])]
    #[case(r"a\\b", &[r"a\b"])]
    #[case("  a \t\n b\r\n", &["a", "b"])]
    #[case("pre'fix suf'fix", &["prefix suffix"])]
    fn splits_like_a_shell(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(split(input), expected);
    }

    #[test]
    fn empty_template_yields_no_tokens() {
        assert!(split("").is_empty());
        assert!(split(" \t ").is_empty());
    }

    #[test]
    fn empty_quotes_do_not_produce_tokens() {
        assert_eq!(split(r#"a "" b"#), vec!["a", "b"]);
    }

    #[test]
    fn unterminated_quote_keeps_accumulated_text() {
        assert_eq!(split(r#"ffmpeg "-i in"#), vec!["ffmpeg", "-i in"]);
    }

    #[test]
    fn trailing_escape_is_dropped() {
        assert_eq!(split(r"abc\"), vec!["abc"]);
    }

    #[test]
    fn escaped_whitespace_inside_token() {
        assert_eq!(split("a\\\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn substitutes_every_occurrence() {
        let template = CommandTemplate::parse("tool $INPUT $OUTPUT --log=$INPUT.log --dst=$OUTPUT");
        let argv = template.render(Path::new("/src/a b.flac"), Path::new("/dst/a b.opus"));
        assert_eq!(
            argv,
            vec![
                "tool",
                "/src/a b.flac",
                "/dst/a b.opus",
                "--log=/src/a b.flac.log",
                "--dst=/dst/a b.opus",
            ]
        );
    }

    #[test]
    fn substitution_happens_inside_quoted_tokens() {
        let template = CommandTemplate::parse(r#"sh -c "cp '$INPUT' '$OUTPUT'""#);
        let argv = template.render(Path::new("/s/x.mp3"), Path::new("/t/x.opus"));
        assert_eq!(argv, vec!["sh", "-c", "cp '/s/x.mp3' '/t/x.opus'"]);
    }

    #[test]
    fn paths_with_spaces_stay_in_one_slot() {
        let template = CommandTemplate::parse("convert $INPUT $OUTPUT");
        let argv = template.render(
            Path::new("/my music/cover art.png"),
            Path::new("/out dir/cover art.jpeg"),
        );
        assert_eq!(argv.len(), 3);
        assert_eq!(argv[1], "/my music/cover art.png");
    }

    #[test]
    fn copy_template_is_empty() {
        let template = CommandTemplate::parse("");
        assert!(template.is_copy());
        assert!(template.render(Path::new("/a"), Path::new("/b")).is_empty());
        assert!(!CommandTemplate::parse(" ").is_copy());
    }

    #[test]
    fn escape_state_returns_to_enclosing_region() {
        assert_eq!(SplitState::resume(SplitState::InDoubleQuote.region()), SplitState::InDoubleQuote);
        assert_eq!(SplitState::resume(SplitState::Escaped(Region::Single).region()), SplitState::InSingleQuote);
    }
}
