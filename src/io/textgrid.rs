use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use tracing::debug;

use crate::error::{TextGridError, TextGridResult};
use crate::models::{Interval, Point, TextGrid, Tier, TierEntries};

/// Read and parse a TextGrid file
///
/// The whole file is read before parsing, so the handle is closed by the time
/// parsing starts.
pub fn parse_textgrid_file(path: &Path) -> TextGridResult<TextGrid> {
    let bytes = std::fs::read(path)?;
    let text = decode_text(&bytes)?;
    let grid = parse_textgrid(&text)?;
    debug!(
        "Read {:?}: {} tiers ({:?})",
        path,
        grid.tiers.len(),
        grid.tier_names()
    );
    Ok(grid)
}

/// Decode file bytes: UTF-16 when a byte order mark says so, UTF-8 otherwise
pub fn decode_text(bytes: &[u8]) -> TextGridResult<String> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest),
        _ => decode_utf8(bytes),
    }
}

fn decode_utf8(bytes: &[u8]) -> TextGridResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| TextGridError::Encoding(e.to_string()))
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> TextGridResult<String> {
    if bytes.len() % 2 != 0 {
        return Err(TextGridError::Encoding(
            "odd number of bytes in UTF-16 text".to_string(),
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| TextGridError::Encoding(e.to_string()))
}

/// Parse the text of a TextGrid in either the long or the short text format
///
/// Both formats carry the same values in the same order; the long format only
/// adds `key =` names and `[n]` indices, which are skipped.
pub fn parse_textgrid(text: &str) -> TextGridResult<TextGrid> {
    let mut parser = Parser::new(text);

    let file_type = match parser.next("file type")? {
        Value::Text(file_type) => file_type,
        other => {
            return Err(TextGridError::NotTextGrid(format!(
                "expected a file type header, found {}",
                other.describe()
            )));
        }
    };
    if !file_type.starts_with("ooTextFile") {
        return Err(TextGridError::NotTextGrid(format!(
            "file type {:?}",
            file_type
        )));
    }
    let object_class = parser.text("object class")?;
    if object_class != "TextGrid" {
        return Err(TextGridError::NotTextGrid(format!(
            "object class {:?}",
            object_class
        )));
    }

    let xmin = parser.number("TextGrid xmin")?;
    let xmax = parser.number("TextGrid xmax")?;

    let tiers_flag = match parser.peek()? {
        Some(Value::Flag(exists)) => Some(*exists),
        _ => None,
    };
    let tier_count = match tiers_flag {
        Some(false) => {
            parser.next("tiers flag")?;
            0
        }
        Some(true) => {
            parser.next("tiers flag")?;
            parser.count("tier count")?
        }
        None => parser.count("tier count")?,
    };

    let mut tiers = Vec::new();
    for _ in 0..tier_count {
        tiers.push(parse_tier(&mut parser)?);
    }

    if parser.peek()?.is_some() {
        let (value, line) = parser.next_lexed("end of file")?;
        return Err(TextGridError::Unexpected {
            line,
            expected: "end of file",
            found: value.describe(),
        });
    }

    Ok(TextGrid { xmin, xmax, tiers })
}

enum TierClass {
    Interval,
    Point,
}

fn parse_tier(parser: &mut Parser<'_>) -> TextGridResult<Tier> {
    let class = parser.text("tier class")?;
    let tier_class = match class.as_str() {
        "IntervalTier" => TierClass::Interval,
        "TextTier" => TierClass::Point,
        _ => return Err(TextGridError::UnknownTierClass(class)),
    };

    let name = parser.text("tier name")?;
    let xmin = parser.number("tier xmin")?;
    let xmax = parser.number("tier xmax")?;
    let size = parser.count("tier size")?;

    let entries = match tier_class {
        TierClass::Interval => {
            let mut intervals = Vec::new();
            for _ in 0..size {
                let start = parser.number("interval xmin")?;
                let end = parser.number("interval xmax")?;
                let label = parser.text("interval text")?;
                intervals.push(Interval { start, end, label });
            }
            TierEntries::Intervals(intervals)
        }
        TierClass::Point => {
            let mut points = Vec::new();
            for _ in 0..size {
                let time = parser.number("point time")?;
                let label = parser.text("point mark")?;
                points.push(Point { time, label });
            }
            TierEntries::Points(points)
        }
    };

    Ok(Tier {
        name,
        xmin,
        xmax,
        entries,
    })
}

/// A value in the TextGrid stream
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    Number(f64),
    /// `<exists>` or `<absent>`
    Flag(bool),
}

impl Value {
    fn describe(&self) -> String {
        match self {
            Value::Text(text) => format!("string {:?}", text),
            Value::Number(number) => format!("number {}", number),
            Value::Flag(true) => "<exists>".to_string(),
            Value::Flag(false) => "<absent>".to_string(),
        }
    }
}

/// Splits TextGrid text into values, dropping keys, indices and comments
struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn skip_past(&mut self, end: char) {
        while let Some(c) = self.bump() {
            if c == end {
                break;
            }
        }
    }

    /// Next value and the line it starts on
    fn next_value(&mut self) -> TextGridResult<Option<(Value, usize)>> {
        while let Some(&c) = self.chars.peek() {
            let line = self.line;
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '!' => self.skip_past('\n'),
                '[' => self.skip_past(']'),
                '"' => {
                    self.bump();
                    return self.read_string().map(|value| Some((value, line)));
                }
                '<' => {
                    self.bump();
                    let mut word = String::new();
                    while let Some(c) = self.bump() {
                        if c == '>' {
                            break;
                        }
                        word.push(c);
                    }
                    match word.as_str() {
                        "exists" => return Ok(Some((Value::Flag(true), line))),
                        "absent" => return Ok(Some((Value::Flag(false), line))),
                        _ => {}
                    }
                }
                _ => {
                    let word = self.read_word();
                    if looks_numeric(&word) {
                        return match word.parse::<f64>() {
                            Ok(number) => Ok(Some((Value::Number(number), line))),
                            Err(_) => Err(TextGridError::Unexpected {
                                line,
                                expected: "number",
                                found: word,
                            }),
                        };
                    }
                }
            }
        }
        Ok(None)
    }

    fn read_string(&mut self) -> TextGridResult<Value> {
        let start_line = self.line;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => {
                    // A doubled quote is a literal quote
                    if self.chars.peek() == Some(&'"') {
                        self.bump();
                        text.push('"');
                    } else {
                        return Ok(Value::Text(text));
                    }
                }
                Some(c) => text.push(c),
                None => return Err(TextGridError::UnterminatedString(start_line)),
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '"' | '!' | '<' | '[') {
                break;
            }
            word.push(c);
            self.bump();
        }
        word
    }
}

fn looks_numeric(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

/// Typed reads over the value stream with one value of lookahead
struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<(Value, usize)>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lexer: Lexer::new(text),
            peeked: None,
        }
    }

    fn next_lexed(&mut self, what: &'static str) -> TextGridResult<(Value, usize)> {
        match self.peeked.take() {
            Some(lexed) => Ok(lexed),
            None => self
                .lexer
                .next_value()?
                .ok_or(TextGridError::UnexpectedEof(what)),
        }
    }

    fn next(&mut self, what: &'static str) -> TextGridResult<Value> {
        self.next_lexed(what).map(|(value, _)| value)
    }

    fn peek(&mut self) -> TextGridResult<Option<&Value>> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_value()?;
        }
        Ok(self.peeked.as_ref().map(|(value, _)| value))
    }

    fn text(&mut self, what: &'static str) -> TextGridResult<String> {
        match self.next_lexed(what)? {
            (Value::Text(text), _) => Ok(text),
            (other, line) => Err(unexpected(line, what, &other)),
        }
    }

    fn number(&mut self, what: &'static str) -> TextGridResult<f64> {
        match self.next_lexed(what)? {
            (Value::Number(number), _) => Ok(number),
            (other, line) => Err(unexpected(line, what, &other)),
        }
    }

    fn count(&mut self, what: &'static str) -> TextGridResult<usize> {
        match self.next_lexed(what)? {
            (Value::Number(number), _) if number >= 0.0 && number.fract() == 0.0 => {
                Ok(number as usize)
            }
            (other, line) => Err(unexpected(line, what, &other)),
        }
    }
}

fn unexpected(line: usize, expected: &'static str, found: &Value) -> TextGridError {
    TextGridError::Unexpected {
        line,
        expected,
        found: found.describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_FORMAT: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

xmin = 0
xmax = 3
tiers? <exists>
size = 2
item []:
    item [1]:
        class = "IntervalTier"
        name = "transcript"
        xmin = 0
        xmax = 3
        intervals: size = 3
        intervals [1]:
            xmin = 0
            xmax = 1
            text = "<S>"
        intervals [2]:
            xmin = 1
            xmax = 2.25
            text = "hello there"
        intervals [3]:
            xmin = 2.25
            xmax = 3
            text = ""
    item [2]:
        class = "TextTier"
        name = "events"
        xmin = 0
        xmax = 3
        points: size = 1
        points [1]:
            number = 1.5
            mark = "click"
"#;

    const SHORT_FORMAT: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

0
3
<exists>
2
"IntervalTier"
"transcript"
0
3
3
0
1
"<S>"
1
2.25
"hello there"
2.25
3
""
"TextTier"
"events"
0
3
1
1.5
"click"
"#;

    #[test]
    fn test_parse_long_format() {
        let grid = parse_textgrid(LONG_FORMAT).unwrap();

        assert_eq!(grid.xmin, 0.0);
        assert_eq!(grid.xmax, 3.0);
        assert_eq!(grid.tier_names(), vec!["transcript", "events"]);

        let intervals = grid.tier("transcript").unwrap().intervals().unwrap();
        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[0], Interval::new(0.0, 1.0, "<S>"));
        assert_eq!(intervals[1], Interval::new(1.0, 2.25, "hello there"));
        assert_eq!(intervals[2].label, "");

        let events = grid.tier("events").unwrap();
        assert!(!events.is_interval_tier());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_short_format_matches_long_format() {
        let long = parse_textgrid(LONG_FORMAT).unwrap();
        let short = parse_textgrid(SHORT_FORMAT).unwrap();

        assert_eq!(long, short);
    }

    #[test]
    fn test_escaped_quotes_and_comments() {
        let text = r#"File type = "ooTextFile"
Object class = "TextGrid"
! written by hand
xmin = 0
xmax = 1
tiers? <exists>
size = 1
item []:
    item [1]:
        class = "IntervalTier"
        name = "words"
        xmin = 0
        xmax = 1
        intervals: size = 1
        intervals [1]:
            xmin = 0
            xmax = 1
            text = "she said ""yes"""
"#;
        let grid = parse_textgrid(text).unwrap();
        let intervals = grid.first_tier().unwrap().intervals().unwrap();

        assert_eq!(intervals[0].label, r#"she said "yes""#);
    }

    #[test]
    fn test_absent_tiers() {
        let text = "File type = \"ooTextFile\"\nObject class = \"TextGrid\"\n\n0\n1\n<absent>\n";
        let grid = parse_textgrid(text).unwrap();

        assert!(grid.tiers.is_empty());
    }

    #[test]
    fn test_truncated_file() {
        let cut = &SHORT_FORMAT[..SHORT_FORMAT.find("\"hello there\"").unwrap()];
        let err = parse_textgrid(cut).unwrap_err();

        assert!(matches!(err, TextGridError::UnexpectedEof("interval text")));
    }

    #[test]
    fn test_not_a_textgrid() {
        let err = parse_textgrid(r#"{"results": []}"#).unwrap_err();
        assert!(matches!(err, TextGridError::NotTextGrid(_)));

        let err = parse_textgrid("File type = \"ooTextFile\"\nObject class = \"Sound\"\n").unwrap_err();
        assert!(matches!(err, TextGridError::NotTextGrid(_)));
    }

    #[test]
    fn test_unknown_tier_class() {
        let text = SHORT_FORMAT.replace("\"TextTier\"", "\"PitchTier\"");
        let err = parse_textgrid(&text).unwrap_err();

        assert!(matches!(err, TextGridError::UnknownTierClass(class) if class == "PitchTier"));
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let text = "File type = \"ooTextFile\"\nObject class = \"TextGrid\"\n\n0\n3\n<exists>\n1\n\
                    \"IntervalTier\"\n\"utt\"\n0x\n3\n3\n\
                    0\n1\n\"<S>\"\n1\n2\n\"hello\"\n2\n3\n\"\"\n";
        let err = parse_textgrid(text).unwrap_err();

        match err {
            TextGridError::Unexpected {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 10);
                assert_eq!(expected, "number");
                assert_eq!(found, "0x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_value_reports_its_own_line() {
        let text = SHORT_FORMAT.replacen("\n1\n2.25\n", "\n1\n\"late\"\n", 1);
        let err = parse_textgrid(&text).unwrap_err();

        match err {
            TextGridError::Unexpected { line, expected, .. } => {
                assert_eq!(expected, "interval xmax");
                assert_eq!(line, text[..text.find("\"late\"").unwrap()].lines().count() + 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_values_are_rejected() {
        let text = format!("{}\n4\n", SHORT_FORMAT.trim_end());
        let err = parse_textgrid(&text).unwrap_err();

        assert!(matches!(
            err,
            TextGridError::Unexpected {
                expected: "end of file",
                ..
            }
        ));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_textgrid("File type = \"ooTextFile").unwrap_err();
        assert!(matches!(err, TextGridError::UnterminatedString(1)));
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let mut le = vec![0xFF, 0xFE];
        le.extend(SHORT_FORMAT.encode_utf16().flat_map(|u| u.to_le_bytes()));
        let mut be = vec![0xFE, 0xFF];
        be.extend(SHORT_FORMAT.encode_utf16().flat_map(|u| u.to_be_bytes()));

        assert_eq!(decode_text(&le).unwrap(), SHORT_FORMAT);
        assert_eq!(decode_text(&be).unwrap(), SHORT_FORMAT);
    }

    #[test]
    fn test_decode_utf8_bom_and_invalid() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"abc");
        assert_eq!(decode_text(&bytes).unwrap(), "abc");

        assert!(matches!(
            decode_text(&[0xC3, 0x28]),
            Err(TextGridError::Encoding(_))
        ));
        assert!(matches!(
            decode_text(&[0xFF, 0xFE, 0x41]),
            Err(TextGridError::Encoding(_))
        ));
    }

    #[test]
    fn test_parse_textgrid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_0683_0013_phnd_cc-bnk.TextGrid");
        std::fs::write(&path, LONG_FORMAT).unwrap();

        let grid = parse_textgrid_file(&path).unwrap();
        assert_eq!(grid.tiers.len(), 2);

        let missing = parse_textgrid_file(&dir.path().join("missing.TextGrid"));
        assert!(matches!(missing, Err(TextGridError::Io(_))));
    }
}
