//=========================================================================
// JSON Parser
//=========================================================================
//
// Strict recursive-descent parser over the input's bytes.
//
// Grammar: RFC 8259. Leading/trailing whitespace is allowed, anything
// else after the root value is an error. Errors report the 1-based line
// and column of the offending character.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::str::FromStr;

//=== Internal Dependencies ===============================================

use super::{Array, JsonError, Object, Value};

//=== Limits ==============================================================

/// Nesting depth past which input is rejected instead of recursing.
const MAX_DEPTH: usize = 512;

//=== Public Entry Points =================================================

impl Value {
    /// Parses JSON text into a document.
    pub fn parse(text: &str) -> Result<Value, JsonError> {
        let mut parser = Parser::new(text);
        parser.skip_whitespace();
        let value = parser.parse_value(0)?;
        parser.skip_whitespace();
        if parser.pos < parser.bytes.len() {
            return Err(parser.error("unexpected trailing characters"));
        }
        Ok(value)
    }
}

impl FromStr for Value {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Value::parse(s)
    }
}

//=== Parser ==============================================================

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    //--- Values -----------------------------------------------------------

    fn parse_value(&mut self, depth: usize) -> Result<Value, JsonError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }

        match self.peek() {
            Some(b'{') => self.parse_object(depth),
            Some(b'[') => self.parse_array(depth),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'n') => self.parse_literal("null", Value::Null),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, JsonError> {
        self.expect(b'{')?;
        let mut members = Object::new();

        self.skip_whitespace();
        if self.eat(b'}') {
            return Ok(Value::Object(members));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.error("expected string key"));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            self.expect(b':')?;
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            members.insert(key, value);

            self.skip_whitespace();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b'}') {
                return Ok(Value::Object(members));
            }
            return Err(self.error("expected ',' or '}'"));
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, JsonError> {
        self.expect(b'[')?;
        let mut items = Array::new();

        self.skip_whitespace();
        if self.eat(b']') {
            return Ok(Value::Array(items));
        }

        loop {
            self.skip_whitespace();
            items.push(self.parse_value(depth + 1)?);

            self.skip_whitespace();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                return Ok(Value::Array(items));
            }
            return Err(self.error("expected ',' or ']'"));
        }
    }

    fn parse_literal(&mut self, word: &str, value: Value) -> Result<Value, JsonError> {
        if self.bytes[self.pos..].starts_with(word.as_bytes()) {
            self.pos += word.len();
            Ok(value)
        } else {
            Err(self.error("invalid literal"))
        }
    }

    fn parse_number(&mut self) -> Result<Value, JsonError> {
        let start = self.pos;

        self.eat(b'-');
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.error("expected digit")),
        }

        if self.eat(b'.') {
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit after decimal point"));
            }
            self.skip_digits();
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit in exponent"));
            }
            self.skip_digits();
        }

        let literal = &self.text[start..self.pos];
        literal
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| self.error_at(start, "invalid number"))
    }

    //--- Strings ----------------------------------------------------------

    fn parse_string(&mut self) -> Result<String, JsonError> {
        self.expect(b'"')?;
        let mut out = String::new();

        loop {
            // copy the unescaped run in one go
            let run_start = self.pos;
            while let Some(b) = self.peek() {
                if b == b'"' || b == b'\\' || b < 0x20 {
                    break;
                }
                self.pos += 1;
            }
            out.push_str(&self.text[run_start..self.pos]);

            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    out.push(self.parse_escape()?);
                }
                Some(_) => return Err(self.error("control character in string")),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, JsonError> {
        let Some(b) = self.peek() else {
            return Err(self.error("unterminated escape"));
        };
        self.pos += 1;

        let c = match b {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{08}',
            b'f' => '\u{0C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => return self.parse_unicode_escape(),
            _ => return Err(self.error_at(self.pos - 1, "invalid escape")),
        };
        Ok(c)
    }

    fn parse_unicode_escape(&mut self) -> Result<char, JsonError> {
        let first = self.parse_hex4()?;

        let code = match first {
            0xD800..=0xDBFF => {
                if !(self.eat(b'\\') && self.eat(b'u')) {
                    return Err(self.error("unpaired surrogate"));
                }
                let second = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(self.error("invalid low surrogate"));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error("unpaired surrogate")),
            code => code,
        };

        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn parse_hex4(&mut self) -> Result<u32, JsonError> {
        let end = self.pos + 4;
        let digits = self
            .text
            .get(self.pos..end)
            .ok_or_else(|| self.error("truncated unicode escape"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error("invalid hex digits"));
        }
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| self.error("invalid hex digits"))?;
        self.pos = end;
        Ok(code)
    }

    //--- Cursor Helpers ---------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), JsonError> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    //--- Errors -----------------------------------------------------------

    fn error(&self, message: &str) -> JsonError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: &str) -> JsonError {
        let consumed = &self.bytes[..pos.min(self.bytes.len())];
        let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = consumed
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let column = String::from_utf8_lossy(&consumed[line_start..]).chars().count() + 1;

        JsonError::Parse {
            line,
            column,
            message: message.to_string(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_document() {
        let doc = Value::parse(
            r#"
            {
                "title": "Main Menu",
                "items": ["Play", "Options", "Quit"],
                "size": {"w": 800, "h": 600.5},
                "visible": true,
                "parent": null
            }
            "#,
        )
        .unwrap();

        assert_eq!(doc.get("title").unwrap().as_str(), Ok("Main Menu"));
        assert_eq!(doc.get("items").unwrap().len(), 3);
        assert_eq!(doc.get("size").unwrap().get("h").unwrap().as_f64(), Ok(600.5));
        assert_eq!(doc.get("visible").unwrap().as_bool(), Ok(true));
        assert!(doc.get("parent").unwrap().is_null());
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(Value::parse("-12").unwrap().as_f64(), Ok(-12.0));
        assert_eq!(Value::parse("0.25").unwrap().as_f64(), Ok(0.25));
        assert_eq!(Value::parse("1e3").unwrap().as_f64(), Ok(1000.0));
        assert_eq!(Value::parse("2E-2").unwrap().as_f64(), Ok(0.02));
        assert!(Value::parse("01").is_err());
        assert!(Value::parse("1.").is_err());
        assert!(Value::parse("-").is_err());
        assert!(Value::parse("1e").is_err());
    }

    #[test]
    fn decodes_escapes() {
        let value = Value::parse(r#""q\"b\\s\/n\nt\tu\u00e9""#).unwrap();
        assert_eq!(value.as_str(), Ok("q\"b\\s/n\nt\tu\u{e9}"));
    }

    #[test]
    fn decodes_surrogate_pairs() {
        let value = Value::parse(r#""\ud83d\ude00""#).unwrap();
        assert_eq!(value.as_str(), Ok("\u{1F600}"));
        assert!(Value::parse(r#""\ud83d""#).is_err());
        assert!(Value::parse(r#""\ude00""#).is_err());
    }

    #[test]
    fn rejects_bad_escape() {
        assert!(matches!(
            Value::parse(r#""\x""#),
            Err(JsonError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_trailing_content() {
        assert!(Value::parse("{} {}").is_err());
        assert!(Value::parse("  [1, 2]  \n").is_ok());
    }

    #[test]
    fn rejects_trailing_commas_and_bare_keys() {
        assert!(Value::parse("[1, 2,]").is_err());
        assert!(Value::parse(r#"{"a": 1,}"#).is_err());
        assert!(Value::parse("{a: 1}").is_err());
    }

    #[test]
    fn reports_line_and_column() {
        let err = Value::parse("{\n  \"a\": tru\n}").unwrap_err();
        assert_eq!(
            err,
            JsonError::Parse {
                line: 2,
                column: 8,
                message: "invalid literal".to_string(),
            }
        );
    }

    #[test]
    fn rejects_raw_control_characters() {
        assert!(Value::parse("\"a\nb\"").is_err());
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(Value::parse("").is_err());
        assert!(Value::parse("   ").is_err());
    }

    #[test]
    fn serialized_text_parses_back() {
        let text = r#"{"a":[1,2.5,"x\/y"],"b":{"c":null,"d":false}}"#;
        let value: Value = text.parse().unwrap();
        assert_eq!(value.serialize(), text);
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let text = "[".repeat(MAX_DEPTH + 2);
        assert!(Value::parse(&text).is_err());
    }
}
