/// Raw message count as it appeared in the serialized mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageCount {
    Integer(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl MessageCount {
    /// Non-negative integer count; anything unparseable, negative or
    /// non-finite becomes 0 and fractions are truncated.
    pub fn coerce(&self) -> u64 {
        match self {
            Self::Integer(value) => (*value).max(0) as u64,
            Self::Float(value) => float_to_count(*value),
            Self::Text(text) => {
                let trimmed = text.trim();
                if let Ok(value) = trimmed.parse::<i64>() {
                    return value.max(0) as u64;
                }
                trimmed.parse::<f64>().map(float_to_count).unwrap_or(0)
            }
            Self::Missing => 0,
        }
    }
}

fn float_to_count(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.trunc() as u64
}

/// Parsed model name to message count mapping, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelUsage {
    entries: Vec<(String, MessageCount)>,
}

impl ModelUsage {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageCount)> {
        self.entries
            .iter()
            .map(|(model, count)| (model.as_str(), count))
    }

    #[cfg(test)]
    pub(crate) fn total_messages(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, count)| count.coerce())
            .fold(0u64, |acc, value| acc.saturating_add(value))
    }

    // A repeated key keeps its first position and takes the last value.
    fn insert(&mut self, model: String, count: MessageCount) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == model) {
            entry.1 = count;
        } else {
            self.entries.push((model, count));
        }
    }
}

impl IntoIterator for ModelUsage {
    type Item = (String, MessageCount);
    type IntoIter = std::vec::IntoIter<(String, MessageCount)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Parses a `model_to_messages` cell such as `{'gpt-4': 5, "gpt-3.5": 2}`.
///
/// Accepts single- or double-quoted keys and values, integer and float
/// numbers, `True`/`False`/`None` (and their JSON spellings) and a trailing
/// comma. Absent input or anything that is not a well-formed mapping yields
/// the empty mapping.
pub fn parse_model_to_messages(raw: Option<&str>) -> ModelUsage {
    raw.and_then(|text| Parser::new(text).parse_mapping())
        .unwrap_or_default()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_mapping(mut self) -> Option<ModelUsage> {
        self.skip_ws();
        if !self.eat('{') {
            return None;
        }
        let mut usage = ModelUsage::default();
        loop {
            self.skip_ws();
            if self.eat('}') {
                break;
            }
            let key = self.parse_key()?;
            self.skip_ws();
            if !self.eat(':') {
                return None;
            }
            self.skip_ws();
            let value = self.parse_value()?;
            usage.insert(key, value);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                break;
            }
            return None;
        }
        self.skip_ws();
        if self.peek().is_some() {
            return None;
        }
        Some(usage)
    }

    fn parse_key(&mut self) -> Option<String> {
        match self.peek()? {
            quote @ ('\'' | '"') => {
                self.pos += 1;
                self.parse_string(quote)
            }
            ch if is_number_start(ch) => self.number_token(),
            _ => None,
        }
    }

    fn parse_value(&mut self) -> Option<MessageCount> {
        match self.peek()? {
            quote @ ('\'' | '"') => {
                self.pos += 1;
                self.parse_string(quote).map(MessageCount::Text)
            }
            ch if is_number_start(ch) => {
                let token = self.number_token()?;
                let cleaned = token.replace('_', "");
                if let Ok(value) = cleaned.parse::<i64>() {
                    Some(MessageCount::Integer(value))
                } else {
                    cleaned.parse::<f64>().ok().map(MessageCount::Float)
                }
            }
            ch if ch.is_ascii_alphabetic() => {
                let word = self.word();
                match word.as_str() {
                    "True" | "true" => Some(MessageCount::Integer(1)),
                    "False" | "false" => Some(MessageCount::Integer(0)),
                    "None" | "null" => Some(MessageCount::Missing),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn parse_string(&mut self, quote: char) -> Option<String> {
        let mut out = String::new();
        loop {
            let ch = self.bump()?;
            if ch == quote {
                return Some(out);
            }
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            match self.bump()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                escaped @ ('\\' | '\'' | '"') => out.push(escaped),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    fn number_token(&mut self) -> Option<String> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(ch) if ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E' | '_')
        ) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn word(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

fn is_number_start(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.')
}
