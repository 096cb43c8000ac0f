//! # Command Syntax
//!
//! Normalizes the two surface syntaxes into one call shape
//! `(operation, kind, identity?, attrName?, attrValue?)`.
//!
//! ```text
//! space:  update User 1234 first_name "Betty"
//! dot:    User.update("1234", "first_name", "Betty")
//! bulk:   User.update("1234", {'first_name': "Betty", 'age': 89})
//! ```
//!
//! Parsing never looks at the registry; it only decides which operation was
//! asked for and splits out its arguments. Value tokens are kept raw (quotes
//! included) so that coercion can tell `42` from `"42"`.

/// The fixed set of console operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Show,
    Destroy,
    All,
    Count,
    Update,
}

impl Operation {
    /// Resolve a command word. `list` is accepted as an alias of `all`.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "create" => Some(Self::Create),
            "show" => Some(Self::Show),
            "destroy" => Some(Self::Destroy),
            "all" | "list" => Some(Self::All),
            "count" => Some(Self::Count),
            "update" => Some(Self::Update),
            _ => None,
        }
    }
}

/// One normalized call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Operation,
    pub kind: Option<String>,
    pub id: Option<String>,
    pub attr: Option<String>,
    /// Raw value token, quotes preserved.
    pub value: Option<String>,
}

impl Call {
    fn new(op: Operation) -> Self {
        Self {
            op,
            kind: None,
            id: None,
            attr: None,
            value: None,
        }
    }
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// A single operation.
    Single(Call),
    /// `Kind.update(id, {dict})`: one update per pair, in literal order.
    Bulk {
        call: Call,
        pairs: Vec<(String, String)>,
    },
}

/// Parse one input line. `None` means unknown syntax.
pub fn parse(line: &str) -> Option<Request> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.ends_with(')') && line.contains('(') {
        if let Some(request) = parse_dot(line) {
            return Some(request);
        }
    }
    parse_space(line).map(Request::Single)
}

// =============================================================================
// SPACE SYNTAX
// =============================================================================

fn parse_space(line: &str) -> Option<Call> {
    let tokens = tokenize(line);
    let mut tokens = tokens.into_iter();

    let mut call = Call::new(Operation::from_word(&tokens.next()?)?);
    call.kind = tokens.next();
    call.id = tokens.next().map(|t| unquote(&t).to_string()).filter(|t| !t.is_empty());
    call.attr = tokens.next().map(|t| unquote(&t).to_string()).filter(|t| !t.is_empty());
    call.value = tokens.next();
    Some(call)
}

/// Split on whitespace. A token that starts with a quote runs to the matching
/// closing quote, so quoted values may contain spaces. Quotes are kept.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        let mut quote: Option<char> = None;
        while let Some(&c) = chars.peek() {
            match quote {
                Some(q) => {
                    token.push(c);
                    chars.next();
                    if c == q {
                        quote = None;
                    }
                }
                None if c.is_whitespace() => break,
                None => {
                    if c == '"' || c == '\'' {
                        quote = Some(c);
                    }
                    token.push(c);
                    chars.next();
                }
            }
        }
        tokens.push(token);
    }
    tokens
}

// =============================================================================
// DOT SYNTAX
// =============================================================================

fn parse_dot(line: &str) -> Option<Request> {
    let open = line.find('(')?;
    let head = &line[..open];
    let inner = &line[open + 1..line.len() - 1];

    let (kind, method) = head.split_once('.')?;
    let kind = kind.trim();
    let method = method.trim();
    if kind.contains(char::is_whitespace) || method.contains(char::is_whitespace) {
        return None;
    }

    let op = Operation::from_word(method)?;
    // Instances are created with the space syntax only.
    if op == Operation::Create {
        return None;
    }

    let mut call = Call::new(op);
    call.kind = Some(kind.to_string()).filter(|k| !k.is_empty());

    let args = split_args(inner)?;
    if let Some(dict) = args.get(1).filter(|a| a.starts_with('{')) {
        if op != Operation::Update || args.len() != 2 {
            return None;
        }
        call.id = Some(unquote(&args[0]).to_string()).filter(|id| !id.is_empty());
        let pairs = parse_dict(dict)?;
        return Some(Request::Bulk { call, pairs });
    }

    let mut args = args.into_iter();
    call.id = args.next().map(|a| unquote(&a).to_string()).filter(|a| !a.is_empty());
    call.attr = args.next().map(|a| unquote(&a).to_string()).filter(|a| !a.is_empty());
    call.value = args.next();
    Some(Request::Single(call))
}

/// Split call arguments on top-level commas. Commas inside quotes or braces
/// do not split. `None` on an unterminated quote or unbalanced braces.
fn split_args(inner: &str) -> Option<Vec<String>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    split_top_level(inner, ',')
        .map(|parts| parts.into_iter().map(|p| p.trim().to_string()).collect())
}

fn split_top_level(text: &str, sep: char) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth: usize = 0;

    for c in text.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                '{' => {
                    depth += 1;
                    current.push(c);
                }
                '}' => {
                    depth = depth.checked_sub(1)?;
                    current.push(c);
                }
                _ if c == sep && depth == 0 => parts.push(std::mem::take(&mut current)),
                _ => current.push(c),
            },
        }
    }

    if quote.is_some() || depth != 0 {
        return None;
    }
    parts.push(current);
    Some(parts)
}

/// Parse `{'key': value, "other": 'text'}` into `(key, raw value)` pairs.
fn parse_dict(text: &str) -> Option<Vec<(String, String)>> {
    let body = text.trim().strip_prefix('{')?.strip_suffix('}')?;
    if body.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut pairs = Vec::new();
    for entry in split_top_level(body, ',')? {
        let entry = entry.trim();
        // Trailing comma.
        if entry.is_empty() {
            continue;
        }
        let mut halves = split_top_level(entry, ':')?.into_iter();
        let key = halves.next()?;
        let value = halves.collect::<Vec<_>>().join(":");
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        pairs.push((unquote(key.trim()).to_string(), value.to_string()));
    }
    Some(pairs)
}

/// Strip one pair of matching surrounding quotes.
pub fn unquote(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &token[1..token.len() - 1];
        }
    }
    token
}

// =============================================================================
// TESTS
// =============================================================================
