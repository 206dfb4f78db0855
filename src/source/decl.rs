//! A recognizer for the handful of Go declaration forms the generator cares
//! about: struct openings and single-name field declarations with tags.

use std::fmt;

/// A Go type expression, restricted to the forms that appear in config structs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    /// A possibly package-qualified name, eg. `int` or `k8sV1.Pod`
    Named(String),
    Pointer(Box<GoType>),
    Slice(Box<GoType>),
    Array { len: String, elem: Box<GoType> },
    Map { key: Box<GoType>, value: Box<GoType> },
    /// `interface{}`
    Interface,
    /// `struct{}`
    EmptyStruct,
}

impl GoType {
    /// The number of leading `*`
    pub fn pointer_depth(&self) -> usize {
        match self {
            Self::Pointer(inner) => 1 + inner.pointer_depth(),
            _ => 0,
        }
    }

    /// The type with every leading `*` removed
    pub fn pointee(&self) -> &Self {
        match self {
            Self::Pointer(inner) => inner.pointee(),
            other => other,
        }
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Pointer(inner) => write!(f, "*{inner}"),
            Self::Slice(elem) => write!(f, "[]{elem}"),
            Self::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Interface => f.write_str("interface{}"),
            Self::EmptyStruct => f.write_str("struct{}"),
        }
    }
}

/// The opening line of a struct definition
#[derive(Debug, PartialEq, Eq)]
pub struct StructOpen<'s> {
    pub name: &'s str,
    /// True for `type X struct {}`, where the body closes on the same line
    pub closed: bool,
}

/// A field declaration with exactly one name
#[derive(Debug)]
pub struct FieldDecl<'s> {
    pub name: &'s str,
    pub ty: GoType,
    pub tag: Option<StructTag>,
}

/// The `key:"value"` pairs of a struct tag, in declaration order
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StructTag {
    pairs: Vec<(String, String)>,
}

impl StructTag {
    /// Parses the contents of a struct tag, following the conventions of
    /// Go's `reflect.StructTag`
    pub fn parse(tag: &str) -> Option<Self> {
        let mut pairs = Vec::new();
        let mut cur = Cursor::new(tag);

        loop {
            cur.skip_ws();
            if cur.is_empty() {
                break;
            }

            let key = cur.take_while(|c| c > ' ' && c != ':' && c != '"' && c != '\x7f');
            if key.is_empty() || !cur.eat(":") {
                return None;
            }

            let value = cur.quoted()?;
            pairs.push((key.to_owned(), value));
        }

        Some(Self { pairs })
    }

    /// The value of the first pair with the given key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Recognizes `type <name> struct`, which must start at the beginning of
/// the line
pub fn struct_open(line: &str) -> Option<StructOpen<'_>> {
    let mut cur = Cursor::new(line);

    if !cur.keyword("type") || !cur.skip_ws() {
        return None;
    }

    let name = cur.ident()?;

    if !cur.skip_ws() || !cur.keyword("struct") {
        return None;
    }

    cur.skip_ws();
    let closed = cur.eat("{") && {
        cur.skip_ws();
        cur.eat("}")
    };

    Some(StructOpen { name, closed })
}

/// Parses a line of the form `Name Type [Tag] [// comment]`
pub fn field(line: &str) -> Option<FieldDecl<'_>> {
    let mut cur = Cursor::new(line);

    cur.skip_ws();
    let name = cur.ident()?;

    if !cur.skip_ws() {
        return None;
    }

    let ty = cur.go_type()?;
    cur.skip_ws();

    let tag = match cur.peek() {
        Some('`') => {
            cur.bump();
            let raw = cur.take_while(|c| c != '`');
            if !cur.eat("`") {
                return None;
            }
            Some(StructTag::parse(raw)?)
        }
        Some('"') => {
            let unquoted = cur.quoted()?;
            Some(StructTag::parse(&unquoted)?)
        }
        _ => None,
    };

    cur.skip_ws();
    if !cur.is_empty() && !cur.rest().starts_with("//") {
        return None;
    }

    Some(FieldDecl { name, ty, tag })
}

struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    #[inline]
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.pos >= self.src.len()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Eats a word that is not immediately followed by more identifier characters
    fn keyword(&mut self, word: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(word) {
            return false;
        }

        if rest[word.len()..].chars().next().map_or(false, is_ident_char) {
            return false;
        }

        self.pos += word.len();
        true
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find_map(|(i, c)| (!pred(c)).then_some(i))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Skips spaces and tabs, returning true if any were skipped
    fn skip_ws(&mut self) -> bool {
        !self.take_while(|c| c == ' ' || c == '\t').is_empty()
    }

    fn ident(&mut self) -> Option<&'s str> {
        match self.peek() {
            Some(c) if c == '_' || c.is_alphabetic() => Some(self.take_while(is_ident_char)),
            _ => None,
        }
    }

    /// Reads a double quoted string, returning its unescaped contents
    fn quoted(&mut self) -> Option<String> {
        if !self.eat("\"") {
            return None;
        }

        let mut out = String::new();
        loop {
            match self.bump()? {
                '"' => return Some(out),
                '\\' => {
                    let escaped = match self.bump()? {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    };
                    out.push(escaped);
                }
                c => out.push(c),
            }
        }
    }

    fn go_type(&mut self) -> Option<GoType> {
        if self.eat("*") {
            self.skip_ws();
            return Some(GoType::Pointer(Box::new(self.go_type()?)));
        }

        if self.eat("[") {
            self.skip_ws();
            if self.eat("]") {
                self.skip_ws();
                return Some(GoType::Slice(Box::new(self.go_type()?)));
            }

            let len = self.take_while(|c| c != ']').trim();
            if len.is_empty() || !self.eat("]") {
                return None;
            }
            self.skip_ws();

            return Some(GoType::Array {
                len: len.to_owned(),
                elem: Box::new(self.go_type()?),
            });
        }

        let name = self.ident()?;
        match name {
            "map" => {
                self.skip_ws();
                if !self.eat("[") {
                    return None;
                }
                self.skip_ws();
                let key = self.go_type()?;
                self.skip_ws();
                if !self.eat("]") {
                    return None;
                }
                self.skip_ws();
                let value = self.go_type()?;

                Some(GoType::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            "interface" | "struct" => {
                self.skip_ws();
                if !self.eat("{") {
                    return None;
                }
                self.skip_ws();
                if !self.eat("}") {
                    return None;
                }

                Some(if name == "interface" {
                    GoType::Interface
                } else {
                    GoType::EmptyStruct
                })
            }
            // Function and channel types never appear in config structs
            "func" | "chan" => None,
            _ => {
                if self.eat(".") {
                    let member = self.ident()?;
                    Some(GoType::Named(format!("{name}.{member}")))
                } else {
                    Some(GoType::Named(name.to_owned()))
                }
            }
        }
    }
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod test {
    use super::*;

    fn ty(s: &str) -> String {
        field(&format!("\tX {s}"))
            .unwrap_or_else(|| panic!("failed to parse type '{s}'"))
            .ty
            .to_string()
    }

    #[test]
    fn parses_types() {
        assert_eq!(ty("int"), "int");
        assert_eq!(ty("*string"), "*string");
        assert_eq!(ty("**BindMountV0"), "**BindMountV0");
        assert_eq!(ty("[]string"), "[]string");
        assert_eq!(ty("*[]DeviceV0"), "*[]DeviceV0");
        assert_eq!(ty("[4]byte"), "[4]byte");
        assert_eq!(ty("map[string]string"), "map[string]string");
        assert_eq!(ty("map[string] *int"), "map[string]*int");
        assert_eq!(ty("*map[string]interface{}"), "*map[string]interface{}");
        assert_eq!(ty("*k8sV1.Pod"), "*k8sV1.Pod");
        assert_eq!(ty("interface { }"), "interface{}");
        assert_eq!(ty("struct{}"), "struct{}");
    }

    #[test]
    fn spaced_types() {
        assert_eq!(ty("* int"), "*int");
        assert_eq!(ty("[] string"), "[]string");
        assert_eq!(ty("[ 4 ] byte"), "[4]byte");
        assert_eq!(ty("map[ string ] *int"), "map[string]*int");
        assert_eq!(ty("* map[string] [] * k8sV1.Pod"), "*map[string][]*k8sV1.Pod");
    }

    #[test]
    fn pointers() {
        let decl = field("\tX **BindMountV0").unwrap();
        assert_eq!(decl.ty.pointer_depth(), 2);
        assert_eq!(decl.ty.pointee().to_string(), "BindMountV0");

        let decl = field("\tX []*int").unwrap();
        assert_eq!(decl.ty.pointer_depth(), 0);
        assert_eq!(decl.ty.pointee(), &decl.ty);
    }

    #[test]
    fn rejects_odd_types() {
        assert!(field("\tX func()").is_none());
        assert!(field("\tX chan int").is_none());
        assert!(field("\tX map[string").is_none());
        assert!(field("\tX []").is_none());
    }

    #[test]
    fn parses_tags() {
        let decl = field("\tRawName *string `json:\"name,omitempty\" yaml:\"n\"` // the name").unwrap();
        assert_eq!(decl.name, "RawName");
        assert_eq!(decl.ty.to_string(), "*string");

        let tag = decl.tag.unwrap();
        assert_eq!(tag.get("json"), Some("name,omitempty"));
        assert_eq!(tag.get("yaml"), Some("n"));
        assert_eq!(tag.get("union"), None);
    }

    #[test]
    fn interpreted_tags() {
        let decl = field("\tName string \"json:\\\"name\\\"\"").unwrap();
        assert_eq!(decl.tag.unwrap().get("json"), Some("name"));
    }

    #[test]
    fn malformed_lines() {
        // No type
        assert!(field("\tName").is_none());
        // Multiple names
        assert!(field("\tA, B int `json:\"a\"`").is_none());
        // Unterminated tag
        assert!(field("\tA int `json:\"a\"").is_none());
        // Malformed tag
        assert!(field("\tA int `json:a`").is_none());
        // Trailing garbage
        assert!(field("\tA int `json:\"a\"` junk").is_none());
    }

    #[test]
    fn untagged_fields_still_parse() {
        let decl = field("\tA int // just a comment").unwrap();
        assert!(decl.tag.is_none());
    }

    #[test]
    fn struct_openings() {
        assert_eq!(
            struct_open("type FooV1 struct {"),
            Some(StructOpen {
                name: "FooV1",
                closed: false
            })
        );
        assert_eq!(
            struct_open("type FooV1 struct{}"),
            Some(StructOpen {
                name: "FooV1",
                closed: true
            })
        );
        assert_eq!(struct_open("type FooV1 structure {"), None);
        assert_eq!(struct_open("type FooV1 interface {"), None);
        assert_eq!(struct_open("\ttype FooV1 struct {"), None);
        assert_eq!(struct_open("typeFooV1 struct {"), None);
    }
}
