use std::fmt::{self, Display};

///
/// StoreTypeName
///
/// Parsed store type name such as `decimal(10,2)`, `nvarchar(max)` or
/// `double precision`. The base name is lowercased and its inner
/// whitespace collapsed; arguments are kept in order.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StoreTypeName {
    pub base: String,
    pub facet: StoreTypeFacet,
}

///
/// StoreTypeFacet
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StoreTypeFacet {
    None,
    /// `(max)`
    Max,
    Size(u32),
    Precision { precision: u8, scale: Option<u8> },
}

impl StoreTypeName {
    /// Parse a store type name; malformed input yields `None`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let Some(open) = input.find('(') else {
            return Some(Self {
                base: normalize_base(input)?,
                facet: StoreTypeFacet::None,
            });
        };

        let rest = input[open + 1..].trim_end();
        let args = rest.strip_suffix(')')?;
        if args.contains('(') || args.contains(')') {
            return None;
        }

        Some(Self {
            base: normalize_base(&input[..open])?,
            facet: parse_facet(args)?,
        })
    }

    /// Render with the given canonical base spelling.
    #[must_use]
    pub fn render_with_base(&self, base: &str) -> String {
        match self.facet {
            StoreTypeFacet::None => base.to_string(),
            StoreTypeFacet::Max => format!("{base}(max)"),
            StoreTypeFacet::Size(size) => format!("{base}({size})"),
            StoreTypeFacet::Precision {
                precision,
                scale: None,
            } => format!("{base}({precision})"),
            StoreTypeFacet::Precision {
                precision,
                scale: Some(scale),
            } => format!("{base}({precision},{scale})"),
        }
    }
}

impl Display for StoreTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_base(&self.base))
    }
}

fn normalize_base(raw: &str) -> Option<String> {
    let words: Vec<_> = raw.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    Some(words.join(" ").to_ascii_lowercase())
}

fn parse_facet(args: &str) -> Option<StoreTypeFacet> {
    let parts: Vec<_> = args.split(',').map(str::trim).collect();

    match parts.as_slice() {
        [one] if one.eq_ignore_ascii_case("max") => Some(StoreTypeFacet::Max),
        [one] => {
            let size = one.parse::<u32>().ok()?;
            Some(StoreTypeFacet::Size(size))
        }
        [precision, scale] => {
            let precision = precision.parse::<u8>().ok()?;
            let scale = scale.parse::<u8>().ok()?;
            if scale > precision {
                return None;
            }

            Some(StoreTypeFacet::Precision {
                precision,
                scale: Some(scale),
            })
        }
        _ => None,
    }
}
