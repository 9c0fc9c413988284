//! Internal Entity Declarations
//!
//! General entities declared in a DOCTYPE internal subset
//! (`<!ENTITY name "value">`), used to expand `&name;` references in text and
//! attribute values. Parameter entities and external (`SYSTEM`/`PUBLIC`)
//! entities are skipped; nothing is ever fetched.

use memchr::memmem;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use std::collections::HashMap;

const ENTITY_DECL: &[u8] = b"<!ENTITY";

/// Replacement text of declared general entities
#[derive(Debug, Default)]
pub struct InternalEntities {
    values: HashMap<String, String>,
}

impl InternalEntities {
    /// Collect the entity declarations in the content of a DOCTYPE.
    ///
    /// A value may reference entities declared before it; the stored text is
    /// already expanded. The first declaration of a name wins.
    pub fn parse(content: &[u8]) -> Result<Self, String> {
        let mut entities = InternalEntities::default();
        let finder = memmem::Finder::new(ENTITY_DECL);
        let mut pos = 0;

        while let Some(found) = finder.find(&content[pos..]) {
            pos = skip_ws(content, pos + found + ENTITY_DECL.len());

            let is_pe = content.get(pos) == Some(&b'%');
            if is_pe {
                pos = skip_ws(content, pos + 1);
            }

            let name_start = pos;
            while pos < content.len() && !is_name_end(content[pos]) {
                pos += 1;
            }
            if pos == name_start {
                return Err("entity declaration without a name".to_string());
            }
            let name = std::str::from_utf8(&content[name_start..pos])
                .map_err(|_| "entity name is not valid UTF-8".to_string())?;
            pos = skip_ws(content, pos);

            let Some(&quote) = content.get(pos).filter(|b| **b == b'"' || **b == b'\'') else {
                // External entity
                continue;
            };
            let value_start = pos + 1;
            let len = memchr::memchr(quote, &content[value_start..])
                .ok_or_else(|| format!("unterminated value for entity {}", name))?;
            pos = value_start + len + 1;

            if !is_pe {
                let raw = std::str::from_utf8(&content[value_start..value_start + len])
                    .map_err(|_| format!("value of entity {} is not valid UTF-8", name))?;
                entities.declare(name, raw)?;
            }
        }

        Ok(entities)
    }

    fn declare(&mut self, name: &str, raw: &str) -> Result<(), String> {
        if self.values.contains_key(name) {
            return Ok(());
        }
        let value = unescape_with(raw, |entity| self.resolve(entity))
            .map_err(|err| format!("invalid value for entity {}: {}", name, err))?
            .into_owned();
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Replacement text for `name`: the five predefined entities, then the
    /// declared ones
    pub fn resolve(&self, name: &str) -> Option<&str> {
        resolve_predefined_entity(name).or_else(|| self.values.get(name).map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn skip_ws(content: &[u8], mut pos: usize) -> usize {
    while pos < content.len() && matches!(content[pos], b' ' | b'\t' | b'\n' | b'\r') {
        pos += 1;
    }
    pos
}

fn is_name_end(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'"' | b'\'' | b'>')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_entities() {
        let entities = InternalEntities::parse(br#" r [<!ENTITY e "x"> <!ENTITY who 'world'>]"#).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities.resolve("e"), Some("x"));
        assert_eq!(entities.resolve("who"), Some("world"));
        assert_eq!(entities.resolve("amp"), Some("&"));
        assert!(entities.resolve("missing").is_none());
    }

    #[test]
    fn test_value_expands_earlier_entities() {
        let entities = InternalEntities::parse(br#"r [<!ENTITY a "A"><!ENTITY b "&a;&#66;&lt;">]"#).unwrap();
        assert_eq!(entities.resolve("b"), Some("AB<"));
    }

    #[test]
    fn test_first_declaration_wins() {
        let entities = InternalEntities::parse(br#"r [<!ENTITY e "1"><!ENTITY e "2">]"#).unwrap();
        assert_eq!(entities.resolve("e"), Some("1"));
    }

    #[test]
    fn test_parameter_and_external_skipped() {
        let entities = InternalEntities::parse(
            br#"r [<!ENTITY % p "x"><!ENTITY ext SYSTEM "file.xml"><!ELEMENT r ANY>]"#,
        )
        .unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn test_self_reference_rejected() {
        assert!(InternalEntities::parse(br#"r [<!ENTITY e "&e;">]"#).is_err());
        assert!(InternalEntities::parse(br#"r [<!ENTITY e "unterminated>]"#).is_err());
    }

    #[test]
    fn test_no_subset() {
        assert!(InternalEntities::parse(b"html").unwrap().is_empty());
    }
}
