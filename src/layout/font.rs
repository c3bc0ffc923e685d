//! Font attribute resolution for word styling.

use regex::Regex;

use crate::model::{format_float, FontInfo};

/// Family, weight and style as written into markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFont {
    pub family: String,
    /// `normal`, `bold`, or a numeric weight such as `700.0`
    pub weight: String,
    /// `normal` or `italic`
    pub style: String,
}

/// Resolves family/weight/style from a font's name and descriptor.
#[derive(Debug, Clone)]
pub struct FontResolver {
    subset_prefix: Regex,
}

impl FontResolver {
    pub fn new() -> Self {
        Self {
            subset_prefix: Regex::new(r"^[A-Z]{6}\+").expect("valid subset prefix pattern"),
        }
    }

    /// Resolve the attributes of `font`.
    ///
    /// An explicit descriptor family wins. Otherwise the base name is
    /// stripped of its subset tag (`ABCDEF+`) and split at the first comma
    /// into family and style suffix (`Arial,BoldItalic`), and bold/italic
    /// are inferred from either part. A descriptor weight of 100 or more
    /// replaces the weight; a non-zero italic angle forces italic.
    pub fn resolve(&self, font: &FontInfo) -> ResolvedFont {
        let mut weight = "normal".to_string();
        let mut style = "normal".to_string();

        let explicit_family = font
            .descriptor
            .as_ref()
            .and_then(|d| d.font_family.as_deref())
            .filter(|f| !f.is_empty());

        let family = match explicit_family {
            Some(family) => family.to_string(),
            None => {
                let name = self.strip_subset_prefix(&font.name);
                let (family, suffix) = match name.split_once(',') {
                    Some((family, suffix)) => (family, suffix),
                    None => (name, ""),
                };
                let family_lower = family.to_lowercase();
                let suffix_lower = suffix.to_lowercase();
                if family_lower.contains("bold") || suffix_lower.contains("bold") {
                    weight = "bold".to_string();
                }
                if family_lower.contains("italic") || suffix_lower.contains("italic") {
                    style = "italic".to_string();
                }
                family.to_string()
            }
        };

        if let Some(descriptor) = &font.descriptor {
            if descriptor.font_weight >= 100.0 {
                weight = format_float(descriptor.font_weight);
            }
            if descriptor.italic_angle != 0.0 {
                style = "italic".to_string();
            }
        }

        ResolvedFont {
            family,
            weight,
            style,
        }
    }

    /// Remove a six-letter subset tag, if any.
    pub fn strip_subset_prefix<'a>(&self, name: &'a str) -> &'a str {
        match self.subset_prefix.find(name) {
            Some(m) => &name[m.end()..],
            None => name,
        }
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FontDescriptor;

    #[test]
    fn test_subset_prefix_and_style_suffix() {
        let resolver = FontResolver::new();
        let font = FontInfo::new("ABCDEF+Arial,BoldItalic");
        let resolved = resolver.resolve(&font);
        assert_eq!(resolved.family, "Arial");
        assert_eq!(resolved.weight, "bold");
        assert_eq!(resolved.style, "italic");
    }

    #[test]
    fn test_plain_name() {
        let resolved = FontResolver::new().resolve(&FontInfo::new("Helvetica"));
        assert_eq!(
            resolved,
            ResolvedFont {
                family: "Helvetica".to_string(),
                weight: "normal".to_string(),
                style: "normal".to_string(),
            }
        );
    }

    #[test]
    fn test_bold_in_family_name() {
        let resolved = FontResolver::new().resolve(&FontInfo::new("XYZABC+Helvetica-Bold"));
        assert_eq!(resolved.family, "Helvetica-Bold");
        assert_eq!(resolved.weight, "bold");
    }

    #[test]
    fn test_lowercase_prefix_is_not_a_subset_tag() {
        let resolver = FontResolver::new();
        assert_eq!(resolver.strip_subset_prefix("abcdef+Arial"), "abcdef+Arial");
        assert_eq!(resolver.strip_subset_prefix("ABCDE+Arial"), "ABCDE+Arial");
        assert_eq!(resolver.strip_subset_prefix("QWERTY+Arial"), "Arial");
    }

    #[test]
    fn test_descriptor_family_and_metrics() {
        let font = FontInfo::new("ABCDEF+Whatever,Bold").with_descriptor(FontDescriptor {
            font_family: Some("Times".to_string()),
            font_weight: 700.0,
            italic_angle: -12.0,
        });
        let resolved = FontResolver::new().resolve(&font);
        assert_eq!(resolved.family, "Times");
        assert_eq!(resolved.weight, "700.0");
        assert_eq!(resolved.style, "italic");
    }

    #[test]
    fn test_small_descriptor_weight_is_ignored() {
        let font = FontInfo::new("Arial,Bold").with_descriptor(FontDescriptor {
            font_family: None,
            font_weight: 0.0,
            italic_angle: 0.0,
        });
        let resolved = FontResolver::new().resolve(&font);
        assert_eq!(resolved.weight, "bold");
        assert_eq!(resolved.style, "normal");
    }
}
