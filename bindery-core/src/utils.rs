//! Utility functions for the binding layer
//!
//! Naming helpers used to derive relationship names from route parameters
//! and to render diagnostics.

/// Naming convention utilities
pub mod naming {
    /// Converts an identifier to camelCase.
    ///
    /// Separators (`_`, `-`, spaces) are dropped and the following character
    /// is upper-cased; the first character is always lower-cased, so
    /// `Comment` becomes `comment`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_core::utils::naming::to_camel_case;
    ///
    /// assert_eq!(to_camel_case("comment"), "comment");
    /// assert_eq!(to_camel_case("blog_post"), "blogPost");
    /// assert_eq!(to_camel_case("team-member"), "teamMember");
    /// assert_eq!(to_camel_case("UserProfile"), "userProfile");
    /// assert_eq!(to_camel_case(""), "");
    /// ```
    pub fn to_camel_case(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut upper_next = false;

        for ch in s.chars() {
            if matches!(ch, '_' | '-' | ' ') {
                upper_next = !result.is_empty();
                continue;
            }

            if result.is_empty() {
                result.extend(ch.to_lowercase());
            } else if upper_next {
                result.extend(ch.to_uppercase());
            } else {
                result.push(ch);
            }
            upper_next = false;
        }

        result
    }

    /// Irregular English plurals, checked before the suffix rules.
    const IRREGULAR: &[(&str, &str)] = &[
        ("person", "people"),
        ("child", "children"),
        ("man", "men"),
        ("woman", "women"),
        ("mouse", "mice"),
        ("goose", "geese"),
        ("foot", "feet"),
        ("tooth", "teeth"),
        ("ox", "oxen"),
    ];

    /// Nouns with identical singular and plural forms.
    const UNCOUNTABLE: &[&str] = &[
        "data",
        "equipment",
        "information",
        "media",
        "metadata",
        "news",
        "series",
        "sheep",
        "species",
    ];

    /// Nouns ending in `-f`/`-fe` whose plural is `-ves`; all others take `-s`.
    const F_TO_VES: &[&str] = &[
        "calf", "elf", "half", "knife", "leaf", "life", "loaf", "self", "sheaf", "shelf", "thief",
        "wife", "wolf",
    ];

    /// Pluralizes the trailing word of an identifier.
    ///
    /// Only the last word is inflected, so camelCase relation names keep
    /// their prefix: `blogPost` becomes `blogPosts`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_core::utils::naming::pluralize;
    ///
    /// assert_eq!(pluralize("comment"), "comments");
    /// assert_eq!(pluralize("category"), "categories");
    /// assert_eq!(pluralize("address"), "addresses");
    /// assert_eq!(pluralize("person"), "people");
    /// assert_eq!(pluralize("blogPost"), "blogPosts");
    /// ```
    pub fn pluralize(word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }

        // camelCase: 只对最后一个单词做变形
        let split = word
            .char_indices()
            .filter(|(_, c)| c.is_uppercase())
            .map(|(i, _)| i)
            .last()
            .unwrap_or(0);
        let (prefix, last) = word.split_at(split);
        let lower = last.to_lowercase();

        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }

        if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
            let mut inflected = String::with_capacity(prefix.len() + plural.len());
            inflected.push_str(prefix);
            if last.starts_with(char::is_uppercase) {
                let mut chars = plural.chars();
                if let Some(first) = chars.next() {
                    inflected.extend(first.to_uppercase());
                    inflected.push_str(chars.as_str());
                }
            } else {
                inflected.push_str(plural);
            }
            return inflected;
        }

        let ends_with_consonant_y = lower.ends_with('y')
            && lower
                .chars()
                .rev()
                .nth(1)
                .is_some_and(|c| !"aeiou".contains(c));

        if ends_with_consonant_y {
            format!("{}ies", &word[..word.len() - 1])
        } else if F_TO_VES.contains(&lower.as_str()) {
            let stem = lower.strip_suffix("fe").or_else(|| lower.strip_suffix('f')).unwrap_or(lower.as_str());
            format!("{}ves", &word[..word.len() - (lower.len() - stem.len())])
        } else if ends_with_single_vowel_z(&lower) {
            format!("{}zes", word)
        } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
            format!("{}es", word)
        } else {
            format!("{}s", word)
        }
    }

    /// `quiz` and `fez` double their trailing `z`.
    fn ends_with_single_vowel_z(lower: &str) -> bool {
        let mut tail = lower.chars().rev();
        let is_vowel = |c: char| "aeiou".contains(c);
        matches!(
            (tail.next(), tail.next(), tail.next()),
            (Some('z'), Some(v), Some(c)) if is_vowel(v) && (!is_vowel(c) || c == 'u')
        )
    }

    /// Renders a 1-based position as an English ordinal.
    ///
    /// # Examples
    ///
    /// ```
    /// use bindery_core::utils::naming::ordinalize;
    ///
    /// assert_eq!(ordinalize(1), "1st");
    /// assert_eq!(ordinalize(2), "2nd");
    /// assert_eq!(ordinalize(11), "11th");
    /// assert_eq!(ordinalize(23), "23rd");
    /// ```
    pub fn ordinalize(n: usize) -> String {
        let suffix = match (n % 10, n % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        format!("{}{}", n, suffix)
    }
}
