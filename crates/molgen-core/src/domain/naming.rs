//! Name sanitisation and default-name derivation.
//!
//! Everything here is pure: identical inputs always produce identical
//! outputs, so prompt defaults and the config-file path agree.
//!
//! ## Derived names for a service called `blogPost`
//!
//! | Field                  | Value                  |
//! |------------------------|------------------------|
//! | `serviceFileName`      | `blog-posts.service.js`|
//! | `serviceDirectoryName` | `blog-posts`           |
//! | `modelFileName`        | `blog-post.model.js`   |
//! | `modelName`            | `BlogPost`             |
//! | `modelVariableName`    | `BlogPostModel`        |
//! | `schemaName`           | `blogPostSchema`       |
//! | `collectionName`       | `blog-posts`           |

use heck::{ToKebabCase, ToLowerCamelCase, ToUpperCamelCase};

/// Longest DNS label.
const MAX_SLUG_LEN: usize = 63;

/// Turn a human name into a filesystem- and DNS-label-safe slug.
///
/// Lowercases, maps whitespace and `_` to `-`, drops everything outside
/// `[a-z0-9-]`, collapses runs of `-` and trims them from both ends.
/// The result may be empty; callers decide whether that is an error.
pub fn sanitize_name(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.trim().chars().flat_map(char::to_lowercase) {
        let mapped = match c {
            'a'..='z' | '0'..='9' => c,
            '-' | '_' => '-',
            c if c.is_whitespace() => '-',
            _ => continue,
        };
        if mapped == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(mapped);
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// `camelCase` form of a free-form name.
pub fn to_camel_case(input: &str) -> String {
    input.trim().to_lower_camel_case()
}

/// Singular and plural forms the suffix rules get wrong.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("criterion", "criteria"),
    ("analysis", "analyses"),
    ("index", "indices"),
];

/// Words with a single form.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "fish",
    "information",
    "media",
    "news",
    "series",
    "sheep",
    "species",
];

/// English plural of the last word, leaving already-plural words alone.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return word.to_owned();
    }
    let (head, last) = split_last_word(word);
    let lower_last = last.to_lowercase();
    if UNCOUNTABLE.contains(&lower_last.as_str()) {
        return word.to_owned();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(one, _)| *one == lower_last) {
        return format!("{head}{}", with_case_of(last, plural));
    }
    if is_plural(word) || IRREGULAR.iter().any(|(_, many)| *many == lower_last) {
        return word.to_owned();
    }

    let lower = word.to_ascii_lowercase();
    if let Some(stem) = word.strip_suffix('y') {
        if !ends_with_vowel(stem) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// English singular of the last word, leaving already-singular words alone.
pub fn singularize(word: &str) -> String {
    let (head, last) = split_last_word(word);
    let lower_last = last.to_lowercase();
    if UNCOUNTABLE.contains(&lower_last.as_str()) {
        return word.to_owned();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, many)| *many == lower_last) {
        return format!("{head}{}", with_case_of(last, singular));
    }
    if !is_plural(word) || IRREGULAR.iter().any(|(one, _)| *one == lower_last) {
        return word.to_owned();
    }

    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        return format!("{}y", &word[..word.len() - 3]);
    }
    let cut = if ["sses", "xes", "zes", "ches", "shes"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        2
    } else {
        1
    };
    word[..word.len() - cut].to_owned()
}

/// Split `salesPerson` into `sales` and `Person`; separators stay in the head.
fn split_last_word(word: &str) -> (&str, &str) {
    let upper = word
        .char_indices()
        .filter(|(i, c)| *i > 0 && c.is_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    let separator = word
        .rfind(|c: char| matches!(c, '-' | '_' | ' '))
        .map_or(0, |i| i + 1);
    word.split_at(upper.max(separator))
}

/// `replacement`, capitalised when `original` starts with a capital.
fn with_case_of(original: &str, replacement: &str) -> String {
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(o), Some(first)) if o.is_uppercase() => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => replacement.to_owned(),
    }
}

fn is_plural(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    lower.len() > 1 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us")
}

fn ends_with_vowel(s: &str) -> bool {
    s.chars()
        .last()
        .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
}

/// File, directory, model and collection names derived from a service name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultNames {
    pub service_file_name: String,
    pub service_directory_name: String,
    pub model_file_name: String,
    pub model_name: String,
    pub model_variable_name: String,
    pub schema_name: String,
    pub collection_name: String,
}

impl DefaultNames {
    /// Derive every default from a (camelCase) service name.
    pub fn derive(service_name: &str) -> Self {
        let plural = pluralize(service_name);
        let singular = singularize(service_name);

        let plural_kebab = plural.to_kebab_case();
        let singular_kebab = singular.to_kebab_case();
        let model_name = singular.to_upper_camel_case();

        Self {
            service_file_name: format!("{plural_kebab}.service.js"),
            service_directory_name: plural_kebab.clone(),
            model_file_name: format!("{singular_kebab}.model.js"),
            model_variable_name: format!("{model_name}Model"),
            model_name,
            schema_name: format!("{}Schema", singular.to_lower_camel_case()),
            collection_name: plural_kebab,
        }
    }
}
