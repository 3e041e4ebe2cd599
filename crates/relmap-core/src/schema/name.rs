#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    /// Splits `src` into lowercase words. Accepts `snake_case` and
    /// `UpperCamelCase` input.
    pub fn new(src: &str) -> Self {
        let mut parts = vec![];
        let mut current = String::new();

        for ch in src.chars() {
            if ch == '_' || ch == ' ' || ch == '-' {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            } else if ch.is_uppercase() {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
                current.extend(ch.to_lowercase());
            } else {
                current.push(ch);
            }
        }

        if !current.is_empty() {
            parts.push(current);
        }

        Self { parts }
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    pub fn upper_camel_case(&self) -> String {
        self.parts
            .iter()
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.upper_camel_case())
    }
}
