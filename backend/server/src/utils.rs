use crate::error::AppError;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_TAGS: usize = 32;
pub const UNTITLED: &str = "Untitled";

pub fn clean_title(title: &str) -> Result<String, AppError> {
    let title = collapse(title);

    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::MalformedPayload("title too long"));
    }

    Ok(if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    })
}

pub fn clean_folder(folder: Option<&str>) -> Option<String> {
    folder.map(collapse).filter(|folder| !folder.is_empty())
}

/// Lowercased, deduplicated, order of first appearance kept.
pub fn clean_tags(tags: &[String]) -> Result<Vec<String>, AppError> {
    let mut cleaned: Vec<String> = Vec::new();

    for tag in tags {
        let tag = collapse(tag).to_lowercase();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }

    if cleaned.len() > MAX_TAGS {
        return Err(AppError::MalformedPayload("too many tags"));
    }

    Ok(cleaned)
}

fn collapse(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title() {
        assert_eq!(clean_title("  Groceries  ").unwrap(), "Groceries");
        assert_eq!(clean_title("two   words").unwrap(), "two words");
        assert_eq!(clean_title("   ").unwrap(), UNTITLED);
        assert!(clean_title(&"x".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_folder() {
        assert_eq!(clean_folder(Some(" Work ")), Some("Work".to_string()));
        assert_eq!(clean_folder(Some("  ")), None);
        assert_eq!(clean_folder(None), None);
    }

    #[test]
    fn test_tags() {
        let tags = vec![
            "Rust".to_string(),
            " rust ".to_string(),
            "".to_string(),
            "web  dev".to_string(),
        ];

        assert_eq!(clean_tags(&tags).unwrap(), vec!["rust", "web dev"]);
    }

    #[test]
    fn test_too_many_tags() {
        let tags: Vec<String> = (0..=MAX_TAGS).map(|i| format!("tag{i}")).collect();

        assert!(clean_tags(&tags).is_err());
    }
}
