#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Database,
    Schema,
    Table,
    Column,
    BusinessMetric,
    BusinessTerm,
    Concept,
    Document,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeClass {
    Hub,
    Leaf,
}

impl SizeClass {
    /// Hub when any label names a hub category, not just the first one.
    pub fn for_labels(labels: &[String]) -> Self {
        if labels
            .iter()
            .any(|label| Category::from_label(label).size_class() == Self::Hub)
        {
            Self::Hub
        } else {
            Self::Leaf
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            Self::Hub => 25.0,
            Self::Leaf => 15.0,
        }
    }
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Database,
        Self::Schema,
        Self::Table,
        Self::Column,
        Self::BusinessMetric,
        Self::BusinessTerm,
        Self::Concept,
        Self::Document,
        Self::Other,
    ];

    pub fn from_label(label: &str) -> Self {
        let normalized = label
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "database" => Self::Database,
            "schema" => Self::Schema,
            "table" => Self::Table,
            "column" => Self::Column,
            "businessmetric" | "metric" => Self::BusinessMetric,
            "businessterm" | "term" => Self::BusinessTerm,
            "concept" => Self::Concept,
            "document" => Self::Document,
            _ => Self::Other,
        }
    }

    /// Only the first label decides the category; the rest are shown as-is in details.
    pub fn from_labels(labels: &[String]) -> Self {
        labels
            .first()
            .map(|label| Self::from_label(label))
            .unwrap_or(Self::Other)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Database => "Database",
            Self::Schema => "Schema",
            Self::Table => "Table",
            Self::Column => "Column",
            Self::BusinessMetric => "BusinessMetric",
            Self::BusinessTerm => "BusinessTerm",
            Self::Concept => "Concept",
            Self::Document => "Document",
            Self::Other => "Other",
        }
    }

    pub fn size_class(self) -> SizeClass {
        match self {
            Self::Table | Self::BusinessMetric => SizeClass::Hub,
            _ => SizeClass::Leaf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_label_wins() {
        let labels = vec!["Column".to_owned(), "Table".to_owned()];
        assert_eq!(Category::from_labels(&labels), Category::Column);
    }

    #[test]
    fn size_follows_any_hub_label() {
        let labels = vec!["Column".to_owned(), "Table".to_owned()];
        assert_eq!(SizeClass::for_labels(&labels), SizeClass::Hub);
        assert_eq!(SizeClass::for_labels(&["Column".to_owned()]), SizeClass::Leaf);
        assert_eq!(SizeClass::for_labels(&[]), SizeClass::Leaf);
    }

    #[test]
    fn unknown_and_missing_labels_fall_back() {
        assert_eq!(Category::from_label("Widget"), Category::Other);
        assert_eq!(Category::from_labels(&[]), Category::Other);
    }

    #[test]
    fn label_matching_ignores_case_and_separators() {
        assert_eq!(
            Category::from_label("business_metric"),
            Category::BusinessMetric
        );
        assert_eq!(Category::from_label("TABLE"), Category::Table);
    }

    #[test]
    fn hubs_are_larger() {
        assert_eq!(Category::Table.size_class().radius(), 25.0);
        assert_eq!(Category::BusinessMetric.size_class().radius(), 25.0);
        for category in Category::ALL {
            if !matches!(category, Category::Table | Category::BusinessMetric) {
                assert_eq!(category.size_class().radius(), 15.0, "{category:?}");
            }
        }
    }
}
