/// What kind of value a column holds. Drives display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Date,
    Text,
    Currency,
}

/// The fixed column set of the ledger, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Date,
    Category,
    Shop,
    Description,
    Value,
}

impl Column {
    /// Internal key, used as the header cell in the ledger file.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "Datum",
            Self::Category => "Kategorie",
            Self::Shop => "Geschäft",
            Self::Description => "Ausgabe",
            Self::Value => "Wert",
        }
    }

    /// User-facing header text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Datum",
            Self::Category => "Kategorie",
            Self::Shop => "Geschäft",
            Self::Description => "Beschreibung",
            Self::Value => "Betrag",
        }
    }

    pub fn kind(&self) -> ColumnType {
        match self {
            Self::Date => ColumnType::Date,
            Self::Value => ColumnType::Currency,
            Self::Category | Self::Shop | Self::Description => ColumnType::Text,
        }
    }

    pub fn all() -> &'static [Column] {
        &[
            Self::Date,
            Self::Category,
            Self::Shop,
            Self::Description,
            Self::Value,
        ]
    }

    /// Column at a 0-based display position.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Match a header cell or user input against key or label (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all().iter().copied().find(|c| {
            c.key().to_lowercase() == lower || c.label().to_lowercase() == lower
        })
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
