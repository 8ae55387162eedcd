//! The static widget catalog.
//!
//! A [`WidgetEntry`] describes one widget the dashboard can show: identity,
//! display name, icon, default visibility, preferred spans, and display
//! priority. Entries are defined at startup and immutable thereafter; the
//! grid engine never inspects widget content, only these descriptors.
//!
//! A layout may reference an id the catalog no longer carries (a widget was
//! retired). The orchestrator skips rendering such items but leaves their
//! stored coordinates untouched, so a reintroduced widget reappears where
//! it was.

/// Static descriptor for one dashboard widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEntry {
    /// Stable identifier, used as the layout item id.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Icon name, resolved by the rendering layer.
    pub icon: String,
    /// Whether the widget is shown before any user customization.
    pub default_visible: bool,
    /// Preferred column span when synthesizing a layout.
    pub col_span: u32,
    /// Preferred row span when synthesizing a layout.
    pub row_span: u32,
    /// Display priority; higher sorts first.
    pub priority: u32,
}

impl WidgetEntry {
    /// Create a visible, single-cell entry.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            default_visible: true,
            col_span: 1,
            row_span: 1,
            priority: 0,
        }
    }

    /// Set the preferred spans (builder pattern). Zero is raised to 1.
    #[must_use]
    pub fn span(mut self, cols: u32, rows: u32) -> Self {
        self.col_span = cols.max(1);
        self.row_span = rows.max(1);
        self
    }

    /// Set the display priority (builder pattern).
    #[must_use]
    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Hide the widget until the user opts in (builder pattern).
    #[must_use]
    pub fn hidden_by_default(mut self) -> Self {
        self.default_visible = false;
        self
    }
}

/// An immutable, ordered collection of widget descriptors.
#[derive(Debug, Clone, Default)]
pub struct WidgetCatalog {
    entries: Vec<WidgetEntry>,
}

impl WidgetCatalog {
    /// Build a catalog from entries. Later duplicates of an id are dropped.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = WidgetEntry>) -> Self {
        let mut seen: Vec<String> = Vec::new();
        let entries = entries
            .into_iter()
            .filter(|e| {
                if seen.iter().any(|id| id == &e.id) {
                    false
                } else {
                    seen.push(e.id.clone());
                    true
                }
            })
            .collect();
        Self { entries }
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WidgetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Whether the catalog knows this id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ids of entries visible before any customization, in catalog order.
    #[must_use]
    pub fn default_visible_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.default_visible)
            .map(|e| e.id.clone())
            .collect()
    }

    /// All entries, highest priority first.
    #[must_use]
    pub fn by_priority(&self) -> Vec<&WidgetEntry> {
        let mut sorted: Vec<&WidgetEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &WidgetEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in market dashboard catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new([
            WidgetEntry::new("market-overview", "Market Overview", "trending-up")
                .span(2, 1)
                .priority(100),
            WidgetEntry::new("token-search", "Token Search", "coins").priority(90),
            WidgetEntry::new("news-feed", "News Feed", "clock").priority(75),
            WidgetEntry::new("price-chart", "Price Chart", "line-chart")
                .span(2, 1)
                .priority(95),
            WidgetEntry::new("top-movers", "Top Movers", "zap").priority(70),
            WidgetEntry::new("stock-financials", "Stock Financials", "dollar-sign")
                .span(2, 1)
                .priority(65),
            WidgetEntry::new("volume-volatility", "Volume & Volatility", "bar-chart-2")
                .priority(60),
            WidgetEntry::new("ai-insights", "AI/ML Insights", "brain").priority(55),
            WidgetEntry::new("economic-calendar", "Economic Calendar", "calendar").priority(50),
            WidgetEntry::new("watchlist", "Watchlist", "list").span(2, 1).priority(45),
            WidgetEntry::new("alerts", "Alerts", "bell").priority(40),
            WidgetEntry::new("discussion-trends", "Discussion Trends", "message-circle")
                .priority(35),
            WidgetEntry::new("portfolio-snapshot", "Portfolio Snapshot", "briefcase")
                .priority(30),
            WidgetEntry::new("developer-activity", "Developer Activity", "code").priority(25),
        ])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
