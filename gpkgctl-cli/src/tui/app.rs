//! Application state and selection management.
//!
//! The catalog is read-only after load; all state here is which rows are
//! selected. The two list panes are linked: moving the table selection
//! reloads the fields pane with that table's fields and resets its
//! selection.

use gpkgctl_core::{Field, FieldDetail, SchemaCatalog, Table};

/// Input mode for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigation mode - move selections, switch panes
    #[default]
    Normal,
    /// Filter input active for the focused pane
    Filter,
}

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Tables,
    Fields,
}

/// Main application state
pub struct App {
    catalog: SchemaCatalog,
    /// Current input mode
    pub mode: Mode,
    /// Which pane is focused
    pub focused: Pane,
    /// Filter input; non-empty only while in filter mode
    pub filter_input: String,
    /// Selected row in the tables pane (index into the visible list)
    pub table_index: usize,
    /// Selected row in the fields pane (index into the visible list)
    pub field_index: usize,
    /// Show the detail pane
    pub show_detail: bool,
    /// Status message (shown in the status bar)
    pub status_message: Option<String>,
}

impl App {
    pub fn new(catalog: SchemaCatalog) -> Self {
        Self {
            catalog,
            mode: Mode::Normal,
            focused: Pane::Tables,
            filter_input: String::new(),
            table_index: 0,
            field_index: 0,
            show_detail: true,
            status_message: None,
        }
    }

    /// Tables visible in the tables pane, narrowed by the filter when the
    /// pane is focused and filtering.
    pub fn visible_tables(&self) -> Vec<&Table> {
        let filter = self.pane_filter(Pane::Tables);
        self.catalog
            .tables()
            .iter()
            .filter(|t| matches(&t.name, filter))
            .collect()
    }

    /// Fields of the selected table, in source order, narrowed by the
    /// filter when the fields pane is focused and filtering.
    pub fn visible_fields(&self) -> Vec<&Field> {
        let filter = self.pane_filter(Pane::Fields);
        self.selected_table()
            .map(|t| {
                t.fields
                    .iter()
                    .filter(|f| matches(&f.name, filter))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn pane_filter(&self, pane: Pane) -> Option<&str> {
        (self.focused == pane && !self.filter_input.is_empty())
            .then_some(self.filter_input.as_str())
    }

    pub fn selected_table(&self) -> Option<&Table> {
        self.visible_tables().get(self.table_index).copied()
    }

    pub fn selected_field(&self) -> Option<&Field> {
        self.visible_fields().get(self.field_index).copied()
    }

    /// Cross-reference for the current selection.
    pub fn detail(&self) -> Option<FieldDetail<'_>> {
        let table = self.selected_table()?.name.clone();
        let field = self.selected_field()?.name.clone();
        self.catalog.describe(&table, &field)
    }

    /// Select the next row in the focused pane.
    pub fn select_next(&mut self) {
        match self.focused {
            Pane::Tables => {
                let len = self.visible_tables().len();
                if len > 0 {
                    self.table_index = (self.table_index + 1) % len;
                    // Linked panes: a new table gets a fresh field selection.
                    self.field_index = 0;
                }
            }
            Pane::Fields => {
                let len = self.visible_fields().len();
                if len > 0 {
                    self.field_index = (self.field_index + 1) % len;
                }
            }
        }
    }

    /// Select the previous row in the focused pane.
    pub fn select_prev(&mut self) {
        match self.focused {
            Pane::Tables => {
                let len = self.visible_tables().len();
                if len > 0 {
                    self.table_index = self
                        .table_index
                        .checked_sub(1)
                        .unwrap_or(len - 1);
                    self.field_index = 0;
                }
            }
            Pane::Fields => {
                let len = self.visible_fields().len();
                if len > 0 {
                    self.field_index = self
                        .field_index
                        .checked_sub(1)
                        .unwrap_or(len - 1);
                }
            }
        }
    }

    pub fn select_first(&mut self) {
        match self.focused {
            Pane::Tables => {
                self.table_index = 0;
                self.field_index = 0;
            }
            Pane::Fields => self.field_index = 0,
        }
    }

    pub fn select_last(&mut self) {
        match self.focused {
            Pane::Tables => {
                self.table_index = self.visible_tables().len().saturating_sub(1);
                self.field_index = 0;
            }
            Pane::Fields => {
                self.field_index = self.visible_fields().len().saturating_sub(1);
            }
        }
    }

    pub fn focus(&mut self, pane: Pane) {
        self.focused = pane;
    }

    pub fn toggle_pane(&mut self) {
        self.focused = match self.focused {
            Pane::Tables => Pane::Fields,
            Pane::Fields => Pane::Tables,
        };
    }

    pub fn enter_filter(&mut self) {
        self.mode = Mode::Filter;
        self.filter_input.clear();
        match self.focused {
            Pane::Tables => {
                self.table_index = 0;
                self.field_index = 0;
            }
            Pane::Fields => self.field_index = 0,
        }
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_input.push(c);
        self.select_first();
    }

    pub fn filter_pop(&mut self) {
        self.filter_input.pop();
        self.select_first();
    }

    /// Accept the filter: keep the highlighted row selected, then drop the
    /// narrowing so the full list shows again.
    pub fn commit_filter(&mut self) {
        match self.focused {
            Pane::Tables => {
                let name = self.selected_table().map(|t| t.name.clone());
                self.filter_input.clear();
                self.table_index = name
                    .and_then(|name| {
                        self.catalog.tables().iter().position(|t| t.name == name)
                    })
                    .unwrap_or(0);
                self.field_index = 0;
            }
            Pane::Fields => {
                let name = self.selected_field().map(|f| f.name.clone());
                self.filter_input.clear();
                self.field_index = name
                    .and_then(|name| {
                        self.selected_table()
                            .and_then(|t| t.fields.iter().position(|f| f.name == name))
                    })
                    .unwrap_or(0);
            }
        }
        self.mode = Mode::Normal;
    }

    /// Cancel the filter: drop the narrowing and reset the pane selection.
    pub fn cancel_filter(&mut self) {
        self.filter_input.clear();
        self.select_first();
        self.mode = Mode::Normal;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

fn matches(name: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) => name.to_ascii_lowercase().contains(&filter.to_ascii_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpkgctl_core::{CodedValue, Domain, DomainKind, FieldType, TableKind};

    fn field(name: &str, domain: Option<&str>) -> Field {
        Field {
            name: name.into(),
            alias: None,
            field_type: FieldType::Text,
            length: None,
            nullable: true,
            editable: true,
            default: None,
            domain: domain.map(String::from),
        }
    }

    fn app() -> App {
        let tables = vec![
            Table {
                name: "parks".into(),
                kind: TableKind::Features,
                identifier: None,
                description: None,
                fields: vec![
                    field("name", None),
                    field("status", Some("park_status")),
                    field("area", None),
                ],
            },
            Table {
                name: "trails".into(),
                kind: TableKind::Features,
                identifier: None,
                description: None,
                fields: vec![field("surface", None)],
            },
        ];
        let domains = vec![Domain {
            name: "park_status".into(),
            kind: DomainKind::Coded {
                values: vec![CodedValue {
                    code: "O".into(),
                    label: "Open".into(),
                }],
            },
        }];
        App::new(SchemaCatalog::new(tables, domains))
    }

    #[test]
    fn fields_pane_follows_table_selection_in_source_order() {
        let mut app = app();
        let names: Vec<&str> = app.visible_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "status", "area"]);

        app.focus(Pane::Fields);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_field().unwrap().name, "area");

        // Moving the table selection resets the linked field selection.
        app.focus(Pane::Tables);
        app.select_next();
        assert_eq!(app.selected_table().unwrap().name, "trails");
        assert_eq!(app.field_index, 0);
        let names: Vec<&str> = app.visible_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["surface"]);
    }

    #[test]
    fn selection_wraps_around() {
        let mut app = app();
        app.select_prev();
        assert_eq!(app.selected_table().unwrap().name, "trails");
        app.select_next();
        assert_eq!(app.selected_table().unwrap().name, "parks");
    }

    #[test]
    fn detail_has_domain_only_for_constrained_fields() {
        let mut app = app();
        app.focus(Pane::Fields);
        assert!(app.detail().unwrap().domain.is_none());

        app.select_next(); // status
        let detail = app.detail().unwrap();
        assert_eq!(detail.domain.unwrap().name, "park_status");
        assert_eq!(detail.coded_values().unwrap()[0].label, "Open");
    }

    #[test]
    fn filter_narrows_and_commit_keeps_selection() {
        let mut app = app();
        app.enter_filter();
        app.filter_push('t');
        app.filter_push('r');
        let names: Vec<&str> = app.visible_tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["trails"]);

        app.commit_filter();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.visible_tables().len(), 2);
        assert_eq!(app.selected_table().unwrap().name, "trails");
    }

    #[test]
    fn filter_with_no_match_selects_nothing() {
        let mut app = app();
        app.enter_filter();
        app.filter_push('z');
        assert!(app.selected_table().is_none());
        assert!(app.detail().is_none());
        app.cancel_filter();
        assert_eq!(app.selected_table().unwrap().name, "parks");
    }
}
