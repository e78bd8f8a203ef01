use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of UI element kinds a user can place on a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentToken {
    Label,
    Input,
    Checkbox,
    Button,
    Table,
}

impl ComponentToken {
    /// All tokens in palette order.
    pub const ALL: [ComponentToken; 5] = [
        ComponentToken::Label,
        ComponentToken::Input,
        ComponentToken::Checkbox,
        ComponentToken::Button,
        ComponentToken::Table,
    ];

    /// Identifier stored in placed items and persisted documents.
    pub fn id(self) -> &'static str {
        match self {
            ComponentToken::Label => "Label",
            ComponentToken::Input => "Input",
            ComponentToken::Checkbox => "Checkbox",
            ComponentToken::Button => "Button",
            ComponentToken::Table => "Table",
        }
    }

    /// Caption shown on the draggable palette row.
    pub fn caption(self) -> &'static str {
        match self {
            ComponentToken::Label => "Label Component",
            ComponentToken::Input => "Input Box Component",
            ComponentToken::Checkbox => "Checkbox Component",
            ComponentToken::Button => "Button Component",
            ComponentToken::Table => "Table Component",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|token| token.id() == id)
    }
}

impl fmt::Display for ComponentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One placed instance of a component, referenced by identifier.
///
/// The identifier is kept as a plain string so layouts read back from a store
/// survive even when they name a token this build does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: String,
}

impl PlacedItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn token(&self) -> Option<ComponentToken> {
        ComponentToken::from_id(&self.id)
    }
}

impl From<ComponentToken> for PlacedItem {
    fn from(token: ComponentToken) -> Self {
        Self::new(token.id())
    }
}

/// The ordered sequence of placed items being edited.
///
/// Insertion order is both the display order and the publish order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    items: Vec<PlacedItem>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: PlacedItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedItem> {
        self.items.iter()
    }
}

impl From<Vec<PlacedItem>> for Layout {
    fn from(items: Vec<PlacedItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<PlacedItem> for Layout {
    fn from_iter<I: IntoIterator<Item = PlacedItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a PlacedItem;
    type IntoIter = std::slice::Iter<'a, PlacedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A persisted, named snapshot of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedLayout {
    pub name: String,
    pub layout: Layout,
}

/// Body of one stored layout document: `{ "layout": [ { "id": ... } ] }`.
///
/// `name` is only written when the storage key cannot hold the name itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub layout: Layout,
}

impl LayoutDocument {
    pub fn named(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: Some(name.into()),
            layout,
        }
    }
}

impl From<Layout> for LayoutDocument {
    fn from(layout: Layout) -> Self {
        Self { name: None, layout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_ids_round_trip_through_from_id() {
        for token in ComponentToken::ALL {
            assert_eq!(ComponentToken::from_id(token.id()), Some(token));
        }
        assert_eq!(ComponentToken::from_id("Slider"), None);
        assert_eq!(ComponentToken::from_id("label"), None);
    }

    #[test]
    fn test_palette_captions() {
        assert_eq!(ComponentToken::Input.caption(), "Input Box Component");
        assert_eq!(ComponentToken::Table.caption(), "Table Component");
    }

    #[test]
    fn test_layout_keeps_insertion_order_and_duplicates() {
        let mut layout = Layout::new();
        layout.push(ComponentToken::Button.into());
        layout.push(ComponentToken::Label.into());
        layout.push(ComponentToken::Button.into());

        let ids: Vec<&str> = layout.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["Button", "Label", "Button"]);
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn test_document_json_shape() {
        let layout: Layout = vec![PlacedItem::new("Label"), PlacedItem::new("Button")].into();
        let json = serde_json::to_value(LayoutDocument::from(layout)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "layout": [ { "id": "Label" }, { "id": "Button" } ] })
        );
    }

    #[test]
    fn test_document_keeps_unknown_ids() {
        let doc: LayoutDocument =
            serde_json::from_str(r#"{ "layout": [ { "id": "Slider" } ] }"#).unwrap();
        assert_eq!(doc.layout.items()[0].id, "Slider");
        assert_eq!(doc.layout.items()[0].token(), None);
    }

    #[test]
    fn test_document_without_layout_field_is_empty() {
        let doc: LayoutDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.layout.is_empty());
        assert_eq!(doc.name, None);
    }

    #[test]
    fn test_named_document_carries_name() {
        let doc = LayoutDocument::named("form", Layout::new());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "form", "layout": [] }));
    }
}
