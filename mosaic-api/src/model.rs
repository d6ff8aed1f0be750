//! ComponentModel - items plus layout and interaction configuration.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de::{
    default_true, lenient_bool, lenient_bool_or_true, lenient_f32, lenient_opt_string,
    lenient_usize, null_as_default,
};
use crate::error::{ModelError, type_name};
use crate::geometry::{Insets, Size};
use crate::item::Item;

/// Rendering strategy for a component.
///
/// Unknown kind strings decode as [`ComponentKind::List`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    #[default]
    List,
    Grid,
    Carousel,
    Row,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::List => "list",
            ComponentKind::Grid => "grid",
            ComponentKind::Carousel => "carousel",
            ComponentKind::Row => "row",
        }
    }
}

impl From<String> for ComponentKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => ComponentKind::Grid,
            "carousel" => ComponentKind::Carousel,
            "row" => ComponentKind::Row,
            _ => ComponentKind::List,
        }
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a paging carousel draws its page indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageIndicatorPlacement {
    Below,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollDirection {
    Horizontal,
    #[default]
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Paginate {
    #[default]
    Disabled,
    ByPage,
    ByItem,
}

/// Layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Fixed column count for grids/rows, items per screen for carousels.
    /// Zero means "let the content decide".
    #[serde(default, deserialize_with = "lenient_usize")]
    pub span: usize,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub dynamic_span: bool,
    /// Derive height from content instead of `ComponentModel::size`.
    #[serde(default = "default_true", deserialize_with = "lenient_bool_or_true")]
    pub dynamic_height: bool,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub item_spacing: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub line_spacing: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inset: Insets,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub infinite_scrolling: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_indicator_placement: Option<PageIndicatorPlacement>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            span: 0,
            dynamic_span: false,
            dynamic_height: true,
            item_spacing: 0.0,
            line_spacing: 0.0,
            inset: Insets::ZERO,
            infinite_scrolling: false,
            page_indicator_placement: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Interaction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scroll_direction: ScrollDirection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paginate: Paginate,
}

/// The data description of a component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentModel {
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub identifier: Option<String>,
    #[serde(default, alias = "type", deserialize_with = "null_as_default")]
    pub kind: ComponentKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Item>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub layout: LayoutConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interaction: Interaction,
    /// Authoritative height when `layout.dynamic_height` is off.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: Size,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub meta: IndexMap<String, Value>,
}

impl ComponentModel {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Decode a model from a key-value document. Item indexes are assigned
    /// from document order.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        if !value.is_object() {
            return Err(ModelError::Shape {
                expected: "component",
                found: type_name(value),
            });
        }
        let mut model: ComponentModel = serde_json::from_value(value.clone())?;
        model.refresh_indexes();
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self.refresh_indexes();
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_header(mut self, header: Item) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_footer(mut self, footer: Item) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Item at a position, `None` when out of range.
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Assign `index = position` to every item in one pass.
    pub fn refresh_indexes(&mut self) {
        for (position, item) in self.items.iter_mut().enumerate() {
            item.index = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_layout_and_interaction() {
        let model = ComponentModel::from_value(&json!({
            "kind": "carousel",
            "items": [{"title": "a"}, {"title": "b"}],
            "layout": {
                "span": 2,
                "dynamic-height": false,
                "item-spacing": 8,
                "inset": {"top": 10, "bottom": 12},
                "infinite-scrolling": true,
                "page-indicator-placement": "overlay"
            },
            "interaction": {"scroll-direction": "horizontal", "paginate": "by-item"},
            "size": {"height": 180}
        }))
        .unwrap();

        assert_eq!(model.kind, ComponentKind::Carousel);
        assert_eq!(model.layout.span, 2);
        assert!(!model.layout.dynamic_height);
        assert_eq!(model.layout.item_spacing, 8.0);
        assert_eq!(model.layout.inset.vertical(), 22.0);
        assert!(model.layout.infinite_scrolling);
        assert_eq!(
            model.layout.page_indicator_placement,
            Some(PageIndicatorPlacement::Overlay)
        );
        assert_eq!(model.interaction.scroll_direction, ScrollDirection::Horizontal);
        assert_eq!(model.interaction.paginate, Paginate::ByItem);
        assert_eq!(model.size.height, 180.0);
    }

    #[test]
    fn test_defaults_when_document_is_empty() {
        let model = ComponentModel::from_json("{}").unwrap();
        assert_eq!(model.kind, ComponentKind::List);
        assert!(model.layout.dynamic_height);
        assert!(model.items.is_empty());
        assert_eq!(model.interaction, Interaction::default());
    }

    #[test]
    fn test_unknown_kind_falls_back_to_list() {
        let model = ComponentModel::from_value(&json!({"kind": "mosaic"})).unwrap();
        assert_eq!(model.kind, ComponentKind::List);

        let typed = ComponentModel::from_value(&json!({"type": "grid"})).unwrap();
        assert_eq!(typed.kind, ComponentKind::Grid);
    }

    #[test]
    fn test_decoding_assigns_indexes() {
        let model = ComponentModel::from_value(&json!({
            "items": [{"title": "a", "index": 7}, {"title": "b", "index": 7}]
        }))
        .unwrap();
        let indexes: Vec<usize> = model.items.iter().map(|i| i.index).collect();
        assert_eq!(indexes, vec![0, 1]);
    }

    #[test]
    fn test_refresh_indexes_preserves_order() {
        let mut model = ComponentModel::new(ComponentKind::List)
            .with_items(vec![Item::new("a"), Item::new("b"), Item::new("c")]);
        model.items.swap(0, 2);
        model.refresh_indexes();

        let titles: Vec<&str> = model.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b", "a"]);
        for (position, item) in model.items.iter().enumerate() {
            assert_eq!(item.index, position);
        }
    }

    #[test]
    fn test_nested_children_decode() {
        let model = ComponentModel::from_value(&json!({
            "items": [{
                "title": "outer",
                "children": [{"kind": "carousel", "items": [{"title": "inner"}]}]
            }]
        }))
        .unwrap();
        let outer = model.item(0).unwrap();
        assert!(outer.is_composite());
        assert_eq!(outer.children[0].kind, ComponentKind::Carousel);
        assert_eq!(outer.children[0].items[0].title, "inner");
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let model = ComponentModel::new(ComponentKind::Grid)
            .with_items(vec![
                Item::new("a").with_size(Size::new(100.5, 44.25)),
                Item::new("b").with_meta("flag", true),
            ])
            .with_header(Item::new("header"))
            .with_size(Size::new(320.0, 240.0));

        let json = serde_json::to_string(&model).unwrap();
        let decoded = ComponentModel::from_json(&json).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(ComponentModel::from_json("[]").is_err());
        assert!(ComponentModel::from_json("{\"items\": 3}").is_err());
        assert!(ComponentModel::from_json("not json").is_err());
    }
}
