use orgchart_layout::config::parse_config;
use orgchart_layout::layout_dump::LayoutDump;
use orgchart_layout::{
    Config, Highlight, Query, compute_layout, find, parse_tree, scroll_target_for,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartOptions {
    /// Full config document, same shape as the CLI config file.
    config: Option<serde_json::Value>,
    highlight_id: Option<String>,
    search: Option<String>,
    search_field: Option<String>,
    scroll_to: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartResult {
    layout: LayoutDump,
    search_result: Option<String>,
    not_found: bool,
}

fn load_options(options_json: Option<String>) -> Result<(ChartOptions, Config), String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<ChartOptions>(&raw).map_err(|e| e.to_string())?,
        None => ChartOptions::default(),
    };
    let config = match &options.config {
        Some(value) => parse_config(&value.to_string()).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    Ok((options, config))
}

/// Lays out `tree_json`, optionally searching and targeting a node, and
/// returns the host hand-off document as JSON.
fn layout_chart(tree_json: &str, options_json: Option<String>) -> Result<String, String> {
    let (options, config) = load_options(options_json)?;
    let tree = parse_tree(tree_json, config.layout.max_depth).map_err(|e| format!("{e:#}"))?;
    let layout = compute_layout(tree.as_ref(), &config.layout, &config.viewport)
        .map_err(|e| e.to_string())?;

    let search_result = match (&tree, options.search.as_deref()) {
        (Some(root), Some(needle)) => {
            let query = match options.search_field.as_deref() {
                Some(field) => Query::field(field, needle),
                None => Query::text(needle),
            };
            find(root, |node| query.matches(node)).map(|node| node.id.clone())
        }
        _ => None,
    };
    let highlight = Highlight {
        external: options.highlight_id.clone(),
        search_result: search_result.clone(),
    };

    let target_id = options.scroll_to.clone().or_else(|| search_result.clone());
    let mut not_found = options.search.is_some() && search_result.is_none();
    let scroll = match target_id.as_deref() {
        Some(id) => match scroll_target_for(id, &layout, &config.viewport, &config.layout) {
            Ok(target) => Some(target),
            Err(_) => {
                not_found = true;
                None
            }
        },
        None => None,
    };

    let result = ChartResult {
        layout: LayoutDump::from_layout(&layout, tree.as_ref(), &highlight).with_scroll(scroll),
        search_result,
        not_found,
    };
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn layout_org_chart(tree_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    layout_chart(tree_json, options_json).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use super::layout_chart;

    const STAFF: &str = r#"[
        { "id": "e1", "fields": { "name": "Alice", "matricule": "M-1" } },
        { "id": "e2", "parentId": "e1", "fields": { "name": "Bruno", "matricule": "M-2" } },
        { "id": "e3", "parentId": "e1", "fields": { "name": "Chloe", "matricule": "M-3" } }
    ]"#;

    #[test]
    fn returns_positions_and_search_hit() {
        let out = layout_chart(
            STAFF,
            Some(r#"{ "search": "chloe", "config": { "viewport": { "width": 300 } } }"#.into()),
        )
        .expect("staff chart should lay out");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["searchResult"], "e3");
        assert_eq!(value["notFound"], false);
        assert_eq!(value["layout"]["nodes"].as_array().unwrap().len(), 3);
        assert!(value["layout"]["scroll"]["x"].as_f64().unwrap() >= 0.0);
    }

    #[test]
    fn missing_match_is_flagged_not_failed() {
        let options = r#"{ "search": "M-9", "searchField": "matricule" }"#;
        let out = layout_chart(STAFF, Some(options.into())).expect("no match is not an error");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["notFound"], true);
        assert!(value["searchResult"].is_null());
    }

    #[test]
    fn cyclic_input_is_an_error() {
        let cyclic = r#"[{ "id": "a", "parentId": "b" }, { "id": "b", "parentId": "a" }]"#;
        assert!(layout_chart(cyclic, None).is_err());
    }
}
