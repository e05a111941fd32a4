//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! D3.js chart functions are split across `assets/js/*.js` and loaded at runtime.
//! They are evaluated as globals (no ES modules) and exposed via `window.*`.
//! This module provides safe Rust wrappers that serialize data and call those globals.

use wasm_bindgen::JsCast;

/// D3 v7 bundle injected when the host page does not provide one.
pub const D3_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/d3@7";

// Embed all D3 chart JS files at compile time
static TOOLTIP_JS: &str = include_str!("../assets/js/tooltip.js");
static PLAYER_JS: &str = include_str!("../assets/js/player.js");
static BAR_RACE_JS: &str = include_str!("../assets/js/bar-race.js");
static BUBBLE_MAP_JS: &str = include_str!("../assets/js/bubble-map.js");
static RADAR_CHART_JS: &str = include_str!("../assets/js/radar-chart.js");
static SUNBURST_JS: &str = include_str!("../assets/js/sunburst.js");

/// Global functions promoted to `window` once the scripts are evaluated.
const CHART_GLOBALS: [&str; 8] = [
    "initTooltip",
    "showTooltip",
    "hideTooltip",
    "createYearPlayer",
    "renderBarRace",
    "renderBubbleMap",
    "renderRadarChart",
    "renderSunburst",
];

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('CO2 JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Initialize chart scripts with a wait-for-D3 polling loop.
///
/// The chart JS files define functions like `renderBarRace(...)` via
/// `function` declarations. To ensure they become globally accessible
/// (not block-scoped inside the setInterval callback), we evaluate them
/// at global scope via a separate `eval()` call once D3 is ready,
/// and then explicitly promote each function to `window.*`.
pub fn init_charts() {
    let promote: String = CHART_GLOBALS
        .iter()
        .map(|name| format!("if (typeof {name} !== 'undefined') window.{name} = {name};\n"))
        .collect();

    let all_js = [
        TOOLTIP_JS,
        PLAYER_JS,
        BAR_RACE_JS,
        BUBBLE_MAP_JS,
        RADAR_CHART_JS,
        SUNBURST_JS,
        &promote,
    ]
    .join("\n");

    // Store the scripts on window so the polling callback can eval them
    // at global scope (not block-scoped inside setInterval).
    let store_js = format!(
        "window.__co2ChartScripts = {};",
        serde_json::to_string(&all_js).unwrap_or_default()
    );
    let _ = js_sys::eval(&store_js);

    let init_js = format!(
        r#"
        (function() {{
            if (window.__co2ChartsReady || window.__co2ChartsWaiting) return;
            window.__co2ChartsWaiting = true;
            if (typeof d3 === 'undefined' && !document.getElementById('co2-d3')) {{
                var tag = document.createElement('script');
                tag.id = 'co2-d3';
                tag.src = '{D3_SCRIPT_URL}';
                document.head.appendChild(tag);
            }}
            var waitForD3 = setInterval(function() {{
                if (typeof d3 !== 'undefined' && window.__co2ChartScripts) {{
                    clearInterval(waitForD3);
                    // Eval at global scope via indirect eval
                    (0, eval)(window.__co2ChartScripts);
                    delete window.__co2ChartScripts;
                    window.__co2ChartsReady = true;
                    console.log('CO2 charts initialized');
                }}
            }}, 100);
        }})();
    "#
    );
    let _ = js_sys::eval(&init_js);
}

/// Call `window.<function>(containerId, dataJson, configJson)` once D3, the
/// chart scripts and the container element all exist.
fn render_when_ready(function: &str, container_id: &str, data_json: &str, config_json: &str) {
    // JSON string literals are valid JS string literals
    let data_literal = serde_json::to_string(data_json).unwrap_or_default();
    let config_literal = serde_json::to_string(config_json).unwrap_or_default();
    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__co2ChartsReady &&
                    typeof window.{function} !== 'undefined' &&
                    document.getElementById('{container_id}')) {{
                    clearInterval(poll);
                    try {{
                        window.{function}('{container_id}', {data_literal}, {config_literal});
                    }} catch(e) {{ console.error('[CO2] {function} error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
    ));
}

/// Render the animated top-emitters bar race.
pub fn render_bar_race(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderBarRace", container_id, data_json, config_json);
}

/// Render the animated per-capita bubble map.
pub fn render_bubble_map(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderBubbleMap", container_id, data_json, config_json);
}

/// Render the normalized multi-country radar.
pub fn render_radar_chart(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderRadarChart", container_id, data_json, config_json);
}

/// Render the country/source sunburst.
pub fn render_sunburst(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderSunburst", container_id, data_json, config_json);
}

/// Destroy/clean up a chart in the given container.
///
/// Stops a running year player (the `__co2Stop` hook set by `createYearPlayer`)
/// before clearing the element.
pub fn destroy_chart(container_id: &str) {
    let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(container_id))
    else {
        return;
    };
    if let Ok(stop) = js_sys::Reflect::get(&el, &"__co2Stop".into()) {
        if let Ok(stop) = stop.dyn_into::<js_sys::Function>() {
            let _ = stop.call0(&el);
        }
    }
    el.set_inner_html("");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_map_shares_one_basemap_fetch() {
        assert!(BUBBLE_MAP_JS.contains("window.__co2World = d3.json(url)"));
        assert!(!BUBBLE_MAP_JS.contains("d3.json(config.geoJsonUrl)"));
    }

    #[test]
    fn stale_basemap_callbacks_draw_nothing() {
        // Both the success and the failure path check the render stamp
        assert_eq!(
            BUBBLE_MAP_JS
                .matches("if (container.__co2RenderId !== renderId) return;")
                .count(),
            2
        );
        assert!(BUBBLE_MAP_JS.contains("container.__co2RenderId = renderId;"));
    }

    #[test]
    fn every_promoted_global_is_defined() {
        let all = [
            TOOLTIP_JS,
            PLAYER_JS,
            BAR_RACE_JS,
            BUBBLE_MAP_JS,
            RADAR_CHART_JS,
            SUNBURST_JS,
        ]
        .join("\n");
        for name in CHART_GLOBALS {
            assert!(all.contains(&format!("function {name}(")), "{name} missing");
        }
    }
}
