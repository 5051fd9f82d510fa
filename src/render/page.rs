//! HTML page shell for the dashboard.
//!
//! The whole page is assembled as a string with inline CSS. No external
//! assets, no build tools, no CDN dependencies. The shell embeds the two
//! panel regions (`panel` and `ia-panel`) that the dashboard controller
//! writes into.

use crate::render::escape;

/// Inline stylesheet shared by the terminal-launched page and the viewer
/// server.
const PAGE_CSS: &str = r#"
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 960px; margin: 0 auto; padding: 24px; }

header {
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 12px; }
.card h3 { font-size: 14px; font-weight: 600; margin: 12px 0 8px; color: var(--text-muted); }

.field { margin-bottom: 4px; }
.field .label { color: var(--text-muted); }

.badge {
  display: inline-block;
  padding: 2px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 600;
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.err { border-color: var(--red); color: var(--red); }

ul.metrics, ul.crystals { list-style: none; margin-left: 4px; }
ul.metrics li, ul.crystals li { margin-bottom: 2px; }

ul.alerts { list-style: disc inside; color: var(--red); }
ul.recommendations { list-style: disc inside; color: var(--yellow); margin-top: 8px; }
.all-clear { color: var(--green); }

pre {
  font-family: var(--mono);
  font-size: 12px;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 12px;
  overflow-x: auto;
  white-space: pre-wrap;
}

button.optimize {
  margin-top: 12px;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: var(--accent);
  color: #fff;
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
}

.working { color: var(--yellow); margin-top: 8px; }
.card.error { border-color: var(--red); }
.card.error strong, div.error strong { color: var(--red); }
div.error {
  background: var(--surface);
  border: 1px solid var(--red);
  border-radius: var(--radius);
  padding: 12px 20px;
  margin-bottom: 16px;
}
"#;

/// Assemble the complete dashboard page around the two panel regions.
pub fn render_page(title: &str, panel: &str, ia_panel: &str) -> String {
    render_page_inner(title, panel, ia_panel, "")
}

/// Like [`render_page`], but the page reloads to `/` after `reload_secs`
/// seconds: the server-rendered expression of the delayed status reload
/// that follows an optimize action.
pub fn render_reloading_page(title: &str, panel: &str, ia_panel: &str, reload_secs: u64) -> String {
    let meta = format!("<meta http-equiv=\"refresh\" content=\"{reload_secs};url=/\">\n");
    render_page_inner(title, panel, ia_panel, &meta)
}

fn render_page_inner(title: &str, panel: &str, ia_panel: &str, head_extra: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head_extra}<title>{title}</title>
<style>{css}</style>
</head>
<body>
<div class="app">
<header>
<h1>{title}</h1>
<div class="subtitle">quantum datacenter monitoring</div>
</header>
<div id="panel">
{panel}</div>
<div id="ia-panel">
{ia_panel}</div>
</div>
</body>
</html>
"#,
        head_extra = head_extra,
        title = escape(title),
        css = PAGE_CSS,
        panel = panel,
        ia_panel = ia_panel,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
