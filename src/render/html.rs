use crate::model::ReportData;

/// Render a self-contained HTML report (data embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from
/// JS template literals (e.g., `${x}`), which would conflict with Rust
/// formatting.
pub fn render_html_report(data: &ReportData) -> anyhow::Result<String> {
    let json = serde_json::to_string(data)?; // embedded as JS object literal

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Memory-tuning benchmark report</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }

  .tabbar { display: flex; gap: 4px; padding: 8px 16px 0; border-bottom: 1px solid #ddd; }
  .tabbar button { padding: 8px 14px; border: 1px solid #ddd; border-bottom: none;
                   border-radius: 6px 6px 0 0; background: #fafafa; cursor: pointer; font-size: 14px; }
  .tabbar button.active { background: white; font-weight: 600; }

  .tab { padding: 12px 16px; }
  h3 { margin: 18px 0 6px; }

  table { border-collapse: collapse; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; }
  th { position: sticky; top: 0; background: white; border-bottom: 1px solid #ddd; }
  td.num { text-align: right; font-variant-numeric: tabular-nums; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 13px; }

  .charts { display: flex; flex-wrap: wrap; gap: 16px; }
  .chart { border: 1px solid #eee; border-radius: 6px; padding: 8px; }
  details { margin-top: 16px; }
  details summary { cursor: pointer; font-weight: 600; }
  .legend { display: flex; gap: 12px; flex-wrap: wrap; font-size: 13px; margin: 4px 0; }
  .legend span { display: inline-flex; align-items: center; gap: 4px; }
  .swatch { display: inline-block; width: 10px; height: 10px; border-radius: 2px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<div class="tabbar" id="tabbar"></div>
<div id="tabs"></div>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

const PALETTE = ['#4285f4', '#db4437', '#f4b400', '#0f9d58', '#ab47bc', '#00acc1', '#ff7043'];

const SUMMARY_COLUMNS = [
  'Memory size',
  'Average optimum running time',
  'Average optimum halt events',
  'Average fixed running time',
  'Average fixed halt events',
  'Average not fixed running time',
  'Average not fixed halt events',
];

const DETAIL_COLUMNS = [
  'Type', 'Total memory', 'Alloc. memory', 'Success', 'Duration',
  'Guest swap reads', 'Guest swap writes',
  'Guest rootfs reads', 'Guest rootfs writes',
  'Guest rand-files reads', 'Guest rand-files writes',
  'Host swap reads', 'Host swap writes',
  'Halt events', 'Halt events (outside IRQ)',
  'ID',
];

function summaryCells(row) {
  return [
    row.memory,
    row.optimum_duration,
    row.optimum_events,
    row.with_fix_duration,
    row.with_fix_events,
    row.without_fix_duration,
    row.without_fix_events,
  ];
}

function detailCells(row) {
  return [
    row.variant,
    row.total_memory,
    row.effective_memory,
    row.success,
    row.duration,
    row.guest_swap_read,
    row.guest_swap_write,
    row.guest_rootfs_read,
    row.guest_rootfs_write,
    row.guest_rand_files_read,
    row.guest_rand_files_write,
    row.host_swap_read,
    row.host_swap_write,
    row.events_total,
    row.events_noirq,
    row.id,
  ];
}

function fmtCell(x) {
  if (x === null || x === undefined) return '';
  return String(x);
}

function el(tag, attrs, parent) {
  const node = document.createElement(tag);
  for (const k in (attrs || {})) node.setAttribute(k, attrs[k]);
  if (parent) parent.appendChild(node);
  return node;
}

function svgEl(tag, attrs, parent) {
  const node = document.createElementNS('http://www.w3.org/2000/svg', tag);
  for (const k in (attrs || {})) node.setAttribute(k, attrs[k]);
  if (parent) parent.appendChild(node);
  return node;
}

function renderSummaryPills() {
  const t = DATA.totals;
  const root = document.getElementById('summary');
  root.innerHTML = `
    <span class="pill">records: <b>${t.records}</b></span>
    <span class="pill">tests: <b>${t.tests}</b></span>
    <span class="pill">memory sizes: <b>${t.memory_sizes}</b></span>
    <span class="pill">optimum runs: <b>${t.optimum_runs}</b></span>
    <span class="pill">with-fix runs: <b>${t.with_fix_runs}</b></span>
    <span class="pill">without-fix runs: <b>${t.without_fix_runs}</b></span>
  `;
}

function renderTable(parent, columns, rows, numericFrom) {
  const table = el('table', {}, parent);
  const thead = el('thead', {}, table);
  const hr = el('tr', {}, thead);
  for (const c of columns) el('th', {}, hr).textContent = c;
  const tbody = el('tbody', {}, table);
  for (const row of rows) {
    const tr = el('tr', {}, tbody);
    row.forEach((cell, i) => {
      const td = el('td', {}, tr);
      if (i >= numericFrom && typeof cell === 'number') td.className = 'num';
      td.textContent = fmtCell(cell);
    });
  }
}

function renderLegend(parent, labels, colorOffset) {
  const legend = el('div', { class: 'legend' }, parent);
  labels.forEach((label, i) => {
    const item = el('span', {}, legend);
    el('span', {
      class: 'swatch',
      style: 'background:' + PALETTE[(i + (colorOffset || 0)) % PALETTE.length],
    }, item);
    item.appendChild(document.createTextNode(label));
  });
}

// Least-squares fit over [x, y] pairs; null when degenerate.
function fitTrendline(points) {
  if (points.length < 2) return null;
  const n = points.length;
  let sx = 0, sy = 0, sxx = 0, sxy = 0;
  for (const [x, y] of points) {
    sx += x; sy += y; sxx += x * x; sxy += x * y;
  }
  const denom = n * sxx - sx * sx;
  if (denom === 0) return null;
  const slope = (n * sxy - sx * sy) / denom;
  return { slope, intercept: (sy - slope * sx) / n };
}

function niceRange(lo, hi) {
  if (lo === hi) { lo -= 1; hi += 1; }
  const pad = (hi - lo) * 0.08;
  return [lo - pad, hi + pad];
}

function axes(svg, x0, y0, w, h, xRange, yRange, xTitle, yTitle) {
  svg.setAttribute('font-size', '11');
  svgEl('line', { x1: x0, y1: y0 + h, x2: x0 + w, y2: y0 + h, stroke: '#999' }, svg);
  svgEl('line', { x1: x0, y1: y0, x2: x0, y2: y0 + h, stroke: '#999' }, svg);
  const ticks = 5;
  for (let i = 0; i <= ticks; i++) {
    const fx = xRange[0] + (xRange[1] - xRange[0]) * i / ticks;
    const fy = yRange[0] + (yRange[1] - yRange[0]) * i / ticks;
    const px = x0 + w * i / ticks;
    const py = y0 + h - h * i / ticks;
    svgEl('line', { x1: px, y1: y0 + h, x2: px, y2: y0 + h + 4, stroke: '#999' }, svg);
    const xt = svgEl('text', { x: px, y: y0 + h + 16, 'text-anchor': 'middle', fill: '#555' }, svg);
    xt.textContent = fx.toFixed(1);
    svgEl('line', { x1: x0 - 4, y1: py, x2: x0, y2: py, stroke: '#999' }, svg);
    const yt = svgEl('text', { x: x0 - 6, y: py + 3, 'text-anchor': 'end', fill: '#555' }, svg);
    yt.textContent = fy.toFixed(0);
  }
  const xl = svgEl('text', { x: x0 + w / 2, y: y0 + h + 32, 'text-anchor': 'middle', fill: '#333' }, svg);
  xl.textContent = xTitle;
  const yl = svgEl('text', {
    x: 12, y: y0 + h / 2, 'text-anchor': 'middle', fill: '#333',
    transform: 'rotate(-90 12 ' + (y0 + h / 2) + ')',
  }, svg);
  yl.textContent = yTitle;
}

// Grouped bar chart: one category per memory size, one bar per series.
function renderBarChart(parent, title, yTitle, categories, seriesNames, values, colorOffset) {
  const box = el('div', { class: 'chart' }, parent);
  el('h3', {}, box).textContent = title;
  renderLegend(box, seriesNames, colorOffset);

  const W = 420, H = 300, x0 = 48, y0 = 10, w = W - x0 - 10, h = H - y0 - 50;
  const svg = svgEl('svg', { width: W, height: H }, box);

  let hi = 0;
  for (const group of values) for (const v of group) if (v > hi) hi = v;
  if (hi === 0) hi = 1;

  const groupW = w / categories.length;
  const barW = groupW * 0.8 / seriesNames.length;

  categories.forEach((cat, gi) => {
    values[gi].forEach((v, si) => {
      const bh = h * v / hi;
      svgEl('rect', {
        x: x0 + gi * groupW + groupW * 0.1 + si * barW,
        y: y0 + h - bh,
        width: barW - 1,
        height: bh,
        fill: PALETTE[(si + (colorOffset || 0)) % PALETTE.length],
      }, svg);
    });
    const label = svgEl('text', {
      x: x0 + gi * groupW + groupW / 2, y: y0 + h + 16,
      'text-anchor': 'middle', 'font-size': '11', fill: '#555',
    }, svg);
    label.textContent = cat;
  });

  svgEl('line', { x1: x0, y1: y0 + h, x2: x0 + w, y2: y0 + h, stroke: '#999' }, svg);
  for (let i = 0; i <= 4; i++) {
    const py = y0 + h - h * i / 4;
    const yt = svgEl('text', { x: x0 - 6, y: py + 3, 'text-anchor': 'end', 'font-size': '11', fill: '#555' }, svg);
    yt.textContent = (hi * i / 4).toFixed(1);
  }
  const yl = svgEl('text', {
    x: 12, y: y0 + h / 2, 'text-anchor': 'middle', 'font-size': '11', fill: '#333',
    transform: 'rotate(-90 12 ' + (y0 + h / 2) + ')',
  }, svg);
  yl.textContent = yTitle;
}

// Scatter plot for one memory size: column 0 is the shared x value, each
// further column one series; null cells are absent points.
function renderScatter(parent, title, legend, rows) {
  const box = el('div', { class: 'chart' }, parent);
  el('h3', {}, box).textContent = title;
  renderLegend(box, legend.slice(1));

  const W = 460, H = 360, x0 = 52, y0 = 10, w = W - x0 - 10, h = H - y0 - 50;
  const svg = svgEl('svg', { width: W, height: H }, box);

  const series = [];
  for (let col = 1; col < legend.length; col++) {
    const points = [];
    for (const row of rows) {
      if (row[0] !== null && row[col] !== null) points.push([row[0], row[col]]);
    }
    series.push(points);
  }

  let xs = [], ys = [];
  for (const points of series) for (const [x, y] of points) { xs.push(x); ys.push(y); }
  if (xs.length === 0) { xs = [0, 1]; ys = [0, 1]; }
  const xRange = niceRange(Math.min(...xs), Math.max(...xs));
  const yRange = niceRange(Math.min(...ys), Math.max(...ys));
  const px = (x) => x0 + w * (x - xRange[0]) / (xRange[1] - xRange[0]);
  const py = (y) => y0 + h - h * (y - yRange[0]) / (yRange[1] - yRange[0]);

  axes(svg, x0, y0, w, h, xRange, yRange, legend[0], 'Operations');

  series.forEach((points, si) => {
    const color = PALETTE[si % PALETTE.length];
    for (const [x, y] of points) {
      svgEl('circle', { cx: px(x), cy: py(y), r: 3, fill: color, 'fill-opacity': '0.8' }, svg);
    }
    const fit = fitTrendline(points);
    if (fit) {
      const y1 = fit.intercept + fit.slope * xRange[0];
      const y2 = fit.intercept + fit.slope * xRange[1];
      svgEl('line', {
        x1: px(xRange[0]), y1: py(y1), x2: px(xRange[1]), y2: py(y2),
        stroke: color, 'stroke-dasharray': '4 3', 'stroke-opacity': '0.7',
      }, svg);
    }
  });
}

function renderTab(tab) {
  const root = el('div', { class: 'tab' });

  el('h3', {}, root).textContent = 'Summary';
  renderTable(root, SUMMARY_COLUMNS, tab.summary.map(summaryCells), 0);

  const charts = el('div', { class: 'charts' }, root);
  const cats = tab.mem_sizes.map((m) => m + ' MB');
  renderBarChart(
    charts, 'Average test running time', 'Time in seconds', cats,
    ['Optimum', 'With fix', 'Without fix'],
    tab.summary.map((r) => [r.optimum_duration, r.with_fix_duration, r.without_fix_duration]),
    0
  );
  renderBarChart(
    charts, 'Average halt events', 'Number of events', cats,
    ['With fix', 'Without fix'],
    tab.summary.map((r) => [r.with_fix_events, r.without_fix_events]),
    1
  );

  for (const family of tab.scatters) {
    const det = el('details', {}, root);
    el('summary', {}, det).textContent = family.title;
    const charts = el('div', { class: 'charts' }, det);
    for (const plot of family.plots) {
      renderScatter(charts, plot.memory + ' MB', family.legend, plot.rows);
    }
  }

  const det = el('details', {}, root);
  el('summary', {}, det).textContent = 'All results';
  renderTable(det, DETAIL_COLUMNS, tab.details.map(detailCells), 1);

  return root;
}

function renderTabs() {
  const bar = document.getElementById('tabbar');
  const host = document.getElementById('tabs');
  const panes = [];

  DATA.tabs.forEach((tab, i) => {
    const btn = el('button', {}, bar);
    btn.textContent = tab.test_name;
    btn.onclick = () => select(i);
    const pane = renderTab(tab);
    pane.style.display = 'none';
    host.appendChild(pane);
    panes.push({ btn, pane });
  });

  function select(i) {
    panes.forEach(({ btn, pane }, j) => {
      btn.className = i === j ? 'active' : '';
      pane.style.display = i === j ? '' : 'none';
    });
  }

  if (panes.length) select(0);
}

renderSummaryPills();
renderTabs();
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use crate::db::Variant;
    use crate::db::testutil::{record, with_events};
    use crate::model::build_report_data;

    #[test]
    fn report_embeds_the_data_and_leaves_no_placeholder() {
        let records = vec![
            record("a", Variant::Optimum, 256, 10.0),
            with_events(record("b", Variant::WithFix, 256, 20.0), 5, 2),
            with_events(record("c", Variant::WithoutFix, 256, 30.0), 8, 3),
        ];
        let data = build_report_data(&records).unwrap();

        let html = super::render_html_report(&data).unwrap();
        assert!(!html.contains("__DATA__"));
        assert!(html.contains("\"test_name\":\"apache_test\""));
        assert!(html.contains("\"memory\":256"));
        assert!(html.contains("Average optimum halt events"));
    }
}
