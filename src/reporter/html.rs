//! HTML reporter: generates a self-contained offline report
//!
//! Embeds the whole test-run document as JSON and renders everything
//! client-side with vanilla JS: summary cards, a filterable/sortable results
//! table and per-row detail panels.

use crate::config::{EffectiveConfig, DEFAULT_LOCALE};
use crate::run::TestRun;
use crate::stats::DEFAULT_SLOW_THRESHOLD_MS;

/// Script prefix in front of the embedded document
pub const DATA_PREFIX: &str = "const testData = ";

/// Keeps the payload from terminating the script block. Both rewrites are
/// valid JSON string escapes, so the embedded value is unchanged.
fn escape_json_for_script(s: &str) -> String {
    s.replace("</", "<\\/").replace("<!--", "\\u003c!--")
}

/// Escape text for element content and double-quoted attributes
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reporter that generates the offline HTML page
pub struct HtmlReporter {
    locale: String,
    slow_threshold: u32,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            slow_threshold: DEFAULT_SLOW_THRESHOLD_MS,
        }
    }

    pub fn from_config(config: &EffectiveConfig) -> Self {
        Self::new()
            .with_locale(&config.locale)
            .with_slow_threshold(config.slow_threshold)
    }

    /// Document language and collation locale for name sorting
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    /// Initial value of the viewer's slow-threshold input
    pub fn with_slow_threshold(mut self, ms: u32) -> Self {
        self.slow_threshold = ms;
        self
    }

    /// Generate the full HTML report.
    ///
    /// The document is serialized with 2-space indentation and non-ASCII text
    /// kept literal, then placed verbatim after [`DATA_PREFIX`]. Title and
    /// payload are inserted by concatenation, so neither can be mistaken for
    /// template syntax.
    pub fn report(&self, run: &TestRun, title: &str) -> serde_json::Result<String> {
        let data_json = serde_json::to_string_pretty(run.as_value())?;
        let locale_json = serde_json::to_string(&self.locale)?;
        let title = escape_html(title);

        let mut html = String::with_capacity(48_000 + data_json.len());
        html.push_str("<!DOCTYPE html>\n<html lang=\"");
        html.push_str(&escape_html(&self.locale));
        html.push_str("\">\n<head>\n<meta charset=\"UTF-8\">\n<title>");
        html.push_str(&title);
        html.push_str("</title>\n");
        html.push_str(Self::template_head());
        html.push_str("<body>\n<div class=\"container\">\n<header>\n<div>\n<h1>");
        html.push_str(&title);
        html.push_str("</h1>\n");
        html.push_str(Self::template_body_top());
        html.push_str("<input id=\"slowThreshold\" type=\"number\" min=\"0\" value=\"");
        html.push_str(&self.slow_threshold.to_string());
        html.push_str("\">\n");
        html.push_str(Self::template_body_bottom());
        html.push_str("<script>\n");
        html.push_str(DATA_PREFIX);
        html.push_str(&escape_json_for_script(&data_json));
        html.push_str(";\nconst REPORT_LOCALE = ");
        html.push_str(&locale_json);
        html.push_str(";\nconst DEFAULT_SLOW = ");
        html.push_str(&self.slow_threshold.to_string());
        html.push_str(";\n</script>\n");
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_head() -> &'static str {
        r##"<meta name="viewport" content="width=device-width,initial-scale=1">
<style>
:root{--bg:#0f1115;--panel:#1b1f27;--text:#eef2f7;--dim:#a9b4c4;--primary:#3b82f6;--success:#10b981;--warn:#f59e0b;--error:#ef4444;--border:#2c3542;--code:#0f1620;--radius:10px;--mono:ui-monospace,SFMono-Regular,Menlo,Consolas,"Courier New",monospace;font-family:"Segoe UI","Noto Sans TC",system-ui,-apple-system,Roboto,"Helvetica Neue",Arial,sans-serif}
*{box-sizing:border-box}
body{margin:0;background:linear-gradient(145deg,#10141b,#0b0d11);color:var(--text);-webkit-font-smoothing:antialiased}
h1,h3,h4{font-weight:600;letter-spacing:.5px;margin:0 0 .75rem}
a{color:var(--primary);text-decoration:none}
a:hover{text-decoration:underline}
.container{max-width:1480px;margin:0 auto;padding:1.8rem 2.2rem 4rem}

/* ── Header ── */
header{display:flex;flex-wrap:wrap;gap:1rem;align-items:flex-end;justify-content:space-between;margin-bottom:1.5rem}
header h1{font-size:clamp(1.65rem,2.2vw,2.3rem);background:linear-gradient(90deg,#70a5ff,#c084fc);-webkit-background-clip:text;background-clip:text;color:transparent}
.meta-line{font-size:.9rem;color:var(--dim)}
.legend{display:flex;gap:.75rem;flex-wrap:wrap;font-size:.6rem;margin-top:.5rem}
.legend span{display:inline-flex;gap:.3rem;align-items:center;background:#16202b;padding:.35rem .55rem;border-radius:5px;border:1px solid #293541}

/* ── Summary cards ── */
.grid{display:grid;gap:1.25rem;grid-template-columns:repeat(auto-fill,minmax(210px,1fr));margin-bottom:1.75rem}
.card{background:linear-gradient(145deg,#1d232d,#161b22);border:1px solid var(--border);padding:1rem 1.1rem .95rem;border-radius:var(--radius)}
.card h3{font-size:.8rem;text-transform:uppercase;letter-spacing:.1em;margin:0 0 .35rem;color:var(--dim)}
.card .value{font-size:1.6rem;font-weight:600;line-height:1.15}
.value.ok{color:var(--success)}.value.warn{color:var(--warn)}.value.err{color:var(--error)}
.tagline{font-size:.7rem;text-transform:uppercase;letter-spacing:.12em;color:var(--dim);margin-top:.25rem}

/* ── Filters ── */
.filters{display:flex;flex-wrap:wrap;gap:.75rem;padding:1rem 1.25rem;background:linear-gradient(145deg,#1d2530,#141a21);border:1px solid var(--border);border-radius:var(--radius);margin-bottom:1.25rem}
.filters .group{display:flex;flex-direction:column;min-width:160px}
.filters label{font-size:.7rem;text-transform:uppercase;letter-spacing:.12em;color:var(--dim);margin-bottom:.25rem}
.filters input,.filters select{background:#10151c;border:1px solid #2a333f;color:var(--text);padding:.55rem .6rem;border-radius:6px;font-size:.85rem}
.filters input:focus,.filters select:focus{outline:1px solid var(--primary)}

/* ── Table ── */
table{width:100%;border-collapse:separate;border-spacing:0 6px}
thead th{font-size:.7rem;font-weight:600;text-transform:uppercase;letter-spacing:.1em;text-align:left;padding:.55rem .75rem;color:var(--dim)}
.sticky-head{position:sticky;top:0;backdrop-filter:blur(6px);background:rgba(15,18,24,.85);z-index:10}
tr.row{background:linear-gradient(145deg,#1d232d,#161b22);cursor:pointer;transition:background .2s}
tr.row:hover{background:#243040}
tr.row td{padding:.65rem .75rem;font-size:.8rem;border-top:1px solid #2b3644;border-bottom:1px solid #2b3644}
tr.row td:first-child{border-left:1px solid #2b3644;border-radius:8px 0 0 8px}
tr.row td:last-child{border-right:1px solid #2b3644;border-radius:0 8px 8px 0}
tr.expand{display:none}
tr.row.open+tr.expand{display:table-row}
.mono{font-family:var(--mono);font-size:.75rem}
.dim{color:var(--dim)}
.row-name{font-weight:600;font-size:.78rem;letter-spacing:.2px}
.row-url{margin-top:2px;word-break:break-all}
.badge{display:inline-flex;padding:.28rem .55rem .32rem;border-radius:6px;font-size:.65rem;font-weight:600;letter-spacing:.05em;background:#334155;color:var(--dim);text-transform:uppercase;white-space:nowrap}
.badge.GET{background:#1e3a8a;color:#93c5fd}.badge.POST{background:#0f4d25;color:#6ee7b7}.badge.PUT{background:#4a3b0b;color:#fde68a}.badge.PATCH{background:#4d194d;color:#fbcfe8}.badge.DELETE{background:#5b2121;color:#fecaca}
.status-chip{font-size:.65rem;font-weight:600;padding:.4rem .55rem;border-radius:6px;background:#334155;color:#cbd5e1;letter-spacing:.05em;white-space:nowrap}
.status-2xx{background:#064e3b;color:#6ee7b7}.status-4xx{background:#5b1d0e;color:#fdba74}.status-5xx{background:#5b0e17;color:#fda4af}
.fast{color:#6ee7b7}.slow{color:#fbbf24}.bad{color:#fca5a5}
.no-results{text-align:center;padding:2rem 1rem;color:var(--dim);font-size:.85rem}
.load-error{padding:1rem 1.25rem;border:1px solid var(--error);border-radius:var(--radius);color:#fecaca;background:#2a1215;margin-bottom:1.25rem}

/* ── Detail panel ── */
.detail-panel{background:linear-gradient(135deg,#202733,#151a22);border:1px solid #2c3644;margin:-4px 4px 10px;padding:1rem 1rem 1.1rem;border-radius:8px;display:grid;gap:1rem;grid-template-columns:repeat(auto-fit,minmax(250px,1fr))}
.detail-box h4{font-size:.75rem;letter-spacing:.1em;text-transform:uppercase;color:var(--dim);margin-bottom:.5rem}
ul.test-list{list-style:none;margin:0;padding:0;display:flex;flex-direction:column;gap:.4rem;max-height:220px;overflow:auto}
ul.test-list li{display:flex;align-items:center;gap:.5rem;font-size:.7rem;background:#12171e;padding:.45rem .55rem;border:1px solid #2b3644;border-radius:6px;line-height:1.3}
.pill{font-size:.55rem;font-weight:600;letter-spacing:.08em;padding:.25rem .45rem;border-radius:5px;text-transform:uppercase}
.pill.pass{background:#064e3b;color:#6ee7b7}.pill.fail{background:#5b0e17;color:#fda4af}
code.inline{background:var(--code);padding:.15rem .35rem;border-radius:4px;border:1px solid #1f2732;font-family:var(--mono);font-size:.68rem;color:#91c7ff}
.times-chips{display:flex;flex-wrap:wrap;gap:.4rem}
.chip{font-size:.55rem;background:#1e2936;border:1px solid #314152;color:#9fb2c7;padding:.35rem .5rem;border-radius:5px;font-family:var(--mono)}
.chip.fast{border-color:#065f46;color:#6ee7b7}.chip.slow{border-color:#92400e;color:#fbbf24}.chip.bad{border-color:#7f1d1d;color:#fca5a5}
.stat-head{margin-top:.65rem;font-size:.6rem;letter-spacing:.08em;text-transform:uppercase;color:var(--dim);font-weight:600}
.stat-lines{font-size:.65rem;display:grid;gap:.25rem}
.exec-list{display:flex;flex-direction:column;gap:.6rem;max-height:240px;overflow:auto}
.exec{padding:.55rem .65rem;border:1px solid #2a3441;background:#12171e;border-radius:6px;display:grid;gap:.45rem}
.exec-head{font-size:.6rem;letter-spacing:.08em;color:var(--dim);font-weight:600}
.exec-line{display:flex;gap:.5rem;align-items:center}
.raw{font-size:.6rem;line-height:1.4;font-family:var(--mono);background:var(--code);padding:.6rem .7rem;border:1px solid #243140;border-radius:6px;max-height:260px;overflow:auto;white-space:pre;margin:0}
.empty-note{font-size:.65rem}

footer{margin-top:3rem;padding:2rem 0 1rem;font-size:.65rem;text-align:center;color:#475569}

@media(max-width:880px){
  thead{display:none}
  table,tbody,tr.row,tr.row td{display:block;width:100%}
  tr.row{margin-bottom:8px;border-radius:8px}
  tr.row td{border:none!important;padding:.4rem .9rem}
  tr.row td[data-label]:before{content:attr(data-label);display:block;font-size:.55rem;letter-spacing:.1em;text-transform:uppercase;color:var(--dim);margin-bottom:.15rem}
  tr.row.open+tr.expand{display:block}
}
</style>
</head>
"##
    }

    fn template_body_top() -> &'static str {
        r##"<div class="meta-line" id="runMeta"></div>
<div class="legend">
  <span><strong style="color:#6ee7b7">2xx</strong> 成功</span>
  <span><strong style="color:#fdba74">4xx</strong> 用戶端錯誤</span>
  <span><strong style="color:#fca5a5">5xx</strong> 服務端錯誤</span>
  <span><strong style="color:#6ee7b7">PASS</strong> 測試通過</span>
  <span><strong style="color:#fca5a5">FAIL</strong> 測試失敗</span>
</div>
</div>
</header>

<div id="loadError" class="load-error" style="display:none"></div>
<section class="grid" id="summaryCards"></section>

<section class="filters">
  <div class="group">
    <label for="search">關鍵字</label>
    <input id="search" placeholder="名稱 / URL / 測試名稱" autocomplete="off">
  </div>
  <div class="group">
    <label for="methodFilter">Method</label>
    <select id="methodFilter"><option value="">全部</option></select>
  </div>
  <div class="group">
    <label for="statusFilter">HTTP 狀態</label>
    <select id="statusFilter">
      <option value="">全部</option>
      <option value="2">2xx</option>
      <option value="4">4xx</option>
      <option value="5">5xx</option>
    </select>
  </div>
  <div class="group">
    <label for="testResultFilter">測試結果</label>
    <select id="testResultFilter">
      <option value="">全部</option>
      <option value="pass">全通過</option>
      <option value="fail">含失敗</option>
    </select>
  </div>
  <div class="group">
    <label for="sortSelect">排序</label>
    <select id="sortSelect">
      <option value="seq">原始順序</option>
      <option value="time-desc">耗時 (高→低)</option>
      <option value="time-asc">耗時 (低→高)</option>
      <option value="tests-desc">測試數 (多→少)</option>
      <option value="tests-asc">測試數 (少→多)</option>
      <option value="status">狀態碼</option>
      <option value="name">名稱 A→Z</option>
    </select>
  </div>
  <div class="group">
    <label for="slowThreshold">慢速閾值(ms)</label>
"##
    }

    fn template_body_bottom() -> &'static str {
        r##"  </div>
</section>

<section id="tableSection">
  <table>
    <thead class="sticky-head">
      <tr>
        <th>#</th>
        <th>名稱 / URL</th>
        <th>Method</th>
        <th>狀態</th>
        <th>耗時 (ms)</th>
        <th>測試通過</th>
        <th>測試失敗</th>
        <th>執行次數</th>
      </tr>
    </thead>
    <tbody id="resultBody"></tbody>
  </table>
  <div id="noResults" class="no-results" style="display:none">無符合條件的結果</div>
</section>

<footer>產生時間：<span id="generatedAt"></span>｜此頁面為離線報告，資料來源於提供之 JSON</footer>
</div>
"##
    }

    fn template_script() -> &'static str {
        r##"<script>
(function(){
"use strict";

/* ── helpers ── */
const $=id=>document.getElementById(id);
const ESC={'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'};
const esc=s=>String(s==null?'':s).replace(/[&<>"']/g,c=>ESC[c]);
const num=v=>(typeof v==='number'&&isFinite(v))?v:0;
const pct=(n,d)=>(n/d*100).toFixed(1)+'%';
const stripCheck=k=>String(k).replace(/✅/g,'').trim();
const EMPTY='<div class="dim empty-note">無</div>';
const isObj=v=>v!==null&&typeof v==='object'&&!Array.isArray(v);

function percentile(arr,p){
  if(!arr.length) return 0;
  const sorted=[...arr].sort((a,b)=>a-b);
  const idx=(p/100)*(sorted.length-1);
  const lo=Math.floor(idx),hi=Math.ceil(idx);
  if(lo===hi) return sorted[lo];
  return +(sorted[lo]+(sorted[hi]-sorted[lo])*(idx-lo)).toFixed(2);
}

function classifyTime(t,slow){
  if(t<=120) return 'fast';
  if(t>=slow) return 'bad';
  return 'slow';
}

function statusOf(r){return isObj(r)&&isObj(r.responseCode)?r.responseCode.code:undefined}

function resolveMethod(r){
  if(!isObj(r)) return '';
  return r._method||r.method||(isObj(r.request)&&r.request.method)||(isObj(r.meta)&&r.meta.method)||'';
}

/* ── summary ── */
function buildSummary(data){
  const results=data.results;
  const n=results.length;
  const times=results.map(r=>isObj(r)?r.time:undefined).filter(Boolean);
  const avg=times.reduce((a,b)=>a+b,0)/(times.length||1);
  const success=results.filter(r=>statusOf(r)<400).length;
  const clientErr=results.filter(r=>{const c=statusOf(r);return c>=400&&c<500}).length;
  const serverErr=results.filter(r=>statusOf(r)>=500).length;
  let totalTests=0,failedTests=0;
  results.forEach(r=>{
    if(!isObj(r)||!isObj(r.tests)) return;
    const vals=Object.values(r.tests);
    totalTests+=vals.length;
    failedTests+=vals.filter(v=>v===false).length;
  });
  const passTests=totalTests-failedTests;

  const cards=[
    {title:'請求總數',value:n},
    {title:'成功請求',value:success,cls:'ok',sub:n?pct(success,n):'—'},
    {title:'4xx',value:clientErr,cls:clientErr?'warn':'',sub:clientErr?pct(clientErr,n):'—'},
    {title:'5xx',value:serverErr,cls:serverErr?'err':'',sub:serverErr?pct(serverErr,n):'—'},
    {title:'平均耗時',value:avg.toFixed(1)+' ms'},
    {title:'P90',value:percentile(times,90)+' ms'},
    {title:'P95',value:percentile(times,95)+' ms'},
    {title:'測試通過',value:passTests,cls:'ok',sub:passTests+'/'+totalTests},
    {title:'測試失敗',value:failedTests,cls:failedTests?'err':'',sub:totalTests?pct(failedTests,totalTests):'0%'},
  ];
  $('summaryCards').innerHTML=cards.map(c=>`<div class="card"><h3>${c.title}</h3><div class="value ${c.cls||''}">${c.value}</div>${c.sub?`<div class="tagline">${c.sub}</div>`:''}</div>`).join('');

  if(data.startedAt&&data.timestamp){
    const started=new Date(data.startedAt),ended=new Date(data.timestamp);
    const dur=(ended-started)/1000;
    $('runMeta').textContent=`集合：${data.name||'未命名'} ｜ 開始：${started.toLocaleString()} ｜ 結束：${ended.toLocaleString()} ｜ 總耗時：${dur.toFixed(1)}s`;
  }
  $('generatedAt').textContent=new Date().toLocaleString();
}

/* ── filters ── */
function initFilters(data){
  const methods=new Set(data.results.map(resolveMethod).filter(Boolean));
  const select=$('methodFilter');
  [...methods].sort().forEach(m=>{
    const opt=document.createElement('option');
    opt.value=m;
    opt.textContent=m;
    select.appendChild(opt);
  });
}

/* ── row projection ── */
function project(r,i){
  const rec=isObj(r)?r:{};
  const testsObj=isObj(rec.tests)?rec.tests:{};
  const vals=Object.values(testsObj);
  return {
    idx:i+1,
    name:rec.name==null?'':String(rec.name),
    url:rec.url==null?'':String(rec.url),
    method:resolveMethod(rec)||'—',
    status:statusOf(rec),
    statusName:isObj(rec.responseCode)?rec.responseCode.name:'',
    time:rec.time,
    passCount:vals.filter(v=>v===true).length,
    failCount:vals.filter(v=>v===false).length,
    testNames:Object.keys(testsObj),
    testsObj,
    times:Array.isArray(rec.times)?rec.times:(rec.time?[rec.time]:[]),
    allTests:Array.isArray(rec.allTests)?rec.allTests:[],
    raw:r
  };
}

function visibleRows(data){
  const search=$('search').value.trim().toLowerCase();
  const method=$('methodFilter').value;
  const statusCat=$('statusFilter').value;
  const testRes=$('testResultFilter').value;
  const sort=$('sortSelect').value;

  let list=data.results.map(project).filter(item=>{
    if(search){
      const hay=(item.name+' '+item.url+' '+item.testNames.join(' ')).toLowerCase();
      if(!hay.includes(search)) return false;
    }
    if(method&&item.method!==method) return false;
    if(statusCat&&!String(item.status).startsWith(statusCat)) return false;
    if(testRes==='pass'&&item.failCount>0) return false;
    if(testRes==='fail'&&item.failCount===0) return false;
    return true;
  });

  const total=x=>x.passCount+x.failCount;
  switch(sort){
    case 'time-desc':list.sort((a,b)=>num(b.time)-num(a.time));break;
    case 'time-asc':list.sort((a,b)=>num(a.time)-num(b.time));break;
    case 'tests-desc':list.sort((a,b)=>total(b)-total(a));break;
    case 'tests-asc':list.sort((a,b)=>total(a)-total(b));break;
    case 'status':list.sort((a,b)=>num(a.status)-num(b.status));break;
    case 'name':list.sort((a,b)=>a.name.localeCompare(b.name,REPORT_LOCALE));break;
    default:break; /* seq: keep original order */
  }
  return list;
}

/* ── detail panel ── */
function rawSnippet(raw){
  try{
    const clone=typeof structuredClone==='function'?structuredClone(raw):JSON.parse(JSON.stringify(raw));
    if(isObj(clone)&&Array.isArray(clone.allTests)&&clone.allTests.length>3){
      clone.allTests=clone.allTests.slice(0,3);
      clone._truncated=true;
    }
    return JSON.stringify(clone,null,2).replace(/[&<>]/g,s=>({'&':'&amp;','<':'&lt;','>':'&gt;'}[s]));
  }catch(e){return '{}'}
}

function timeStats(times){
  const nums=times.filter(t=>typeof t==='number');
  if(!nums.length) return '<div class="dim">—</div>';
  const min=Math.min(...nums),max=Math.max(...nums);
  const avg=(nums.reduce((a,b)=>a+b,0)/nums.length).toFixed(2);
  return `<div>最小：<code class="inline">${min} ms</code></div>
    <div>最大：<code class="inline">${max} ms</code></div>
    <div>平均：<code class="inline">${avg} ms</code></div>`;
}

function renderDetail(item,slow){
  const testList=item.testNames.map(k=>{
    const pass=item.testsObj[k]===true;
    return `<li><span class="pill ${pass?'pass':'fail'}">${pass?'PASS':'FAIL'}</span><span>${esc(stripCheck(k))}</span></li>`;
  }).join('')||'<div class="dim empty-note">無測試記錄</div>';

  const chips=item.times.map(t=>`<span class="chip ${classifyTime(num(t),slow)}">${esc(t)} ms</span>`).join('');

  const executions=item.allTests.map((exec,i)=>{
    const lines=isObj(exec)?Object.entries(exec).map(([k,v])=>`<div class="exec-line"><span class="pill ${v?'pass':'fail'}">${v?'PASS':'FAIL'}</span><code class="inline">${esc(stripCheck(k))}</code></div>`).join(''):'';
    return `<div class="exec"><div class="exec-head">執行 #${i+1}</div>${lines||'<div class="dim empty-note">—</div>'}</div>`;
  }).join('');

  return `<div class="detail-panel">
    <div class="detail-box"><h4>測試摘要</h4><ul class="test-list">${testList}</ul></div>
    <div class="detail-box"><h4>耗時分佈 (${item.times.length})</h4>
      <div class="times-chips">${chips||EMPTY}</div>
      <div class="stat-head">統計</div>
      <div class="stat-lines">${timeStats(item.times)}</div>
    </div>
    <div class="detail-box"><h4>每次執行測試結果</h4><div class="exec-list">${executions||EMPTY}</div></div>
    <div class="detail-box"><h4>原始資料片段</h4><pre class="raw">${rawSnippet(item.raw)}</pre></div>
  </div>`;
}

/* ── table ── */
function renderTable(data){
  const body=$('resultBody');
  const slow=+$('slowThreshold').value||DEFAULT_SLOW;
  const list=visibleRows(data);

  body.innerHTML='';
  $('noResults').style.display=list.length?'none':'block';
  if(!list.length) return;

  const frag=document.createDocumentFragment();
  list.forEach(item=>{
    const tr=document.createElement('tr');
    tr.className='row';
    const code=num(item.status);
    const statusCls=code>=500?'status-5xx':code>=400?'status-4xx':'status-2xx';
    const href=item.url.startsWith('http')?item.url:'https://'+item.url;
    const badge=String(item.method).replace(/[^A-Za-z]/g,'');
    tr.innerHTML=`<td data-label="#">${item.idx}</td>
      <td data-label="名稱 / URL"><div class="row-name">${esc(item.name||'—')}</div>
        <div class="mono dim row-url"><a href="${esc(href)}" target="_blank" rel="noopener">${esc(item.url)}</a></div></td>
      <td data-label="Method"><span class="badge ${badge}">${esc(item.method)}</span></td>
      <td data-label="狀態"><span class="status-chip ${statusCls}">${esc(item.status)} ${esc(item.statusName||'')}</span></td>
      <td data-label="耗時"><span class="mono ${classifyTime(num(item.time),slow)}">${esc(item.time)}</span></td>
      <td data-label="通過">${item.passCount}</td>
      <td data-label="失敗" style="color:${item.failCount?'var(--error)':'var(--dim)'}">${item.failCount}</td>
      <td data-label="執行次數">${item.times.length}</td>`;
    frag.appendChild(tr);

    const expand=document.createElement('tr');
    expand.className='expand';
    const td=document.createElement('td');
    td.colSpan=8;
    expand.appendChild(td);
    frag.appendChild(expand);

    tr.addEventListener('click',e=>{
      if(e.target.closest('a')) return;
      if(!td.firstChild) td.innerHTML=renderDetail(item,slow);
      tr.classList.toggle('open');
    });
  });
  body.appendChild(frag);
}

function attachEvents(data){
  const rerender=()=>renderTable(data);
  ['search','slowThreshold'].forEach(id=>$(id).addEventListener('input',rerender));
  ['methodFilter','statusFilter','testResultFilter','sortSelect'].forEach(id=>$(id).addEventListener('change',rerender));
}

function initReport(data){
  if(!isObj(data)||!Array.isArray(data.results)){
    const el=$('loadError');
    el.textContent='資料格式錯誤：缺少 results 陣列';
    el.style.display='block';
    return;
  }
  buildSummary(data);
  initFilters(data);
  renderTable(data);
  attachEvents(data);
}

/* ── init ── */
if(document.readyState==='loading'){
  document.addEventListener('DOMContentLoaded',()=>initReport(testData));
}else{
  initReport(testData);
}

})();
</script>
"##
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_run() -> TestRun {
        TestRun::from_value(json!({
            "name": "訂單 API",
            "startedAt": "2024-01-01T00:00:00Z",
            "results": [
                {"id": "1", "name": "List orders", "url": "api.example.com/orders",
                 "responseCode": {"code": 200, "name": "OK"}, "time": 95,
                 "tests": {"✅ status is 200": true}},
                {"id": "2", "name": "Missing order", "url": "https://api.example.com/orders/9",
                 "responseCode": {"code": 404, "name": "Not Found"}, "time": 610,
                 "tests": {"status is 200": false}}
            ]
        }))
    }

    /// Pull the embedded document back out of a rendered page
    fn embedded_payload(html: &str) -> serde_json::Value {
        let start = html.find(DATA_PREFIX).unwrap() + DATA_PREFIX.len();
        let end = start + html[start..].find(";\nconst REPORT_LOCALE").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_report_contains_structure() {
        let html = HtmlReporter::new()
            .report(&sample_run(), "訂單 API - 2024-01-01")
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"zh-Hant\">"));
        assert!(html.contains("<title>訂單 API - 2024-01-01</title>"));
        assert!(html.contains("<h1>訂單 API - 2024-01-01</h1>"));
        assert!(html.contains("List orders"));
        assert!(html.contains("Missing order"));
        assert!(html.contains("const DEFAULT_SLOW = 500;"));
        assert!(html.contains("value=\"500\""));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_payload_round_trips_in_order() {
        let run = sample_run();
        let html = HtmlReporter::new().report(&run, "t").unwrap();
        let payload = embedded_payload(&html);
        assert_eq!(&payload, run.as_value());
        let names: Vec<&str> = payload["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["List orders", "Missing order"]);
    }

    #[test]
    fn test_payload_is_pretty_and_keeps_non_ascii() {
        let html = HtmlReporter::new().report(&sample_run(), "t").unwrap();
        assert!(html.contains("const testData = {\n  \"name\": \"訂單 API\","));
        assert!(!html.contains("\\u8a02"));
    }

    #[test]
    fn test_payload_braces_untouched() {
        let run = TestRun::from_value(json!({
            "name": "braces",
            "results": [{"name": "{{template}} ${x} }}", "tests": {}}]
        }));
        let html = HtmlReporter::new().report(&run, "t").unwrap();
        assert!(html.contains("{{template}} ${x} }}"));
        assert_eq!(&embedded_payload(&html), run.as_value());
    }

    #[test]
    fn test_script_breakout_is_escaped() {
        let run = TestRun::from_value(json!({
            "results": [{"name": "</script><script>alert(1)</script>"}, {"name": "<!-- x"}]
        }));
        let html = HtmlReporter::new().report(&run, "t").unwrap();
        assert!(!html.contains("</script><script>alert(1)"));
        assert_eq!(&embedded_payload(&html), run.as_value());
    }

    #[test]
    fn test_title_is_html_escaped() {
        let html = HtmlReporter::new()
            .report(&sample_run(), "<b>Run</b> & co - —")
            .unwrap();
        assert!(html.contains("<title>&lt;b&gt;Run&lt;/b&gt; &amp; co - —</title>"));
    }

    #[test]
    fn test_config_values_applied() {
        let html = HtmlReporter::new()
            .with_locale("en")
            .with_slow_threshold(750)
            .report(&sample_run(), "t")
            .unwrap();
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("const REPORT_LOCALE = \"en\";"));
        assert!(html.contains("const DEFAULT_SLOW = 750;"));
        assert!(html.contains("value=\"750\""));
    }

    #[test]
    fn test_empty_results() {
        let run = TestRun::from_value(json!({"results": []}));
        let html = HtmlReporter::new().report(&run, "t").unwrap();
        assert!(html.contains("const testData = {\n  \"results\": []\n};"));
    }

    #[test]
    fn test_escape_json_for_script() {
        assert_eq!(escape_json_for_script("\"</script>\""), "\"<\\/script>\"");
        assert_eq!(escape_json_for_script("\"<!--\""), "\"\\u003c!--\"");
        assert_eq!(escape_json_for_script("normal"), "normal");
    }
}
