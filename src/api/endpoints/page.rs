//! The single page served at `/`.
//!
//! Self-contained: inline CSS and JS, no external resources. Result panels
//! arrive as server-rendered fragments from `/api/analyze` and `/api/result`.

use axum::response::Html;

/// `GET /`: the analyzer page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ---------------------------------------------------------------------------
// Page HTML
// ---------------------------------------------------------------------------

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>MediLens AI</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #f8fafc; color: #0f172a; line-height: 1.5;
    }
    main { max-width: 1040px; margin: 0 auto; padding: 32px 16px 64px; }
    h1 { font-size: 22px; color: #0d9488; margin-bottom: 24px; }
    .hero h2 { font-size: 32px; margin-bottom: 4px; }
    .hero p { color: #64748b; margin-bottom: 32px; }
    .input-card {
      background: white; border-radius: 24px; border: 1px solid #e2e8f0;
      box-shadow: 0 10px 30px rgba(15, 23, 42, 0.06); overflow: hidden; margin-bottom: 32px;
    }
    .input-head { background: linear-gradient(90deg, #0d9488, #10b981); color: white; padding: 20px 24px; }
    .input-head p { opacity: 0.9; font-size: 14px; }
    .input-body { display: grid; grid-template-columns: 1fr 1fr; gap: 32px; padding: 28px; }
    @media (max-width: 800px) { .input-body { grid-template-columns: 1fr; } }
    label.step { display: block; font-size: 13px; font-weight: 700; text-transform: uppercase;
      letter-spacing: 0.05em; color: #334155; margin-bottom: 12px; }
    .drop {
      display: block; border: 2px dashed #cbd5e1; border-radius: 16px; padding: 32px;
      text-align: center; color: #64748b; cursor: pointer; font-size: 14px;
    }
    .drop:hover, .drop.dragging { border-color: #0d9488; background: #f0fdfa; }
    .drop input { display: none; }
    .file-chip { display: none; align-items: center; gap: 12px; margin-top: 12px; padding: 10px;
      background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 12px; }
    .file-chip img { width: 48px; height: 48px; object-fit: cover; border-radius: 8px; }
    .file-chip .meta { flex: 1; overflow: hidden; font-size: 13px; }
    .file-chip .meta strong { display: block; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
    .file-chip button { border: none; background: none; font-size: 18px; color: #94a3b8; cursor: pointer; }
    textarea {
      width: 100%; min-height: 140px; padding: 14px; border-radius: 12px; border: 2px solid #e2e8f0;
      font: inherit; font-size: 14px; resize: vertical; background: #f8fafc;
    }
    textarea:focus { outline: none; border-color: #14b8a6; background: white; }
    .tags { display: flex; flex-wrap: wrap; gap: 8px; margin-top: 12px; }
    .tags button {
      border: 1px solid transparent; background: #f1f5f9; color: #475569; border-radius: 999px;
      padding: 4px 12px; font-size: 12px; cursor: pointer;
    }
    .tags button:hover { background: #f0fdfa; color: #0d9488; border-color: #99f6e4; }
    .actions { padding: 20px; background: #f8fafc; border-top: 1px solid #e2e8f0; text-align: center; }
    #analyze {
      min-width: 300px; padding: 14px 28px; border: none; border-radius: 12px; font-size: 17px;
      font-weight: 700; color: white; background: linear-gradient(90deg, #0d9488, #059669); cursor: pointer;
    }
    #analyze:disabled { background: #cbd5e1; cursor: not-allowed; }
    .error { background: #fef2f2; border: 1px solid #fecaca; border-radius: 16px; padding: 20px; margin-bottom: 24px; }
    .error h3 { color: #7f1d1d; font-size: 16px; }
    .error p { color: #b91c1c; font-size: 14px; }
    .result-header { display: flex; flex-wrap: wrap; align-items: center; justify-content: space-between; gap: 12px; margin-bottom: 16px; }
    .badge { padding: 4px 14px; border-radius: 999px; border: 1px solid; font-size: 13px; font-weight: 600; }
    .badge-good { color: #16a34a; background: #f0fdf4; border-color: #bbf7d0; }
    .badge-warn { color: #d97706; background: #fffbeb; border-color: #fde68a; }
    .badge-poor { color: #dc2626; background: #fef2f2; border-color: #fecaca; }
    .badge-neutral { color: #64748b; border-color: #e2e8f0; }
    .disclaimer { background: #fffbeb; border-left: 4px solid #fbbf24; padding: 14px; border-radius: 0 12px 12px 0;
      font-size: 14px; color: #92400e; margin-bottom: 16px; }
    .disclaimer-title { font-weight: 700; }
    .card { background: white; border: 1px solid #e2e8f0; border-radius: 16px; padding: 20px; margin-bottom: 16px; }
    .card h3, .card summary { font-weight: 700; margin-bottom: 8px; cursor: default; }
    details.card summary { cursor: pointer; }
    .card-alert { background: #fef2f2; border-color: #fee2e2; color: #991b1b; }
    .summary { white-space: pre-wrap; color: #334155; }
    .card ul { padding-left: 20px; font-size: 14px; }
    .columns { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
    @media (max-width: 800px) { .columns { grid-template-columns: 1fr; } }
    table { width: 100%; border-collapse: collapse; font-size: 14px; }
    th { text-align: left; font-size: 11px; text-transform: uppercase; color: #64748b; padding: 8px; border-bottom: 1px solid #e2e8f0; }
    td { padding: 10px 8px; vertical-align: top; border-bottom: 1px solid #f1f5f9; }
    td small { display: block; color: #94a3b8; font-size: 12px; }
    td p { font-size: 12px; color: #475569; margin-top: 4px; }
    .mono { font-family: ui-monospace, monospace; font-size: 12px; color: #64748b; }
    .row-warning { background: #fff7ed; }
    .row-alert { background: #fef2f2; }
    .pill { display: inline-block; padding: 1px 8px; border-radius: 4px; font-size: 10px; font-weight: 700; text-transform: uppercase; }
    .pill-normal { background: #dcfce7; color: #15803d; }
    .pill-abnormal { background: #ffedd5; color: #c2410c; }
    .pill-critical { background: #fee2e2; color: #b91c1c; }
    .pill-unknown { background: #f1f5f9; color: #475569; }
    .steps { list-style: none; }
    .steps li { display: flex; gap: 12px; margin-bottom: 10px; }
    .step-number { flex-shrink: 0; width: 24px; height: 24px; border-radius: 50%; background: #f1f5f9;
      color: #64748b; font-size: 12px; font-weight: 700; display: flex; align-items: center; justify-content: center; }
    .raw-text { margin-top: 24px; padding-top: 16px; border-top: 1px solid #e2e8f0; font-size: 12px; color: #94a3b8; }
    .raw-text pre { margin-top: 8px; padding: 12px; background: #f1f5f9; border-radius: 8px; white-space: pre-wrap;
      max-height: 240px; overflow-y: auto; color: #475569; }
    footer { margin-top: 48px; font-size: 11px; color: #94a3b8; text-align: center; }
  </style>
</head>
<body>
  <main>
    <h1>MediLens AI</h1>
    <div class="hero">
      <h2>Your Health, Decoded.</h2>
      <p>Upload a lab report, describe your symptoms, or do both for the most accurate interpretation.</p>
    </div>

    <div class="input-card">
      <div class="input-head">
        <strong>New Analysis</strong>
        <p>Supported files: JPEG, PNG, WEBP, HEIC or PDF.</p>
      </div>
      <div class="input-body">
        <div>
          <label class="step">1. Upload Document</label>
          <label class="drop" id="drop">
            <input type="file" id="file" accept="image/jpeg,image/png,image/webp,image/heic,application/pdf">
            Click or drop a medical report here
          </label>
          <div class="file-chip" id="chip">
            <img id="chip-preview" alt="Preview" hidden>
            <div class="meta"><strong id="chip-name"></strong><span id="chip-detail"></span></div>
            <button id="chip-remove" title="Remove file">&times;</button>
          </div>
        </div>
        <div>
          <label class="step" for="symptoms">2. Clinical Context &amp; Symptoms</label>
          <textarea id="symptoms" placeholder="Describe how you feel (e.g., 'Severe headache, sensitivity to light, and nausea for 2 days')..."></textarea>
          <div class="tags" id="tags"></div>
        </div>
      </div>
      <div class="actions">
        <button id="analyze" disabled>Check Symptoms</button>
      </div>
    </div>

    <div id="result"></div>
    <footer>Strictly for educational use only. Not a substitute for professional medical advice.</footer>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    let busy = false;

    async function api(method, path, body, isForm) {
      const opts = { method };
      if (body !== undefined) {
        opts.body = isForm ? body : JSON.stringify(body);
        if (!isForm) opts.headers = { 'Content-Type': 'application/json' };
      }
      const res = await fetch(path, opts);
      const type = res.headers.get('content-type') || '';
      const data = type.includes('application/json') ? await res.json() : null;
      return { ok: res.ok, status: res.status, data };
    }

    async function refreshResult() {
      const res = await fetch('/api/result');
      $('result').innerHTML = await res.text();
    }

    function drawSession(s) {
      if (document.activeElement !== $('symptoms')) $('symptoms').value = s.symptoms;
      if (s.file) {
        $('chip').style.display = 'flex';
        $('chip-name').textContent = s.file.fileName;
        $('chip-detail').textContent =
          (s.file.sizeBytes / 1024 / 1024).toFixed(2) + ' MB • ' + s.file.label;
        if (s.file.preview) { $('chip-preview').src = s.file.preview; $('chip-preview').hidden = false; }
        else { $('chip-preview').hidden = true; }
      } else {
        $('chip').style.display = 'none';
      }
      if (!busy) $('analyze').textContent = s.actionLabel;
      $('analyze').disabled = busy || !s.canAnalyze;
      if (!$('tags').children.length) {
        for (const tag of s.tags) {
          const b = document.createElement('button');
          b.textContent = '+ ' + tag;
          b.onclick = () => addTag(tag);
          $('tags').appendChild(b);
        }
      }
    }

    async function refreshSession() {
      const res = await api('GET', '/api/session');
      if (res.ok) drawSession(res.data);
    }

    async function addTag(tag) {
      if (busy) return;
      await api('PUT', '/api/symptoms', { text: $('symptoms').value });
      await api('POST', '/api/symptoms/tags', { tag });
      $('symptoms').blur();
      await refreshSession();
    }

    let typing;
    $('symptoms').addEventListener('input', () => {
      clearTimeout(typing);
      $('analyze').disabled = busy || (!$('symptoms').value.trim() && $('chip').style.display !== 'flex');
      typing = setTimeout(() => api('PUT', '/api/symptoms', { text: $('symptoms').value }), 250);
    });

    async function uploadFile(file) {
      if (!file || busy) return;
      const form = new FormData();
      form.append('file', file);
      const res = await api('POST', '/api/file', form, true);
      if (!res.ok) {
        alert(res.data && res.data.error ? res.data.error.message : 'Upload failed.');
        return;
      }
      await refreshSession();
      await refreshResult();
    }

    $('file').addEventListener('change', async (e) => {
      const file = e.target.files[0];
      e.target.value = '';
      await uploadFile(file);
    });

    $('drop').addEventListener('dragover', (e) => {
      e.preventDefault();
      if (!busy) $('drop').classList.add('dragging');
    });
    $('drop').addEventListener('dragleave', () => $('drop').classList.remove('dragging'));
    $('drop').addEventListener('drop', async (e) => {
      e.preventDefault();
      $('drop').classList.remove('dragging');
      if (busy) return;
      await uploadFile(e.dataTransfer.files[0]);
    });

    $('chip-remove').addEventListener('click', async () => {
      await api('DELETE', '/api/file');
      await refreshSession();
    });

    $('analyze').addEventListener('click', async () => {
      clearTimeout(typing);
      await api('PUT', '/api/symptoms', { text: $('symptoms').value });
      busy = true;
      $('analyze').disabled = true;
      $('analyze').textContent = 'Processing...';
      try {
        const res = await api('POST', '/api/analyze');
        await refreshResult();
        if (res.ok) $('result').scrollIntoView({ behavior: 'smooth', block: 'start' });
      } finally {
        busy = false;
        await refreshSession();
      }
    });

    refreshSession().then(refreshResult);
  </script>
</body>
</html>
"#;
