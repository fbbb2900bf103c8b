//! Landing page handler

use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Tributary</title>
  <style>
    body { font-family: sans-serif; max-width: 48rem; margin: 3rem auto; padding: 0 1rem; }
    textarea { width: 100%; min-height: 6rem; }
    .error { color: #b00020; }
  </style>
</head>
<body>
  <h1>Tributary</h1>
  <form id="queryForm">
    <textarea id="prompt" name="prompt" placeholder="Ask a question"></textarea>
    <button type="submit">Ask</button>
  </form>
  <div id="result"></div>
  <script>
    document.getElementById('queryForm').addEventListener('submit', async (e) => {
      e.preventDefault();
      const result = document.getElementById('result');
      const prompt = document.getElementById('prompt').value;
      const started = performance.now();
      result.textContent = 'Working...';
      try {
        const response = await fetch('/query', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ prompt }),
        });
        const data = await response.json();
        const elapsed = (performance.now() - started).toFixed(2);
        result.innerHTML = '';
        const p = document.createElement('p');
        if (response.ok) {
          p.textContent = data.result;
          const timing = document.createElement('p');
          timing.textContent = `Response time: ${elapsed} ms (server ${data.processing_time_ms} ms)`;
          result.append(p, timing);
        } else {
          p.className = 'error';
          p.textContent = `Error: ${data.error}`;
          result.append(p);
        }
      } catch (error) {
        result.innerHTML = '';
        const p = document.createElement('p');
        p.className = 'error';
        p.textContent = `Error: ${error.message}`;
        result.append(p);
      }
    });
  </script>
</body>
</html>
"#;

/// Handler for the static landing page
pub struct IndexHandler;

impl IndexHandler {
    /// Handle GET /
    pub async fn handle() -> Html<&'static str> {
        Html(INDEX_HTML)
    }
}
