use crate::events::GENERATION_META;
use codenano_preview::sandbox_attribute;

const SANDBOX_PLACEHOLDER: &str = "__SANDBOX__";
const GENERATION_PLACEHOLDER: &str = "__GENERATION_META__";

/// The page served at `/`, with the sandbox policy filled in
pub fn host_page() -> String {
    HOST_HTML
        .replace(SANDBOX_PLACEHOLDER, &sandbox_attribute())
        .replace(GENERATION_PLACEHOLDER, GENERATION_META)
}

const HOST_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>CodeNANO</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            background: #f5f5f5;
            height: 100vh;
            display: flex;
            flex-direction: column;
        }
        .header {
            padding: 10px 16px;
            background: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            display: flex;
            align-items: center;
            gap: 12px;
        }
        .header h1 { font-size: 16px; color: #333; flex: 1; }
        .status { display: flex; align-items: center; gap: 8px; font-size: 13px; color: #666; }
        .status-dot { width: 8px; height: 8px; border-radius: 50%; background: #22c55e; }
        .status-dot.disconnected { background: #ef4444; }
        button, select {
            font: inherit;
            font-size: 13px;
            padding: 4px 10px;
            border: 1px solid #ddd;
            border-radius: 4px;
            background: white;
            cursor: pointer;
        }
        button.active { background: #333; color: white; border-color: #333; }
        .main { flex: 1; display: flex; min-height: 0; }
        .editor { width: 45%; display: flex; flex-direction: column; border-right: 1px solid #ddd; background: white; }
        .tabs { display: flex; gap: 2px; padding: 6px 6px 0; background: #eee; overflow-x: auto; }
        .tab { padding: 6px 12px; font-size: 13px; background: #ddd; border-radius: 4px 4px 0 0; cursor: pointer; white-space: nowrap; }
        .tab.active { background: white; }
        .buffer { flex: 1; display: flex; min-height: 0; font-family: 'Monaco', 'Menlo', 'Courier New', monospace; font-size: 13px; line-height: 1.5; }
        .gutter { padding: 8px; color: #999; text-align: right; background: #fafafa; user-select: none; overflow: hidden; white-space: pre; }
        textarea { flex: 1; padding: 8px; border: none; outline: none; resize: none; font: inherit; white-space: pre; }
        .stage { flex: 1; display: flex; flex-direction: column; min-width: 0; }
        .frame-host { flex: 1; display: flex; justify-content: center; align-items: flex-start; padding: 16px; overflow: auto; }
        iframe { border: 1px solid #ddd; background: white; width: 100%; height: 100%; }
        .console { height: 180px; overflow-y: auto; background: #1e1e1e; color: #ddd; font-family: 'Monaco', 'Menlo', 'Courier New', monospace; font-size: 12px; }
        .console-line { padding: 2px 8px; border-bottom: 1px solid #2a2a2a; white-space: pre-wrap; }
        .console-error { color: #f87171; }
        .console-warn { color: #fbbf24; }
        .console-info { color: #60a5fa; }
    </style>
</head>
<body>
    <div class="header">
        <h1>CodeNANO</h1>
        <select id="mode">
            <option value="html">HTML</option>
            <option value="react">React</option>
            <option value="vue">Vue</option>
            <option value="nextjs">Next.js</option>
        </select>
        <button data-device="desktop" class="active">Desktop</button>
        <button data-device="tablet">Tablet</button>
        <button data-device="mobile">Mobile</button>
        <button id="refresh">Refresh</button>
        <div class="status">
            <div class="status-dot disconnected" id="status-dot"></div>
            <span id="status-text">Connecting...</span>
        </div>
    </div>
    <div class="main">
        <div class="editor">
            <div class="tabs" id="tabs"></div>
            <div class="buffer">
                <div class="gutter" id="gutter">1</div>
                <textarea id="source" spellcheck="false"></textarea>
            </div>
        </div>
        <div class="stage">
            <div class="frame-host" id="frame-host"></div>
            <div class="console" id="console"></div>
        </div>
    </div>
    <script>
        const SANDBOX = "__SANDBOX__";
        const frameHost = document.getElementById('frame-host');
        const consolePanel = document.getElementById('console');
        const statusDot = document.getElementById('status-dot');
        const statusText = document.getElementById('status-text');
        const tabsEl = document.getElementById('tabs');
        const gutter = document.getElementById('gutter');
        const source = document.getElementById('source');
        const modeSelect = document.getElementById('mode');

        let ws = null;
        let reconnectDelay = 1000;
        let frame = null;
        let sandboxKey = null;
        let files = [];
        let activePath = null;
        let saveTimer = null;

        function send(message) {
            if (ws && ws.readyState === WebSocket.OPEN) {
                ws.send(JSON.stringify(message));
            }
        }

        function api(method, path, body) {
            return fetch(path, {
                method,
                headers: { 'Content-Type': 'application/json' },
                body: body === undefined ? undefined : JSON.stringify(body),
            }).then(r => r.json().catch(() => null));
        }

        // Messages posted by the sandbox are forwarded verbatim
        window.addEventListener('message', (event) => {
            if (frame && event.source === frame.contentWindow) {
                send(event.data);
            }
        });

        function ensureFrame(key) {
            if (frame && sandboxKey === key) return frame;
            if (frame) frame.remove();
            frame = document.createElement('iframe');
            frame.setAttribute('sandbox', SANDBOX);
            frame.setAttribute('title', 'Preview');
            frameHost.appendChild(frame);
            sandboxKey = key;
            const created = frame;
            // Report the generation stamped into the document that loaded,
            // not the one most recently requested
            created.addEventListener('load', () => {
                const doc = created.contentDocument;
                const meta = doc && doc.querySelector('meta[name="__GENERATION_META__"]');
                if (meta) send({ type: 'loaded', generation: Number(meta.content) });
            });
            return frame;
        }

        function render(data) {
            consolePanel.innerHTML = '';
            const target = ensureFrame(data.sandboxKey);
            target.srcdoc = data.document;
            applyDevice(data.device);
        }

        function applyDevice(device, width, height) {
            const sizes = { tablet: [768, 1024], mobile: [375, 667] };
            const size = width && height ? [width, height] : sizes[device];
            if (frame) {
                frame.style.width = size ? size[0] + 'px' : '100%';
                frame.style.height = size ? size[1] + 'px' : '100%';
            }
            document.querySelectorAll('[data-device]').forEach(b =>
                b.classList.toggle('active', b.dataset.device === device));
        }

        function appendConsole(kind, content) {
            const line = document.createElement('div');
            line.className = 'console-line console-' + kind;
            line.textContent = content;
            consolePanel.appendChild(line);
            consolePanel.scrollTop = consolePanel.scrollHeight;
        }

        function renderTabs() {
            tabsEl.innerHTML = '';
            files.forEach(file => {
                const tab = document.createElement('div');
                tab.className = 'tab' + (file.path === activePath ? ' active' : '');
                tab.textContent = file.name;
                tab.onclick = () => selectFile(file.path);
                tabsEl.appendChild(tab);
            });
        }

        function updateGutter() {
            const lines = source.value.split('\n').length;
            gutter.textContent = Array.from({ length: lines }, (_, i) => i + 1).join('\n');
        }

        function selectFile(path) {
            activePath = path;
            const file = files.find(f => f.path === path);
            source.value = file ? file.content : '';
            updateGutter();
            renderTabs();
        }

        function scheduleSave() {
            const file = files.find(f => f.path === activePath);
            if (!file) return;
            file.content = source.value;
            clearTimeout(saveTimer);
            saveTimer = setTimeout(() => {
                api('PUT', '/api/files/' + encodeURI(file.path), { content: file.content });
            }, 300);
        }

        source.addEventListener('input', () => { updateGutter(); scheduleSave(); });
        source.addEventListener('scroll', () => { gutter.scrollTop = source.scrollTop; });
        source.addEventListener('keydown', (event) => {
            if (event.key !== 'Tab') return;
            event.preventDefault();
            const start = source.selectionStart;
            source.value = source.value.slice(0, start) + '  ' + source.value.slice(source.selectionEnd);
            source.selectionStart = source.selectionEnd = start + 2;
            updateGutter();
            scheduleSave();
        });

        modeSelect.addEventListener('change', () => api('PUT', '/api/mode', { mode: modeSelect.value }));
        document.getElementById('refresh').addEventListener('click', () => api('POST', '/api/refresh'));
        document.querySelectorAll('[data-device]').forEach(button =>
            button.addEventListener('click', () => api('PUT', '/api/device', { device: button.dataset.device })));

        function loadState() {
            api('GET', '/api/state').then(state => {
                if (!state) return;
                files = state.files;
                modeSelect.value = state.mode;
                selectFile(state.session.active || (files[0] && files[0].path));
            });
        }

        function connect() {
            ws = new WebSocket(`ws://${location.host}/ws`);

            ws.onopen = () => {
                statusDot.classList.remove('disconnected');
                statusText.textContent = 'Connected';
                reconnectDelay = 1000;
                loadState();
            };

            ws.onmessage = (event) => {
                const data = JSON.parse(event.data);
                if (data.type === 'render') {
                    render(data);
                } else if (data.type === 'device') {
                    applyDevice(data.device, data.width, data.height);
                } else if (data.type === 'console') {
                    appendConsole(data.kind, data.content);
                }
            };

            ws.onclose = () => {
                statusDot.classList.add('disconnected');
                statusText.textContent = 'Disconnected - Reconnecting...';
                setTimeout(connect, reconnectDelay);
                reconnectDelay = Math.min(reconnectDelay * 1.5, 10000);
            };
        }

        connect();
    </script>
</body>
</html>
"#;
