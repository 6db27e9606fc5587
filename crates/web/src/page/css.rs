//! Dashboard CSS styles
//!
//! The `.status` banner is hidden unless it also carries `.show`, which the
//! status board removes when a message expires.

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: #333;
    padding: 20px;
    min-height: 100vh;
}

.container { max-width: 1200px; margin: 0 auto; }

header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 24px;
    color: white;
}

header form { display: inline; }

.btn {
    padding: 10px 18px;
    border: none;
    border-radius: 8px;
    font-size: 14px;
    cursor: pointer;
    background: white;
    color: #667eea;
    font-weight: 600;
}

.btn:disabled { opacity: 0.6; cursor: not-allowed; }

.metrics {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
    gap: 20px;
}

.metric-card {
    background: white;
    border-radius: 12px;
    padding: 20px;
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.1);
}

.metric-label { font-size: 13px; color: #888; text-transform: uppercase; }
.metric-value { font-size: 32px; font-weight: 700; color: #667eea; margin-top: 8px; }

.scan-time { color: white; margin: 16px 0; font-size: 14px; }

.panel {
    background: rgba(255, 255, 255, 0.9);
    border-radius: 12px;
    padding: 20px;
    margin-top: 20px;
}

.status {
    display: none;
    padding: 12px 16px;
    border-radius: 8px;
    margin-bottom: 16px;
}

.status.show { display: block; }
.status.success { background: #d4edda; color: #155724; }
.status.error { background: #f8d7da; color: #721c24; }

table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid #eee; font-size: 14px; }
th { color: #667eea; }
.severity-HIGH { color: #c0392b; font-weight: 600; }
.severity-MEDIUM { color: #d68910; font-weight: 600; }
";
