//! Browser page: two inputs, the generated strategy and a download button.
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

const PAGE: &str = "page";

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Sales Contact Finder</title>
  <style>
    body { font-family: sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; }
    label { display: block; margin: 1rem 0 .25rem; font-weight: 600; }
    input { width: 100%; padding: .5rem; }
    button { margin-top: 1rem; padding: .5rem 1rem; }
    pre { white-space: pre-wrap; background: #f6f8fa; padding: 1rem; }
    .warning { color: #9a6700; }
    .error { color: #cf222e; }
    .success { color: #1a7f37; }
  </style>
</head>
<body>
  <h1>🔍 Sales Contact Finder</h1>
  <form method="post" action="/">
    <label for="target_company">Target Company Name</label>
    <input id="target_company" name="target_company" placeholder="e.g. Google" value="{{target_company}}">
    <label for="our_product">Your Product/Service</label>
    <input id="our_product" name="our_product" placeholder="e.g. AI-powered CRM software" value="{{our_product}}">
    <button type="submit">Find Sales Contacts</button>
  </form>
  {{#if warning}}<p class="warning">{{warning}}</p>{{/if}}
  {{#if error}}<p class="error">An error occurred: {{error}}</p>{{/if}}
  {{#if markdown}}
  <p class="success">Found the following contacts and strategy:</p>
  <pre>{{markdown}}</pre>
  <form method="post" action="/v1/outreach/download">
    <textarea name="markdown" hidden>{{markdown}}</textarea>
    <button type="submit">Download Contact Strategy</button>
  </form>
  {{/if}}
</body>
</html>
"#;

/// Values shown on the page; every field is HTML-escaped
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub target_company: String,
    pub our_product: String,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub markdown: Option<String>,
}

pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_template_string(PAGE, PAGE_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, view: &PageView) -> Result<String, RenderError> {
        self.handlebars.render(PAGE, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page() {
        let html = PageRenderer::new().unwrap().render(&PageView::default()).unwrap();
        assert!(html.contains("Target Company Name"));
        assert!(html.contains("Your Product/Service"));
        assert!(!html.contains("Download Contact Strategy"));
    }

    #[test]
    fn test_result_is_escaped() {
        let view = PageView {
            target_company: "Globex".to_string(),
            our_product: "AI CRM".to_string(),
            markdown: Some("# Plan\n<script>alert(1)</script>".to_string()),
            ..PageView::default()
        };

        let html = PageRenderer::new().unwrap().render(&view).unwrap();
        assert!(html.contains("value=\"Globex\""));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Download Contact Strategy"));
    }
}
