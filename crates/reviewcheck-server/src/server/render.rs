use reviewcheck_classifiers::ModelRegistry;
use reviewcheck_core::{ModelKey, PredictionResult};
use rust_embed::Embed;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Embed)]
#[folder = "templates"]
struct PageTemplates;

/// The single form page
pub const INDEX_TEMPLATE: &str = "index.html";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template '{0}' not found")]
    Missing(String),

    #[error("template '{0}' is not valid UTF-8")]
    Encoding(String),

    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),

    #[error("template error: {0}")]
    Liquid(#[from] liquid::Error),
}

/// Values the form page can display
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageContext {
    pub prediction_text: Option<String>,
    pub fake_prob: Option<String>,
    pub real_prob: Option<String>,
    pub submitted_review: Option<String>,
    pub last_model_choice: Option<String>,
    pub models: Vec<ModelOption>,
}

/// One entry of the model picker
#[derive(Debug, Clone, Serialize)]
pub struct ModelOption {
    pub key: &'static str,
    pub label: &'static str,
    pub loaded: bool,
}

impl PageContext {
    /// Empty form listing every model key
    pub fn empty(registry: &ModelRegistry) -> Self {
        let models = ModelKey::ALL
            .iter()
            .map(|key| ModelOption {
                key: key.as_str(),
                label: key.display_name(),
                loaded: registry.has_model(*key),
            })
            .collect();

        Self {
            models,
            ..Default::default()
        }
    }

    /// Form populated with a prediction
    pub fn with_result(mut self, result: PredictionResult) -> Self {
        self.prediction_text = Some(result.prediction_text);
        self.fake_prob = Some(result.fake_prob);
        self.real_prob = Some(result.real_prob);
        self.submitted_review = Some(result.submitted_review);
        self.last_model_choice = Some(result.last_model_choice);
        self
    }

    /// Form showing only a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.prediction_text = Some(message.into());
        self
    }
}

enum TemplateSource {
    /// Compiled into the binary and parsed once at startup
    Embedded(liquid::Template),

    /// Read from disk on every render so edits show up without a restart
    Directory { dir: PathBuf, parser: liquid::Parser },
}

/// Renders the form page with liquid
pub struct PageRenderer {
    source: TemplateSource,
}

impl PageRenderer {
    /// Use the template compiled into the binary
    pub fn embedded() -> Result<Self, RenderError> {
        let content = <PageTemplates as Embed>::get(INDEX_TEMPLATE)
            .ok_or_else(|| RenderError::Missing(INDEX_TEMPLATE.to_string()))?;
        let text = std::str::from_utf8(&content.data)
            .map_err(|_| RenderError::Encoding(INDEX_TEMPLATE.to_string()))?;

        let template = parser()?.parse(text)?;
        Ok(Self {
            source: TemplateSource::Embedded(template),
        })
    }

    /// Load `index.html` from `dir` on each render
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref().to_path_buf();
        let path = dir.join(INDEX_TEMPLATE);
        if !path.is_file() {
            return Err(RenderError::Missing(path.display().to_string()));
        }

        Ok(Self {
            source: TemplateSource::Directory {
                dir,
                parser: parser()?,
            },
        })
    }

    pub fn render(&self, page: &PageContext) -> Result<String, RenderError> {
        let globals = liquid::to_object(page)?;

        match &self.source {
            TemplateSource::Embedded(template) => Ok(template.render(&globals)?),
            TemplateSource::Directory { dir, parser } => {
                let text = std::fs::read_to_string(dir.join(INDEX_TEMPLATE))?;
                Ok(parser.parse(&text)?.render(&globals)?)
            }
        }
    }
}

fn parser() -> Result<liquid::Parser, RenderError> {
    Ok(liquid::ParserBuilder::with_stdlib().build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewcheck_core::{ClassProbabilities, Label};

    #[test]
    fn test_empty_page_lists_models() {
        let renderer = PageRenderer::embedded().unwrap();
        let html = renderer
            .render(&PageContext::empty(&ModelRegistry::default()))
            .unwrap();

        assert!(html.contains(r#"<form action="/predict" method="post">"#));
        assert!(html.contains(r#"value="rf""#));
        assert!(html.contains(r#"value="svc""#));
        assert!(html.contains(r#"value="lr""#));
        assert!(html.contains("(not loaded)"));
        assert!(!html.contains(r#"id="prediction""#));
        assert!(!html.contains(" selected"));
    }

    #[test]
    fn test_result_page_reselects_model_and_escapes_review() {
        let probs = ClassProbabilities::new(
            &[Label::ComputerGenerated, Label::Original],
            &[0.25, 0.75],
        );
        let result = PredictionResult::from_prediction(
            "<b>loved</b> it",
            ModelKey::SupportVector,
            Label::Original,
            &probs,
        );
        let page = PageContext::empty(&ModelRegistry::default()).with_result(result);
        let html = PageRenderer::embedded().unwrap().render(&page).unwrap();

        assert!(html.contains(r#"<option value="svc" selected>"#));
        assert!(html.contains("&lt;b&gt;loved&lt;/b&gt; it"));
        assert!(!html.contains("<b>loved</b>"));
        assert!(html.contains("Probability of being FAKE (CG): 25.0%"));
        assert!(html.contains("Probability of being REAL (OR): 75.0%"));
    }

    #[test]
    fn test_message_only_page() {
        let page = PageContext::empty(&ModelRegistry::default()).with_message("Something happened");
        let html = PageRenderer::embedded().unwrap().render(&page).unwrap();

        assert!(html.contains("Something happened"));
        assert!(!html.contains(r#"id="fake-prob""#));
        assert!(!html.contains(r#"id="real-prob""#));
    }

    #[test]
    fn test_directory_templates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_TEMPLATE), "v1 {{ prediction_text }}").unwrap();

        let renderer = PageRenderer::from_dir(dir.path()).unwrap();
        let page = PageContext::default().with_message("ok");
        assert_eq!(renderer.render(&page).unwrap(), "v1 ok");

        std::fs::write(dir.path().join(INDEX_TEMPLATE), "v2 {{ prediction_text }}").unwrap();
        assert_eq!(renderer.render(&page).unwrap(), "v2 ok");

        std::fs::remove_file(dir.path().join(INDEX_TEMPLATE)).unwrap();
        assert!(matches!(renderer.render(&page), Err(RenderError::Io(_))));
    }

    #[test]
    fn test_missing_template_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PageRenderer::from_dir(dir.path()),
            Err(RenderError::Missing(_))
        ));
    }
}
