//! Server-rendered pages.
//!
//! Templates are compiled into the binary and rendered with Tera. Every
//! template name ends in `.html`, so Tera escapes interpolated values; only
//! the rich-text article body is emitted with `safe`.

use serde::Serialize;
use tera::{Context, Tera};
use tracing::error;

use crate::domain::{Article, ArticleKind, Error};

const TEMPLATES: [(&str, &str); 7] = [
    ("base.html", include_str!("../../../templates/base.html")),
    ("admin/login.html", include_str!("../../../templates/admin/login.html")),
    ("admin/dashboard.html", include_str!("../../../templates/admin/dashboard.html")),
    ("admin/form.html", include_str!("../../../templates/admin/form.html")),
    ("articles/index.html", include_str!("../../../templates/articles/index.html")),
    ("articles/show.html", include_str!("../../../templates/articles/show.html")),
    ("not_found.html", include_str!("../../../templates/not_found.html")),
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Path segment of the public section listing `kind`.
pub fn section_for(kind: ArticleKind) -> &'static str {
    match kind {
        ArticleKind::Article => "articles",
        ArticleKind::News => "news",
    }
}

fn kind_label(kind: ArticleKind) -> &'static str {
    match kind {
        ArticleKind::Article => "مقاله",
        ArticleKind::News => "خبر",
    }
}

fn section_label(kind: ArticleKind) -> &'static str {
    match kind {
        ArticleKind::Article => "مقالات",
        ArticleKind::News => "اخبار",
    }
}

/// Display projection of an [`Article`].
#[derive(Debug, Serialize)]
struct ArticleView<'a> {
    id: i32,
    title: &'a str,
    summary: &'a str,
    content: &'a str,
    image_url: Option<String>,
    kind_label: &'static str,
    section: &'static str,
    section_label: &'static str,
    featured: bool,
    created: String,
}

impl<'a> From<&'a Article> for ArticleView<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            id: article.id.get(),
            title: &article.title,
            summary: &article.summary,
            content: &article.content,
            image_url: article.image.as_ref().map(|image| image.public_url()),
            kind_label: kind_label(article.kind),
            section: section_for(article.kind),
            section_label: section_label(article.kind),
            featured: article.featured,
            created: article.created_at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Values shown in the create or edit form.
///
/// Built from a stored article for editing, or from rejected input so the
/// form can be re-rendered with the admin's text intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleFormView {
    pub editing: bool,
    pub action: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub is_news: bool,
    pub featured: bool,
    pub image_url: Option<String>,
    pub error: Option<String>,
}

impl ArticleFormView {
    /// Empty form posting to `/admin/articles`.
    pub fn blank() -> Self {
        Self {
            action: "/admin/articles".to_owned(),
            ..Self::default()
        }
    }

    /// Form pre-filled with a stored article.
    pub fn editing(article: &Article) -> Self {
        Self {
            editing: true,
            action: format!("/admin/articles/{}", article.id),
            title: article.title.clone(),
            summary: article.summary.clone(),
            content: article.content.clone(),
            is_news: article.kind == ArticleKind::News,
            featured: article.featured,
            image_url: article.image.as_ref().map(|image| image.public_url()),
            error: None,
        }
    }

    /// Overlay submitted text fields.
    #[must_use]
    pub fn with_submitted(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(title) = get("title") {
            self.title = title;
        }
        if let Some(summary) = get("summary") {
            self.summary = summary;
        }
        if let Some(content) = get("content") {
            self.content = content;
        }
        if let Some(kind) = get("type") {
            self.is_news = kind.trim().eq_ignore_ascii_case("NEWS");
        }
        self.featured = get("featured").is_some_and(|flag| flag == "1" || flag == "on");
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_owned());
        self
    }
}

/// Renders the login, admin and public pages.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Compile the built-in templates.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    fn render(&self, name: &str, context: &Context) -> Result<String, Error> {
        self.tera.render(name, context).map_err(|err| {
            error!(template = name, error = %err, "template rendering failed");
            Error::internal(format!("failed to render {name}: {err}"))
        })
    }

    pub fn login(&self, error: Option<&str>) -> Result<String, Error> {
        let mut context = Context::new();
        context.insert("error", &error);
        self.render("admin/login.html", &context)
    }

    pub fn dashboard(&self, articles: &[Article]) -> Result<String, Error> {
        let views: Vec<ArticleView<'_>> = articles.iter().map(ArticleView::from).collect();
        let mut context = Context::new();
        context.insert("articles", &views);
        self.render("admin/dashboard.html", &context)
    }

    pub fn article_form(&self, form: &ArticleFormView) -> Result<String, Error> {
        let mut context = Context::new();
        context.insert("form", form);
        self.render("admin/form.html", &context)
    }

    /// Public listing for one category.
    pub fn article_list(&self, kind: ArticleKind, articles: &[Article]) -> Result<String, Error> {
        let views: Vec<ArticleView<'_>> = articles.iter().map(ArticleView::from).collect();
        let mut context = Context::new();
        context.insert("heading", section_label(kind));
        context.insert("articles", &views);
        self.render("articles/index.html", &context)
    }

    pub fn article_detail(&self, article: &Article) -> Result<String, Error> {
        let mut context = Context::new();
        context.insert("article", &ArticleView::from(article));
        self.render("articles/show.html", &context)
    }

    pub fn not_found(&self) -> Result<String, Error> {
        self.render("not_found.html", &Context::new())
    }
}
