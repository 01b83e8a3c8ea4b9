//! Page templates. Everything here is string interpolation over already
//! prepared posts; user-provided strings are escaped, cleaned post bodies
//! are inserted as-is.

use crate::excerpt::excerpt;
use blog_mirror_core::html::html_escape;
use blog_mirror_core::{Comment, Post, SiteConfig};

const UNTITLED: &str = "Sans titre";

struct PageMeta<'a> {
    title: String,
    description: &'a str,
    canonical: String,
    og_type: &'a str,
}

/// Absolute URL of a post on the published site
pub fn post_url(config: &SiteConfig, post: &Post) -> String {
    format!("{}/{}/", config.site.site_url, post.slug)
}

fn home_url(config: &SiteConfig) -> String {
    format!("{}/", config.site.site_url)
}

fn post_title(post: &Post) -> &str {
    if post.title.is_empty() {
        UNTITLED
    } else {
        &post.title
    }
}

fn post_excerpt(post: &Post, config: &SiteConfig) -> String {
    excerpt(
        &post.content_html,
        &config.render.marketing_text,
        config.render.excerpt_length,
    )
}

/// Wrap page content in the shared head, header and footer
fn layout(config: &SiteConfig, meta: &PageMeta, main: &str) -> String {
    let title = html_escape(&meta.title);
    let description = html_escape(meta.description);
    let canonical = html_escape(&meta.canonical);
    let footer = if config.site.author.is_empty() {
        html_escape(&config.site.title)
    } else {
        format!(
            "{} · {}",
            html_escape(&config.site.author),
            html_escape(&config.site.title)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="description" content="{description}">
    <link rel="canonical" href="{canonical}">
    <meta property="og:type" content="{og_type}">
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:url" content="{canonical}">
    <meta property="og:site_name" content="{site_title}">
    <link rel="stylesheet" href="/style.css">
</head>
<body>
    <header class="site-header">
        <a href="/" class="site-title">{site_title}</a>
        <p class="site-description">{site_description}</p>
    </header>
    <main>
{main}
    </main>
    <footer class="site-footer">
        <p>{footer}</p>
    </footer>
</body>
</html>
"#,
        lang = html_escape(&config.site.language),
        title = title,
        description = description,
        canonical = canonical,
        og_type = meta.og_type,
        site_title = html_escape(&config.site.title),
        site_description = html_escape(&config.site.description),
        main = main,
        footer = footer,
    )
}

fn date_markup(post: &Post) -> String {
    let display = html_escape(post.display_date());
    match post.parsed_date {
        Some(date) => format!(
            r#"<time class="post-date" datetime="{}">{}</time>"#,
            date.format("%Y-%m-%d"),
            display
        ),
        None => format!(r#"<span class="post-date">{}</span>"#, display),
    }
}

fn comments_markup(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return String::new();
    }

    let items: String = comments
        .iter()
        .map(|comment| {
            format!(
                r#"
            <li class="comment">
                <p class="comment-author">{}</p>
                <div class="comment-text">{}</div>
            </li>"#,
                html_escape(&comment.author),
                html_escape(&comment.text).replace('\n', "<br>")
            )
        })
        .collect();

    let heading = if comments.len() == 1 {
        "1 commentaire".to_string()
    } else {
        format!("{} commentaires", comments.len())
    };

    format!(
        r#"
        <section class="comments">
            <h2>{}</h2>
            <ol>{}
            </ol>
        </section>"#,
        heading, items
    )
}

fn nav_markup(previous: Option<&Post>, next: Option<&Post>) -> String {
    if previous.is_none() && next.is_none() {
        return String::new();
    }

    let previous = previous
        .map(|p| {
            format!(
                r#"<a class="prev" rel="prev" href="/{}/">← {}</a>"#,
                html_escape(&p.slug),
                html_escape(post_title(p))
            )
        })
        .unwrap_or_default();
    let next = next
        .map(|p| {
            format!(
                r#"<a class="next" rel="next" href="/{}/">{} →</a>"#,
                html_escape(&p.slug),
                html_escape(post_title(p))
            )
        })
        .unwrap_or_default();

    format!(
        r#"
        <nav class="post-nav">
            {}
            {}
        </nav>"#,
        previous, next
    )
}

/// Full page for one post.
///
/// `previous` is the next-older post and `next` the next-newer one.
pub fn render_post(
    post: &Post,
    previous: Option<&Post>,
    next: Option<&Post>,
    config: &SiteConfig,
) -> String {
    let description = post_excerpt(post, config);
    let meta = PageMeta {
        title: format!("{} | {}", post_title(post), config.site.title),
        description: &description,
        canonical: post_url(config, post),
        og_type: "article",
    };

    let main = format!(
        r#"        <article class="post">
            <header>
                <h1>{title}</h1>
                {date}
            </header>
            <div class="post-content">
{content}
            </div>
        </article>{comments}{nav}"#,
        title = html_escape(post_title(post)),
        date = date_markup(post),
        content = post.content_html,
        comments = comments_markup(&post.comments),
        nav = nav_markup(previous, next),
    );

    layout(config, &meta, &main)
}

/// Homepage listing every post, in the given order
pub fn render_index(posts: &[Post], config: &SiteConfig) -> String {
    let items: String = posts
        .iter()
        .map(|post| {
            format!(
                r#"
            <li>
                <h2><a href="/{slug}/">{title}</a></h2>
                {date}
                <p class="excerpt">{excerpt}</p>
            </li>"#,
                slug = html_escape(&post.slug),
                title = html_escape(post_title(post)),
                date = date_markup(post),
                excerpt = html_escape(&post_excerpt(post, config)),
            )
        })
        .collect();

    let meta = PageMeta {
        title: config.site.title.clone(),
        description: &config.site.description,
        canonical: home_url(config),
        og_type: "website",
    };

    let main = format!(
        r#"        <ul class="post-list">{}
        </ul>"#,
        items
    );

    layout(config, &meta, &main)
}

pub fn render_not_found(config: &SiteConfig) -> String {
    let meta = PageMeta {
        title: format!("Page introuvable | {}", config.site.title),
        description: &config.site.description,
        canonical: format!("{}/404.html", config.site.site_url),
        og_type: "website",
    };

    let main = r#"        <article class="post">
            <h1>Page introuvable</h1>
            <p>Cette page n'existe pas ou a été déplacée.</p>
            <p><a href="/">Retour à l'accueil</a></p>
        </article>"#;

    layout(config, &meta, main)
}

/// XML sitemap: homepage first, then every post with its date when known
pub fn render_sitemap(posts: &[Post], config: &SiteConfig) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
"#,
    );

    xml.push_str(&format!(
        "  <url>\n    <loc>{}</loc>\n  </url>\n",
        html_escape(&home_url(config))
    ));

    for post in posts {
        let lastmod = post
            .parsed_date
            .map(|d| format!("\n    <lastmod>{}</lastmod>", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>{}\n  </url>\n",
            html_escape(&post_url(config, post)),
            lastmod
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn render_robots(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        config.site.site_url
    )
}
