/// Site stylesheet, written to `style.css`
pub const STYLESHEET: &str = r#"* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: Georgia, "Times New Roman", serif;
    line-height: 1.7;
    color: #2b2b2b;
    background: #fbfaf7;
}

a { color: #8a3b12; }
a:hover { color: #5c2509; }

.site-header, main, .site-footer {
    max-width: 720px;
    margin: 0 auto;
    padding: 0 1.25rem;
}

.site-header {
    padding-top: 2.5rem;
    padding-bottom: 1.5rem;
    border-bottom: 1px solid #e4ded4;
}

.site-title {
    font-size: 2rem;
    font-weight: bold;
    text-decoration: none;
    color: #2b2b2b;
}

.site-description {
    color: #777;
    font-style: italic;
}

main { padding-top: 2rem; padding-bottom: 3rem; }

.post-list { list-style: none; }

.post-list li {
    padding: 1.5rem 0;
    border-bottom: 1px solid #eee8de;
}

.post-list h2 { font-size: 1.4rem; line-height: 1.3; }
.post-list h2 a { text-decoration: none; }

.post-date {
    display: block;
    color: #999;
    font-size: 0.9rem;
    margin: 0.25rem 0 0.75rem;
}

.post h1 { font-size: 2rem; line-height: 1.25; }

.post-content p, .post-content ul, .post-content ol,
.post-content blockquote, .post-content figure {
    margin-bottom: 1.2rem;
}

.post-content ul, .post-content ol { padding-left: 1.5rem; }

.post-content img {
    max-width: 100%;
    height: auto;
    display: block;
    margin: 0 auto;
}

.post-content figcaption {
    text-align: center;
    color: #777;
    font-size: 0.9rem;
}

.post-content blockquote {
    border-left: 3px solid #d8cfc0;
    padding-left: 1rem;
    color: #555;
}

.comments {
    margin-top: 3rem;
    padding-top: 1.5rem;
    border-top: 1px solid #e4ded4;
}

.comments h2 { font-size: 1.2rem; margin-bottom: 1rem; }
.comments ol { list-style: none; }

.comment {
    padding: 1rem;
    margin-bottom: 1rem;
    background: #f3efe8;
    border-radius: 4px;
}

.comment-author { font-weight: bold; margin-bottom: 0.3rem; }

.post-nav {
    display: flex;
    justify-content: space-between;
    gap: 1rem;
    margin-top: 3rem;
}

.post-nav .next { margin-left: auto; text-align: right; }

.site-footer {
    padding-top: 1.5rem;
    padding-bottom: 2.5rem;
    border-top: 1px solid #e4ded4;
    color: #999;
    font-size: 0.85rem;
}

@media (max-width: 600px) {
    .site-title { font-size: 1.5rem; }
    .post h1 { font-size: 1.5rem; }
    .post-nav { flex-direction: column; }
}
"#;
